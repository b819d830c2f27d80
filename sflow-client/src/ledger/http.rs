// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing::debug;

use super::{
    BlockHeader, Event, Identifier, Ledger, TransactionResult, TxId, TxStatus,
};
use crate::tx::{SignedTransaction, TransactionSignature};
use crate::{Address, Error};

/// Access node HTTP client, speaking the REST API
#[derive(Clone)]
pub struct HttpLedger {
    client: reqwest::Client,
    uri: String,
}

impl HttpLedger {
    /// Create a new HTTP Client
    ///
    /// # Errors
    /// This method errors if a TLS backend cannot be initialized, or the
    /// resolver cannot load the system configuration.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|_| Error::HttpClient)?;

        let uri: String = uri.into();
        let uri = uri.trim_end_matches('/').to_string();

        Ok(Self { client, uri })
    }

    /// Check the access node connection
    ///
    /// # Errors
    /// This method errors if there was an error while sending the request.
    pub async fn check_connection(&self) -> Result<(), Error> {
        self.latest_block().await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .client
            .get(format!("{}/v1/{path}", self.uri))
            .send()
            .await?;
        parse(check(response).await?).await
    }
}

/// Turns error statuses into errors.
///
/// Client errors carry the node's explanation and are classified as
/// rejections, server errors are ledger failures.
async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return Ok(response);
    }

    let body = response.bytes().await?;
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            String::from_utf8(body.to_vec())
                .unwrap_or("unparsable error".into())
        });

    if status.is_client_error() {
        Err(Error::from_rejection(message))
    } else {
        Err(Error::Ledger(format!("{status}: {message}")))
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::Ledger(e.to_string()))
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn latest_block(&self) -> Result<BlockHeader, Error> {
        let blocks: Vec<BlockJson> = self.get("blocks?height=sealed").await?;
        let block = blocks
            .into_iter()
            .next()
            .ok_or_else(|| Error::Ledger("No sealed block returned".into()))?;

        Ok(BlockHeader {
            id: block.header.id,
            height: block.header.height,
        })
    }

    async fn sequence_number(
        &self,
        address: Address,
        key_index: u32,
    ) -> Result<u64, Error> {
        let path = format!("accounts/{}?expand=keys", address.sans_prefix());
        let account: AccountJson = self.get(&path).await?;

        account
            .keys
            .into_iter()
            .find(|key| key.index == key_index)
            .map(|key| key.sequence_number)
            .ok_or_else(|| {
                Error::Authorization(format!(
                    "Account {address} has no key {key_index}"
                ))
            })
    }

    async fn send_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<TxId, Error> {
        let body = TransactionJson::from(tx);
        debug!(payer = %tx.payload.payer, "Sending transaction");

        let response = self
            .client
            .post(format!("{}/v1/transactions", self.uri))
            .json(&body)
            .send()
            .await?;
        let sent: SentJson = parse(check(response).await?).await?;

        Ok(sent.id)
    }

    async fn transaction_result(
        &self,
        id: &TxId,
    ) -> Result<TransactionResult, Error> {
        let response = self
            .client
            .get(format!("{}/v1/transaction_results/{id}", self.uri))
            .send()
            .await?;

        // not indexed by the node yet
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TransactionResult::with_status(TxStatus::Unknown));
        }

        let result: ResultJson = parse(check(response).await?).await?;
        Ok(result.into())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[serde_as]
#[derive(Deserialize)]
struct HeaderJson {
    #[serde_as(as = "DisplayFromStr")]
    id: Identifier,
    #[serde_as(as = "DisplayFromStr")]
    height: u64,
}

#[derive(Deserialize)]
struct BlockJson {
    header: HeaderJson,
}

#[serde_as]
#[derive(Deserialize)]
struct KeyJson {
    #[serde_as(as = "DisplayFromStr")]
    index: u32,
    #[serde_as(as = "DisplayFromStr")]
    sequence_number: u64,
}

#[derive(Deserialize)]
struct AccountJson {
    #[serde(default)]
    keys: Vec<KeyJson>,
}

#[serde_as]
#[derive(Deserialize)]
struct SentJson {
    #[serde_as(as = "DisplayFromStr")]
    id: Identifier,
}

#[derive(Deserialize)]
struct EventJson {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, with = "base64_vec_u8")]
    payload: Vec<u8>,
}

#[serde_as]
#[derive(Deserialize)]
struct ResultJson {
    #[serde(default)]
    block_id: String,
    status: TxStatus,
    #[serde(default)]
    error_message: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    computation_used: u64,
    #[serde(default)]
    events: Vec<EventJson>,
}

impl From<ResultJson> for TransactionResult {
    fn from(result: ResultJson) -> Self {
        Self {
            status: result.status,
            error_message: result.error_message,
            block_id: result.block_id.parse().ok(),
            computation_used: result.computation_used,
            events: result
                .events
                .into_iter()
                .map(|e| Event {
                    ty: e.ty,
                    payload: e.payload,
                })
                .collect(),
        }
    }
}

#[serde_as]
#[derive(Serialize)]
struct ProposalKeyJson {
    address: String,
    #[serde_as(as = "DisplayFromStr")]
    key_index: u32,
    #[serde_as(as = "DisplayFromStr")]
    sequence_number: u64,
}

#[serde_as]
#[derive(Serialize)]
struct SignatureJson {
    address: String,
    #[serde_as(as = "DisplayFromStr")]
    key_index: u32,
    #[serde(with = "base64_vec_u8")]
    signature: Vec<u8>,
}

impl From<&TransactionSignature> for SignatureJson {
    fn from(s: &TransactionSignature) -> Self {
        Self {
            address: s.address.sans_prefix(),
            key_index: s.key_index,
            signature: s.signature.clone(),
        }
    }
}

#[serde_as]
#[derive(Serialize)]
struct TransactionJson {
    #[serde(with = "base64_vec_u8")]
    script: Vec<u8>,
    arguments: Vec<String>,
    reference_block_id: String,
    #[serde_as(as = "DisplayFromStr")]
    gas_limit: u64,
    payer: String,
    proposal_key: ProposalKeyJson,
    authorizers: Vec<String>,
    payload_signatures: Vec<SignatureJson>,
    envelope_signatures: Vec<SignatureJson>,
}

impl From<&SignedTransaction> for TransactionJson {
    fn from(tx: &SignedTransaction) -> Self {
        let payload = &tx.payload;
        Self {
            script: payload.script.as_bytes().to_vec(),
            arguments: payload
                .arguments
                .iter()
                .map(|arg| BASE64.encode(arg))
                .collect(),
            reference_block_id: payload.reference_block.to_string(),
            gas_limit: payload.compute_limit,
            payer: payload.payer.sans_prefix(),
            proposal_key: ProposalKeyJson {
                address: payload.proposal_key.address.sans_prefix(),
                key_index: payload.proposal_key.key_index,
                sequence_number: payload.proposal_key.sequence_number,
            },
            authorizers: payload
                .authorizers
                .iter()
                .map(Address::sans_prefix)
                .collect(),
            payload_signatures: tx
                .payload_signatures
                .iter()
                .map(SignatureJson::from)
                .collect(),
            envelope_signatures: tx
                .envelope_signatures
                .iter()
                .map(SignatureJson::from)
                .collect(),
        }
    }
}

/// Serialize/deserialize `Vec<u8>` to/from Base64 string.
mod base64_vec_u8 {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(
            &base64::engine::general_purpose::STANDARD.encode(bytes),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}
