// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The boundary between the client and the ledger service.
//!
//! [`Ledger`] is everything the submission path needs from a node: a
//! reference block, the proposer's sequence number, a way to send a signed
//! transaction and a way to poll its result. [`HttpLedger`] implements it
//! over the access node REST API.

mod http;

pub use http::HttpLedger;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tx::SignedTransaction;
use crate::{Address, Error};

/// A 32 bytes ledger identifier, used for blocks and transactions
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier([u8; 32]);

/// Id of a submitted transaction
pub type TxId = Identifier;
/// Id of a block
pub type BlockId = Identifier;

impl Identifier {
    /// Creates an identifier from its bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the identifier bytes
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut bytes)
            .map_err(|_| Error::Ledger(format!("Invalid identifier `{s}`")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Lifecycle status of a transaction as reported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TxStatus {
    /// Waiting to be included in a block
    Pending,
    /// Included in a finalized block
    Finalized,
    /// Executed, not sealed yet
    Executed,
    /// Irreversibly included, with success or failure
    Sealed,
    /// Its reference block got too old before inclusion
    Expired,
    /// Not known to the node
    #[serde(other)]
    Unknown,
}

impl TxStatus {
    /// Returns `true` if the status will not change anymore
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Sealed | Self::Expired)
    }
}

/// An event emitted by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Fully qualified event type
    pub ty: String,
    /// JSON-Cadence encoded payload
    pub payload: Vec<u8>,
}

/// The result of a transaction at a given point of its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// Current status
    pub status: TxStatus,
    /// Execution error, empty on success
    pub error_message: String,
    /// Block including the transaction, if any
    pub block_id: Option<BlockId>,
    /// Compute units used
    pub computation_used: u64,
    /// Emitted events
    pub events: Vec<Event>,
}

impl TransactionResult {
    /// A result with the given status and nothing else
    pub fn with_status(status: TxStatus) -> Self {
        Self {
            status,
            error_message: String::new(),
            block_id: None,
            computation_used: 0,
            events: vec![],
        }
    }
}

/// Header of a sealed block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block id
    pub id: BlockId,
    /// Block height
    pub height: u64,
}

/// The operations the client needs from a ledger service
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Returns the latest sealed block, used as reference block
    async fn latest_block(&self) -> Result<BlockHeader, Error>;

    /// Returns the current sequence number of an account key
    async fn sequence_number(
        &self,
        address: Address,
        key_index: u32,
    ) -> Result<u64, Error>;

    /// Sends a signed transaction and returns its id
    async fn send_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<TxId, Error>;

    /// Returns the current result of a transaction
    async fn transaction_result(
        &self,
        id: &TxId,
    ) -> Result<TransactionResult, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        let hex =
            "dbc5a2c949516ecfb418406909d195c3cc267b46bd966a3ca9d66d2e13c47003";
        let id: Identifier = hex.parse().unwrap();
        assert_eq!(id.to_string(), hex);
        assert_eq!(format!("0x{hex}").parse::<Identifier>().unwrap(), id);
        assert!("abcd".parse::<Identifier>().is_err());
    }

    #[test]
    fn statuses() {
        let status: TxStatus = serde_json::from_str("\"Sealed\"").unwrap();
        assert_eq!(status, TxStatus::Sealed);
        assert!(status.is_final());

        let status: TxStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert!(!status.is_final());

        let status: TxStatus = serde_json::from_str("\"Expired\"").unwrap();
        assert_eq!(status, TxStatus::Expired);

        let status: TxStatus = serde_json::from_str("\"Weird\"").unwrap();
        assert_eq!(status, TxStatus::Unknown);
    }
}
