// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;
use sflow_client::ledger::TxStatus;
use sflow_client::{
    Client, Contracts, ErrorKind, HttpLedger, Identifier, Ledger, LocalSigner,
    SignerRoles,
};

const KEY: &str =
    "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const BLOCK_ID: &str =
    "7bc42fe85d32ca513769a74f97f7e1a7bad6c9407f0d934c2aa645ef9cf613c7";
const TX_ID: &str =
    "dbc5a2c949516ecfb418406909d195c3cc267b46bd966a3ca9d66d2e13c47003";

fn block_body() -> String {
    json!([{
        "header": {
            "id": BLOCK_ID,
            "parent_id": "00",
            "height": "42",
            "timestamp": "2021-10-01T00:00:00Z"
        }
    }])
    .to_string()
}

fn account_body() -> String {
    json!({
        "address": "0000000000000001",
        "balance": "100000",
        "keys": [
            {
                "index": "0",
                "public_key": "0x00",
                "signing_algorithm": "ECDSA_secp256k1",
                "hashing_algorithm": "SHA3_256",
                "sequence_number": "7",
                "weight": "1000",
                "revoked": false
            },
            {
                "index": "1",
                "sequence_number": "3"
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn latest_block() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/blocks")
        .match_query(Matcher::UrlEncoded("height".into(), "sealed".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(block_body())
        .create_async()
        .await;

    let ledger = HttpLedger::new(server.url()).unwrap();
    let block = ledger.latest_block().await.unwrap();

    assert_eq!(block.height, 42);
    assert_eq!(block.id.to_string(), BLOCK_ID);
    mock.assert_async().await;
}

#[tokio::test]
async fn sequence_numbers() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/accounts/0000000000000001")
        .match_query(Matcher::UrlEncoded("expand".into(), "keys".into()))
        .with_status(200)
        .with_body(account_body())
        .expect(3)
        .create_async()
        .await;

    let ledger = HttpLedger::new(server.url()).unwrap();
    let address = "0x01".parse().unwrap();

    assert_eq!(ledger.sequence_number(address, 0).await.unwrap(), 7);
    assert_eq!(ledger.sequence_number(address, 1).await.unwrap(), 3);

    let err = ledger.sequence_number(address, 2).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[tokio::test]
async fn transaction_results() {
    let mut server = Server::new_async().await;
    let path = format!("/v1/transaction_results/{TX_ID}");
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(
            json!({
                "block_id": BLOCK_ID,
                "status": "Sealed",
                "status_code": 0,
                "error_message": "",
                "computation_used": "31",
                "events": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let ledger = HttpLedger::new(server.url()).unwrap();
    let result = ledger
        .transaction_result(&TX_ID.parse().unwrap())
        .await
        .unwrap();

    assert_eq!(result.status, TxStatus::Sealed);
    assert_eq!(result.computation_used, 31);
    assert_eq!(result.block_id, Some(BLOCK_ID.parse().unwrap()));
}

#[tokio::test]
async fn unknown_transaction() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/v1/transaction_results/".into()))
        .with_status(404)
        .with_body(r#"{"code":404,"message":"transaction not found"}"#)
        .create_async()
        .await;

    let ledger = HttpLedger::new(server.url()).unwrap();
    let result = ledger
        .transaction_result(&Identifier::new([1; 32]))
        .await
        .unwrap();
    assert_eq!(result.status, TxStatus::Unknown);
}

#[tokio::test]
async fn error_responses() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/blocks")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let ledger = HttpLedger::new(server.url()).unwrap();

    let err = ledger.latest_block().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("upstream unavailable"));

    let err = ledger.check_connection().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn unreachable_node() {
    let ledger = HttpLedger::new("http://127.0.0.1:1").unwrap();
    let err = ledger.latest_block().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn stake_through_the_rest_api() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/blocks")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(block_body())
        .create_async()
        .await;
    server
        .mock("GET", "/v1/accounts/0000000000000001")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(account_body())
        .create_async()
        .await;
    let send = server
        .mock("POST", "/v1/transactions")
        .match_body(Matcher::PartialJson(json!({
            "reference_block_id": BLOCK_ID,
            "gas_limit": "9999",
            "payer": "0000000000000001",
            "proposal_key": {
                "address": "0000000000000001",
                "key_index": "0",
                "sequence_number": "7"
            },
            "authorizers": ["0000000000000001"],
            "payload_signatures": []
        })))
        .with_status(201)
        .with_body(json!({ "id": TX_ID }).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", format!("/v1/transaction_results/{TX_ID}").as_str())
        .with_status(200)
        .with_body(
            json!({
                "block_id": BLOCK_ID,
                "status": "Sealed",
                "error_message": "",
                "computation_used": "25",
                "events": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = "0xf8d6e0586b0a20c7".parse().unwrap();
    let contracts = Contracts::new()
        .with("FungibleToken", "0xee82856bf20e2aa6".parse().unwrap())
        .with("FlowToken", "0x0ae53cb6e3f42a79".parse().unwrap())
        .with("sFlowToken4", service)
        .with("sFlowStakingManager18", service);
    let ledger = Arc::new(HttpLedger::new(server.url()).unwrap());
    let client = Client::new(ledger, contracts)
        .with_poll_interval(Duration::from_millis(1));

    let address = "0x01".parse().unwrap();
    let signer = Arc::new(LocalSigner::from_hex(address, 0, KEY).unwrap());
    let receipt = client
        .stake(&SignerRoles::single(signer), "10.0".parse().unwrap())
        .await
        .unwrap();

    assert_eq!(receipt.id.to_string(), TX_ID);
    assert_eq!(receipt.computation_used, 25);
    send.assert_async().await;
}

#[tokio::test]
async fn rejected_submission() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/blocks")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(block_body())
        .create_async()
        .await;
    server
        .mock("GET", "/v1/accounts/0000000000000001")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(account_body())
        .create_async()
        .await;
    server
        .mock("POST", "/v1/transactions")
        .with_status(400)
        .with_body(r#"{"code":400,"message":"invalid transaction arguments"}"#)
        .create_async()
        .await;
    let results = server
        .mock("GET", Matcher::Regex("^/v1/transaction_results/".into()))
        .expect(0)
        .create_async()
        .await;

    let contracts = Contracts::new()
        .with("FungibleToken", "0xee82856bf20e2aa6".parse().unwrap())
        .with("FlowToken", "0x0ae53cb6e3f42a79".parse().unwrap())
        .with("sFlowStakingManager18", "0xf8d6e0586b0a20c7".parse().unwrap())
        .with("sFlowToken4", "0xf8d6e0586b0a20c7".parse().unwrap());
    let client = Client::connect(server.url(), contracts).unwrap();

    let address = "0x01".parse().unwrap();
    let signer = Arc::new(LocalSigner::from_hex(address, 0, KEY).unwrap());
    let err = client
        .unstake(&SignerRoles::single(signer), "1".parse().unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Argument);
    results.assert_async().await;
}
