// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Upstream fixtures for explorer tests
//!
//! Builds an [`Explorer`] against wiremock servers standing in for the registry,
//! the adapter and the JSON-RPC node.

use std::time::Duration;

use api_client::FetcherConfig;
use external_apis::{AdapterClient, BrandSettings, ChainClient, ChainConfig, Explorer, RegistryClient};
use serde_json::{Value, json};
use shared_types::Network;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

pub const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
pub const UNREACHABLE: &str = "http://127.0.0.1:1";
pub const TEST_DEADLINE: Duration = Duration::from_millis(300);

/// Where each backend lives; `rpc` of `None` leaves the chain unconfigured
#[derive(Debug)]
pub struct Upstreams<'a> {
    pub registry: &'a str,
    pub adapter: &'a str,
    pub rpc: Option<&'a str>,
    pub block_explorer: Option<&'a str>,
}

impl Default for Upstreams<'_> {
    fn default() -> Self {
        Self {
            registry: UNREACHABLE,
            adapter: UNREACHABLE,
            rpc: None,
            block_explorer: None,
        }
    }
}

pub fn explorer(upstreams: &Upstreams<'_>) -> Explorer {
    let fetcher = |base: &str| {
        FetcherConfig::new(Url::parse(base).unwrap()).with_deadline(TEST_DEADLINE)
    };
    let chain = ChainClient::new(ChainConfig {
        rpc_url: upstreams.rpc.map(|u| Url::parse(u).unwrap()),
        block_explorer_url: upstreams.block_explorer.map(|u| Url::parse(u).unwrap()),
        network: Network::default(),
        deadline: TEST_DEADLINE,
    })
    .unwrap();

    Explorer::new(
        RegistryClient::new(fetcher(upstreams.registry)).unwrap(),
        AdapterClient::new(fetcher(upstreams.adapter)).unwrap(),
        chain,
        BrandSettings::default(),
    )
}

pub fn retirement_body(certificate_id: &str, onchain_hash: Option<&str>) -> Value {
    json!({
        "certificateId": certificate_id,
        "projectId": "PROJ-002",
        "classId": "CLASS-002",
        "quantity": 250,
        "serialStart": 5001,
        "serialEnd": 5250,
        "factorRef": "FACTOR-007",
        "onchainHash": onchain_hash,
        "issuedAt": "2024-05-01T08:00:00Z"
    })
}

pub fn rpc_transaction() -> Value {
    json!({
        "hash": TX_HASH,
        "from": "0x1234567890123456789012345678901234567890",
        "to": "0x0987654321098765432109876543210987654321",
        "value": "0x0",
        "blockNumber": "0x10"
    })
}

pub async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mount_json(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_rpc(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result
        })))
        .mount(server)
        .await;
}

pub async fn mount_known_transaction(server: &MockServer) {
    mount_rpc(server, "eth_getTransactionByHash", rpc_transaction()).await;
    mount_rpc(server, "eth_getTransactionReceipt", json!({"status": "0x1"})).await;
}
