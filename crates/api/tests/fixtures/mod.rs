// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Test fixtures for booting the explorer server against mock upstreams

use std::net::SocketAddr;

use api::{Server, ServerConfig, config::DeadlineMillis};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Nothing listens here, so every request fails at connect time
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// A running server; dropping it shuts the server down
pub struct TestServer {
    pub addr: SocketAddr,
    token: CancellationToken,
}

impl TestServer {
    pub fn url(&self, route: &str) -> String {
        format!("http://{}{route}", self.addr)
    }

    pub async fn get(&self, route: &str) -> reqwest::Response {
        reqwest::get(self.url(route))
            .await
            .expect("request to test server failed")
    }

    pub async fn get_json(&self, route: &str) -> (reqwest::StatusCode, Value) {
        let response = self.get(route).await;
        let status = response.status();
        let body = response.json().await.expect("response body is not JSON");
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Where the upstreams live; `rpc` of `None` leaves the chain unconfigured
#[derive(Debug, Clone, Copy)]
pub struct Upstreams<'a> {
    pub registry: &'a str,
    pub adapter: &'a str,
    pub rpc: Option<&'a str>,
}

impl Default for Upstreams<'_> {
    fn default() -> Self {
        Self {
            registry: UNREACHABLE,
            adapter: UNREACHABLE,
            rpc: None,
        }
    }
}

pub async fn spawn(upstreams: Upstreams<'_>) -> TestServer {
    let mut config = ServerConfig::for_testing();
    config.explorer.registry_api_url = upstreams.registry.parse().expect("registry URL");
    config.explorer.adapter_api_url = upstreams.adapter.parse().expect("adapter URL");
    config.explorer.rpc_url = upstreams.rpc.map(|u| u.parse().expect("RPC URL"));
    config.explorer.fetch_deadline_ms = DeadlineMillis::new(300).expect("deadline in range");

    let (addr, token) = Server::new(config)
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    TestServer { addr, token }
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
