// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the `/api` read surface

mod fixtures;

use fixtures::{Upstreams, mount_json, mount_status, spawn};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::MockServer;

const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

#[tokio::test]
async fn stats_fall_back_when_registry_is_down() {
    let server = spawn(Upstreams::default()).await;
    let (status, body) = server.get_json("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalProjects"], 3);
    assert_eq!(body["totalIssued"], 26_000);
    assert_eq!(body["totalRetired"], 9_500);
    let rate = body["retirementRate"].as_f64().unwrap();
    assert!((rate - 9_500.0 / 26_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn live_registry_answer_is_passed_through() {
    let registry = MockServer::start().await;
    mount_json(
        &registry,
        "/reports/registry-stats",
        json!({"totalProjects": 3, "totalIssued": 10, "totalRetired": 5, "retirementRate": 0.5}),
    )
    .await;

    let server = spawn(Upstreams {
        registry: &registry.uri(),
        ..Upstreams::default()
    })
    .await;
    let (_, body) = server.get_json("/api/stats").await;
    assert_eq!(body["totalProjects"], 3);
}

#[tokio::test]
async fn project_listing_honours_filters() {
    let server = spawn(Upstreams::default()).await;

    let (status, body) = server.get_json("/api/projects?status=completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], "PROJ-003");
    assert_eq!(body["hasMore"], false);

    let (_, body) = server.get_json("/api/projects?q=india").await;
    assert_eq!(body["data"][0]["id"], "PROJ-002");
}

#[tokio::test]
async fn malformed_page_is_bad_request() {
    let server = spawn(Upstreams::default()).await;
    let response = server.get("/api/projects?page=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let registry = MockServer::start().await;
    mount_status(&registry, "/projects/PROJ-404", 404).await;

    let server = spawn(Upstreams {
        registry: &registry.uri(),
        ..Upstreams::default()
    })
    .await;
    let (status, body) = server.get_json("/api/projects/PROJ-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "project PROJ-404 not found");
}

#[tokio::test]
async fn registry_server_error_is_bad_gateway() {
    let registry = MockServer::start().await;
    mount_status(&registry, "/issuances/CLASS-001", 500).await;

    let server = spawn(Upstreams {
        registry: &registry.uri(),
        ..Upstreams::default()
    })
    .await;
    let (status, body) = server.get_json("/api/issuances/CLASS-001").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "Unable to load issuance, the registry API is currently unavailable"
    );
}

#[tokio::test]
async fn unusable_identifier_is_bad_request() {
    let server = spawn(Upstreams::default()).await;
    let response = server.get("/api/projects/bad%20id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_project_is_synthesised_from_fallback() {
    let server = spawn(Upstreams::default()).await;
    let (status, body) = server.get_json("/api/projects/PROJ-999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "PROJ-999");
    assert_eq!(body["status"], "unknown");

    let (_, evidence) = server.get_json("/api/projects/PROJ-999/evidence").await;
    assert_eq!(evidence, json!([]));
}

#[tokio::test]
async fn issuances_filter_by_project_status() {
    let server = spawn(Upstreams::default()).await;
    let (_, body) = server.get_json("/api/issuances?status=completed").await;

    let classes = body.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["classId"], "CLASS-004");
}

#[tokio::test]
async fn retirement_and_proof_without_chain() {
    let server = spawn(Upstreams::default()).await;

    let (_, cert) = server.get_json("/api/retirements/CERT-2024-001").await;
    assert_eq!(cert["certificateId"], "CERT-2024-001");
    assert_eq!(cert["quantity"], 1000);

    let (status, panel) = server
        .get_json("/api/retirements/CERT-2024-001/proof")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(panel["credits"]["serialRange"], "1,000,001\u{2013}1,001,000");
    assert_eq!(panel["tokens"], serde_json::Value::Null);
    assert_eq!(panel["notice"], "chain_unavailable");
}

#[tokio::test]
async fn adapter_reads_fall_back() {
    let server = spawn(Upstreams::default()).await;

    let (_, receipt) = server.get_json("/api/receipts/ADAPTER-TX-7").await;
    assert_eq!(receipt["adapterTxId"], "ADAPTER-TX-7");
    assert_eq!(receipt["status"], "completed");

    let (_, lookup) = server.get_json(&format!("/api/tx/{TX_HASH}")).await;
    assert_eq!(lookup["source"], "adapter");
    assert_eq!(lookup["transaction"]["hash"], TX_HASH);
    assert_eq!(lookup["transaction"]["status"], "success");
}

#[tokio::test]
async fn class_resolution_uses_camel_case_query() {
    let server = spawn(Upstreams::default()).await;

    let (status, body) = server
        .get_json("/api/classes/resolve?projectId=PROJ-001&vintageStart=2023-01-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    let classes = body.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["classId"], "CLASS-001");

    let response = server.get("/api/classes/resolve").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_transaction_without_chain_is_not_found() {
    let adapter = MockServer::start().await;
    mount_status(&adapter, &format!("/v1/tx/{TX_HASH}"), 404).await;

    let server = spawn(Upstreams {
        adapter: &adapter.uri(),
        ..Upstreams::default()
    })
    .await;
    let response = server.get(&format!("/api/tx/{TX_HASH}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ledger_context_is_explicit() {
    let server = spawn(Upstreams::default()).await;

    let (status, credits) = server.get_json("/api/ledgers/credits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(credits["ledger"], "credits");
    assert_eq!(credits["authority"], "Registry API (Off-chain, Authoritative)");
    assert_eq!(credits["environment"], "Local Development");
    assert_eq!(credits["brandName"], "Sim Registry");
    assert_eq!(credits["chainAvailable"], false);

    let (_, tokens) = server.get_json("/api/ledgers/tokens").await;
    assert_eq!(tokens["authority"], "Blockchain (On-chain Representation)");

    let response = server.get("/api/ledgers/bonds").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_id_is_propagated() {
    let server = spawn(Upstreams::default()).await;
    let response = server.get("/api/ledgers/credits").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = spawn(Upstreams::default()).await;
    let (status, doc) = server.get_json("/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/retirements/{certificate_id}/proof"].is_object());

    let page = server.get("/swagger-ui").await.text().await.unwrap();
    assert!(page.contains("/api-doc/openapi.json"));
}
