// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the explorer server.

pub mod handlers;

use axum::{Router, middleware, routing::get};
use handlers::{
    health_handler, issuance_handler, issuances_handler, ledger_handler, project_evidence_handler,
    project_handler, projects_handler, proof_handler, receipt_handler, resolve_classes_handler,
    retirement_handler, stats_handler, transaction_handler,
};

use crate::{
    metrics::{metrics_handler, track_metrics},
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    // Documentation and metrics endpoints are not tracked
    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui))
        .route("/metrics", get(metrics_handler));

    let api_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/projects", get(projects_handler))
        .route("/projects/{id}", get(project_handler))
        .route("/projects/{id}/evidence", get(project_evidence_handler))
        .route("/issuances", get(issuances_handler))
        .route("/issuances/{id}", get(issuance_handler))
        .route("/retirements/{certificate_id}", get(retirement_handler))
        .route("/retirements/{certificate_id}/proof", get(proof_handler))
        .route("/receipts/{adapter_tx_id}", get(receipt_handler))
        .route("/classes/resolve", get(resolve_classes_handler))
        .route("/tx/{tx_hash}", get(transaction_handler))
        .route("/ledgers/{ledger}", get(ledger_handler))
        .route_layer(middleware::from_fn(track_metrics));

    Router::new()
        .merge(docs_routes)
        .nest("/api", api_routes)
}
