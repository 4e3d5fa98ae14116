// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros,
//! a middleware recording per-route request metrics, and an Axum-compatible
//! metrics handler.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{MatchedPath, Request},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

const UNMATCHED_ROUTE: &str = "unmatched";

/// Total number of HTTP requests, labeled by matched route and status.
#[allow(clippy::expect_used)]
pub static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "explorer_http_requests_total",
        "Total number of HTTP requests, labeled by route and status",
        &["route", "status"]
    )
    .expect("Failed to create explorer_http_requests_total counter vec")
});

/// Histogram for HTTP request durations in seconds.
#[allow(clippy::expect_used)]
pub static HTTP_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "explorer_http_request_duration_seconds",
        "HTTP request durations in seconds",
        &["route"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to create HTTP request duration histogram")
});

/// Backend health probes, labeled by backend and result.
#[allow(clippy::expect_used)]
pub static HEALTH_PROBES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "explorer_health_probes_total",
        "Total number of backend health probes, labeled by backend and result",
        &["backend", "result"]
    )
    .expect("Failed to create explorer_health_probes_total counter vec")
});

/// Record one health probe outcome
///
/// # Arguments
/// * `backend` - `registry`, `adapter` or `chain`
/// * `up` - Whether the probe found the backend available
pub fn record_health_probe(backend: &str, up: bool) {
    let result = if up { "up" } else { "down" };
    HEALTH_PROBES.with_label_values(&[backend, result]).inc();
}

/// Observe one finished HTTP request
pub fn observe_request(route: &str, status: StatusCode, duration_secs: f64) {
    HTTP_REQUESTS
        .with_label_values(&[route, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[route])
        .observe(duration_secs);
}

/// Middleware recording count and latency per matched route
///
/// The route template (`/api/projects/{id}`) is used as label so identifiers do not
/// inflate label cardinality.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |p| p.as_str().to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    observe_request(&route, response.status(), start.elapsed().as_secs_f64());
    response
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
