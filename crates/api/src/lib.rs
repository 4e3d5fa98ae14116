// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Carbon Explorer Server Implementation
//!
//! This crate provides the HTTP server for the carbon-credit explorer, built with Axum.
//! It exposes the registry, adapter and chain data gathered by `external-apis` as a
//! read-only JSON surface.
//!
//! # Module Structure
//!
//! - [`config`]: Server and upstream configuration with hierarchical loading
//! - [`error`]: Error types and HTTP response mapping for upstream failures
//! - [`state`]: Shared application state with cancellation token support
//! - [`server`]: Server lifecycle, middleware stack and coordinated shutdown
//! - [`routes`]: Route table and request handlers under `/api`
//! - [`metrics`]: Prometheus request and health probe metrics
//! - [`docs`] and [`openapi`]: `OpenAPI` document and Swagger UI
//!
//! # Key Features
//!
//! - **Graceful degradation**: registry and adapter reads fall back to fixed sample data
//!   when an upstream is unreachable; the chain is optional
//! - **Live health**: `/api/health` probes every backend concurrently and never through
//!   fallback data
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`

pub mod config;
pub mod docs;
pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ExplorerConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::Server;
pub use state::ServerState;
