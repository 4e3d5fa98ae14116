// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides the error types for server operations and maps upstream
//! failures onto HTTP responses the presentation layer can render.

use std::net::SocketAddr;

use api_client::FetchError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use external_apis::{ExplorerError, HealthError};
use shared_types::Network;
use thiserror::Error;

/// Comprehensive error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The requested record does not exist upstream
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of record, e.g. `project`
        resource: &'static str,
        /// Identifier as requested
        id: String,
    },

    /// An upstream failed and no fallback applies
    #[error("Unable to load {resource}, the {service} API is currently unavailable")]
    Upstream {
        /// Backend that failed
        service: &'static str,
        /// Kind of record that was being loaded
        resource: &'static str,
        /// Underlying failure
        #[source]
        source: FetchError,
    },

    /// Health aggregation failed as a whole
    #[error("Health check failed: {source}")]
    HealthCheck {
        /// Configured network, echoed in the error body
        network: Network,
        /// Underlying failure
        #[source]
        source: HealthError,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Wrap a client failure for `resource` served by `service`
    pub fn upstream(service: &'static str, resource: &'static str, source: FetchError) -> Self {
        match source {
            FetchError::InvalidRequest { message } => Self::ValidationError(message),
            source => Self::Upstream {
                service,
                resource,
                source,
            },
        }
    }

    /// Like [`ServerError::upstream`], with an upstream 404 reported as [`ServerError::NotFound`]
    pub fn lookup(
        service: &'static str,
        resource: &'static str,
        id: &str,
        source: FetchError,
    ) -> Self {
        if source.is_not_found() {
            Self::NotFound {
                resource,
                id: id.to_string(),
            }
        } else {
            Self::upstream(service, resource, source)
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. }
            | Self::HealthCheck { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError(..) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { source, .. } => match source {
                FetchError::RequestFailed { status: 404, .. } => StatusCode::NOT_FOUND,
                FetchError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
                FetchError::ProviderNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                FetchError::RequestFailed { .. }
                | FetchError::Unavailable { .. }
                | FetchError::ParseFailure { .. }
                | FetchError::Rpc { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl From<ExplorerError> for ServerError {
    fn from(error: ExplorerError) -> Self {
        match error {
            ExplorerError::NotFound { resource, id } => Self::NotFound { resource, id },
            ExplorerError::Upstream {
                service,
                resource,
                source,
            } => Self::upstream(service, resource, source),
            ExplorerError::Health { network, source } => Self::HealthCheck { network, source },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let json_body = match &self {
            ServerError::HealthCheck { network, .. } => serde_json::json!({
                "ok": false,
                "registry": false,
                "adapter": false,
                "chain": false,
                "network": network,
                "timestamp": chrono::Utc::now(),
                "error": self.to_string(),
            }),
            ServerError::Upstream { source, .. } => {
                tracing::warn!(error = %source, "upstream failure surfaced to client");
                serde_json::json!({
                    "error": self.to_string(),
                    "status": status.as_u16()
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16()
            }),
        };

        (status, Json(json_body)).into_response()
    }
}
