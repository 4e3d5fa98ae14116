// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream fetching primitives for the carbon explorer
//!
//! This crate provides the pieces every upstream client is composed from:
//!
//! - [`HttpFetcher`]: a single-attempt GET with a fixed deadline that aborts the
//!   in-flight request when the deadline elapses
//! - [`FallbackTable`]: an ordered list of (matcher, payload builder) routes that
//!   synthesises a structurally valid payload for an endpoint
//! - [`FallbackFetcher`]: the two combined, substituting fallback payloads for
//!   transport failures only
//! - [`FetchError`]: the failure taxonomy shared by the HTTP and JSON-RPC clients
//! - [`ApiClient`]: the probe interface the health aggregator is written against

use std::time::Duration;

use thiserror::Error;

pub mod fallback;
pub mod fetcher;
pub mod health;
pub mod query;

pub use fallback::{EndpointPath, FallbackFetcher, FallbackRoute, FallbackTable};
pub use fetcher::{DEFAULT_FETCH_DEADLINE, FetcherConfig, HttpFetcher};
pub use health::*;
pub use query::{QueryParams, ResourceId};

/// Probe interface for an upstream backend
///
/// Each backend decides what a harmless liveness check means for it. A probe
/// never consults fallback payloads.
pub trait ApiClient: Send + Sync {
    /// Check whether this backend is currently usable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be reached at all
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, FetchError>> + Send;

    /// Get the name/identifier of this backend
    fn name(&self) -> &'static str;
}

/// Why an upstream could not be reached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnavailableReason {
    /// The deadline elapsed before a response arrived
    #[error("no response within {} ms", .0.as_millis())]
    Timeout(Duration),
    /// Connection refused, DNS failure or a broken connection
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failures raised by upstream clients
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    /// The upstream could not be reached; eligible for fallback
    #[error("upstream unavailable for {endpoint}: {reason}")]
    Unavailable {
        endpoint: String,
        reason: UnavailableReason,
    },

    /// The upstream answered with a non-success status
    #[error("API request failed for {endpoint}: {status} {status_text}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        status_text: String,
    },

    /// The body could not be decoded into the expected shape
    #[error("invalid response from {endpoint}: {message}")]
    ParseFailure { endpoint: String, message: String },

    /// No JSON-RPC provider is configured
    #[error("RPC provider not configured")]
    ProviderNotConfigured,

    /// The JSON-RPC node returned an error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request could not be built, e.g. an identifier unusable in a path
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl FetchError {
    /// Whether this failure is transport-level and should be served from fallback
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Whether the upstream reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }

    /// Upstream HTTP status, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
