// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Liveness probe outcomes

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Health status of a single backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Backend answered
    Up,
    /// Backend is unreachable or failing
    Down { reason: String },
}

impl HealthStatus {
    /// Interpret a probe's HTTP status; only a 2xx answer counts as up
    pub fn from_probe_status(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Up
        } else {
            Self::Down {
                reason: format!("API returned status {}", status.as_u16()),
            }
        }
    }

    /// Check if this health status indicates the service is available
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            Self::Up => "Service is healthy",
            Self::Down { reason } => reason,
        }
    }
}

/// Probe outcome with timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// The health status
    pub status: HealthStatus,
    /// Time the probe took
    pub response_time: Duration,
    /// When the probe completed
    pub timestamp: DateTime<Utc>,
}

impl HealthCheckResult {
    /// A probe that found the backend available
    pub fn healthy(response_time: Duration) -> Self {
        Self::with_status(HealthStatus::Up, response_time)
    }

    /// A probe that found the backend unavailable
    pub fn unhealthy(response_time: Duration, reason: String) -> Self {
        Self::with_status(HealthStatus::Down { reason }, response_time)
    }

    /// Wrap an already computed status
    pub fn with_status(status: HealthStatus, response_time: Duration) -> Self {
        Self {
            status,
            response_time,
            timestamp: Utc::now(),
        }
    }
}
