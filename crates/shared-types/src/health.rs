// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Composite health record for the explorer's three backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ledger::Network;

/// Availability of the registry, adapter and chain backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExplorerHealth {
    /// True when at least one backend is available
    pub ok: bool,
    /// Registry API reachable
    pub registry: bool,
    /// Adapter API reachable
    pub adapter: bool,
    /// Chain provider configured
    pub chain: bool,
    /// Configured chain id
    pub network: Option<Network>,
    /// When the probes completed
    pub timestamp: DateTime<Utc>,
}

impl ExplorerHealth {
    /// Combine independent probe outcomes; `ok` is true if any backend is up
    pub fn from_flags(registry: bool, adapter: bool, chain: bool, network: Option<Network>) -> Self {
        Self {
            ok: registry || adapter || chain,
            registry,
            adapter,
            chain,
            network,
            timestamp: Utc::now(),
        }
    }
}
