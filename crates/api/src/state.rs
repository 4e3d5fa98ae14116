// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the explorer server,
//! including configuration, the explorer facade, and coordinated cancellation.

use std::sync::Arc;

use external_apis::Explorer;
use shared_types::ExplorerHealth;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    error::ServerResult,
    metrics,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Registry, adapter and chain clients behind one facade
    explorer: Arc<Explorer>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `explorer` - Explorer facade shared by all handlers
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        explorer: Arc<Explorer>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            explorer,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Explorer facade
    pub fn explorer(&self) -> &Arc<Explorer> {
        &self.explorer
    }

    /// Probe all backends and record one metric sample per probe
    pub async fn health_check(&self) -> ServerResult<ExplorerHealth> {
        let report = self.explorer.health().await?;

        for backend in &report.backends {
            metrics::record_health_probe(backend.name, backend.result.status.is_available());
        }

        Ok(report.health)
    }
}

#[cfg(test)]
mod tests {
    use external_apis::{AdapterClient, BrandSettings, ChainClient, RegistryClient};
    use shared_types::Network;

    use super::*;

    fn explorer(config: &ServerConfig) -> Arc<Explorer> {
        let explorer = &config.explorer;
        Arc::new(Explorer::new(
            RegistryClient::new(explorer.registry_fetcher()).unwrap(),
            AdapterClient::new(explorer.adapter_fetcher()).unwrap(),
            ChainClient::unavailable(Network::default()),
            BrandSettings::default(),
        ))
    }

    #[test]
    fn server_state_creation() {
        let config = ServerConfig::default();
        let state = ServerState::new(config.clone(), explorer(&config), CancellationToken::new());

        assert!(!state.cancellation_token.is_cancelled());
        assert!(!state.explorer().chain().is_available());
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let config = ServerConfig::default();
        let token = CancellationToken::new();
        let state = ServerState::new(config.clone(), explorer(&config), token.clone());

        assert!(!state.cancellation_token.is_cancelled());

        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }
}
