// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Carbon Explorer Server
//!
//! Read-only explorer for carbon-credit registry data and its on-chain tokens.

use anyhow::Result;
use api::{Server, ServerConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting carbon explorer server");

    let config = ServerConfig::from_env()?;
    info!(
        registry = %config.explorer.registry_api_url,
        adapter = %config.explorer.adapter_api_url,
        chain_id = %config.explorer.chain_id,
        "upstreams configured"
    );

    let server = Server::new(config)?;

    // NOTE: the `#[tokio::main]` task does not run a worker future, we must spawn
    tokio::spawn(async move { server.run().await }).await??;

    Ok(())
}
