// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Composite health of the registry, adapter and chain backends
//!
//! Each probe runs in its own task, so a probe that panics or hangs until its
//! deadline only affects its own flag. Probes are live-only: a backend answered
//! from fallback data is not healthy.

use std::{sync::Arc, time::Instant};

use api_client::{ApiClient, HealthCheckResult};
use shared_types::{ExplorerHealth, Network};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// Probe outcome for one backend
#[derive(Debug, Clone)]
pub struct BackendHealth {
    /// Backend name, see [`ApiClient::name`]
    pub name: &'static str,
    /// Probe result
    pub result: HealthCheckResult,
}

/// Composite health plus the individual probe results
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// The `{ok, registry, adapter, chain, network}` record
    pub health: ExplorerHealth,
    /// Registry, adapter and chain, in that order
    pub backends: Vec<BackendHealth>,
}

/// Aggregation failed as a whole
#[derive(Debug, Error)]
pub enum HealthError {
    /// A probe task was cancelled before reporting
    #[error("health probe for {backend} was cancelled")]
    ProbeCancelled {
        /// Backend whose probe was cancelled
        backend: &'static str,
    },
}

/// Probe the three backends concurrently and combine their flags
///
/// `ok` is true when at least one backend is healthy.
///
/// # Errors
///
/// Returns [`HealthError::ProbeCancelled`] if the runtime cancels a probe task
pub async fn aggregate<R, A, C>(
    registry: Arc<R>,
    adapter: Arc<A>,
    chain: Arc<C>,
    network: Network,
) -> Result<HealthReport, HealthError>
where
    R: ApiClient + 'static,
    A: ApiClient + 'static,
    C: ApiClient + 'static,
{
    let (registry, adapter, chain) = tokio::join!(
        spawn_probe(registry),
        spawn_probe(adapter),
        spawn_probe(chain)
    );
    let (registry, adapter, chain) = (registry?, adapter?, chain?);

    let health = ExplorerHealth::from_flags(
        registry.result.status.is_available(),
        adapter.result.status.is_available(),
        chain.result.status.is_available(),
        Some(network),
    );
    debug!(
        ok = health.ok,
        registry = health.registry,
        adapter = health.adapter,
        chain = health.chain,
        "health aggregation completed"
    );

    Ok(HealthReport {
        health,
        backends: vec![registry, adapter, chain],
    })
}

async fn spawn_probe<C: ApiClient + 'static>(client: Arc<C>) -> Result<BackendHealth, HealthError> {
    let name = client.name();
    let start_time = Instant::now();
    let outcome = tokio::spawn(async move {
        match client.health_check().await {
            Ok(status) => HealthCheckResult::with_status(status, start_time.elapsed()),
            Err(e) => {
                warn!(backend = client.name(), error = %e, "health probe failed");
                HealthCheckResult::unhealthy(start_time.elapsed(), e.to_string())
            }
        }
    })
    .await;

    match outcome {
        Ok(result) => Ok(BackendHealth { name, result }),
        Err(e) => probe_aborted(name, start_time, &e),
    }
}

fn probe_aborted(
    name: &'static str,
    start_time: Instant,
    e: &JoinError,
) -> Result<BackendHealth, HealthError> {
    if e.is_cancelled() {
        error!(backend = name, "health probe cancelled");
        return Err(HealthError::ProbeCancelled { backend: name });
    }
    error!(backend = name, error = %e, "health probe panicked");
    Ok(BackendHealth {
        name,
        result: HealthCheckResult::unhealthy(start_time.elapsed(), "probe panicked".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use api_client::{FetchError, HealthStatus, UnavailableReason};

    use super::*;

    #[derive(Debug)]
    enum Fake {
        Up,
        Unreachable,
        Panics,
    }

    #[derive(Debug)]
    struct FakeBackend {
        name: &'static str,
        behaviour: Fake,
    }

    impl FakeBackend {
        fn new(name: &'static str, behaviour: Fake) -> Arc<Self> {
            Arc::new(Self { name, behaviour })
        }
    }

    impl ApiClient for FakeBackend {
        #[allow(clippy::panic)]
        async fn health_check(&self) -> Result<HealthStatus, FetchError> {
            match self.behaviour {
                Fake::Up => Ok(HealthStatus::Up),
                Fake::Unreachable => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Err(FetchError::Unavailable {
                        endpoint: "/probe".to_string(),
                        reason: UnavailableReason::Timeout(Duration::from_millis(20)),
                    })
                }
                Fake::Panics => panic!("probe exploded"),
            }
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[tokio::test]
    async fn failing_adapter_does_not_affect_others() {
        let report = aggregate(
            FakeBackend::new("registry", Fake::Up),
            FakeBackend::new("adapter", Fake::Unreachable),
            FakeBackend::new("chain", Fake::Up),
            Network::default(),
        )
        .await
        .unwrap();

        let health = report.health;
        assert!(health.registry);
        assert!(!health.adapter);
        assert!(health.chain);
        assert!(health.ok);
        assert_eq!(health.network, Some(Network::default()));

        let names: Vec<_> = report.backends.iter().map(|b| b.name).collect();
        assert_eq!(names, ["registry", "adapter", "chain"]);
    }

    #[tokio::test]
    async fn panicking_probe_is_isolated() {
        let report = aggregate(
            FakeBackend::new("registry", Fake::Panics),
            FakeBackend::new("adapter", Fake::Up),
            FakeBackend::new("chain", Fake::Unreachable),
            Network::new("137"),
        )
        .await
        .unwrap();

        assert!(!report.health.registry);
        assert!(report.health.adapter);
        assert!(!report.health.chain);
        assert!(report.health.ok);
        assert_eq!(
            report.backends[0].result.status.description(),
            "probe panicked"
        );
    }

    #[tokio::test]
    async fn all_down_is_not_ok() {
        let report = aggregate(
            FakeBackend::new("registry", Fake::Unreachable),
            FakeBackend::new("adapter", Fake::Unreachable),
            FakeBackend::new("chain", Fake::Unreachable),
            Network::default(),
        )
        .await
        .unwrap();
        assert!(!report.health.ok);
    }
}
