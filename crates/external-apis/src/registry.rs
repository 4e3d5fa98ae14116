// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Registry API client
//!
//! The registry is the off-chain source of record for projects, issuances and
//! retirements. Every read goes through a [`FallbackFetcher`], so an unreachable
//! registry yields the fallback payload for the endpoint instead of an error.

use std::time::Instant;

use api_client::{
    ApiClient, FallbackFetcher, FetchError, FetcherConfig, HealthStatus, HttpFetcher,
    QueryParams, ResourceId,
};
use shared_types::{
    ClassSummary, EvidenceAnchor, Page, ProjectDetail, ProjectSummary, RegistryStats,
    RetirementCert,
};
use tracing::{debug, info, warn};

use crate::fallbacks;

/// Service name used in logs and health output
pub const REGISTRY_SERVICE: &str = "registry";

const HEALTH_PROBE_ENDPOINT: &str = "/reports/registry-stats";

/// Filters for the project listing; absent or empty filters are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Lifecycle status, e.g. `active`
    pub status: Option<String>,
    /// Free-text search
    pub q: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl ProjectQuery {
    fn endpoint(&self) -> String {
        QueryParams::new()
            .optional("status", non_empty(self.status.as_deref()))
            .optional("q", non_empty(self.q.as_deref()))
            .optional("page", self.page.filter(|page| *page > 0))
            .append_to("/projects")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Typed accessor for the registry API
#[derive(Debug, Clone)]
pub struct RegistryClient {
    fetcher: FallbackFetcher,
}

impl RegistryClient {
    /// Create a registry client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config)?;
        debug!(base_url = %fetcher.base_url(), "created registry client");
        Ok(Self {
            fetcher: FallbackFetcher::new(REGISTRY_SERVICE, fetcher, fallbacks::registry_table()),
        })
    }

    /// `GET /reports/registry-stats`
    pub async fn registry_stats(&self) -> Result<RegistryStats, FetchError> {
        self.fetcher.get("/reports/registry-stats").await
    }

    /// `GET /projects[?status&q&page]`
    pub async fn projects(&self, query: &ProjectQuery) -> Result<Page<ProjectSummary>, FetchError> {
        self.fetcher.get(&query.endpoint()).await
    }

    /// `GET /projects/:id`
    pub async fn project(&self, id: &str) -> Result<ProjectDetail, FetchError> {
        let id = ResourceId::new(id)?;
        self.fetcher.get(&format!("/projects/{id}")).await
    }

    /// `GET /projects/:id/evidence`
    pub async fn project_evidence(&self, id: &str) -> Result<Vec<EvidenceAnchor>, FetchError> {
        let id = ResourceId::new(id)?;
        self.fetcher.get(&format!("/projects/{id}/evidence")).await
    }

    /// `GET /issuances[?status]`
    pub async fn issuances(&self, status: Option<&str>) -> Result<Vec<ClassSummary>, FetchError> {
        let endpoint = QueryParams::new()
            .optional("status", non_empty(status))
            .append_to("/issuances");
        self.fetcher.get(&endpoint).await
    }

    /// `GET /issuances/:id`
    pub async fn issuance(&self, id: &str) -> Result<ClassSummary, FetchError> {
        let id = ResourceId::new(id)?;
        self.fetcher.get(&format!("/issuances/{id}")).await
    }

    /// `GET /retirements/:certificateId`
    pub async fn retirement(&self, certificate_id: &str) -> Result<RetirementCert, FetchError> {
        let id = ResourceId::new(certificate_id)?;
        self.fetcher.get(&format!("/retirements/{id}")).await
    }
}

impl ApiClient for RegistryClient {
    async fn health_check(&self) -> Result<HealthStatus, FetchError> {
        let start_time = Instant::now();
        let status = self.fetcher.live().probe(HEALTH_PROBE_ENDPOINT).await?;
        let health = HealthStatus::from_probe_status(status);

        if health.is_available() {
            info!("Registry API health check passed in {:?}", start_time.elapsed());
        } else {
            warn!(status = status.as_u16(), "Registry API health check failed");
        }
        Ok(health)
    }

    fn name(&self) -> &'static str {
        REGISTRY_SERVICE
    }
}
