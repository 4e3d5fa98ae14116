// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Adapter API client
//!
//! The adapter relays registry operations to the chain and reports their
//! receipts and transactions. Reads fall back the same way as the registry.

use api_client::{
    ApiClient, FallbackFetcher, FetchError, FetcherConfig, HealthStatus, HttpFetcher,
    QueryParams, ResourceId,
};
use chrono::NaiveDate;
use shared_types::{AdapterReceipt, AdapterTransaction, ClassSummary};
use tracing::{debug, warn};

use crate::fallbacks;

/// Service name used in logs and health output
pub const ADAPTER_SERVICE: &str = "adapter";

/// A receipt lookup the adapter answers quickly, found or not
const HEALTH_PROBE_ENDPOINT: &str = "/v1/receipts/test";

const VINTAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters for class resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassQuery {
    /// Project whose classes to resolve
    pub project_id: String,
    /// Earliest vintage of interest
    pub vintage_start: Option<NaiveDate>,
    /// Latest vintage of interest
    pub vintage_end: Option<NaiveDate>,
}

impl ClassQuery {
    /// All classes of `project_id`
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            vintage_start: None,
            vintage_end: None,
        }
    }

    fn endpoint(&self) -> Result<String, FetchError> {
        let project_id = ResourceId::new(self.project_id.as_str())?;
        let format = |d: NaiveDate| d.format(VINTAGE_DATE_FORMAT).to_string();
        Ok(QueryParams::new()
            .optional("projectId", Some(project_id))
            .optional("vintageStart", self.vintage_start.map(format))
            .optional("vintageEnd", self.vintage_end.map(format))
            .append_to("/v1/classes/resolve"))
    }
}

/// Typed accessor for the adapter API
#[derive(Debug, Clone)]
pub struct AdapterClient {
    fetcher: FallbackFetcher,
}

impl AdapterClient {
    /// Create an adapter client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config)?;
        debug!(base_url = %fetcher.base_url(), "created adapter client");
        Ok(Self {
            fetcher: FallbackFetcher::new(ADAPTER_SERVICE, fetcher, fallbacks::adapter_table()),
        })
    }

    /// `GET /v1/receipts/:adapterTxId`
    pub async fn receipt(&self, adapter_tx_id: &str) -> Result<AdapterReceipt, FetchError> {
        let id = ResourceId::new(adapter_tx_id)?;
        self.fetcher.get(&format!("/v1/receipts/{id}")).await
    }

    /// `GET /v1/tx/:txHash`
    pub async fn transaction(&self, tx_hash: &str) -> Result<AdapterTransaction, FetchError> {
        let hash = ResourceId::new(tx_hash)?;
        self.fetcher.get(&format!("/v1/tx/{hash}")).await
    }

    /// `GET /v1/classes/resolve?projectId[&vintageStart][&vintageEnd]`
    pub async fn resolve_classes(&self, query: &ClassQuery) -> Result<Vec<ClassSummary>, FetchError> {
        self.fetcher.get(&query.endpoint()?).await
    }
}

impl ApiClient for AdapterClient {
    async fn health_check(&self) -> Result<HealthStatus, FetchError> {
        let status = self.fetcher.live().probe(HEALTH_PROBE_ENDPOINT).await?;
        let health = HealthStatus::from_probe_status(status);
        if !health.is_available() {
            warn!(status = status.as_u16(), "Adapter API health check failed");
        }
        Ok(health)
    }

    fn name(&self) -> &'static str {
        ADAPTER_SERVICE
    }
}
