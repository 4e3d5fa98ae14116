// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Explorer facade over the registry, adapter and chain clients
//!
//! The facade is constructed once at startup and handed to request handlers.
//! It owns the reconciliation rules between the off-chain registry (the source of
//! record) and the on-chain representation.

use std::sync::Arc;

use alloy_primitives::B256;
use api_client::FetchError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{
    AdapterTransaction, FeatureFlags, Ledger, LedgerContext, Network, RetirementCert,
    format::{format_date, format_number, format_serial_range},
};
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::{
    adapter::{ADAPTER_SERVICE, AdapterClient},
    chain::{CHAIN_SERVICE, ChainClient, ChainTransaction, TxStatus},
    health::{self, HealthError, HealthReport},
    registry::{REGISTRY_SERVICE, RegistryClient},
};

/// Failures of explorer-level operations
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ExplorerError {
    /// No source had the requested resource
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// An upstream failed in a way the fallback does not cover
    #[error("{service} lookup of {resource} failed: {source}")]
    Upstream {
        service: &'static str,
        resource: &'static str,
        #[source]
        source: FetchError,
    },

    /// Health aggregation failed as a whole
    #[error("{source}")]
    Health {
        network: Network,
        #[source]
        source: HealthError,
    },
}

/// Deployment settings surfaced through the ledger context
#[derive(Debug, Clone)]
pub struct BrandSettings {
    /// Brand string
    pub brand_name: String,
    /// Feature switches
    pub features: FeatureFlags,
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            brand_name: "Sim Registry".to_string(),
            features: FeatureFlags::default(),
        }
    }
}

/// A transaction together with the source that answered
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "source", content = "transaction", rename_all = "lowercase")]
pub enum TransactionLookup {
    /// Answered by the adapter API
    Adapter(AdapterTransaction),
    /// Answered by the chain node
    Chain(ChainTransaction),
}

/// Registry half of the proof panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CreditPanel {
    /// Retirement certificate id
    pub credit_id: String,
    pub project_id: String,
    pub class_id: String,
    pub serial_start: u64,
    pub serial_end: u64,
    /// `1,000,001–1,001,000`
    pub serial_range: String,
    pub quantity: u64,
    /// `1,000`
    pub quantity_display: String,
    /// Always `retired` for a certificate
    pub status: String,
    /// On-chain hash recorded by the registry
    pub registry_hash: Option<String>,
    pub issued_at: DateTime<Utc>,
    /// `YYYY-MM-DD HH:MM:SS UTC`
    pub issued_at_display: String,
    /// Whether the serial range size matches the quantity
    pub serials_consistent: bool,
}

impl From<&RetirementCert> for CreditPanel {
    fn from(cert: &RetirementCert) -> Self {
        Self {
            credit_id: cert.certificate_id.clone(),
            project_id: cert.project_id.clone(),
            class_id: cert.class_id.clone(),
            serial_start: cert.serial_start,
            serial_end: cert.serial_end,
            serial_range: format_serial_range(cert.serial_start, cert.serial_end),
            quantity: cert.quantity,
            quantity_display: format_number(cert.quantity),
            status: "retired".to_string(),
            registry_hash: cert.onchain_hash.clone(),
            issued_at: cert.issued_at,
            issued_at_display: format_date(&cert.issued_at),
            serials_consistent: cert.is_consistent(),
        }
    }
}

/// Chain half of the proof panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TokenPanel {
    #[schema(value_type = String)]
    pub tx_hash: B256,
    /// Contract the retirement transaction called
    pub contract_address: Option<String>,
    pub block_number: Option<u64>,
    pub status: TxStatus,
    pub explorer_url: Option<String>,
}

impl From<ChainTransaction> for TokenPanel {
    fn from(tx: ChainTransaction) -> Self {
        Self {
            tx_hash: tx.hash,
            contract_address: tx.to.map(|a| a.to_checksum(None)),
            block_number: tx.block_number,
            status: tx.status,
            explorer_url: tx.explorer_url,
        }
    }
}

/// Why the chain half of a proof panel is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProofNotice {
    /// No RPC provider is configured
    ChainUnavailable,
    /// The certificate carries no on-chain hash
    NotOnChain,
    /// The node does not know the recorded hash
    TransactionNotFound,
    /// The node could not be queried
    ChainLookupFailed,
}

/// Registry certificate side by side with its on-chain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProofPanel {
    /// Off-chain, authoritative
    pub credits: CreditPanel,
    /// On-chain representation, when it could be read
    pub tokens: Option<TokenPanel>,
    /// Set whenever `tokens` is empty
    pub notice: Option<ProofNotice>,
}

/// Handle to all upstream clients, shared by request handlers
#[derive(Debug, Clone)]
pub struct Explorer {
    registry: Arc<RegistryClient>,
    adapter: Arc<AdapterClient>,
    chain: Arc<ChainClient>,
    brand: BrandSettings,
}

impl Explorer {
    /// Bundle already constructed clients
    pub fn new(
        registry: RegistryClient,
        adapter: AdapterClient,
        chain: ChainClient,
        brand: BrandSettings,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            adapter: Arc::new(adapter),
            chain: Arc::new(chain),
            brand,
        }
    }

    /// Registry API client
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Adapter API client
    pub fn adapter(&self) -> &AdapterClient {
        &self.adapter
    }

    /// Chain client
    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    /// Configured network
    pub fn network(&self) -> &Network {
        self.chain.network()
    }

    /// Probe every backend; see [`health::aggregate`]
    pub async fn health(&self) -> Result<HealthReport, ExplorerError> {
        let report = health::aggregate(
            Arc::clone(&self.registry),
            Arc::clone(&self.adapter),
            Arc::clone(&self.chain),
            self.network().clone(),
        )
        .await
        .map_err(|source| ExplorerError::Health {
            network: self.network().clone(),
            source,
        })?;
        Ok(report)
    }

    /// Context for the view of `ledger`
    pub fn ledger_context(&self, ledger: Ledger) -> LedgerContext {
        LedgerContext::new(
            ledger,
            self.network().clone(),
            self.brand.brand_name.clone(),
            self.brand.features,
            self.chain.is_available(),
        )
    }

    /// Look a transaction up in the adapter, then on chain
    ///
    /// The chain is only asked when the adapter reports a logical failure and a
    /// provider is configured. When neither source has the transaction the result
    /// is [`ExplorerError::NotFound`].
    pub async fn transaction(&self, tx_hash: &str) -> Result<TransactionLookup, ExplorerError> {
        let adapter_error = match self.adapter.transaction(tx_hash).await {
            Ok(tx) => return Ok(TransactionLookup::Adapter(tx)),
            Err(e) => e,
        };

        let upstream = |source| ExplorerError::Upstream {
            service: ADAPTER_SERVICE,
            resource: "transaction",
            source,
        };

        if !self.chain.is_available() {
            return Err(if adapter_error.is_not_found() {
                not_found("transaction", tx_hash)
            } else {
                upstream(adapter_error)
            });
        }

        let Ok(hash) = tx_hash.parse::<B256>() else {
            debug!(tx_hash, "not a 32-byte hash, skipping chain lookup");
            return Err(upstream(adapter_error));
        };

        debug!(tx_hash, error = %adapter_error, "adapter lookup failed, asking the chain");
        match self.chain.get_transaction(hash).await {
            Ok(Some(tx)) => Ok(TransactionLookup::Chain(tx)),
            Ok(None) => Err(not_found("transaction", tx_hash)),
            Err(chain_error) => {
                warn!(tx_hash, error = %chain_error, "chain lookup failed");
                Err(upstream(adapter_error))
            }
        }
    }

    /// Registry certificate with its on-chain counterpart
    ///
    /// A missing or failing chain never fails the panel; it is reported through
    /// [`ProofPanel::notice`].
    pub async fn proof_panel(&self, certificate_id: &str) -> Result<ProofPanel, ExplorerError> {
        let cert = self
            .registry
            .retirement(certificate_id)
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    not_found("retirement", certificate_id)
                } else {
                    ExplorerError::Upstream {
                        service: REGISTRY_SERVICE,
                        resource: "retirement",
                        source,
                    }
                }
            })?;

        let credits = CreditPanel::from(&cert);
        let (tokens, notice) = match self.token_panel(&cert).await {
            Ok(panel) => (Some(panel), None),
            Err(notice) => (None, Some(notice)),
        };

        Ok(ProofPanel {
            credits,
            tokens,
            notice,
        })
    }

    async fn token_panel(&self, cert: &RetirementCert) -> Result<TokenPanel, ProofNotice> {
        if !self.chain.is_available() {
            return Err(ProofNotice::ChainUnavailable);
        }
        let recorded = cert.onchain_hash.as_deref().ok_or(ProofNotice::NotOnChain)?;
        let hash = recorded.parse::<B256>().map_err(|e| {
            warn!(
                certificate_id = %cert.certificate_id,
                recorded,
                error = %e,
                "recorded on-chain hash is not a transaction hash"
            );
            ProofNotice::ChainLookupFailed
        })?;

        match self.chain.get_transaction(hash).await {
            Ok(Some(tx)) => Ok(TokenPanel::from(tx)),
            Ok(None) => Err(ProofNotice::TransactionNotFound),
            Err(e) => {
                warn!(
                    service = CHAIN_SERVICE,
                    certificate_id = %cert.certificate_id,
                    error = %e,
                    "chain lookup for proof panel failed"
                );
                Err(ProofNotice::ChainLookupFailed)
            }
        }
    }
}

fn not_found(resource: &'static str, id: &str) -> ExplorerError {
    ExplorerError::NotFound {
        resource,
        id: id.to_string(),
    }
}
