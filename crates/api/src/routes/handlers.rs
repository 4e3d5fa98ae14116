// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! Read-only handlers for the explorer surface. Registry and adapter reads are
//! served from fallback payloads when the upstream is unreachable, so the only
//! failures surfaced here are logical ones (missing records, bad identifiers,
//! non-success upstream answers).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use external_apis::{ClassQuery, ProjectQuery, ProofPanel, TransactionLookup};
use serde::Deserialize;
use shared_types::{
    AdapterReceipt, ClassSummary, EvidenceAnchor, ExplorerHealth, Ledger, LedgerContext, Page,
    ProjectDetail, ProjectSummary, RegistryStats, RetirementCert,
};
use utoipa::IntoParams;

use crate::{error::ServerError, state::ServerState};

const REGISTRY: &str = "registry";
const ADAPTER: &str = "adapter";

/// Filters for `/api/projects`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectsParams {
    /// Lifecycle status, e.g. `active`
    pub status: Option<String>,
    /// Free-text search over name and country
    pub q: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl From<ProjectsParams> for ProjectQuery {
    fn from(params: ProjectsParams) -> Self {
        Self {
            status: params.status,
            q: params.q,
            page: params.page,
        }
    }
}

/// Filters for `/api/issuances`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssuancesParams {
    /// Status of the owning project
    pub status: Option<String>,
}

/// Parameters for `/api/classes/resolve`
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ClassResolveParams {
    /// Project whose classes to resolve
    pub project_id: String,
    /// Earliest vintage, `YYYY-MM-DD`
    pub vintage_start: Option<NaiveDate>,
    /// Latest vintage, `YYYY-MM-DD`
    pub vintage_end: Option<NaiveDate>,
}

impl From<ClassResolveParams> for ClassQuery {
    fn from(params: ClassResolveParams) -> Self {
        Self {
            project_id: params.project_id,
            vintage_start: params.vintage_start,
            vintage_end: params.vintage_end,
        }
    }
}

/// Composite health of the registry, adapter and chain
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    summary = "Backend health",
    description = "Probes the registry and adapter APIs live (never through fallback data) and reports whether a chain provider is configured. `ok` is true when at least one backend is available.",
    responses(
        (status = 200, description = "Probe results", body = ExplorerHealth),
        (status = 500, description = "Aggregation failed; every flag is reported false", body = ExplorerHealth)
    )
)]
pub async fn health_handler(
    State(state): State<ServerState>,
) -> Result<Json<ExplorerHealth>, ServerError> {
    Ok(Json(state.health_check().await?))
}

/// Registry-wide totals
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "registry",
    responses(
        (status = 200, description = "Registry totals", body = RegistryStats),
        (status = 502, description = "Registry answered with an error", body = String)
    )
)]
pub async fn stats_handler(
    State(state): State<ServerState>,
) -> Result<Json<RegistryStats>, ServerError> {
    let stats = state
        .explorer()
        .registry()
        .registry_stats()
        .await
        .map_err(|e| ServerError::upstream(REGISTRY, "registry stats", e))?;
    Ok(Json(stats))
}

/// Paginated project listing
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "registry",
    params(ProjectsParams),
    responses(
        (status = 200, description = "One page of projects", body = Page<ProjectSummary>),
        (status = 400, description = "Malformed query string", body = String),
        (status = 502, description = "Registry answered with an error", body = String)
    )
)]
pub async fn projects_handler(
    State(state): State<ServerState>,
    Query(params): Query<ProjectsParams>,
) -> Result<Json<Page<ProjectSummary>>, ServerError> {
    let page = state
        .explorer()
        .registry()
        .projects(&params.into())
        .await
        .map_err(|e| ServerError::upstream(REGISTRY, "projects", e))?;
    Ok(Json(page))
}

/// Project detail with vintages, evidence and receipts
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "registry",
    params(("id" = String, Path, description = "Project id, e.g. `PROJ-001`")),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetail),
        (status = 400, description = "Identifier cannot be used in a path", body = String),
        (status = 404, description = "Unknown project", body = String),
        (status = 502, description = "Registry answered with an error", body = String)
    )
)]
pub async fn project_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetail>, ServerError> {
    let project = state
        .explorer()
        .registry()
        .project(&id)
        .await
        .map_err(|e| ServerError::lookup(REGISTRY, "project", &id, e))?;
    Ok(Json(project))
}

/// Evidence anchors recorded for a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/evidence",
    tag = "registry",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Evidence anchors", body = Vec<EvidenceAnchor>),
        (status = 404, description = "Unknown project", body = String)
    )
)]
pub async fn project_evidence_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EvidenceAnchor>>, ServerError> {
    let evidence = state
        .explorer()
        .registry()
        .project_evidence(&id)
        .await
        .map_err(|e| ServerError::lookup(REGISTRY, "project evidence", &id, e))?;
    Ok(Json(evidence))
}

/// Credit classes, optionally filtered by project status
#[utoipa::path(
    get,
    path = "/api/issuances",
    tag = "registry",
    params(IssuancesParams),
    responses(
        (status = 200, description = "Credit classes", body = Vec<ClassSummary>)
    )
)]
pub async fn issuances_handler(
    State(state): State<ServerState>,
    Query(params): Query<IssuancesParams>,
) -> Result<Json<Vec<ClassSummary>>, ServerError> {
    let classes = state
        .explorer()
        .registry()
        .issuances(params.status.as_deref())
        .await
        .map_err(|e| ServerError::upstream(REGISTRY, "issuances", e))?;
    Ok(Json(classes))
}

/// One credit class
#[utoipa::path(
    get,
    path = "/api/issuances/{id}",
    tag = "registry",
    params(("id" = String, Path, description = "Class id, e.g. `CLASS-001`")),
    responses(
        (status = 200, description = "Credit class", body = ClassSummary),
        (status = 404, description = "Unknown class", body = String)
    )
)]
pub async fn issuance_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ClassSummary>, ServerError> {
    let class = state
        .explorer()
        .registry()
        .issuance(&id)
        .await
        .map_err(|e| ServerError::lookup(REGISTRY, "issuance", &id, e))?;
    Ok(Json(class))
}

/// Retirement certificate
#[utoipa::path(
    get,
    path = "/api/retirements/{certificate_id}",
    tag = "registry",
    params(("certificate_id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Retirement certificate", body = RetirementCert),
        (status = 404, description = "Unknown certificate", body = String)
    )
)]
pub async fn retirement_handler(
    State(state): State<ServerState>,
    Path(certificate_id): Path<String>,
) -> Result<Json<RetirementCert>, ServerError> {
    let cert = state
        .explorer()
        .registry()
        .retirement(&certificate_id)
        .await
        .map_err(|e| ServerError::lookup(REGISTRY, "retirement", &certificate_id, e))?;
    Ok(Json(cert))
}

/// Retirement certificate next to its on-chain transaction
#[utoipa::path(
    get,
    path = "/api/retirements/{certificate_id}/proof",
    tag = "explorer",
    params(("certificate_id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Proof panel; `notice` explains an empty token half", body = ProofPanel),
        (status = 404, description = "Unknown certificate", body = String)
    )
)]
pub async fn proof_handler(
    State(state): State<ServerState>,
    Path(certificate_id): Path<String>,
) -> Result<Json<ProofPanel>, ServerError> {
    Ok(Json(state.explorer().proof_panel(&certificate_id).await?))
}

/// Adapter receipt
#[utoipa::path(
    get,
    path = "/api/receipts/{adapter_tx_id}",
    tag = "adapter",
    params(("adapter_tx_id" = String, Path, description = "Adapter transaction id")),
    responses(
        (status = 200, description = "Adapter receipt", body = AdapterReceipt),
        (status = 404, description = "Unknown receipt", body = String)
    )
)]
pub async fn receipt_handler(
    State(state): State<ServerState>,
    Path(adapter_tx_id): Path<String>,
) -> Result<Json<AdapterReceipt>, ServerError> {
    let receipt = state
        .explorer()
        .adapter()
        .receipt(&adapter_tx_id)
        .await
        .map_err(|e| ServerError::lookup(ADAPTER, "receipt", &adapter_tx_id, e))?;
    Ok(Json(receipt))
}

/// Credit classes of a project, optionally restricted to a vintage window
#[utoipa::path(
    get,
    path = "/api/classes/resolve",
    tag = "adapter",
    params(ClassResolveParams),
    responses(
        (status = 200, description = "Matching classes", body = Vec<ClassSummary>),
        (status = 400, description = "Missing `projectId` or malformed date", body = String)
    )
)]
pub async fn resolve_classes_handler(
    State(state): State<ServerState>,
    Query(params): Query<ClassResolveParams>,
) -> Result<Json<Vec<ClassSummary>>, ServerError> {
    let classes = state
        .explorer()
        .adapter()
        .resolve_classes(&params.into())
        .await
        .map_err(|e| ServerError::upstream(ADAPTER, "classes", e))?;
    Ok(Json(classes))
}

/// Transaction from the adapter, or from the chain when the adapter has none
#[utoipa::path(
    get,
    path = "/api/tx/{tx_hash}",
    tag = "explorer",
    params(("tx_hash" = String, Path, description = "Transaction hash")),
    responses(
        (status = 200, description = "Transaction with the source that answered", body = TransactionLookup),
        (status = 404, description = "Neither source knows the hash", body = String),
        (status = 502, description = "Adapter answered with an error", body = String)
    )
)]
pub async fn transaction_handler(
    State(state): State<ServerState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<TransactionLookup>, ServerError> {
    Ok(Json(state.explorer().transaction(&tx_hash).await?))
}

/// View context for one ledger
#[utoipa::path(
    get,
    path = "/api/ledgers/{ledger}",
    tag = "explorer",
    params(("ledger" = String, Path, description = "`credits` or `tokens`")),
    responses(
        (status = 200, description = "Ledger context", body = LedgerContext),
        (status = 400, description = "Unknown ledger", body = String)
    )
)]
pub async fn ledger_handler(
    State(state): State<ServerState>,
    Path(ledger): Path<String>,
) -> Result<Json<LedgerContext>, ServerError> {
    let ledger = ledger
        .parse::<Ledger>()
        .map_err(|e| ServerError::ValidationError(e.to_string()))?;
    Ok(Json(state.explorer().ledger_context(ledger)))
}
