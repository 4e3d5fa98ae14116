// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document for the explorer read surface

use external_apis::{CreditPanel, ProofNotice, ProofPanel, TokenPanel, TransactionLookup, TxStatus};
use shared_types::{
    AdapterReceipt, ClassSummary, CreditTotals, EvidenceAnchor, ExplorerHealth, FeatureFlags,
    Ledger, LedgerContext, Network, ProjectDetail, ProjectSummary, RegistryStats, RetirementCert,
};
use utoipa::OpenApi;

use crate::routes::handlers;

/// Generated `OpenAPI` specification
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Carbon Explorer API",
        description = "Read-only view of a carbon-credit registry and its on-chain token representation. Registry and adapter reads fall back to fixed sample data when the upstream is unreachable."
    ),
    paths(
        handlers::health_handler,
        handlers::stats_handler,
        handlers::projects_handler,
        handlers::project_handler,
        handlers::project_evidence_handler,
        handlers::issuances_handler,
        handlers::issuance_handler,
        handlers::retirement_handler,
        handlers::proof_handler,
        handlers::receipt_handler,
        handlers::resolve_classes_handler,
        handlers::transaction_handler,
        handlers::ledger_handler,
    ),
    components(schemas(
        ExplorerHealth,
        Network,
        RegistryStats,
        ProjectSummary,
        ProjectDetail,
        CreditTotals,
        EvidenceAnchor,
        ClassSummary,
        RetirementCert,
        AdapterReceipt,
        Ledger,
        LedgerContext,
        FeatureFlags,
        TransactionLookup,
        TxStatus,
        ProofPanel,
        CreditPanel,
        TokenPanel,
        ProofNotice,
    )),
    tags(
        (name = "health", description = "Backend availability"),
        (name = "registry", description = "Off-chain registry records, the source of record"),
        (name = "adapter", description = "Adapter receipts and class resolution"),
        (name = "explorer", description = "Views reconciling the registry with the chain")
    )
)]
pub struct ApiDoc;
