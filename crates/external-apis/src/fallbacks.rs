// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fallback payloads for the registry and adapter APIs
//!
//! All payloads are built from one small catalog of projects so that project
//! totals, vintages, class summaries and evidence anchors agree with each other.
//! Every timestamp is fixed, so the same endpoint always resolves to the same
//! payload.

use api_client::{EndpointPath, FallbackTable, fallback::ANY_SEGMENT};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use shared_types::{
    AdapterReceipt, AdapterReceiptRef, AdapterTransaction, AnchorRef, ClassSummary,
    CreditTotals, Evidence, EvidenceAnchor, IotDigest, Page, ProjectDetail, ProjectSummary,
    RegistryStats, RetirementCert, Vintage,
};

/// 2024-01-15T10:30:00Z
const FIXED_TIMESTAMP_SECS: i64 = 1_705_314_600;

/// Page size of the project listing
pub const PROJECT_PAGE_SIZE: u32 = 10;


const MOCK_BLOCK_NUMBER: u64 = 12_345_678;
const MOCK_ONCHAIN_HASH: &str =
    "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

/// Registry API fallback routes, most specific first
pub fn registry_table() -> FallbackTable {
    FallbackTable::new()
        .route(
            "registry_stats",
            |p| p.is(&["reports", "registry-stats"]),
            |_| payload(&registry_stats()),
        )
        .route(
            "project_evidence",
            |p| p.is(&["projects", ANY_SEGMENT, "evidence"]),
            |p| payload(&project_evidence(p.segment(1).unwrap_or_default())),
        )
        .route(
            "project_detail",
            |p| p.is(&["projects", ANY_SEGMENT]),
            |p| payload(&project_detail(p.segment(1).unwrap_or_default())),
        )
        .route("project_list", |p| p.is(&["projects"]), |p| {
            payload(&project_page(p))
        })
        .route(
            "issuance_detail",
            |p| p.is(&["issuances", ANY_SEGMENT]),
            |p| payload(&issuance(p.segment(1).unwrap_or_default())),
        )
        .route("issuance_list", |p| p.is(&["issuances"]), |p| {
            payload(&issuances(p.query("status")))
        })
        .route(
            "retirement",
            |p| p.is(&["retirements", ANY_SEGMENT]),
            |p| payload(&retirement(p.segment(1).unwrap_or_default())),
        )
}

/// Adapter API fallback routes, most specific first
pub fn adapter_table() -> FallbackTable {
    FallbackTable::new()
        .route(
            "transaction",
            |p| p.is(&["v1", "tx", ANY_SEGMENT]),
            |p| payload(&transaction(p.segment(2).unwrap_or_default())),
        )
        .route(
            "receipt",
            |p| p.is(&["v1", "receipts", ANY_SEGMENT]),
            |p| payload(&receipt(p.segment(2).unwrap_or_default())),
        )
        .route(
            "class_resolution",
            |p| p.is(&["v1", "classes", "resolve"]),
            |p| payload(&resolved_classes(p)),
        )
}

fn payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(FIXED_TIMESTAMP_SECS, 0).unwrap_or_default()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn vintage(class_id: &str, year: i32, issued: u64, retired: u64) -> Vintage {
    Vintage {
        class_id: class_id.to_string(),
        vintage_start: date(year, 1, 1),
        vintage_end: date(year, 12, 31),
        issued,
        retired,
    }
}

fn totals_of(vintages: &[Vintage]) -> CreditTotals {
    let issued = vintages.iter().map(|v| v.issued).sum();
    let retired = vintages.iter().map(|v| v.retired).sum();
    CreditTotals::new(issued, retired)
}

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    status: &'static str,
    country: &'static str,
    methodology: &'static str,
    description: &'static str,
    vintages: Vec<Vintage>,
    evidence: Vec<Evidence>,
    adapter_receipts: Vec<AdapterReceiptRef>,
    iot: Option<IotDigest>,
}

impl CatalogEntry {
    fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.to_string(),
            title: self.title.to_string(),
            status: self.status.to_string(),
            country: Some(self.country.to_string()),
            methodology: self.methodology.to_string(),
            totals: totals_of(&self.vintages),
            last_digest_at: Some(fixed_time()),
        }
    }

    fn detail(self) -> ProjectDetail {
        ProjectDetail {
            summary: self.summary(),
            description: Some(self.description.to_string()),
            vintages: self.vintages,
            evidence: self.evidence,
            adapter_receipts: self.adapter_receipts,
            iot: self.iot,
        }
    }

    fn classes(&self) -> impl Iterator<Item = ClassSummary> + '_ {
        self.vintages.iter().map(|v| ClassSummary {
            class_id: v.class_id.clone(),
            project_id: self.id.to_string(),
            vintage_start: v.vintage_start,
            vintage_end: v.vintage_end,
            total_issued: v.issued,
            total_retired: v.retired,
            uri: Some(format!("ipfs://QmClassMetadata{}", v.class_id)),
        })
    }

    fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [self.id, self.title, self.country, self.methodology]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: "PROJ-001",
            title: "Forest Conservation Project",
            status: "active",
            country: "Brazil",
            methodology: "REDD+",
            description: "A comprehensive forest conservation project in the Amazon rainforest focusing on REDD+ methodologies.",
            vintages: vec![
                vintage("CLASS-001", 2023, 10_000, 2_500),
                vintage("CLASS-003", 2022, 8_000, 3_000),
            ],
            evidence: vec![Evidence {
                id: "EVIDENCE-001".to_string(),
                file_name: "forest_conservation_report.pdf".to_string(),
                sha256: "a1b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef123456"
                    .to_string(),
                cid: Some("QmForestConservationReport001".to_string()),
                anchored: Some(AnchorRef {
                    topic: "ISSUANCE:CLASS-001".to_string(),
                    hash: "0xa1b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef123456"
                        .to_string(),
                    uri: Some("ipfs://QmForestConservationReport001".to_string()),
                }),
            }],
            adapter_receipts: vec![AdapterReceiptRef {
                adapter_tx_id: "ADAPTER-001".to_string(),
                tx_hash: "0xabc123def456789".to_string(),
                block_number: Some(MOCK_BLOCK_NUMBER),
            }],
            iot: None,
        },
        CatalogEntry {
            id: "PROJ-002",
            title: "Solar Energy Initiative",
            status: "active",
            country: "India",
            methodology: "Solar",
            description: "Large-scale solar energy project providing clean electricity to rural communities in India.",
            vintages: vec![vintage("CLASS-002", 2023, 5_000, 1_000)],
            evidence: vec![Evidence {
                id: "EVIDENCE-002".to_string(),
                file_name: "solar_energy_report.pdf".to_string(),
                sha256: "b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef1234567"
                    .to_string(),
                cid: None,
                anchored: None,
            }],
            adapter_receipts: vec![AdapterReceiptRef {
                adapter_tx_id: "ADAPTER-002".to_string(),
                tx_hash: "0xdef789abc012345".to_string(),
                block_number: Some(MOCK_BLOCK_NUMBER + 1),
            }],
            iot: Some(IotDigest {
                kwh: 125_000.0,
                tco2e: 87.5,
                date: date(2024, 1, 14),
                digest_hash: "0x5f2c9d8e7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f0e"
                    .to_string(),
                cid: Some("QmSolarIotDigest20240114".to_string()),
            }),
        },
        CatalogEntry {
            id: "PROJ-003",
            title: "Mangrove Restoration",
            status: "completed",
            country: "Indonesia",
            methodology: "Blue Carbon",
            description: "Restoration of degraded coastal mangrove forests in North Sulawesi.",
            vintages: vec![vintage("CLASS-004", 2021, 3_000, 3_000)],
            evidence: Vec::new(),
            adapter_receipts: Vec::new(),
            iot: None,
        },
    ]
}

fn registry_stats() -> RegistryStats {
    let catalog = catalog();
    let vintages: Vec<Vintage> = catalog.iter().flat_map(|e| e.vintages.clone()).collect();
    let totals = totals_of(&vintages);
    RegistryStats::new(catalog.len() as u64, totals.issued, totals.retired)
}

/// Curated detail for catalog ids; any other id gets its own record with
/// empty collections and zero totals
fn project_detail(id: &str) -> ProjectDetail {
    if let Some(entry) = catalog().into_iter().find(|entry| entry.id == id) {
        return entry.detail();
    }

    ProjectDetail {
        summary: ProjectSummary {
            id: id.to_string(),
            title: format!("Project {id}"),
            status: "unknown".to_string(),
            country: None,
            methodology: "Unspecified".to_string(),
            totals: CreditTotals::new(0, 0),
            last_digest_at: None,
        },
        description: None,
        vintages: Vec::new(),
        evidence: Vec::new(),
        adapter_receipts: Vec::new(),
        iot: None,
    }
}

fn project_evidence(id: &str) -> Vec<EvidenceAnchor> {
    let Some(entry) = catalog().into_iter().find(|entry| entry.id == id) else {
        return Vec::new();
    };

    let mut anchors = Vec::new();
    if let Some(iot) = &entry.iot {
        anchors.push(EvidenceAnchor {
            topic: format!("IOT:{}", entry.id),
            hash: iot.digest_hash.clone(),
            uri: iot.cid.as_ref().map(|cid| format!("ipfs://{cid}")),
            timestamp: fixed_time(),
        });
    }
    anchors.extend(entry.evidence.iter().filter_map(|evidence| {
        let anchor = evidence.anchored.as_ref()?;
        Some(EvidenceAnchor {
            topic: anchor.topic.clone(),
            hash: anchor.hash.clone(),
            uri: anchor.uri.clone(),
            timestamp: fixed_time(),
        })
    }));
    anchors
}

fn project_page(path: &EndpointPath) -> Page<ProjectSummary> {
    let status = path.query("status");
    let text = path.query("q").filter(|q| !q.is_empty());
    let page = path
        .query("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    let matching: Vec<ProjectSummary> = catalog()
        .iter()
        .filter(|entry| status.is_none_or(|s| entry.status.eq_ignore_ascii_case(s)))
        .filter(|entry| text.is_none_or(|q| entry.matches_text(q)))
        .map(CatalogEntry::summary)
        .collect();

    let total = matching.len() as u64;
    let offset = (page - 1).saturating_mul(PROJECT_PAGE_SIZE) as usize;
    let data: Vec<_> = matching
        .into_iter()
        .skip(offset)
        .take(PROJECT_PAGE_SIZE as usize)
        .collect();
    let has_more = ((offset + data.len()) as u64) < total;

    Page {
        data,
        page,
        limit: PROJECT_PAGE_SIZE,
        total,
        has_more,
    }
}

fn all_classes() -> Vec<ClassSummary> {
    catalog()
        .iter()
        .flat_map(|entry| entry.classes().collect::<Vec<_>>())
        .collect()
}

/// Every catalog class belongs to a project; the class listing honours the
/// owning project's status
fn issuances(status: Option<&str>) -> Vec<ClassSummary> {
    let projects = catalog();
    all_classes()
        .into_iter()
        .filter(|class| {
            status.is_none_or(|s| {
                projects
                    .iter()
                    .any(|p| p.id == class.project_id && p.status.eq_ignore_ascii_case(s))
            })
        })
        .collect()
}

fn issuance(id: &str) -> ClassSummary {
    all_classes()
        .into_iter()
        .find(|class| class.class_id == id)
        .unwrap_or_else(|| ClassSummary {
            class_id: id.to_string(),
            project_id: "PROJ-001".to_string(),
            vintage_start: date(2023, 1, 1),
            vintage_end: date(2023, 12, 31),
            total_issued: 0,
            total_retired: 0,
            uri: None,
        })
}

fn retirement(certificate_id: &str) -> RetirementCert {
    RetirementCert {
        certificate_id: certificate_id.to_string(),
        project_id: "PROJ-001".to_string(),
        class_id: "CLASS-001".to_string(),
        quantity: 1_000,
        serial_start: 1_000_001,
        serial_end: 1_001_000,
        factor_ref: "FACTOR-001".to_string(),
        onchain_hash: Some(MOCK_ONCHAIN_HASH.to_string()),
        issued_at: fixed_time(),
        beneficiary_hash: Some("0xabcdef1234567890abcdef1234567890abcdef12".to_string()),
        purpose_hash: Some("0x9876543210fedcba9876543210fedcba98765432".to_string()),
    }
}

fn transaction(hash: &str) -> AdapterTransaction {
    AdapterTransaction {
        hash: hash.to_string(),
        block_number: Some(MOCK_BLOCK_NUMBER),
        timestamp: Some(fixed_time()),
        from: Some("0x1234567890123456789012345678901234567890".to_string()),
        to: Some("0x0987654321098765432109876543210987654321".to_string()),
        value: Some("1000000000000000000".to_string()),
        gas_used: Some(21_000),
        gas_price: Some("20000000000".to_string()),
        status: "success".to_string(),
        events: Vec::new(),
        logs: Vec::new(),
    }
}

fn receipt(adapter_tx_id: &str) -> AdapterReceipt {
    AdapterReceipt {
        adapter_tx_id: adapter_tx_id.to_string(),
        status: "completed".to_string(),
        tx_hash: Some("0xabcdef1234567890abcdef1234567890abcdef12".to_string()),
        timestamp: fixed_time(),
    }
}

/// Classes of `projectId` whose vintage overlaps `[vintageStart, vintageEnd]`
fn resolved_classes(path: &EndpointPath) -> Vec<ClassSummary> {
    let Some(project_id) = path.query("projectId") else {
        return Vec::new();
    };
    let bound = |key| {
        path.query(key)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    };
    let start = bound("vintageStart");
    let end = bound("vintageEnd");

    all_classes()
        .into_iter()
        .filter(|class| class.project_id == project_id)
        .filter(|class| start.is_none_or(|s| class.vintage_end >= s))
        .filter(|class| end.is_none_or(|e| class.vintage_start <= e))
        .collect()
}
