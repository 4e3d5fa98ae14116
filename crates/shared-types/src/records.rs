// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Registry and adapter value records
//!
//! Every record here is received from an external system and never mutated after
//! deserialization. The wire format is camelCase JSON, identical whether the value
//! came from a live upstream or from a fallback payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

/// Aggregate credit counts for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditTotals {
    /// Credits issued
    pub issued: u64,
    /// Credits retired
    pub retired: u64,
    /// Credits still outstanding
    pub remaining: u64,
}

impl CreditTotals {
    /// Build totals with `remaining` derived from the other two counts
    pub fn new(issued: u64, retired: u64) -> Self {
        Self {
            issued,
            retired,
            remaining: issued.saturating_sub(retired),
        }
    }

    /// Whether `remaining == issued - retired` holds for this record
    ///
    /// The registry is expected to keep this invariant; the explorer only reports it.
    pub fn is_consistent(&self) -> bool {
        self.retired <= self.issued && self.remaining == self.issued - self.retired
    }
}

/// Summary row for a registry project
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project identifier
    #[schema(example = "PROJ-001")]
    pub id: String,
    /// Display title
    pub title: String,
    /// Lifecycle status, opaque to the explorer (`active`, `inactive`, ...)
    pub status: String,
    /// Host country
    pub country: Option<String>,
    /// Methodology label
    pub methodology: String,
    /// Issued, retired and remaining credits
    pub totals: CreditTotals,
    /// When the last IoT digest was recorded
    pub last_digest_at: Option<DateTime<Utc>>,
}

/// Dated batch of credits within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vintage {
    /// Issuance class identifier
    pub class_id: String,
    /// First day covered by the vintage
    pub vintage_start: NaiveDate,
    /// Last day covered by the vintage
    pub vintage_end: NaiveDate,
    /// Credits issued in this vintage
    pub issued: u64,
    /// Credits retired from this vintage
    pub retired: u64,
}

/// Reference to the anchor that committed a piece of evidence
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRef {
    /// Namespaced anchor topic
    pub topic: String,
    /// Anchored hash
    pub hash: String,
    /// Optional locator of the anchored content
    pub uri: Option<String>,
}

/// Evidence file attached to a project
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Evidence identifier
    pub id: String,
    /// Original file name
    pub file_name: String,
    /// SHA-256 of the file contents
    pub sha256: String,
    /// Content-address identifier
    pub cid: Option<String>,
    /// Anchor that committed this file, if any
    pub anchored: Option<AnchorRef>,
}

/// Adapter receipt linked from a project
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterReceiptRef {
    /// Adapter transaction identifier
    pub adapter_tx_id: String,
    /// On-chain transaction hash
    pub tx_hash: String,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
}

/// Latest IoT measurement digest for a project
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IotDigest {
    /// Energy measured in kWh
    pub kwh: f64,
    /// Avoided emissions in tCO2e
    pub tco2e: f64,
    /// Measurement day
    pub date: NaiveDate,
    /// Hash of the digest payload
    pub digest_hash: String,
    /// Content-address identifier of the digest payload
    pub cid: Option<String>,
}

/// Full project record
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    /// Summary fields
    #[serde(flatten)]
    pub summary: ProjectSummary,
    /// Free-text description
    pub description: Option<String>,
    /// Vintages in registry order
    pub vintages: Vec<Vintage>,
    /// Evidence files in registry order
    pub evidence: Vec<Evidence>,
    /// Adapter receipts for this project
    #[serde(default)]
    pub adapter_receipts: Vec<AdapterReceiptRef>,
    /// Latest IoT digest
    pub iot: Option<IotDigest>,
}

/// Issuance batch (credit class)
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    /// Class identifier, unique per issuance batch
    #[schema(example = "CLASS-001")]
    pub class_id: String,
    /// Owning project
    pub project_id: String,
    /// First day covered by the batch
    pub vintage_start: NaiveDate,
    /// Last day covered by the batch
    pub vintage_end: NaiveDate,
    /// Credits issued in the batch
    pub total_issued: u64,
    /// Credits retired from the batch
    pub total_retired: u64,
    /// Class metadata locator
    pub uri: Option<String>,
}

/// Retirement certificate
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetirementCert {
    /// Certificate identifier
    #[schema(example = "CERT-001")]
    pub certificate_id: String,
    /// Project the credits came from
    pub project_id: String,
    /// Class the credits came from
    pub class_id: String,
    /// Credits retired
    pub quantity: u64,
    /// First serial number, inclusive
    pub serial_start: u64,
    /// Last serial number, inclusive
    pub serial_end: u64,
    /// Emission factor reference
    pub factor_ref: String,
    /// Hash of the on-chain retirement transaction
    pub onchain_hash: Option<String>,
    /// When the certificate was issued
    pub issued_at: DateTime<Utc>,
    /// Commitment to the beneficiary, not reversible
    pub beneficiary_hash: Option<String>,
    /// Commitment to the retirement purpose, not reversible
    pub purpose_hash: Option<String>,
}

impl RetirementCert {
    /// Number of serials covered by `[serial_start, serial_end]`
    pub fn serial_count(&self) -> u64 {
        self.serial_end
            .checked_sub(self.serial_start)
            .map_or(0, |span| span + 1)
    }

    /// Whether the serial range covers exactly `quantity` credits
    pub fn is_consistent(&self) -> bool {
        self.serial_count() == self.quantity
    }
}

/// Kind of subject an evidence anchor commits to, derived from its topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorTopic<'a> {
    /// `IOT:<project>`
    Iot(&'a str),
    /// `ISSUANCE:<class>`
    Issuance(&'a str),
    /// Any other namespace
    Other(&'a str),
}

/// Evidence anchor published for a project
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceAnchor {
    /// Namespaced topic, e.g. `IOT:PROJ-001`
    pub topic: String,
    /// Anchored content hash
    pub hash: String,
    /// Content-addressed storage locator
    pub uri: Option<String>,
    /// When the anchor was published
    pub timestamp: DateTime<Utc>,
}

impl EvidenceAnchor {
    /// Split the topic into its namespace and subject
    pub fn topic_kind(&self) -> AnchorTopic<'_> {
        match self.topic.split_once(':') {
            Some(("IOT", subject)) => AnchorTopic::Iot(subject),
            Some(("ISSUANCE", subject)) => AnchorTopic::Issuance(subject),
            _ => AnchorTopic::Other(&self.topic),
        }
    }
}

/// Registry-wide aggregate counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    /// Number of registered projects
    pub total_projects: u64,
    /// Credits issued across all projects
    pub total_issued: u64,
    /// Credits retired across all projects
    pub total_retired: u64,
    /// `total_retired / total_issued`, 0 when nothing was issued
    pub retirement_rate: f64,
}

impl RegistryStats {
    /// Build stats with the retirement rate derived from the totals
    #[allow(clippy::cast_precision_loss)]
    pub fn new(total_projects: u64, total_issued: u64, total_retired: u64) -> Self {
        let retirement_rate = if total_issued == 0 {
            0.0
        } else {
            total_retired as f64 / total_issued as f64
        };
        Self {
            total_projects,
            total_issued,
            total_retired,
            retirement_rate,
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total matching items across all pages
    pub total: u64,
    /// Whether a later page exists
    pub has_more: bool,
}

/// Adapter receipt for a registry-to-chain operation
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterReceipt {
    /// Adapter transaction identifier
    pub adapter_tx_id: String,
    /// Adapter-side processing status
    pub status: String,
    /// On-chain transaction hash, once submitted
    pub tx_hash: Option<String>,
    /// When the adapter recorded the receipt
    pub timestamp: DateTime<Utc>,
}

/// Transaction as indexed by the adapter
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterTransaction {
    /// Transaction hash
    pub hash: String,
    /// Inclusion block
    pub block_number: Option<u64>,
    /// Block timestamp
    pub timestamp: Option<DateTime<Utc>>,
    /// Sender address
    pub from: Option<String>,
    /// Recipient address
    pub to: Option<String>,
    /// Transferred value in wei, decimal string
    pub value: Option<String>,
    /// Gas consumed
    pub gas_used: Option<u64>,
    /// Gas price in wei, decimal string
    pub gas_price: Option<String>,
    /// `success` or `failed`
    pub status: String,
    /// Decoded events
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<serde_json::Value>,
    /// Raw logs
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub logs: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn credit_totals_derive_remaining() {
        let totals = CreditTotals::new(10_000, 2_500);
        assert_eq!(totals.remaining, 7_500);
        assert!(totals.is_consistent());

        let skewed = CreditTotals {
            issued: 10,
            retired: 2,
            remaining: 9,
        };
        assert!(!skewed.is_consistent());
    }

    #[test]
    fn retirement_serial_count_is_inclusive() {
        let cert = RetirementCert {
            certificate_id: "CERT-1".to_string(),
            project_id: "PROJ-001".to_string(),
            class_id: "CLASS-001".to_string(),
            quantity: 1000,
            serial_start: 1_000_001,
            serial_end: 1_001_000,
            factor_ref: "FACTOR-001".to_string(),
            onchain_hash: None,
            issued_at: DateTime::UNIX_EPOCH,
            beneficiary_hash: None,
            purpose_hash: None,
        };
        assert_eq!(cert.serial_count(), 1000);
        assert!(cert.is_consistent());

        let inverted = RetirementCert {
            serial_start: 10,
            serial_end: 5,
            ..cert
        };
        assert_eq!(inverted.serial_count(), 0);
    }

    #[test]
    fn anchor_topic_namespaces() {
        let mut anchor = EvidenceAnchor {
            topic: "IOT:PROJ-001".to_string(),
            hash: "0x01".to_string(),
            uri: None,
            timestamp: DateTime::UNIX_EPOCH,
        };
        assert_eq!(anchor.topic_kind(), AnchorTopic::Iot("PROJ-001"));

        anchor.topic = "ISSUANCE:CLASS-001".to_string();
        assert_eq!(anchor.topic_kind(), AnchorTopic::Issuance("CLASS-001"));

        anchor.topic = "AUDIT".to_string();
        assert_eq!(anchor.topic_kind(), AnchorTopic::Other("AUDIT"));
    }

    #[test]
    fn registry_stats_rate() {
        assert!((RegistryStats::new(2, 200, 50).retirement_rate - 0.25).abs() < f64::EPSILON);
        assert!(RegistryStats::new(0, 0, 0).retirement_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn project_detail_flattens_summary() {
        let detail: ProjectDetail = serde_json::from_value(json!({
            "id": "PROJ-001",
            "title": "Forest Conservation Project",
            "status": "active",
            "methodology": "REDD+",
            "totals": {"issued": 10, "retired": 4, "remaining": 6},
            "vintages": [],
            "evidence": []
        }))
        .unwrap();

        assert_eq!(detail.summary.id, "PROJ-001");
        assert!(detail.adapter_receipts.is_empty());
        assert!(detail.iot.is_none());

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], "PROJ-001");
        assert!(value.get("summary").is_none());
        assert!(value.get("country").is_none());
    }

    #[test]
    fn project_detail_requires_collections() {
        let result: Result<ProjectDetail, _> = serde_json::from_value(json!({
            "id": "PROJ-001",
            "title": "Forest Conservation Project",
            "status": "active",
            "methodology": "REDD+",
            "totals": {"issued": 10, "retired": 4, "remaining": 6}
        }));
        assert!(result.is_err());
    }
}
