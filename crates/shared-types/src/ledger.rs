// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Ledger and network identifiers
//!
//! The explorer shows two views of the same credits: the off-chain registry
//! ("credits") and the on-chain token representation ("tokens"). The ledger is
//! always supplied by the routing layer; nothing here infers it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chain id used by local development nodes
pub const LOCAL_DEVELOPMENT_CHAIN_ID: &str = "31337";

/// Which ledger a view presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    /// Off-chain registry, the source of record
    Credits,
    /// On-chain token representation
    Tokens,
}

impl Ledger {
    /// Both ledgers, credits first
    pub const fn all() -> &'static [Self] {
        &[Self::Credits, Self::Tokens]
    }

    /// Source-of-record label shown next to data from this ledger
    pub const fn authority(self) -> &'static str {
        match self {
            Self::Credits => "Registry API (Off-chain, Authoritative)",
            Self::Tokens => "Blockchain (On-chain Representation)",
        }
    }

    /// Theme class applied by the presentation layer
    pub const fn theme(self) -> &'static str {
        match self {
            Self::Credits => "credits-theme",
            Self::Tokens => "tokens-theme",
        }
    }

    /// Whether data for this ledger is read from the chain
    pub const fn is_on_chain(self) -> bool {
        matches!(self, Self::Tokens)
    }

    /// Lowercase path name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credits => "credits",
            Self::Tokens => "tokens",
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ledger {
    type Err = LedgerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "credits" => Ok(Self::Credits),
            "tokens" => Ok(Self::Tokens),
            _ => Err(LedgerParseError(s.to_string())),
        }
    }
}

/// Error returned when a ledger name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ledger: {0}. Expected one of: credits, tokens")]
pub struct LedgerParseError(pub String);

/// Network the chain client is pointed at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Network(String);

impl Network {
    /// Wrap a chain id as configured
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self(chain_id.into())
    }

    /// Chain id as configured
    pub fn chain_id(&self) -> &str {
        &self.0
    }

    /// Whether this is a local development node
    pub fn is_local_development(&self) -> bool {
        self.0 == LOCAL_DEVELOPMENT_CHAIN_ID
    }

    /// Human-readable environment label
    pub fn label(&self) -> String {
        if self.is_local_development() {
            "Local Development".to_string()
        } else {
            format!("Network: {}", self.0)
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(LOCAL_DEVELOPMENT_CHAIN_ID)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feature switches surfaced to the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeatureFlags {
    /// Token holder views
    pub holders: bool,
    /// Subgraph-backed views
    pub subgraph: bool,
}

/// Everything a view needs to know about the ledger it presents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct LedgerContext {
    pub ledger: Ledger,
    pub authority: String,
    pub theme: String,
    pub environment: String,
    pub network: Network,
    pub brand_name: String,
    pub features: FeatureFlags,
    /// Whether on-chain data can be read at all
    pub chain_available: bool,
}

impl LedgerContext {
    /// Context for `ledger` under the given deployment settings
    pub fn new(
        ledger: Ledger,
        network: Network,
        brand_name: impl Into<String>,
        features: FeatureFlags,
        chain_available: bool,
    ) -> Self {
        Self {
            ledger,
            authority: ledger.authority().to_string(),
            theme: ledger.theme().to_string(),
            environment: network.label(),
            network,
            brand_name: brand_name.into(),
            features,
            chain_available,
        }
    }
}
