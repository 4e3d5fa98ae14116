// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the carbon explorer
//!
//! This crate provides the value records exchanged with the registry and adapter
//! services, the explicit ledger context used by the presentation layer, and the
//! display helpers that pages use to render those records.

pub mod format;
pub mod health;
pub mod ledger;
pub mod records;

pub use health::ExplorerHealth;
pub use ledger::{FeatureFlags, Ledger, LedgerContext, LedgerParseError, Network};
pub use records::*;
