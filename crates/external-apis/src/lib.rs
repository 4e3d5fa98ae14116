// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream integrations for the carbon explorer
//!
//! This crate wires the generic fetching primitives of `api-client` to the three
//! backends the explorer reads from, and reconciles their answers.
//!
//! # Architecture
//!
//! - **Clients**: [`registry`], [`adapter`] - REST APIs answered from
//!   [`fallbacks`] when unreachable; [`chain`] - optional JSON-RPC node, no fallback
//! - **Health**: [`health`] - concurrent, isolated, live-only probes of all backends
//! - **Facade**: [`explorer::Explorer`] - shared handle passed to request handlers,
//!   with transaction lookup across sources and the dual-ledger proof panel
//!
//! # Failure policy
//!
//! - Transport failures of the registry and adapter are absorbed by fallback payloads
//! - Error statuses, malformed bodies and chain failures always reach the caller

pub mod adapter;
pub mod chain;
pub mod explorer;
pub mod fallbacks;
pub mod health;
pub mod registry;

pub use adapter::{AdapterClient, ClassQuery};
pub use chain::{ChainClient, ChainConfig, ChainTransaction, TxStatus};
pub use explorer::*;
pub use health::{BackendHealth, HealthError, HealthReport};
pub use registry::{ProjectQuery, RegistryClient};
