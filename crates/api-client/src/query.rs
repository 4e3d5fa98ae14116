// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint construction helpers

use std::fmt;

use url::form_urlencoded;

use crate::FetchError;

const MAX_RESOURCE_ID_LEN: usize = 128;

/// Query string builder that only emits parameters that are present
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// No parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key=value` when `value` is `Some`
    #[must_use]
    pub fn optional<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Whether no parameter was added
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `path` with the encoded query string appended, or `path` alone when empty
    pub fn append_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{path}?{query}")
    }
}

/// Identifier that is safe to place into a single URL path segment
///
/// Registry, adapter and chain identifiers (`PROJ-001`, `CERT-2024-001`,
/// `0x…` hashes) only use ASCII alphanumerics and `-`, `_`, `.`, `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Validate an identifier
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidRequest`] if the identifier is empty, too
    /// long, a dot segment, or contains other characters
    pub fn new(id: impl Into<String>) -> Result<Self, FetchError> {
        let id = id.into();
        let valid_chars = id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));

        if id.is_empty() || id.len() > MAX_RESOURCE_ID_LEN || !valid_chars || id == "." || id == ".."
        {
            return Err(FetchError::InvalidRequest {
                message: format!("invalid resource identifier: {id:?}"),
            });
        }
        Ok(Self(id))
    }

    /// The identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
