// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered fallback payloads for unreachable upstreams
//!
//! A [`FallbackTable`] is a list of named routes, each a matcher over a parsed
//! [`EndpointPath`] and a builder producing the substitute JSON. Routes are
//! evaluated in registration order and the first match wins, so specific routes
//! (`/projects/*`) must be registered before general ones (`/projects`).
//! An endpoint no route matches resolves to an empty object.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::{FetchError, fetcher::HttpFetcher};

/// Wildcard accepted by [`EndpointPath::is`] for any single segment
pub const ANY_SEGMENT: &str = "*";

/// An endpoint split into path segments and decoded query pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl EndpointPath {
    /// Parse an endpoint such as `/projects/PROJ-001/evidence?page=2`
    pub fn parse(endpoint: &str) -> Self {
        let (path, query) = endpoint.split_once('?').unwrap_or((endpoint, ""));
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let query = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self { segments, query }
    }

    /// Path segments in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment at `index`, if present
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Whether the path has exactly the shape of `pattern`, where
    /// [`ANY_SEGMENT`] matches any single segment
    pub fn is(&self, pattern: &[&str]) -> bool {
        self.segments.len() == pattern.len()
            && self
                .segments
                .iter()
                .zip(pattern)
                .all(|(segment, expected)| *expected == ANY_SEGMENT || segment == expected)
    }

    /// First value of query parameter `key`
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Predicate selecting the endpoints a route answers
pub type Matcher = fn(&EndpointPath) -> bool;

/// Builder producing the substitute payload for a matched endpoint
pub type Builder = fn(&EndpointPath) -> Value;

/// One entry of a [`FallbackTable`]
#[derive(Debug, Clone, Copy)]
pub struct FallbackRoute {
    /// Name reported in logs
    pub name: &'static str,
    matches: Matcher,
    build: Builder,
}

/// Ordered, first-match-wins list of fallback routes
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    routes: Vec<FallbackRoute>,
}

impl FallbackTable {
    /// An empty table; every endpoint resolves to `{}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route with lower priority than every route already registered
    #[must_use]
    pub fn route(mut self, name: &'static str, matches: Matcher, build: Builder) -> Self {
        self.routes.push(FallbackRoute {
            name,
            matches,
            build,
        });
        self
    }

    /// Route names in priority order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|route| route.name)
    }

    /// Name of the route that would answer `endpoint`
    pub fn matched_route(&self, endpoint: &str) -> Option<&'static str> {
        let path = EndpointPath::parse(endpoint);
        self.find(&path).map(|route| route.name)
    }

    /// Substitute payload for `endpoint`; never fails
    pub fn resolve(&self, endpoint: &str) -> Value {
        let path = EndpointPath::parse(endpoint);
        match self.find(&path) {
            Some(route) => {
                debug!(endpoint, route = route.name, "resolved fallback payload");
                (route.build)(&path)
            }
            None => {
                debug!(endpoint, "no fallback route, using empty object");
                Value::Object(Map::new())
            }
        }
    }

    fn find(&self, path: &EndpointPath) -> Option<&FallbackRoute> {
        self.routes.iter().find(|route| (route.matches)(path))
    }
}

/// [`HttpFetcher`] that answers transport failures from a [`FallbackTable`]
///
/// Only [`FetchError::Unavailable`] is absorbed. Error statuses, malformed
/// bodies and invalid requests still reach the caller.
#[derive(Debug, Clone)]
pub struct FallbackFetcher {
    service: &'static str,
    fetcher: HttpFetcher,
    table: FallbackTable,
}

impl FallbackFetcher {
    /// Combine a fetcher with the fallback table for its upstream
    pub fn new(service: &'static str, fetcher: HttpFetcher, table: FallbackTable) -> Self {
        Self {
            service,
            fetcher,
            table,
        }
    }

    /// The underlying live-only fetcher, used for probes
    pub fn live(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// The fallback table
    pub fn table(&self) -> &FallbackTable {
        &self.table
    }

    /// GET `endpoint` and decode it as `T`, substituting the fallback payload
    /// when the upstream is unreachable
    ///
    /// # Errors
    ///
    /// Returns every [`FetchError`] except `Unavailable`, plus
    /// [`FetchError::ParseFailure`] when the payload does not decode as `T`
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let value = match self.fetcher.get_json(endpoint).await {
            Ok(value) => value,
            Err(error) if error.is_unavailable() => {
                warn!(
                    service = self.service,
                    endpoint,
                    route = self.table.matched_route(endpoint).unwrap_or("none"),
                    %error,
                    "upstream unavailable, serving fallback payload"
                );
                self.table.resolve(endpoint)
            }
            Err(error) => return Err(error),
        };

        serde_json::from_value(value).map_err(|e| FetchError::ParseFailure {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}
