// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Deadline-bounded HTTP GET
//!
//! Every call is a single attempt. The deadline covers connecting, sending and
//! reading the body; when it elapses the request future is dropped, which
//! aborts the underlying connection.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::ACCEPT};
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::{FetchError, UnavailableReason};

/// Deadline applied to every upstream call unless configured otherwise
pub const DEFAULT_FETCH_DEADLINE: Duration = Duration::from_millis(3000);

const USER_AGENT: &str = "carbon-explorer/0.1.0";

/// Where and how long to fetch
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL that endpoints are appended to
    pub base_url: Url,
    /// Per-call deadline
    pub deadline: Duration,
}

impl FetcherConfig {
    /// Configuration with the default deadline
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            deadline: DEFAULT_FETCH_DEADLINE,
        }
    }

    /// Override the per-call deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Single-attempt JSON GET against one upstream
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Create a fetcher for the configured upstream
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::InvalidRequest {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Base URL this fetcher targets
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Per-call deadline
    pub fn deadline(&self) -> Duration {
        self.config.deadline
    }

    /// Resolve an endpoint such as `/projects?page=2` against the base URL
    ///
    /// Any path on the base URL is kept, so `http://host/api` + `/projects`
    /// yields `http://host/api/projects`.
    pub fn url_for(&self, endpoint: &str) -> Result<Url, FetchError> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let joined = if endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        };
        Url::parse(&joined).map_err(|e| FetchError::InvalidRequest {
            message: format!("cannot build URL for {endpoint}: {e}"),
        })
    }

    /// GET `endpoint` and parse the body as JSON
    ///
    /// # Errors
    ///
    /// - [`FetchError::Unavailable`] when the deadline elapses or the transport fails
    /// - [`FetchError::RequestFailed`] for any non-2xx status
    /// - [`FetchError::ParseFailure`] when the body is not JSON
    pub async fn get_json(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint)?;
        debug!(%url, deadline_ms = self.config.deadline.as_millis(), "fetching upstream");

        let request = self.client.get(url).header(ACCEPT, "application/json");
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = timeout(self.config.deadline, exchange)
            .await
            .map_err(|_| self.timed_out(endpoint))?
            .map_err(|e| transport_failure(endpoint, &e))?;

        if !status.is_success() {
            debug!(endpoint, status = status.as_u16(), "upstream returned error status");
            return Err(request_failed(endpoint, status));
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::ParseFailure {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// GET `endpoint` and report only the status, ignoring the body
    ///
    /// Used for liveness probes, which must never be answered from fallback data.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] when no status was received in time
    pub async fn probe(&self, endpoint: &str) -> Result<StatusCode, FetchError> {
        let url = self.url_for(endpoint)?;
        debug!(%url, "probing upstream");

        let response = timeout(self.config.deadline, self.client.get(url).send())
            .await
            .map_err(|_| self.timed_out(endpoint))?
            .map_err(|e| transport_failure(endpoint, &e))?;

        Ok(response.status())
    }

    fn timed_out(&self, endpoint: &str) -> FetchError {
        FetchError::Unavailable {
            endpoint: endpoint.to_string(),
            reason: UnavailableReason::Timeout(self.config.deadline),
        }
    }
}

fn request_failed(endpoint: &str, status: StatusCode) -> FetchError {
    FetchError::RequestFailed {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string(),
    }
}

fn transport_failure(endpoint: &str, error: &reqwest::Error) -> FetchError {
    if error.is_builder() {
        return FetchError::InvalidRequest {
            message: error.to_string(),
        };
    }
    FetchError::Unavailable {
        endpoint: endpoint.to_string(),
        reason: UnavailableReason::Transport(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio_test::assert_err;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    fn fetcher_for(base: &str, deadline: Duration) -> HttpFetcher {
        let config = FetcherConfig::new(Url::parse(base).unwrap()).with_deadline(deadline);
        HttpFetcher::new(config).unwrap()
    }

    #[test]
    fn url_joining_keeps_base_path() {
        let fetcher = fetcher_for("http://registry.local/api/", DEFAULT_FETCH_DEADLINE);
        assert_eq!(
            fetcher.url_for("/projects?page=2").unwrap().as_str(),
            "http://registry.local/api/projects?page=2"
        );
        assert_eq!(
            fetcher.url_for("reports/registry-stats").unwrap().as_str(),
            "http://registry.local/api/reports/registry-stats"
        );
    }

    #[tokio::test]
    async fn returns_parsed_json_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("status", "active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server.uri(), DEFAULT_FETCH_DEADLINE);
        let value = fetcher.get_json("/projects?status=active").await.unwrap();
        assert_eq!(value, json!({"data": []}));
    }

    #[tokio::test]
    async fn non_success_status_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/PROJ-404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server.uri(), DEFAULT_FETCH_DEADLINE);
        let err = fetcher.get_json("/projects/PROJ-404").await.unwrap_err();
        assert!(!err.is_unavailable());
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().ends_with("404 Not Found"));
    }

    #[tokio::test]
    async fn slow_response_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reports/registry-stats"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server.uri(), Duration::from_millis(50));
        let err = fetcher
            .get_json("/reports/registry-stats")
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(matches!(
            err,
            FetchError::Unavailable {
                reason: UnavailableReason::Timeout(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let fetcher = fetcher_for("http://127.0.0.1:1", Duration::from_millis(500));
        let err = fetcher.get_json("/projects").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn malformed_body_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issuances"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server.uri(), DEFAULT_FETCH_DEADLINE);
        let result = fetcher.get_json("/issuances").await;
        let err = assert_err!(result);
        assert!(matches!(err, FetchError::ParseFailure { .. }));
    }

    #[tokio::test]
    async fn probe_reports_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/receipts/test"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server.uri(), DEFAULT_FETCH_DEADLINE);
        let status = fetcher.probe("/v1/receipts/test").await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
