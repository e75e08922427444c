use crate::error::{HarvestError, Result};
use crate::gate::ConcurrencyGate;
use crate::models::{CommitRecord, RankedRepository, SearchResponse};
use crate::rate_limiter::RateLimiter;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const GITHUB_API_BASE: &str = "https://api.github.com";
const API_TIMEOUT_SECS: u64 = 30;

/// Thin authenticated executor for GitHub API calls
///
/// Owns the HTTP transport and the shared [`RateLimiter`]; every request
/// passes through the limiter before hitting the network. Commit fetches
/// additionally hold a [`ConcurrencyGate`] slot for the duration of the call.
/// Transport, HTTP-status, and decode failures on the fetch path are logged
/// and degrade to empty results rather than aborting the harvest.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
    gate: ConcurrencyGate,
}

impl GitHubClient {
    /// Creates a client against the public GitHub API
    pub fn new(token: &str, limiter: Arc<RateLimiter>, gate: ConcurrencyGate) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE, limiter, gate)
    }

    /// Creates a client against an explicit base URL (used by tests)
    pub fn with_base_url(
        token: &str,
        base_url: &str,
        limiter: Arc<RateLimiter>,
        gate: ConcurrencyGate,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("starwatch"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| HarvestError::Config("access token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
            gate,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        self.limiter.acquire().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(HarvestError::GitHubApi(format!(
                "{} returned {}",
                endpoint,
                response.status()
            )));
        }
        Ok(response.json::<T>().await?)
    }

    /// Fetches up to `limit` repositories sorted by star count descending
    ///
    /// Transient failures degrade to an empty page (logged, `Ok`); only
    /// unexpected non-network errors propagate, aborting the cycle upstream.
    pub async fn fetch_top_repositories(&self, limit: usize) -> Result<Vec<RankedRepository>> {
        let query = [
            ("q", "stars:>1".to_string()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", limit.to_string()),
        ];

        match self.get::<SearchResponse>("search/repositories", &query).await {
            Ok(data) => {
                debug!("ranked page fetched: {} repositories", data.items.len());
                Ok(data.items)
            }
            Err(e) if e.is_transient() => {
                error!("ranked repository fetch failed: {e}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches commits for `owner/repo` since the given instant
    ///
    /// Holds a gate slot for the duration of the call. Any failure, including
    /// a body that is not a well-formed list, is logged and yields an empty
    /// sequence.
    pub async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Vec<CommitRecord> {
        let _slot = self.gate.acquire().await;

        let endpoint = format!("repos/{owner}/{repo}/commits");
        let query = [("since", since.to_rfc3339_opts(SecondsFormat::Secs, true))];
        match self.get::<Vec<CommitRecord>>(&endpoint, &query).await {
            Ok(commits) => commits,
            Err(e) => {
                error!("commit fetch for {owner}/{repo} failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GitHubClient {
        GitHubClient::with_base_url(
            "test-token",
            base_url,
            Arc::new(RateLimiter::new(1000)),
            ConcurrencyGate::new(8),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_error_degrades_to_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/repositories")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let repos = client.fetch_top_repositories(100).await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn test_non_list_commit_body_treated_as_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Git Repository is empty."}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let commits = client.fetch_commits("acme", "widget", Utc::now()).await;
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_since_parameter_sent() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/repos/acme/widget/commits")
            .match_query(mockito::Matcher::UrlEncoded(
                "since".into(),
                "2024-05-01T00:00:00Z".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let since = DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let client = test_client(&server.url());
        client.fetch_commits("acme", "widget", since).await;
        m.assert_async().await;
    }
}
