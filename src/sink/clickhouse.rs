use super::Sink;
use crate::config::ClickHouseConfig;
use crate::error::{HarvestError, Result};
use crate::models::{AuthorCommitRow, PositionRow, RepoSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const INSERT_TIMEOUT_SECS: u64 = 30;

/// [`Sink`] implementation speaking the ClickHouse HTTP interface
///
/// Rows go out as `INSERT INTO <db>.<table> FORMAT JSONEachRow` POST bodies,
/// authenticated with the `X-ClickHouse-User`/`X-ClickHouse-Key` headers.
pub struct ClickHouseSink {
    client: Client,
    base_url: String,
    database: String,
    user: String,
    password: String,
}

impl ClickHouseSink {
    /// Creates a sink from resolved connection settings
    pub fn new(config: &ClickHouseConfig) -> Result<Self> {
        Self::with_base_url(config, &config.url())
    }

    /// Creates a sink against an explicit base URL (used by tests)
    pub fn with_base_url(config: &ClickHouseConfig, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(INSERT_TIMEOUT_SECS))
            .build()
            .map_err(|e| HarvestError::Sink(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    async fn execute(&self, query: &str, body: String) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("query", query)])
            .header("X-ClickHouse-User", &self.user)
            .header("X-ClickHouse-Key", &self.password)
            .body(body)
            .send()
            .await
            .map_err(|e| HarvestError::Sink(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(HarvestError::Sink(format!(
                "query failed with {status}: {}",
                text.trim()
            )));
        }
        Ok(text)
    }

    async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for row in rows {
            body.push_str(&serde_json::to_string(row)?);
            body.push('\n');
        }

        let query = format!(
            "INSERT INTO {}.{} FORMAT JSONEachRow",
            self.database, table
        );
        self.execute(&query, body).await?;
        debug!("inserted {} rows into {table}", rows.len());
        Ok(())
    }

    /// Reports the ClickHouse server version (diagnostic endpoint backing)
    pub async fn server_version(&self) -> Result<String> {
        let version = self.execute("SELECT version()", String::new()).await?;
        Ok(version.trim().to_string())
    }
}

#[async_trait]
impl Sink for ClickHouseSink {
    async fn write_repository_snapshot(&self, snapshot: &RepoSnapshot) -> Result<()> {
        self.insert("repositories", std::slice::from_ref(snapshot)).await
    }

    async fn write_author_commit_counts(&self, rows: &[AuthorCommitRow]) -> Result<()> {
        self.insert("repositories_authors_commits", rows).await
    }

    async fn write_repository_position(&self, row: &PositionRow) -> Result<()> {
        self.insert("repositories_positions", std::slice::from_ref(row)).await
    }
}
