use async_trait::async_trait;
use serde_json::{json, Value};
use starwatch::error::{HarvestError, Result};
use starwatch::models::{AuthorCommitRow, PositionRow, RepoSnapshot};
use starwatch::sink::Sink;
use starwatch::{ConcurrencyGate, GitHubClient, RateLimiter};
use std::sync::Arc;
use std::sync::Mutex;

/// Client wired to a mock server, throttles wide open
pub fn test_client(base_url: &str) -> Arc<GitHubClient> {
    Arc::new(
        GitHubClient::with_base_url(
            "test-token",
            base_url,
            Arc::new(RateLimiter::new(1000)),
            ConcurrencyGate::new(16),
        )
        .unwrap(),
    )
}

/// One item of a repository search payload
pub fn repo_item(owner: &str, name: &str, stars: u64) -> Value {
    json!({
        "id": 1,
        "name": name,
        "owner": {"login": owner},
        "stargazers_count": stars,
        "watchers_count": stars,
        "forks_count": stars / 10,
        "language": "Rust",
    })
}

/// Full search response body
pub fn search_body(items: &[Value]) -> String {
    json!({"total_count": items.len(), "items": items}).to_string()
}

/// Commits-listing body; `None` entries omit the author name
pub fn commits_body(authors: &[Option<&str>]) -> String {
    let commits: Vec<Value> = authors
        .iter()
        .map(|author| match author {
            Some(name) => json!({"commit": {"author": {"name": name}}}),
            None => json!({"commit": {"author": {}}}),
        })
        .collect();
    Value::Array(commits).to_string()
}

/// Sink that records every write for later assertions
#[derive(Default)]
pub struct RecordingSink {
    pub snapshots: Mutex<Vec<RepoSnapshot>>,
    pub author_rows: Mutex<Vec<AuthorCommitRow>>,
    pub positions: Mutex<Vec<PositionRow>>,
}

#[async_trait]
impl Sink for RecordingSink {
    async fn write_repository_snapshot(&self, snapshot: &RepoSnapshot) -> Result<()> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    async fn write_author_commit_counts(&self, rows: &[AuthorCommitRow]) -> Result<()> {
        self.author_rows.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }

    async fn write_repository_position(&self, row: &PositionRow) -> Result<()> {
        self.positions.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// Recording sink that rejects every write for one repository name
#[derive(Default)]
pub struct FailingSink {
    pub inner: RecordingSink,
    pub fail_repo: String,
}

impl FailingSink {
    pub fn rejecting(repo: &str) -> Self {
        Self {
            inner: RecordingSink::default(),
            fail_repo: repo.to_string(),
        }
    }
}

#[async_trait]
impl Sink for FailingSink {
    async fn write_repository_snapshot(&self, snapshot: &RepoSnapshot) -> Result<()> {
        if snapshot.name == self.fail_repo {
            return Err(HarvestError::Sink(format!(
                "simulated insert failure for {}",
                snapshot.name
            )));
        }
        self.inner.write_repository_snapshot(snapshot).await
    }

    async fn write_author_commit_counts(&self, rows: &[AuthorCommitRow]) -> Result<()> {
        if rows.iter().any(|row| row.repo == self.fail_repo) {
            return Err(HarvestError::Sink("simulated insert failure".into()));
        }
        self.inner.write_author_commit_counts(rows).await
    }

    async fn write_repository_position(&self, row: &PositionRow) -> Result<()> {
        if row.repo == self.fail_repo {
            return Err(HarvestError::Sink("simulated insert failure".into()));
        }
        self.inner.write_repository_position(row).await
    }
}
