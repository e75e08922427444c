use crate::aggregate::aggregate_commits;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{AuthorCommitRow, HarvestResult, PositionRow, RankedRepository, RepoSnapshot};
use crate::sink::Sink;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Orchestrates one harvest cycle: ranked fetch, per-repository fan-out,
/// aggregation, and sink writes
///
/// The fan-out is unbounded here; the client's rate limiter and concurrency
/// gate are the only throttles. Per-repository failures degrade to sentinel
/// results and never touch sibling tasks.
pub struct RepositoryHarvester {
    client: Arc<GitHubClient>,
    sink: Option<Arc<dyn Sink>>,
    page_size: usize,
    lookback: Duration,
}

impl RepositoryHarvester {
    /// Creates a harvester; pass `None` for the sink to collect results
    /// without persisting them
    pub fn new(
        client: Arc<GitHubClient>,
        sink: Option<Arc<dyn Sink>>,
        page_size: usize,
        lookback_hours: i64,
    ) -> Self {
        Self {
            client,
            sink,
            page_size,
            lookback: Duration::hours(lookback_hours),
        }
    }

    /// Runs one full cycle and returns one result per ranked repository, in
    /// ranked order
    ///
    /// Never returns an error: transient upstream failures yield an empty or
    /// partially-sentinel sequence, and only an unexpected ranked-list
    /// failure aborts the cycle (also as an empty sequence).
    pub async fn harvest(&self) -> Vec<HarvestResult> {
        let ranked = match self.client.fetch_top_repositories(self.page_size).await {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("harvest cycle aborted: {e}");
                return Vec::new();
            }
        };
        info!("harvest cycle started: {} ranked repositories", ranked.len());

        // One shared window per cycle, so counts are comparable across the page
        let captured_at = Utc::now();
        let since = captured_at - self.lookback;

        let mut handles = Vec::with_capacity(ranked.len());
        for (index, repo) in ranked.into_iter().enumerate() {
            let client = Arc::clone(&self.client);
            let sink = self.sink.clone();
            let position = index as u64 + 1;
            handles.push(tokio::spawn(async move {
                process_repository(client, sink, repo, position, since, captured_at).await
            }));
        }

        // Awaiting in spawn order restores ranked order regardless of
        // completion order
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("repository task failed to complete: {e}");
                    results.push(HarvestResult::sentinel());
                }
            }
        }

        info!("harvest cycle complete: {} repositories", results.len());
        results
    }
}

async fn process_repository(
    client: Arc<GitHubClient>,
    sink: Option<Arc<dyn Sink>>,
    repo: RankedRepository,
    position: u64,
    since: DateTime<Utc>,
    captured_at: DateTime<Utc>,
) -> HarvestResult {
    match try_process(client, sink, &repo, position, since, captured_at).await {
        Ok(result) => result,
        Err(e) => {
            error!("repository task failed (position {position}): {e}");
            HarvestResult::sentinel()
        }
    }
}

async fn try_process(
    client: Arc<GitHubClient>,
    sink: Option<Arc<dyn Sink>>,
    repo: &RankedRepository,
    position: u64,
    since: DateTime<Utc>,
    captured_at: DateTime<Utc>,
) -> Result<HarvestResult> {
    let (owner, name) = repo.identity()?;

    let commits = client.fetch_commits(&owner, &name, since).await;
    let authors = aggregate_commits(&commits);

    let result = HarvestResult {
        name: name.clone(),
        owner: owner.clone(),
        position,
        stars: repo.stars,
        watchers: repo.watchers,
        forks: repo.forks,
        language: repo.language_or_unknown(),
        authors: authors.clone(),
    };

    if let Some(sink) = sink {
        let date = captured_at.date_naive();

        let snapshot = RepoSnapshot {
            name: name.clone(),
            owner,
            stars: repo.stars,
            watchers: repo.watchers,
            forks: repo.forks,
            language: result.language.clone(),
            updated: captured_at,
        };
        sink.write_repository_snapshot(&snapshot).await.map_err(|e| {
            error!("snapshot write for {name} failed: {e}");
            e
        })?;

        let rows: Vec<AuthorCommitRow> = authors
            .into_iter()
            .map(|entry| AuthorCommitRow {
                date,
                repo: name.clone(),
                author: entry.author,
                commits_num: entry.commits,
            })
            .collect();
        sink.write_author_commit_counts(&rows).await.map_err(|e| {
            error!("author-commit write for {name} failed: {e}");
            e
        })?;

        let row = PositionRow {
            date,
            repo: name.clone(),
            position,
        };
        sink.write_repository_position(&row).await.map_err(|e| {
            error!("position write for {name} failed: {e}");
            e
        })?;
    }

    Ok(result)
}
