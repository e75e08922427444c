#![warn(missing_docs)]
#![warn(clippy::all)]

//! starwatch - harvests the most-starred GitHub repositories and their
//! per-author commit activity into ClickHouse
//!
//! One harvest cycle retrieves a star-ranked page of repositories, fans out
//! one task per repository to count commits by author over the trailing day,
//! and appends three kinds of rows (snapshot, per-author counts, rank
//! position) to the configured sink. The fan-out runs under two independent
//! throttles: a global requests-per-second limiter and a concurrency gate on
//! in-flight commit fetches.
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use starwatch::{Config, ConcurrencyGate, GitHubClient, RateLimiter, RepositoryHarvester};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let limiter = Arc::new(RateLimiter::new(config.harvest.requests_per_second));
//!     let gate = ConcurrencyGate::new(config.harvest.max_concurrent_fetches);
//!     let client = Arc::new(GitHubClient::new(config.github_token()?, limiter, gate)?);
//!
//!     let harvester = RepositoryHarvester::new(client, None, 100, 24);
//!     let results = harvester.harvest().await;
//!     println!("harvested {} repositories", results.len());
//!     Ok(())
//! }
//! ```

/// Per-author commit aggregation
pub mod aggregate;
/// Diagnostic HTTP front-end
pub mod api;
/// Configuration loading (YAML file + environment overrides)
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Concurrency gate for in-flight commit fetches
pub mod gate;
/// Authenticated GitHub API client
pub mod github;
/// Harvest cycle orchestration
pub mod harvester;
/// Logging configuration
pub mod logging;
/// Data model: upstream payloads, results, sink rows
pub mod models;
/// Global request-rate limiting
pub mod rate_limiter;
/// Storage sink interface and ClickHouse implementation
pub mod sink;

// Re-export common types
pub use aggregate::aggregate_commits;
pub use config::Config;
pub use error::{HarvestError, Result};
pub use gate::ConcurrencyGate;
pub use github::GitHubClient;
pub use harvester::RepositoryHarvester;
pub use models::{AuthorCommitCount, HarvestResult, RankedRepository};
pub use rate_limiter::RateLimiter;
pub use sink::{ClickHouseSink, Sink};
