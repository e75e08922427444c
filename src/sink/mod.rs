mod clickhouse;

pub use clickhouse::ClickHouseSink;

use crate::error::Result;
use crate::models::{AuthorCommitRow, PositionRow, RepoSnapshot};
use async_trait::async_trait;

/// Durable store consuming the three row kinds a harvest cycle produces
///
/// Writes are append-only and idempotent by convention. Implementations must
/// accept concurrent calls from the per-repository tasks; any serialization
/// they need is their own. A returned error fails the calling repository's
/// task without touching its siblings.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Appends one repository snapshot row
    async fn write_repository_snapshot(&self, snapshot: &RepoSnapshot) -> Result<()>;

    /// Appends one row per (repository, author) pair for the cycle's date
    async fn write_author_commit_counts(&self, rows: &[AuthorCommitRow]) -> Result<()>;

    /// Appends one rank-position row for the cycle's date
    async fn write_repository_position(&self, row: &PositionRow) -> Result<()>;
}
