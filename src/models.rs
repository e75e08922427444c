use crate::error::{HarvestError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel recorded wherever a name or language is absent upstream
pub const UNKNOWN: &str = "Unknown";

/// One entry from the star-sorted GitHub search response
///
/// Numeric fields default to zero and optional strings to `None` when the
/// payload omits them; only `owner.login` and `name` are treated as required
/// (their absence marks the payload as malformed, see [`RankedRepository::identity`]).
#[derive(Debug, Clone, Deserialize)]
pub struct RankedRepository {
    /// Upstream repository identifier
    #[serde(default)]
    pub id: u64,
    /// Repository name
    #[serde(default)]
    pub name: Option<String>,
    /// Repository owner
    #[serde(default)]
    pub owner: Option<RepositoryOwner>,
    /// Star count
    #[serde(default, rename = "stargazers_count")]
    pub stars: u64,
    /// Watcher count
    #[serde(default, rename = "watchers_count")]
    pub watchers: u64,
    /// Fork count
    #[serde(default, rename = "forks_count")]
    pub forks: u64,
    /// Primary language, when GitHub reports one
    #[serde(default)]
    pub language: Option<String>,
}

/// Owner object nested inside a search result item
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
    /// Owner login name
    #[serde(default)]
    pub login: Option<String>,
}

impl RankedRepository {
    /// Resolves the (owner, name) pair, erroring when either is absent
    pub fn identity(&self) -> Result<(String, String)> {
        let owner = self
            .owner
            .as_ref()
            .and_then(|owner| owner.login.clone())
            .ok_or_else(|| HarvestError::MissingField("owner.login".into()))?;
        let name = self
            .name
            .clone()
            .ok_or_else(|| HarvestError::MissingField("name".into()))?;
        Ok((owner, name))
    }

    /// Primary language, with the `"Unknown"` sentinel for absent values
    pub fn language_or_unknown(&self) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Envelope of the GitHub repository search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Ranked result items
    #[serde(default)]
    pub items: Vec<RankedRepository>,
}

/// One raw commit record from the commits-listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitRecord {
    /// Nested commit detail object
    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

/// The `commit` object inside a commit record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitDetail {
    /// Commit author identity
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

/// The `commit.author` object inside a commit record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    /// Author display name
    #[serde(default)]
    pub name: Option<String>,
}

impl CommitRecord {
    /// Author display name, falling back to `"Unknown"` when any nesting
    /// level is missing
    pub fn author_name(&self) -> &str {
        self.commit
            .as_ref()
            .and_then(|commit| commit.author.as_ref())
            .and_then(|author| author.name.as_deref())
            .unwrap_or(UNKNOWN)
    }
}

/// Per-author commit count within one repository-day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCommitCount {
    /// Author display name
    pub author: String,
    /// Number of commits by this author in the window
    pub commits: u64,
}

/// The per-repository output unit of a harvest cycle
#[derive(Debug, Clone, Serialize)]
pub struct HarvestResult {
    /// Repository name
    pub name: String,
    /// Owner login
    pub owner: String,
    /// 1-based rank within the retrieved page
    pub position: u64,
    /// Star count
    pub stars: u64,
    /// Watcher count
    pub watchers: u64,
    /// Fork count
    pub forks: u64,
    /// Primary language
    pub language: String,
    /// One entry per distinct author seen in the commit window
    pub authors: Vec<AuthorCommitCount>,
}

impl HarvestResult {
    /// Placeholder result emitted when a repository task fails; sibling
    /// results are unaffected
    pub fn sentinel() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            owner: UNKNOWN.to_string(),
            position: 0,
            stars: 0,
            watchers: 0,
            forks: 0,
            language: UNKNOWN.to_string(),
            authors: Vec::new(),
        }
    }
}

/// Snapshot row written to the `repositories` table
#[derive(Debug, Clone, Serialize)]
pub struct RepoSnapshot {
    /// Repository name
    pub name: String,
    /// Owner login
    pub owner: String,
    /// Star count
    pub stars: u64,
    /// Watcher count
    pub watchers: u64,
    /// Fork count
    pub forks: u64,
    /// Primary language
    pub language: String,
    /// Harvest timestamp
    #[serde(serialize_with = "serialize_datetime")]
    pub updated: DateTime<Utc>,
}

/// Row written to the `repositories_authors_commits` table
#[derive(Debug, Clone, Serialize)]
pub struct AuthorCommitRow {
    /// Harvest date
    pub date: NaiveDate,
    /// Repository name
    pub repo: String,
    /// Author display name
    pub author: String,
    /// Commit count for the window
    pub commits_num: u64,
}

/// Row written to the `repositories_positions` table
#[derive(Debug, Clone, Serialize)]
pub struct PositionRow {
    /// Harvest date
    pub date: NaiveDate,
    /// Repository name
    pub repo: String,
    /// 1-based rank within the retrieved page
    pub position: u64,
}

// ClickHouse DateTime columns take "YYYY-MM-DD hh:mm:ss", not RFC 3339.
fn serialize_datetime<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
