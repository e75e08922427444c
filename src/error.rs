use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Errors that can occur during a harvest cycle
#[derive(Debug, Error)]
pub enum HarvestError {
    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// GitHub API errors (non-success status codes)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A repository payload was missing a field the pipeline requires
    #[error("Missing field in repository payload: {0}")]
    MissingField(String),

    /// Sink write errors
    #[error("Sink error: {0}")]
    Sink(String),

    /// A spawned repository task failed to complete
    #[error("Task join error: {0}")]
    Join(String),
}

impl HarvestError {
    /// Checks if this error is transient: fetch-path errors of this class
    /// degrade to empty results instead of aborting the cycle
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Io(_) | Self::GitHubApi(_) | Self::Json(_))
    }
}
