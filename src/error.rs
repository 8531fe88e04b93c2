use thiserror::Error;

/// Unified error type for git-gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Configuration error: {0}")]
    ConfigLoad(String),

    #[error("Event payload error: {0}")]
    Event(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Release drafter error: {0}")]
    Drafter(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-gatekeeper
pub type Result<T> = std::result::Result<T, GatekeeperError>;

impl GatekeeperError {
    /// Create a branch name error with context
    pub fn branch_name(msg: impl Into<String>) -> Self {
        GatekeeperError::InvalidBranchName(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GatekeeperError::ConfigLoad(msg.into())
    }

    pub fn event(msg: impl Into<String>) -> Self {
        GatekeeperError::Event(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GatekeeperError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GatekeeperError::Tag(msg.into())
    }

    pub fn github(msg: impl Into<String>) -> Self {
        GatekeeperError::GitHub(msg.into())
    }

    pub fn drafter(msg: impl Into<String>) -> Self {
        GatekeeperError::Drafter(msg.into())
    }
}
