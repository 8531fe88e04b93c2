//! GitHub API abstraction layer
//!
//! The workflows talk to GitHub only through the [GitHubApi] trait, so the
//! policy decisions can be exercised without network access.
//!
//! - [client::RestClient]: REST implementation using blocking `reqwest`
//! - [recording::RecordingClient]: records calls instead of sending them;
//!   backs `--dry-run` and the tests

pub mod client;
pub mod recording;

pub use client::RestClient;
pub use recording::{GitHubCall, RecordingClient};

use serde::Deserialize;

use crate::error::Result;

/// Default REST endpoint for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// A release as returned by the releases endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftRelease {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

/// Operations the release workflows perform against GitHub.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` so one client can be shared.
///
/// ## Error Handling
///
/// Transport failures and non-success responses are reported as
/// [crate::error::GatekeeperError::GitHub] or
/// [crate::error::GatekeeperError::Http]; nothing is retried.
pub trait GitHubApi: Send + Sync {
    /// Add labels to a pull request (labels are issue-level in GitHub).
    fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Post a comment on a pull request.
    fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Close a pull request without merging it.
    fn close_pull_request(&self, pr_number: u64) -> Result<()>;

    /// Find the draft release whose tag or name equals `draft_tag`.
    ///
    /// # Returns
    /// * `Ok(Some(release))` - The draft release
    /// * `Ok(None)` - No draft matches
    fn find_draft_release(&self, draft_tag: &str) -> Result<Option<DraftRelease>>;

    /// Retag, retitle, and publish a draft release.
    fn publish_release(&self, release_id: u64, tag: &str, title: &str) -> Result<()>;
}

/// True when `release` is a draft stored under `draft_tag`.
pub fn is_matching_draft(release: &DraftRelease, draft_tag: &str) -> bool {
    release.draft
        && (release.tag_name == draft_tag || release.name.as_deref() == Some(draft_tag))
}
