//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the tag operations the
//! release workflow needs, allowing for a real `git2`-backed implementation
//! and a mock implementation for testing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use git_gatekeeper::git::{get_or_create_tag, MockRepository};
//! # use git_gatekeeper::config::ReleaseConfig;
//! let repo = MockRepository::new();
//! let resolution = get_or_create_tag(&repo, &ReleaseConfig::default()).unwrap();
//! assert_eq!(resolution.latest_tag, "1.0.0");
//! assert!(resolution.initial_version);
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::config::ReleaseConfig;
use crate::domain::Version;
use crate::error::{GatekeeperError, Result};

/// Tag operations on a git repository
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// Implementations map underlying errors (like `git2::Error`) to
/// [crate::error::GatekeeperError] variants.
pub trait TagRepository: Send + Sync {
    /// Latest tag reachable from HEAD
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The nearest tag walking back from HEAD
    /// * `Ok(None)` - If no tag is reachable
    /// * `Err` - If HEAD cannot be resolved
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Create a lightweight tag on HEAD
    ///
    /// # Returns
    /// * `Err` - If the tag already exists or HEAD cannot be resolved
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a tag to a remote
    ///
    /// # Arguments
    /// * `name` - Tag to push
    /// * `remote` - Name of the remote (e.g., "origin")
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;
}

/// Latest tag plus whether it was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    pub latest_tag: String,
    pub initial_version: bool,
}

/// Find the latest tag, or create and push the initial version tag when the
/// repository has none.
pub fn get_or_create_tag<R: TagRepository + ?Sized>(
    repo: &R,
    release: &ReleaseConfig,
) -> Result<TagResolution> {
    if let Some(latest_tag) = repo.latest_tag()? {
        tracing::debug!(%latest_tag, "found latest tag");
        return Ok(TagResolution {
            latest_tag,
            initial_version: false,
        });
    }

    let initial = Version::parse(&release.initial_version).map_err(|e| {
        GatekeeperError::tag(format!(
            "initialVersion '{}' is not a version: {}",
            release.initial_version, e
        ))
    })?;
    let tag = release.tag_pattern()?.format(&initial);

    repo.create_tag(&tag)?;
    repo.push_tag(&tag, &release.remote)?;
    tracing::info!(%tag, remote = %release.remote, "created initial tag");

    Ok(TagResolution {
        latest_tag: tag,
        initial_version: true,
    })
}
