use crate::domain::Version;
use crate::error::{GatekeeperError, Result};
use crate::git::TagRepository;
use git2::{Oid, Repository as Git2Repo};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository at or above `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            GatekeeperError::tag(format!(
                "Not in a git repository ({}): {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
            token: None,
        }
    }

    /// Authenticate HTTPS pushes with a GitHub token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| GatekeeperError::tag("repository lock poisoned"))
    }
}

/// Pick the tag to report when several point at the same commit.
fn preferred_tag(mut names: Vec<String>) -> Option<String> {
    names.sort_by(|a, b| match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => std::cmp::Ordering::Greater,
        (Err(_), Ok(_)) => std::cmp::Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    });
    names.pop()
}

impl TagRepository for Git2Repository {
    fn latest_tag(&self) -> Result<Option<String>> {
        let repo = self.repo()?;

        let head = match repo.head() {
            Ok(head) => head.peel_to_commit()?.id(),
            // Unborn HEAD: an empty repository has no tags
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Map commit OIDs to tag names (handles both lightweight and annotated tags)
        let mut tags_by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        let tag_names = repo.tag_names(None)?;
        for tag_name in tag_names.iter().flatten() {
            if let Ok(tag_ref) = repo.find_reference(&format!("refs/tags/{}", tag_name)) {
                if let Ok(commit) = tag_ref.peel_to_commit() {
                    tags_by_commit
                        .entry(commit.id())
                        .or_default()
                        .push(tag_name.to_string());
                }
            }
        }

        if tags_by_commit.is_empty() {
            return Ok(None);
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.push(head)?;
        for oid in revwalk {
            let oid = oid?;
            if let Some(names) = tags_by_commit.remove(&oid) {
                return Ok(preferred_tag(names));
            }
        }

        Ok(None)
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;
        let head = repo.head()?.peel_to_commit()?;
        repo.tag_lightweight(name, head.as_object(), false)
            .map_err(|e| GatekeeperError::tag(format!("Failed to create tag '{}': {}", name, e)))?;
        Ok(())
    }

    fn push_tag(&self, name: &str, remote_name: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut remote = repo
            .find_remote(remote_name)
            .map_err(|_| GatekeeperError::tag(format!("No remote named '{}' found", remote_name)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        let token = self.token.clone();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if let Some(token) = &token {
                if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                return git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
            }
            git2::Cred::default()
        });

        // Surface per-reference rejections, which push() itself does not report
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[format!("refs/tags/{}", name)], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    GatekeeperError::tag(format!("Network error during push: {}", e))
                }
                _ => GatekeeperError::tag(format!("Failed to push tag '{}': {}", name, e)),
            })?;

        tracing::info!(tag = name, remote = remote_name, "pushed tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, message: &str) -> Oid {
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_empty_repository_has_no_tag() {
        let dir = TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        let repo = Git2Repository::discover(dir.path()).unwrap();
        assert_eq!(repo.latest_tag().unwrap(), None);
    }

    #[test]
    fn test_latest_tag_walks_back_from_head() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        commit(&raw, "first");
        let repo = Git2Repository::discover(dir.path()).unwrap();
        assert_eq!(repo.latest_tag().unwrap(), None);

        repo.create_tag("1.0.0").unwrap();
        commit(&raw, "second");
        assert_eq!(repo.latest_tag().unwrap(), Some("1.0.0".to_string()));

        repo.create_tag("1.1.0").unwrap();
        assert_eq!(repo.latest_tag().unwrap(), Some("1.1.0".to_string()));
    }

    #[test]
    fn test_create_existing_tag_fails() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        commit(&raw, "first");
        let repo = Git2Repository::discover(dir.path()).unwrap();
        repo.create_tag("1.0.0").unwrap();
        assert!(repo.create_tag("1.0.0").is_err());
    }

    #[test]
    fn test_push_to_missing_remote() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        commit(&raw, "first");
        let repo = Git2Repository::discover(dir.path()).unwrap();
        repo.create_tag("1.0.0").unwrap();
        let err = repo.push_tag("1.0.0", "origin").unwrap_err();
        assert!(err.to_string().contains("No remote named 'origin'"));
    }

    #[test]
    fn test_preferred_tag_picks_highest_version() {
        let names = vec!["1.2.0".to_string(), "latest".to_string(), "1.10.0".to_string()];
        assert_eq!(preferred_tag(names), Some("1.10.0".to_string()));
    }
}
