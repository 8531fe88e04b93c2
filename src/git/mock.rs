use crate::error::{GatekeeperError, Result};
use crate::git::TagRepository;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// Tags are ordered oldest first; the last one is "latest".
pub struct MockRepository {
    tags: Mutex<Vec<String>>,
    pushed: Mutex<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Add a tag reachable from HEAD
    pub fn add_tag(&mut self, name: impl Into<String>) {
        if let Ok(tags) = self.tags.get_mut() {
            tags.push(name.into());
        }
    }

    /// `(tag, remote)` pairs pushed so far
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> GatekeeperError {
    GatekeeperError::tag("mock repository lock poisoned")
}

impl TagRepository for MockRepository {
    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.tags.lock().map_err(|_| poisoned())?.last().cloned())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let mut tags = self.tags.lock().map_err(|_| poisoned())?;
        if tags.iter().any(|t| t == name) {
            return Err(GatekeeperError::tag(format!("Tag '{}' already exists", name)));
        }
        tags.push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let tags = self.tags.lock().map_err(|_| poisoned())?;
        if !tags.iter().any(|t| t == name) {
            return Err(GatekeeperError::tag(format!("Tag '{}' does not exist", name)));
        }
        self.pushed
            .lock()
            .map_err(|_| poisoned())?
            .push((name.to_string(), remote.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_last_added() {
        let mut repo = MockRepository::new();
        assert_eq!(repo.latest_tag().unwrap(), None);
        repo.add_tag("1.0.0");
        repo.add_tag("1.1.0");
        assert_eq!(repo.latest_tag().unwrap(), Some("1.1.0".to_string()));
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut repo = MockRepository::new();
        repo.add_tag("1.0.0");
        assert!(repo.create_tag("1.0.0").is_err());
    }

    #[test]
    fn test_push_unknown_tag_rejected() {
        let repo = MockRepository::new();
        assert!(repo.push_tag("9.9.9", "origin").is_err());
    }
}
