use std::sync::Mutex;

use crate::error::{GatekeeperError, Result};
use crate::github::{is_matching_draft, DraftRelease, GitHubApi};

/// A GitHub call captured by [RecordingClient].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubCall {
    AddLabels { pr: u64, labels: Vec<String> },
    Comment { pr: u64, body: String },
    ClosePullRequest { pr: u64 },
    PublishRelease { id: u64, tag: String, title: String },
}

/// Client that records calls instead of sending them.
pub struct RecordingClient {
    calls: Mutex<Vec<GitHubCall>>,
    releases: Vec<DraftRelease>,
    fail_with: Option<String>,
}

impl RecordingClient {
    /// Create a new recorder with no releases
    pub fn new() -> Self {
        RecordingClient {
            calls: Mutex::new(Vec::new()),
            releases: Vec::new(),
            fail_with: None,
        }
    }

    /// Add a release visible to [GitHubApi::find_draft_release]
    pub fn with_release(mut self, release: DraftRelease) -> Self {
        self.releases.push(release);
        self
    }

    /// Make every call fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        RecordingClient {
            fail_with: Some(message.into()),
            ..RecordingClient::new()
        }
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<GitHubCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitHubCall::Comment { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitHubCall) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(GatekeeperError::github(message.clone()));
        }
        self.calls
            .lock()
            .map_err(|_| GatekeeperError::github("call log lock poisoned"))?
            .push(call);
        Ok(())
    }
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubApi for RecordingClient {
    fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.record(GitHubCall::AddLabels {
            pr: pr_number,
            labels: labels.to_vec(),
        })
    }

    fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.record(GitHubCall::Comment {
            pr: pr_number,
            body: body.to_string(),
        })
    }

    fn close_pull_request(&self, pr_number: u64) -> Result<()> {
        self.record(GitHubCall::ClosePullRequest { pr: pr_number })
    }

    fn find_draft_release(&self, draft_tag: &str) -> Result<Option<DraftRelease>> {
        if let Some(message) = &self.fail_with {
            return Err(GatekeeperError::github(message.clone()));
        }
        Ok(self
            .releases
            .iter()
            .find(|release| is_matching_draft(release, draft_tag))
            .cloned())
    }

    fn publish_release(&self, release_id: u64, tag: &str, title: &str) -> Result<()> {
        self.record(GitHubCall::PublishRelease {
            id: release_id,
            tag: tag.to_string(),
            title: title.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let client = RecordingClient::new();
        client.add_labels(3, &["release".to_string()]).unwrap();
        client.create_comment(3, "hello").unwrap();
        client.close_pull_request(3).unwrap();

        assert_eq!(
            client.calls(),
            vec![
                GitHubCall::AddLabels {
                    pr: 3,
                    labels: vec!["release".to_string()]
                },
                GitHubCall::Comment {
                    pr: 3,
                    body: "hello".to_string()
                },
                GitHubCall::ClosePullRequest { pr: 3 },
            ]
        );
        assert_eq!(client.comments(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_failing_client_records_nothing() {
        let client = RecordingClient::failing("boom");
        assert!(client.create_comment(1, "x").is_err());
        assert!(client.find_draft_release("_DRAFT_").is_err());
        assert!(client.calls().is_empty());
    }
}
