//! GitHub Actions event payloads.
//!
//! Only the fields the workflows read are modelled; everything else in the
//! payload is ignored.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GatekeeperError, Result};

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref", default)]
    git_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    base: GitRef,
    head: GitRef,
}

#[derive(Debug, Deserialize)]
struct HeadCommit {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    head_commit: Option<HeadCommit>,
}

/// The pull request a `pull_request` event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub number: u64,
    /// Target branch.
    pub base_ref: String,
    /// Source branch.
    pub head_ref: String,
}

fn read_payload(path: &Path) -> Result<EventPayload> {
    let content = fs::read_to_string(path).map_err(|e| {
        GatekeeperError::event(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_payload(&content)
}

fn parse_payload(content: &str) -> Result<EventPayload> {
    serde_json::from_str(content)
        .map_err(|e| GatekeeperError::event(format!("Invalid event JSON: {}", e)))
}

fn non_empty(value: Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GatekeeperError::event(format!(
            "{} is undefined in the pull request context",
            what
        ))),
    }
}

impl PullRequestContext {
    pub fn from_event_file(path: &Path) -> Result<Self> {
        Self::from_payload(read_payload(path)?)
    }

    pub fn from_event_json(content: &str) -> Result<Self> {
        Self::from_payload(parse_payload(content)?)
    }

    fn from_payload(payload: EventPayload) -> Result<Self> {
        let pr = payload
            .pull_request
            .ok_or_else(|| GatekeeperError::event("event has no pull_request"))?;

        Ok(PullRequestContext {
            number: pr.number,
            base_ref: non_empty(pr.base.git_ref, "Target branch")?,
            head_ref: non_empty(pr.head.git_ref, "Source branch")?,
        })
    }
}

/// Read `head_commit.message` from a push event.
pub fn head_commit_message(path: &Path) -> Result<String> {
    head_commit_message_from_payload(read_payload(path)?)
}

pub fn head_commit_message_from_json(content: &str) -> Result<String> {
    head_commit_message_from_payload(parse_payload(content)?)
}

fn head_commit_message_from_payload(payload: EventPayload) -> Result<String> {
    payload
        .head_commit
        .and_then(|c| c.message)
        .ok_or_else(|| GatekeeperError::event("head_commit or message not found in event data"))
}

/// `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = GatekeeperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoSlug {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GatekeeperError::event(format!(
                "repository '{}' is not in owner/name form",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_context() {
        let json = r#"{
            "action": "opened",
            "pull_request": {
                "number": 17,
                "base": { "ref": "main", "sha": "abc" },
                "head": { "ref": "release/2.3.0" }
            }
        }"#;
        let pr = PullRequestContext::from_event_json(json).unwrap();
        assert_eq!(
            pr,
            PullRequestContext {
                number: 17,
                base_ref: "main".to_string(),
                head_ref: "release/2.3.0".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_head_ref() {
        let json = r#"{ "pull_request": { "number": 1, "base": { "ref": "main" }, "head": {} } }"#;
        let err = PullRequestContext::from_event_json(json).unwrap_err();
        assert!(err.to_string().contains("Source branch"));
    }

    #[test]
    fn test_not_a_pull_request_event() {
        let err = PullRequestContext::from_event_json(r#"{ "ref": "refs/heads/main" }"#)
            .unwrap_err();
        assert!(err.to_string().contains("no pull_request"));
    }

    #[test]
    fn test_head_commit_message() {
        let json = r#"{ "head_commit": { "message": "Merge pull request #3 from a/hotfix/x" } }"#;
        assert_eq!(
            head_commit_message_from_json(json).unwrap(),
            "Merge pull request #3 from a/hotfix/x"
        );
        assert!(head_commit_message_from_json("{}").is_err());
    }

    #[test]
    fn test_repo_slug() {
        let slug: RepoSlug = "acme/widgets".parse().unwrap();
        assert_eq!(slug.owner, "acme");
        assert_eq!(slug.name, "widgets");
        assert_eq!(slug.to_string(), "acme/widgets");
        assert!("acme".parse::<RepoSlug>().is_err());
        assert!("acme/widgets/extra".parse::<RepoSlug>().is_err());
    }
}
