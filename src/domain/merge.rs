//! Classification of merged pull requests into release kinds.

use std::collections::BTreeMap;

use clap::ValueEnum;
use regex::Regex;

use crate::config::DrafterSettings;
use crate::domain::branch::{extract_branch_type, BranchNameMode};
use crate::error::{GatekeeperError, Result};

/// What kind of release a merged branch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReleaseKind {
    Release,
    Hotfix,
}

impl ReleaseKind {
    /// Branch type string, also the `branch_type` step output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Release => "release",
            ReleaseKind::Hotfix => "hotfix",
        }
    }

    /// Key into `drafterSettings` for this kind.
    pub fn drafter_key(&self) -> &'static str {
        match self {
            ReleaseKind::Release => "minor",
            ReleaseKind::Hotfix => "patch",
        }
    }

    pub fn default_drafter_file(&self) -> &'static str {
        match self {
            ReleaseKind::Release => "release-drafter-minor.yml",
            ReleaseKind::Hotfix => "release-drafter-patch.yml",
        }
    }

    pub fn from_branch_type(branch_type: &str) -> Option<Self> {
        match branch_type {
            "release" => Some(ReleaseKind::Release),
            "hotfix" => Some(ReleaseKind::Hotfix),
            _ => None,
        }
    }

    /// Classify a merged branch (`release/1.4.0` -> `Release`).
    pub fn classify(branch: &str) -> Result<Self> {
        let branch_type = extract_branch_type(branch, BranchNameMode::Strict)?;
        ReleaseKind::from_branch_type(&branch_type).ok_or_else(|| {
            GatekeeperError::branch_name(format!(
                "branch '{}' does not match the release/* or hotfix/* patterns",
                branch
            ))
        })
    }

    /// Release-Drafter config file for this kind, honouring `drafterSettings`.
    pub fn drafter_file(&self, settings: &BTreeMap<String, DrafterSettings>) -> String {
        settings
            .get(self.drafter_key())
            .map(|s| s.file_name.clone())
            .unwrap_or_else(|| self.default_drafter_file().to_string())
    }
}

impl std::str::FromStr for ReleaseKind {
    type Err = GatekeeperError;

    fn from_str(s: &str) -> Result<Self> {
        ReleaseKind::from_branch_type(s)
            .ok_or_else(|| GatekeeperError::branch_name(format!("unknown branch type '{}'", s)))
    }
}

/// Extract the merged branch from a GitHub merge commit message.
///
/// GitHub writes `Merge pull request #12 from owner/release/1.4.0`; the
/// owner segment is dropped, leaving `release/1.4.0`.
pub fn merged_branch_from_message(message: &str) -> Result<String> {
    let re = Regex::new(r"Merge pull request #[0-9]+ from (\S+)")
        .map_err(|e| GatekeeperError::event(format!("invalid merge pattern: {}", e)))?;

    let head = re
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            GatekeeperError::event("no merged branch name found in the commit message")
        })?;

    match head.split_once('/') {
        Some((_owner, branch)) if !branch.is_empty() => Ok(branch.to_string()),
        _ => Err(GatekeeperError::event(format!(
            "merged head '{}' is not in owner/branch form",
            head
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_branch_strips_owner() {
        let msg = "Merge pull request #42 from acme/release/1.4.0\n\nRelease 1.4";
        assert_eq!(merged_branch_from_message(msg).unwrap(), "release/1.4.0");
    }

    #[test]
    fn test_merged_branch_missing() {
        let err = merged_branch_from_message("fix: typo").unwrap_err();
        assert!(matches!(err, GatekeeperError::Event(_)));
    }

    #[test]
    fn test_merged_branch_without_owner() {
        assert!(merged_branch_from_message("Merge pull request #1 from hotfix").is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            ReleaseKind::classify("release/1.4.0").unwrap(),
            ReleaseKind::Release
        );
        assert_eq!(
            ReleaseKind::classify("hotfix/crash").unwrap(),
            ReleaseKind::Hotfix
        );
        assert!(ReleaseKind::classify("feature/login").is_err());
        assert!(ReleaseKind::classify("release").is_err());
    }

    #[test]
    fn test_drafter_file_defaults_and_overrides() {
        let mut settings = BTreeMap::new();
        assert_eq!(
            ReleaseKind::Release.drafter_file(&settings),
            "release-drafter-minor.yml"
        );

        settings.insert(
            "patch".to_string(),
            DrafterSettings {
                file_name: "drafter-hotfix.yml".to_string(),
                name_template: "v$RESOLVED_VERSION".to_string(),
                tag_template: "v$RESOLVED_VERSION".to_string(),
                categories: Vec::new(),
            },
        );
        assert_eq!(
            ReleaseKind::Hotfix.drafter_file(&settings),
            "drafter-hotfix.yml"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("hotfix".parse::<ReleaseKind>().unwrap(), ReleaseKind::Hotfix);
        assert!("feature".parse::<ReleaseKind>().is_err());
    }
}
