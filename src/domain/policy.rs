//! Branch policy engine: decides whether a source branch may target a branch
//! and which labels the pull request should carry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::branch::{extract_branch_type, BranchNameMode};
use crate::error::{GatekeeperError, Result};

/// Label applied when the target branch has no policy.
pub const UNKNOWN_TARGET_LABEL: &str = "unknown-target-branch";

/// Label applied when the branch type is not accepted.
pub const INVALID_BRANCH_LABEL: &str = "invalid-branch";

/// Branch types accepted by one target branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTypePolicy {
    pub accepts: Vec<String>,
}

impl BranchTypePolicy {
    pub fn new<I, S>(accepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BranchTypePolicy {
            accepts: accepts.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership.
    pub fn is_accepted(&self, branch_type: &str) -> bool {
        self.accepts.iter().any(|t| t == branch_type)
    }
}

/// Target branch name -> accepted branch types.
pub type BranchSystemConfig = BTreeMap<String, BranchTypePolicy>;

/// Why a branch pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    UnknownTargetBranch,
    NotAccepted,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::UnknownTargetBranch => "unknown-target-branch",
            InvalidReason::NotAccepted => "not-accepted",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(InvalidReason),
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Valid => "valid",
            Verdict::Invalid(reason) => reason.as_str(),
        }
    }
}

/// Outcome of evaluating one (target, source) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    /// The classified type of the source branch.
    pub branch_type: String,
    /// Labels to apply, never empty.
    pub labels: Vec<String>,
}

impl Decision {
    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }

    fn valid(branch_type: String) -> Self {
        Decision {
            verdict: Verdict::Valid,
            labels: vec![branch_type.clone()],
            branch_type,
        }
    }

    fn invalid(reason: InvalidReason, branch_type: String) -> Self {
        let label = match reason {
            InvalidReason::UnknownTargetBranch => UNKNOWN_TARGET_LABEL,
            InvalidReason::NotAccepted => INVALID_BRANCH_LABEL,
        };
        Decision {
            verdict: Verdict::Invalid(reason),
            branch_type,
            labels: vec![label.to_string()],
        }
    }
}

/// Pure decision engine over a loaded [`BranchSystemConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchPolicyEngine {
    mode: BranchNameMode,
}

impl BranchPolicyEngine {
    pub fn new(mode: BranchNameMode) -> Self {
        BranchPolicyEngine { mode }
    }

    pub fn mode(&self) -> BranchNameMode {
        self.mode
    }

    pub fn extract_branch_type(&self, source_branch: &str) -> Result<String> {
        extract_branch_type(source_branch, self.mode)
    }

    /// Returns `None` when the target branch has no entry.
    pub fn lookup_policy<'a>(
        &self,
        config: &'a BranchSystemConfig,
        target_branch: &str,
    ) -> Option<&'a BranchTypePolicy> {
        config.get(target_branch)
    }

    /// Decide whether `source_branch` may be merged into `target_branch`.
    ///
    /// Malformed branch names are errors; an unknown target or an unaccepted
    /// type is an `Invalid` decision so callers can still label the PR.
    ///
    /// # Example
    /// ```
    /// use git_gatekeeper::domain::{BranchPolicyEngine, BranchSystemConfig, BranchTypePolicy};
    ///
    /// let mut config = BranchSystemConfig::new();
    /// config.insert("main".into(), BranchTypePolicy::new(["release", "hotfix"]));
    ///
    /// let decision = BranchPolicyEngine::default()
    ///     .evaluate("main", "release/2.3.0", &config)
    ///     .unwrap();
    /// assert!(decision.is_valid());
    /// assert_eq!(decision.labels, vec!["release".to_string()]);
    /// ```
    pub fn evaluate(
        &self,
        target_branch: &str,
        source_branch: &str,
        config: &BranchSystemConfig,
    ) -> Result<Decision> {
        if target_branch.trim().is_empty() {
            return Err(GatekeeperError::branch_name(
                "target branch must be a non-empty string",
            ));
        }

        let branch_type = self.extract_branch_type(source_branch)?;

        let decision = match self.lookup_policy(config, target_branch) {
            None => Decision::invalid(InvalidReason::UnknownTargetBranch, branch_type),
            Some(policy) if policy.is_accepted(&branch_type) => Decision::valid(branch_type),
            Some(_) => Decision::invalid(InvalidReason::NotAccepted, branch_type),
        };

        tracing::debug!(
            target_branch,
            source_branch,
            branch_type = %decision.branch_type,
            verdict = decision.verdict.as_str(),
            "evaluated branch policy"
        );

        Ok(decision)
    }
}
