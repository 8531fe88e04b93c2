use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{GatekeeperError, Result};

/// How a source branch without a `/` separator is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BranchNameMode {
    /// `type/name` is required; `hotfix` alone is rejected.
    #[default]
    Strict,
    /// A name without `/` is its own type.
    Lenient,
}

impl BranchNameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchNameMode::Strict => "strict",
            BranchNameMode::Lenient => "lenient",
        }
    }
}

/// Extract the branch type (the segment before the first `/`) from a branch name.
///
/// # Arguments
/// * `source_branch` - Full branch name (e.g., "feature/login")
/// * `mode` - Whether a separator-less name is an error or its own type
///
/// # Returns
/// * `Ok(String)` - The branch type (e.g., "feature")
/// * `Err(InvalidBranchName)` - Empty input, empty type segment, or missing
///   separator in strict mode
///
/// # Example
/// ```
/// use git_gatekeeper::domain::{extract_branch_type, BranchNameMode};
///
/// assert_eq!(extract_branch_type("release/2.3.0", BranchNameMode::Strict).unwrap(), "release");
/// assert!(extract_branch_type("hotfix", BranchNameMode::Strict).is_err());
/// assert_eq!(extract_branch_type("hotfix", BranchNameMode::Lenient).unwrap(), "hotfix");
/// ```
pub fn extract_branch_type(source_branch: &str, mode: BranchNameMode) -> Result<String> {
    if source_branch.trim().is_empty() {
        return Err(GatekeeperError::branch_name(
            "branch name must be a non-empty string",
        ));
    }

    let branch_type = match source_branch.split_once('/') {
        Some((prefix, _)) => prefix,
        None => match mode {
            BranchNameMode::Strict => {
                return Err(GatekeeperError::branch_name(format!(
                    "\"{}\" does not follow the expected \"type/branch-name\" format",
                    source_branch
                )));
            }
            BranchNameMode::Lenient => source_branch,
        },
    };

    if branch_type.is_empty() {
        return Err(GatekeeperError::branch_name(format!(
            "\"{}\" has an empty branch type",
            source_branch
        )));
    }

    Ok(branch_type.to_string())
}
