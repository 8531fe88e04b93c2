use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{BranchNameMode, BranchSystemConfig, TagPattern};
use crate::error::{GatekeeperError, Result};

/// File name searched for when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "workflow.config.json";

/// Represents the complete workflow configuration document.
///
/// Contains the per-target branch policies, Release-Drafter settings, and
/// the release tagging conventions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub branch_name_mode: BranchNameMode,

    #[serde(default)]
    pub branch_system: BranchSystemConfig,

    #[serde(default)]
    pub drafter_settings: BTreeMap<String, DrafterSettings>,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Settings for one generated Release-Drafter configuration file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DrafterSettings {
    pub file_name: String,
    pub name_template: String,
    pub tag_template: String,
    #[serde(default)]
    pub categories: Vec<DrafterCategory>,
}

/// A release-notes section grouping PRs by branch-type label.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrafterCategory {
    pub title: String,
    #[serde(default)]
    pub branch_types: Vec<String>,
}

fn default_tag_template() -> String {
    "{version}".to_string()
}

fn default_title_template() -> String {
    "Release v{version}".to_string()
}

fn default_draft_tag() -> String {
    "_DRAFT_".to_string()
}

fn default_initial_version() -> String {
    "1.0.0".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Release tagging conventions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_template")]
    pub tag_template: String,

    #[serde(default = "default_title_template")]
    pub title_template: String,

    /// Tag name Release-Drafter keeps its draft under.
    #[serde(default = "default_draft_tag")]
    pub draft_tag: String,

    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_template: default_tag_template(),
            title_template: default_title_template(),
            draft_tag: default_draft_tag(),
            initial_version: default_initial_version(),
            remote: default_remote(),
        }
    }
}

impl ReleaseConfig {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_template.clone())
    }

    pub fn title_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.title_template.clone())
    }
}

impl WorkflowConfig {
    /// Parse a configuration document; `.toml` paths are read as TOML, all
    /// others as JSON.
    pub fn from_str_for_path(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(GatekeeperError::config(format!(
                "Configuration file is empty: {}",
                path.display()
            )));
        }

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let config: WorkflowConfig = if is_toml {
            toml::from_str(content).map_err(|e| {
                GatekeeperError::config(format!("Invalid TOML in {}: {}", path.display(), e))
            })?
        } else {
            serde_json::from_str(content).map_err(|e| {
                GatekeeperError::config(format!("Invalid JSON in {}: {}", path.display(), e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// The branch policies, failing when none are configured.
    ///
    /// The drafter and release commands work without `branchSystem`; the
    /// PR checks do not, since every target would be unknown.
    pub fn require_branch_system(&self) -> Result<&BranchSystemConfig> {
        if self.branch_system.is_empty() {
            return Err(GatekeeperError::config(
                "Missing or malformed branch system configuration: branchSystem has no target branches",
            ));
        }
        Ok(&self.branch_system)
    }

    /// Check the structural invariants the policy engine relies on.
    pub fn validate(&self) -> Result<()> {
        for (target, policy) in &self.branch_system {
            if target.trim().is_empty() {
                return Err(GatekeeperError::config(
                    "branchSystem contains an empty target branch name",
                ));
            }
            if policy.accepts.is_empty() {
                return Err(GatekeeperError::config(format!(
                    "branchSystem.{}.accepts must list at least one branch type",
                    target
                )));
            }
            if policy.accepts.iter().any(|t| t.trim().is_empty()) {
                return Err(GatekeeperError::config(format!(
                    "branchSystem.{}.accepts contains an empty branch type",
                    target
                )));
            }
        }

        for (kind, settings) in &self.drafter_settings {
            if settings.file_name.trim().is_empty() {
                return Err(GatekeeperError::config(format!(
                    "drafterSettings.{} has an empty file-name",
                    kind
                )));
            }
        }

        self.release.tag_pattern()?;
        self.release.title_pattern()?;
        Ok(())
    }
}

/// Candidate locations searched when no explicit path is given, in order.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(".").join(CONFIG_FILE_NAME),
        PathBuf::from(".github").join(CONFIG_FILE_NAME),
    ];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("git-gatekeeper").join(CONFIG_FILE_NAME));
    }
    paths
}

/// Loads the workflow configuration.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `workflow.config.json` in current directory
/// 3. `.github/workflow.config.json` in current directory
/// 4. `<config dir>/git-gatekeeper/workflow.config.json`
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(WorkflowConfig)` - Loaded and validated configuration
/// * `Err(ConfigLoad)` - If no file is found, or it is empty, unreadable,
///   malformed, or violates an invariant
pub fn load_config(config_path: Option<&Path>) -> Result<WorkflowConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(GatekeeperError::config(format!(
                    "Configuration file not found at path: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => default_config_paths()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                GatekeeperError::config(format!(
                    "No {} found in the working directory, .github/, or the user config directory",
                    CONFIG_FILE_NAME
                ))
            })?,
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        GatekeeperError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let config = WorkflowConfig::from_str_for_path(&content, &path)?;
    tracing::debug!(
        path = %path.display(),
        targets = config.branch_system.len(),
        drafters = config.drafter_settings.len(),
        "loaded workflow config"
    );
    Ok(config)
}
