//! Workflow orchestration logic
//!
//! One function per subcommand. Each takes its inputs explicitly (config,
//! event context, clients) and returns a result struct; none of them read
//! the process environment or exit the process. `main` owns both.

use std::path::Path;

use crate::config::{ReleaseConfig, WorkflowConfig};
use crate::domain::{
    merged_branch_from_message, next_tag, BranchNameMode, BranchPolicyEngine, Decision,
    ReleaseKind,
};
use crate::drafter::{self, DrafterReport};
use crate::error::{GatekeeperError, Result};
use crate::event::PullRequestContext;
use crate::git::{get_or_create_tag, TagRepository, TagResolution};
use crate::github::GitHubApi;
use crate::outputs::{StepOutputs, StepResult};
use crate::ui::comments;

/// Explicit values that take precedence over the event payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestOverrides {
    pub number: Option<u64>,
    pub target: Option<String>,
    pub source: Option<String>,
}

/// Build the pull request context from the event file and/or overrides.
///
/// When all three overrides are given the event file is not read.
pub fn resolve_pull_request(
    event_path: Option<&Path>,
    overrides: &PullRequestOverrides,
) -> Result<PullRequestContext> {
    if let (Some(number), Some(target), Some(source)) =
        (overrides.number, &overrides.target, &overrides.source)
    {
        return Ok(PullRequestContext {
            number,
            base_ref: target.clone(),
            head_ref: source.clone(),
        });
    }

    let path = event_path.ok_or_else(|| {
        GatekeeperError::event(
            "no event payload given; pass --event-path or all of --pr, --target and --source",
        )
    })?;
    let mut pr = PullRequestContext::from_event_file(path)?;

    if let Some(number) = overrides.number {
        pr.number = number;
    }
    if let Some(target) = &overrides.target {
        pr.base_ref = target.clone();
    }
    if let Some(source) = &overrides.source {
        pr.head_ref = source.clone();
    }
    Ok(pr)
}

/// Options shared by `validate` and `label`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CheckOptions {
    /// Overrides `branchNameMode` from the config.
    pub mode: Option<BranchNameMode>,
    /// Leave rejected PRs open (`validate` only).
    pub keep_open: bool,
}

/// Result of a branch policy check on a pull request
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub pr_number: u64,
    pub decision: Decision,
    /// Whether the PR was closed
    pub closed: bool,
}

impl CheckResult {
    /// `0` when the branch pair is valid, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.decision.is_valid() {
            0
        } else {
            1
        }
    }
}

impl StepResult for CheckResult {
    fn outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("decision", self.decision.verdict.as_str())
            .set("branch_type", self.decision.branch_type.clone())
            .set("labels", self.decision.labels.join(","));
        outputs
    }
}

fn engine_for(config: &WorkflowConfig, options: &CheckOptions) -> BranchPolicyEngine {
    BranchPolicyEngine::new(options.mode.unwrap_or(config.branch_name_mode))
}

/// Validate a pull request's branch pair.
///
/// Posts exactly one comment; closes the PR when the decision is invalid
/// unless `keep_open` is set.
pub fn run_validate(
    pr: &PullRequestContext,
    config: &WorkflowConfig,
    options: &CheckOptions,
    client: &dyn GitHubApi,
) -> Result<CheckResult> {
    let branch_system = config.require_branch_system()?;
    let engine = engine_for(config, options);
    let decision = engine.evaluate(&pr.base_ref, &pr.head_ref, branch_system)?;

    let accepted = engine
        .lookup_policy(branch_system, &pr.base_ref)
        .map(|policy| policy.accepts.clone())
        .unwrap_or_default();
    let body = comments::validation_comment(&decision, &pr.base_ref, &pr.head_ref, &accepted);
    client.create_comment(pr.number, &body)?;

    let closed = !decision.is_valid() && !options.keep_open;
    if closed {
        client.close_pull_request(pr.number)?;
    }

    Ok(CheckResult {
        pr_number: pr.number,
        decision,
        closed,
    })
}

/// Label a pull request by its source branch type and post one comment
/// listing the labels.
pub fn run_label(
    pr: &PullRequestContext,
    config: &WorkflowConfig,
    options: &CheckOptions,
    client: &dyn GitHubApi,
) -> Result<CheckResult> {
    let branch_system = config.require_branch_system()?;
    let decision =
        engine_for(config, options).evaluate(&pr.base_ref, &pr.head_ref, branch_system)?;

    client.add_labels(pr.number, &decision.labels)?;
    client.create_comment(pr.number, &comments::labels_comment(&decision))?;

    Ok(CheckResult {
        pr_number: pr.number,
        decision,
        closed: false,
    })
}

/// Post the single failure comment for an error raised before a decision.
///
/// Returns `Ok(false)` when the error came from GitHub itself, since
/// commenting would fail the same way.
pub fn report_failure(
    pr: &PullRequestContext,
    error: &GatekeeperError,
    client: &dyn GitHubApi,
) -> Result<bool> {
    if matches!(error, GatekeeperError::GitHub(_) | GatekeeperError::Http(_)) {
        return Ok(false);
    }
    client.create_comment(pr.number, &comments::failure_comment(&error.to_string()))?;
    Ok(true)
}

/// Release kind of a merged pull request
#[derive(Debug, Clone, PartialEq)]
pub struct BranchTypeResult {
    pub branch: String,
    pub kind: ReleaseKind,
    /// Release-Drafter config the release job should use
    pub config_file: String,
}

impl StepResult for BranchTypeResult {
    fn outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("branch_type", self.kind.as_str())
            .set("config_file", self.config_file.clone());
        outputs
    }
}

/// Classify the branch merged by a push event's head commit.
pub fn run_branch_type(commit_message: &str, config: &WorkflowConfig) -> Result<BranchTypeResult> {
    let branch = merged_branch_from_message(commit_message)?;
    let kind = ReleaseKind::classify(&branch)?;
    let config_file = kind.drafter_file(&config.drafter_settings);
    tracing::debug!(%branch, kind = kind.as_str(), %config_file, "classified merged branch");

    Ok(BranchTypeResult {
        branch,
        kind,
        config_file,
    })
}

impl StepResult for TagResolution {
    fn outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("latest_tag", self.latest_tag.clone())
            .set("initial_version", self.initial_version.to_string());
        outputs
    }
}

/// Latest tag, creating the initial one when the repository has none.
pub fn run_tag(repo: &dyn TagRepository, release: &ReleaseConfig) -> Result<TagResolution> {
    get_or_create_tag(repo, release)
}

/// Next release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpResult {
    pub previous_tag: String,
    pub new_tag: String,
}

impl StepResult for BumpResult {
    fn outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs.set("new_tag", self.new_tag.clone());
        outputs
    }
}

pub fn run_bump(latest_tag: &str, kind: ReleaseKind, release: &ReleaseConfig) -> Result<BumpResult> {
    let new_tag = next_tag(latest_tag, kind, &release.tag_pattern()?)?;
    Ok(BumpResult {
        previous_tag: latest_tag.to_string(),
        new_tag,
    })
}

/// A draft release that was published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub id: u64,
    pub tag: String,
    pub title: String,
}

impl StepResult for PublishedRelease {
    fn outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("release_tag", self.tag.clone())
            .set("release_title", self.title.clone());
        outputs
    }
}

/// Publish the Release-Drafter draft under `tag`.
pub fn run_publish(tag: &str, release: &ReleaseConfig, client: &dyn GitHubApi) -> Result<PublishedRelease> {
    let version = release.tag_pattern()?.extract_version(tag)?;
    let title = release.title_pattern()?.format(&version);

    let draft = client.find_draft_release(&release.draft_tag)?.ok_or_else(|| {
        GatekeeperError::github(format!(
            "no draft release found under '{}'",
            release.draft_tag
        ))
    })?;

    client.publish_release(draft.id, tag, &title)?;

    Ok(PublishedRelease {
        id: draft.id,
        tag: tag.to_string(),
        title,
    })
}

/// Write the Release-Drafter configs described by `drafterSettings`.
pub fn run_drafters(config: &WorkflowConfig, out_dir: &Path) -> Result<DrafterReport> {
    drafter::generate(&config.drafter_settings, out_dir)
}
