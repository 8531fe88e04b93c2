//! Command workflows behind the `git-gatekeeper` subcommands.

pub mod orchestration;

pub use orchestration::{
    report_failure, resolve_pull_request, run_branch_type, run_bump, run_drafters, run_label,
    run_publish, run_tag, run_validate, BranchTypeResult, BumpResult, CheckOptions, CheckResult,
    PublishedRelease, PullRequestOverrides,
};
