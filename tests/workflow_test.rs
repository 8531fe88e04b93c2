// tests/workflow_test.rs
use std::path::PathBuf;

use git_gatekeeper::cli::{
    report_failure, resolve_pull_request, run_branch_type, run_bump, run_drafters, run_label,
    run_tag, run_validate, CheckOptions, PullRequestOverrides,
};
use git_gatekeeper::config::{load_config, WorkflowConfig};
use git_gatekeeper::domain::ReleaseKind;
use git_gatekeeper::event::head_commit_message;
use git_gatekeeper::git::{MockRepository, TagRepository};
use git_gatekeeper::github::{GitHubCall, RecordingClient};
use git_gatekeeper::outputs::StepResult;
use git_gatekeeper::GatekeeperError;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn config() -> WorkflowConfig {
    load_config(Some(&fixture("workflow.config.json"))).unwrap()
}

#[test]
fn test_validate_from_event_payload() {
    let pr = resolve_pull_request(
        Some(&fixture("pull_request_event.json")),
        &PullRequestOverrides::default(),
    )
    .unwrap();
    assert_eq!(pr.number, 42);
    assert_eq!(pr.base_ref, "develop");
    assert_eq!(pr.head_ref, "feature/login-form");

    let client = RecordingClient::new();
    let result = run_validate(&pr, &config(), &CheckOptions::default(), &client).unwrap();

    assert!(result.decision.is_valid());
    assert_eq!(result.exit_code(), 0);
    assert_eq!(client.comments().len(), 1);
    assert_eq!(result.outputs().get("branch_type"), Some("feature"));
}

#[test]
fn test_override_retargets_event_pull_request() {
    let overrides = PullRequestOverrides {
        target: Some("main".to_string()),
        ..PullRequestOverrides::default()
    };
    let pr = resolve_pull_request(Some(&fixture("pull_request_event.json")), &overrides).unwrap();

    let client = RecordingClient::new();
    let result = run_validate(&pr, &config(), &CheckOptions::default(), &client).unwrap();

    assert!(result.closed);
    assert_eq!(result.exit_code(), 1);
    assert_eq!(
        client.calls().last(),
        Some(&GitHubCall::ClosePullRequest { pr: 42 })
    );
}

#[test]
fn test_label_then_failure_comment_count() {
    let pr = resolve_pull_request(
        None,
        &PullRequestOverrides {
            number: Some(5),
            target: Some("main".to_string()),
            source: Some("hotfix".to_string()),
        },
    )
    .unwrap();

    let client = RecordingClient::new();
    let err = run_label(&pr, &config(), &CheckOptions::default(), &client).unwrap_err();
    assert!(report_failure(&pr, &err, &client).unwrap());

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], GitHubCall::Comment { pr: 5, body } if body.contains("Branch check failed")));
}

#[test]
fn test_push_event_to_bumped_tag() {
    let message = head_commit_message(&fixture("push_event.json")).unwrap();
    let config = config();

    let classified = run_branch_type(&message, &config).unwrap();
    assert_eq!(classified.kind, ReleaseKind::Release);
    assert_eq!(classified.config_file, "release-drafter-minor.yml");

    let mut repo = MockRepository::new();
    repo.add_tag("2.3.1");
    let resolution = run_tag(&repo, &config.release).unwrap();
    assert!(!resolution.initial_version);

    let bumped = run_bump(&resolution.latest_tag, classified.kind, &config.release).unwrap();
    assert_eq!(bumped.new_tag, "2.4.0");
}

#[test]
fn test_tag_creates_initial_version_once() {
    let repo = MockRepository::new();
    let release = config().release;

    let first = run_tag(&repo, &release).unwrap();
    assert!(first.initial_version);
    assert_eq!(first.latest_tag, "1.0.0");
    assert_eq!(
        repo.pushed_tags(),
        vec![("1.0.0".to_string(), "origin".to_string())]
    );

    let second = run_tag(&repo, &release).unwrap();
    assert!(!second.initial_version);
    assert_eq!(repo.latest_tag().unwrap(), Some("1.0.0".to_string()));
    assert_eq!(repo.pushed_tags().len(), 1);
}

#[test]
fn test_drafters_written_from_fixture() {
    let dir = TempDir::new().unwrap();
    let report = run_drafters(&config(), dir.path()).unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(report.warnings.is_empty());

    let minor = std::fs::read_to_string(dir.path().join("release-drafter-minor.yml")).unwrap();
    assert!(minor.contains("name-template: 'Release v$NEXT_MINOR_VERSION'"));
    assert!(minor.contains("🚀 Features"));
}

#[test]
fn test_github_failure_is_not_reported_as_comment() {
    let pr = resolve_pull_request(
        None,
        &PullRequestOverrides {
            number: Some(11),
            target: Some("main".to_string()),
            source: Some("release/2.0".to_string()),
        },
    )
    .unwrap();

    let client = RecordingClient::failing("502 Bad Gateway");
    let err = run_label(&pr, &config(), &CheckOptions::default(), &client).unwrap_err();
    assert!(matches!(err, GatekeeperError::GitHub(_)));
    assert!(err.to_string().contains("502 Bad Gateway"));

    assert!(!report_failure(&pr, &err, &client).unwrap());
    assert!(client.calls().is_empty());
}

#[test]
fn test_validate_github_failure_propagates() {
    let pr = resolve_pull_request(
        Some(&fixture("pull_request_event.json")),
        &PullRequestOverrides::default(),
    )
    .unwrap();

    let client = RecordingClient::failing("403 Forbidden");
    let err = run_validate(&pr, &config(), &CheckOptions::default(), &client).unwrap_err();
    assert!(matches!(err, GatekeeperError::GitHub(_)));
    assert!(!report_failure(&pr, &err, &client).unwrap());
}
