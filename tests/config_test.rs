// tests/config_test.rs
use git_gatekeeper::config::{load_config, WorkflowConfig, CONFIG_FILE_NAME};
use git_gatekeeper::domain::BranchNameMode;
use git_gatekeeper::GatekeeperError;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile, TempDir};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn temp_config(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}

#[test]
fn test_load_fixture() {
    let config = load_config(Some(&fixture("workflow.config.json")))
        .expect("Failed to load test config");

    assert_eq!(config.branch_name_mode, BranchNameMode::Strict);
    assert!(config.branch_system["main"].is_accepted("release"));
    assert!(!config.branch_system["main"].is_accepted("feature"));
    assert_eq!(
        config.drafter_settings["patch"].file_name,
        "release-drafter-patch.yml"
    );
    assert_eq!(config.release.tag_template, "{version}");
    assert_eq!(config.release.draft_tag, "_DRAFT_");
}

#[test]
fn test_load_toml_file() {
    let mut temp_file = temp_config(".toml");
    let toml_content = r#"
branchNameMode = "lenient"

[branchSystem.main]
accepts = ["release"]

[release]
tagTemplate = "v{version}"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.branch_name_mode, BranchNameMode::Lenient);
    assert_eq!(config.release.tag_template, "v{version}");
    assert_eq!(config.release.remote, "origin");
}

#[test]
fn test_missing_explicit_path() {
    let err = load_config(Some(&fixture("does-not-exist.json"))).unwrap_err();
    assert!(matches!(err, GatekeeperError::ConfigLoad(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_malformed_json() {
    let mut temp_file = temp_config(".json");
    temp_file.write_all(b"{ \"branchSystem\": ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(matches!(err, GatekeeperError::ConfigLoad(_)));
}

#[test]
fn test_empty_accepts_rejected() {
    let mut temp_file = temp_config(".json");
    temp_file
        .write_all(br#"{ "branchSystem": { "main": { "accepts": [] } } }"#)
        .unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path())).is_err());
}

#[test]
fn test_defaults() {
    let config = WorkflowConfig::default();
    assert!(config.branch_system.is_empty());
    assert!(config.drafter_settings.is_empty());
    assert_eq!(config.release.initial_version, "1.0.0");
    assert_eq!(config.release.title_template, "Release v{version}");
}

#[test]
#[serial]
fn test_default_lookup_prefers_github_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".github")).unwrap();
    std::fs::write(
        dir.path().join(".github").join(CONFIG_FILE_NAME),
        r#"{ "branchSystem": { "qa": { "accepts": ["bugfix"] } } }"#,
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    std::env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert!(config.branch_system.contains_key("qa"));
}

#[test]
#[serial]
fn test_default_lookup_working_directory_first() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".github")).unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{ "branchSystem": { "main": { "accepts": ["release"] } } }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".github").join(CONFIG_FILE_NAME),
        r#"{ "branchSystem": { "qa": { "accepts": ["bugfix"] } } }"#,
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    std::env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert!(config.branch_system.contains_key("main"));
    assert!(!config.branch_system.contains_key("qa"));
}
