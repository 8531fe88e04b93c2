use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_gatekeeper::cli::{self, CheckOptions, CheckResult, PullRequestOverrides};
use git_gatekeeper::config::{self, WorkflowConfig};
use git_gatekeeper::domain::{BranchNameMode, ReleaseKind};
use git_gatekeeper::drafter::DEFAULT_OUTPUT_DIR;
use git_gatekeeper::event::{self, PullRequestContext, RepoSlug};
use git_gatekeeper::git::Git2Repository;
use git_gatekeeper::github::{
    DraftRelease, GitHubApi, RecordingClient, RestClient, DEFAULT_API_URL,
};
use git_gatekeeper::outputs::{StepOutputs, StepResult};
use git_gatekeeper::ui;
use git_gatekeeper::warning::WorkflowWarning;
use git_gatekeeper::GatekeeperError;

#[derive(Parser)]
#[command(
    name = "git-gatekeeper",
    version,
    about = "Branch policy checks and release tagging for GitHub Actions"
)]
struct Args {
    #[arg(short, long, global = true, help = "Workflow config file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(
        long,
        global = true,
        env = "GITHUB_OUTPUT",
        help = "File that step outputs are appended to"
    )]
    github_output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct GitHubArgs {
    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/name")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, help = "Print GitHub calls instead of sending them")]
    dry_run: bool,
}

#[derive(clap::Args)]
struct PullRequestArgs {
    #[arg(long, env = "GITHUB_EVENT_PATH", help = "pull_request event payload")]
    event_path: Option<PathBuf>,

    #[arg(long, help = "Pull request number (overrides the event)")]
    pr: Option<u64>,

    #[arg(long, help = "Target branch (overrides the event)")]
    target: Option<String>,

    #[arg(long, help = "Source branch (overrides the event)")]
    source: Option<String>,

    #[arg(long, value_enum, help = "How to treat branch names without '/'")]
    branch_name_mode: Option<BranchNameMode>,

    #[command(flatten)]
    github: GitHubArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Check the PR's branches against the policy; comment, and close the PR if invalid
    Validate {
        #[command(flatten)]
        pr: PullRequestArgs,

        #[arg(long, help = "Do not close rejected pull requests")]
        keep_open: bool,
    },
    /// Label the PR with its branch type and comment the labels
    Label {
        #[command(flatten)]
        pr: PullRequestArgs,
    },
    /// Classify the branch merged by a push event as release or hotfix
    BranchType {
        #[arg(long, env = "GITHUB_EVENT_PATH", help = "push event payload")]
        event_path: Option<PathBuf>,

        #[arg(long, help = "Merge commit message (instead of the event)")]
        message: Option<String>,
    },
    /// Print the latest tag, creating and pushing the initial one if none exists
    Tag {
        #[arg(long, default_value = ".", help = "Repository path")]
        repo: PathBuf,

        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Compute the next tag from the latest tag and the branch type
    Bump {
        #[arg(long)]
        latest_tag: String,

        #[arg(long, value_enum)]
        branch_type: ReleaseKind,
    },
    /// Publish the draft release under the given tag
    Publish {
        #[arg(long)]
        tag: String,

        #[command(flatten)]
        github: GitHubArgs,
    },
    /// Generate Release-Drafter configs from drafterSettings
    Drafters {
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR, help = "Output directory")]
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config_path = args.config.as_deref();
    let github_output = args.github_output.as_deref();

    match args.command {
        Command::Validate { pr, keep_open } => {
            run_check(config_path, github_output, pr, keep_open, cli::run_validate)
        }
        Command::Label { pr } => run_check(config_path, github_output, pr, false, cli::run_label),
        Command::BranchType {
            event_path,
            message,
        } => {
            let message = match (message, event_path) {
                (Some(message), _) => message,
                (None, Some(path)) => event::head_commit_message(&path)?,
                (None, None) => {
                    anyhow::bail!("pass --message or --event-path (GITHUB_EVENT_PATH)")
                }
            };
            let config = load(config_path)?;
            let result = cli::run_branch_type(&message, &config)?;
            ui::display_success(&format!(
                "Branch '{}' is a {} branch",
                result.branch,
                result.kind.as_str()
            ));
            emit(&result.outputs(), github_output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Tag { repo, token } => {
            let config = load(config_path)?;
            let repository = Git2Repository::discover(&repo)?.with_token(token);
            let resolution = cli::run_tag(&repository, &config.release)?;
            if resolution.initial_version {
                ui::display_warning(&WorkflowWarning::InitialTagCreated {
                    tag: resolution.latest_tag.clone(),
                    remote: config.release.remote.clone(),
                });
            }
            ui::display_status(&format!("Latest tag is: {}", resolution.latest_tag));
            emit(&resolution.outputs(), github_output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Bump {
            latest_tag,
            branch_type,
        } => {
            let config = load(config_path)?;
            let result = cli::run_bump(&latest_tag, branch_type, &config.release)?;
            ui::display_status(&format!(
                "New tag calculated: {} -> {}",
                result.previous_tag, result.new_tag
            ));
            emit(&result.outputs(), github_output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Publish { tag, github } => {
            let config = load(config_path)?;
            // Stand-in draft under the configured tag
            let recorder = RecordingClient::new().with_release(DraftRelease {
                id: 0,
                tag_name: config.release.draft_tag.clone(),
                name: None,
                draft: true,
            });
            let rest;
            let client: &dyn GitHubApi = if github.dry_run {
                &recorder
            } else {
                rest = rest_client(&github)?;
                &rest
            };
            let published = cli::run_publish(&tag, &config.release, client)?;
            finish_dry_run(github.dry_run, &recorder);
            ui::display_success(&format!("Release published: {}", published.tag));
            emit(&published.outputs(), github_output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Drafters { out_dir } => {
            let config = load(config_path)?;
            let report = cli::run_drafters(&config, &out_dir)?;
            for path in &report.written {
                ui::display_success(&format!("Generated {}", path.display()));
            }
            for warning in &report.warnings {
                ui::display_warning(warning);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

type CheckFn = fn(
    &PullRequestContext,
    &WorkflowConfig,
    &CheckOptions,
    &dyn GitHubApi,
) -> git_gatekeeper::Result<CheckResult>;

/// Shared driver for `validate` and `label`: every outcome, including a
/// structural error, ends in exactly one PR comment.
fn run_check(
    config_path: Option<&Path>,
    github_output: Option<&Path>,
    args: PullRequestArgs,
    keep_open: bool,
    check: CheckFn,
) -> Result<ExitCode> {
    let overrides = PullRequestOverrides {
        number: args.pr,
        target: args.target.clone(),
        source: args.source.clone(),
    };
    let pr = cli::resolve_pull_request(args.event_path.as_deref(), &overrides)
        .context("Failed to read the pull request context")?;

    let recorder = RecordingClient::new();
    let rest;
    let client: &dyn GitHubApi = if args.github.dry_run {
        &recorder
    } else {
        rest = rest_client(&args.github)?;
        &rest
    };

    let options = CheckOptions {
        mode: args.branch_name_mode,
        keep_open,
    };

    let outcome =
        config::load_config(config_path).and_then(|config| check(&pr, &config, &options, client));

    let code = match outcome {
        Ok(result) => {
            ui::display_decision(&result.decision, &pr.base_ref, &pr.head_ref);
            if result.closed {
                ui::display_status(&format!("Closed PR #{}", result.pr_number));
            }
            emit(&result.outputs(), github_output)?;
            ExitCode::from(result.exit_code())
        }
        Err(error) => {
            ui::display_error(&error.to_string());
            report_error(&pr, &error, client);
            ExitCode::FAILURE
        }
    };

    finish_dry_run(args.github.dry_run, &recorder);
    Ok(code)
}

fn report_error(pr: &PullRequestContext, error: &GatekeeperError, client: &dyn GitHubApi) {
    match cli::report_failure(pr, error, client) {
        Ok(true) => ui::display_status(&format!("Posted failure comment on PR #{}", pr.number)),
        Ok(false) => {}
        Err(e) => ui::display_error(&format!("Could not post failure comment: {}", e)),
    }
}

fn rest_client(github: &GitHubArgs) -> Result<RestClient> {
    let repository = github
        .repository
        .as_deref()
        .context("--repository (GITHUB_REPOSITORY) is required")?;
    let slug: RepoSlug = repository.parse()?;
    let token = github.token.as_deref().unwrap_or_default();
    Ok(RestClient::new(&github.api_url, slug, token)?)
}

fn load(config_path: Option<&Path>) -> Result<WorkflowConfig> {
    Ok(config::load_config(config_path)?)
}

fn emit(outputs: &StepOutputs, github_output: Option<&Path>) -> Result<()> {
    ui::display_outputs(outputs);
    if let Some(path) = github_output {
        outputs
            .append_to(path)
            .with_context(|| format!("Failed to write step outputs to {}", path.display()))?;
    }
    Ok(())
}

fn finish_dry_run(dry_run: bool, recorder: &RecordingClient) {
    if !dry_run {
        return;
    }
    let calls = recorder.calls();
    ui::display_recorded_calls(&calls);
    ui::display_warning(&WorkflowWarning::DryRun { calls: calls.len() });
}
