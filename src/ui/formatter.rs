//! Pure formatting functions for terminal output.
//!
//! Messages go to stderr; stdout carries only step outputs.

use console::style;

use crate::domain::{Decision, Verdict};
use crate::github::GitHubCall;
use crate::outputs::StepOutputs;
use crate::warning::WorkflowWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(warning: &WorkflowWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}

/// One-line summary of a policy decision.
pub fn decision_summary(decision: &Decision, target: &str, source: &str) -> String {
    match decision.verdict {
        Verdict::Valid => format!(
            "The PR source branch '{}' is valid for the target branch '{}'",
            source, target
        ),
        Verdict::Invalid(reason) => format!(
            "Invalid source branch '{}' for target branch '{}' ({})",
            source, target, reason
        ),
    }
}

pub fn display_decision(decision: &Decision, target: &str, source: &str) {
    let summary = decision_summary(decision, target, source);
    if decision.is_valid() {
        display_success(&summary);
    } else {
        display_error(&summary);
    }
}

/// Print step outputs as `key=value` lines on stdout.
pub fn display_outputs(outputs: &StepOutputs) {
    print!("{}", outputs.render());
}

/// Show the GitHub calls a dry run would have made.
pub fn display_recorded_calls(calls: &[GitHubCall]) {
    eprintln!("{}", style("Dry run, GitHub calls not sent:").bold());
    for call in calls {
        let line = match call {
            GitHubCall::AddLabels { pr, labels } => {
                format!("add labels [{}] to #{}", labels.join(", "), pr)
            }
            GitHubCall::Comment { pr, body } => {
                format!("comment on #{}: {}", pr, body.replace('\n', " "))
            }
            GitHubCall::ClosePullRequest { pr } => format!("close #{}", pr),
            GitHubCall::PublishRelease { id, tag, title } => {
                format!("publish release {} as {} (\"{}\")", id, tag, title)
            }
        };
        eprintln!("  - {}", style(line).cyan());
    }
}
