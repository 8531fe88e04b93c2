//! Pull request comment bodies.

use crate::domain::{Decision, InvalidReason, Verdict};

/// Comment posted by `validate`.
pub fn validation_comment(decision: &Decision, target: &str, source: &str, accepted: &[String]) -> String {
    match decision.verdict {
        Verdict::Valid => format!(
            "🤖 ✅ **This PR is valid!** The source branch `{}` follows the allowed conventions for merging into `{}`.",
            source, target
        ),
        Verdict::Invalid(InvalidReason::NotAccepted) => format!(
            "🤖 ❌ **This PR cannot be merged into `{}`.**\nOnly branches starting with the allowed types are accepted ({}). The current source branch is: `{}`.",
            target,
            format_types(accepted),
            source
        ),
        Verdict::Invalid(InvalidReason::UnknownTargetBranch) => format!(
            "🤖 ❌ **This PR cannot be merged into `{}`.**\nNo branch policy is configured for `{}`. The current source branch is: `{}`.",
            target, target, source
        ),
    }
}

/// Comment posted by `label`.
pub fn labels_comment(decision: &Decision) -> String {
    format!(
        "Labels have been added to this PR based on the branch type: {}",
        decision.labels.join(", ")
    )
}

/// Comment posted when the workflow fails before reaching a decision.
pub fn failure_comment(error: &str) -> String {
    format!("🤖 ⚠️ **Branch check failed.**\n{}", error)
}

fn format_types(types: &[String]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types
        .iter()
        .map(|t| format!("`{}/…`", t))
        .collect::<Vec<_>>()
        .join(", ")
}
