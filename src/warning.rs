use std::fmt;

/// Non-fatal conditions that should be reported to the user but do not stop
/// the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowWarning {
    /// The repository had no tags; the initial version tag was created
    InitialTagCreated { tag: String, remote: String },
    /// The config has no `drafterSettings`; nothing was generated
    NoDrafterSettings,
    /// One drafter file could not be written
    DrafterWriteFailed { file: String, reason: String },
    /// Dry run: GitHub calls were recorded, not sent
    DryRun { calls: usize },
}

impl fmt::Display for WorkflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowWarning::InitialTagCreated { tag, remote } => {
                write!(
                    f,
                    "No tags found; created initial tag '{}' and pushed it to '{}'",
                    tag, remote
                )
            }
            WorkflowWarning::NoDrafterSettings => {
                write!(f, "No drafter settings found in config")
            }
            WorkflowWarning::DrafterWriteFailed { file, reason } => {
                write!(f, "Could not write '{}': {}", file, reason)
            }
            WorkflowWarning::DryRun { calls } => {
                write!(f, "Dry run: {} GitHub call(s) were not sent", calls)
            }
        }
    }
}
