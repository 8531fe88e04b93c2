//! Release-Drafter configuration generation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DrafterSettings;
use crate::error::{GatekeeperError, Result};
use crate::warning::WorkflowWarning;

/// Default output directory, relative to the repository root.
pub const DEFAULT_OUTPUT_DIR: &str = ".github";

const RELEASE_TEMPLATE: &str = "template: |
  ## What’s Changed in this release

  $CHANGES

  ## Contributors

  $CONTRIBUTORS
";

/// Render one Release-Drafter YAML document.
pub fn render(settings: &DrafterSettings) -> String {
    let categories = settings
        .categories
        .iter()
        .map(|category| {
            let labels = serde_json::to_string(&category.branch_types)
                .unwrap_or_else(|_| "[]".to_string());
            format!("  - title: {}\n    labels: {}", category.title, labels)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "name-template: '{}'\ntag-template: '{}'\n{}\ncategories:\n{}",
        settings.name_template, settings.tag_template, RELEASE_TEMPLATE, categories
    )
}

/// Outcome of a generation run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrafterReport {
    pub written: Vec<PathBuf>,
    pub warnings: Vec<WorkflowWarning>,
}

/// Write one file per drafter entry into `out_dir`, creating it if missing.
///
/// A failed write is recorded as a warning and the remaining entries are
/// still written.
pub fn generate(settings: &BTreeMap<String, DrafterSettings>, out_dir: &Path) -> Result<DrafterReport> {
    let mut report = DrafterReport::default();

    if settings.is_empty() {
        report.warnings.push(WorkflowWarning::NoDrafterSettings);
        return Ok(report);
    }

    if !out_dir.exists() {
        fs::create_dir_all(out_dir).map_err(|e| {
            GatekeeperError::drafter(format!("Failed to create {}: {}", out_dir.display(), e))
        })?;
        tracing::info!(dir = %out_dir.display(), "created drafter output directory");
    }

    for (kind, entry) in settings {
        let path = out_dir.join(&entry.file_name);
        match fs::write(&path, render(entry)) {
            Ok(()) => {
                tracing::info!(kind = %kind, path = %path.display(), "wrote drafter config");
                report.written.push(path);
            }
            Err(e) => {
                tracing::warn!(kind = %kind, path = %path.display(), error = %e, "drafter write failed");
                report.warnings.push(WorkflowWarning::DrafterWriteFailed {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
