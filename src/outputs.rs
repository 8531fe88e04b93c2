//! Step outputs handed to later workflow steps via `GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{GatekeeperError, Result};

/// A workflow result that hands values to later steps.
pub trait StepResult {
    fn outputs(&self) -> StepOutputs;
}

/// Ordered `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutputs {
    entries: Vec<(String, String)>,
}

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value for the same key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `key=value` lines.
    ///
    /// Values are single-line; newlines are escaped as `\n`.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v.replace('\n', "\\n")))
            .collect()
    }

    /// Append to a `GITHUB_OUTPUT` file.
    pub fn append_to(&self, path: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                GatekeeperError::Io(std::io::Error::new(
                    e.kind(),
                    format!("cannot open step output file {}: {}", path.display(), e),
                ))
            })?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_in_insertion_order() {
        let mut outputs = StepOutputs::new();
        outputs.set("branch_type", "release").set("config_file", "a.yml");
        assert_eq!(outputs.render(), "branch_type=release\nconfig_file=a.yml\n");
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut outputs = StepOutputs::new();
        outputs.set("new_tag", "1.0.0").set("new_tag", "1.1.0");
        assert_eq!(outputs.get("new_tag"), Some("1.1.0"));
        assert_eq!(outputs.iter().count(), 1);
    }

    #[test]
    fn test_newlines_escaped() {
        let mut outputs = StepOutputs::new();
        outputs.set("notes", "a\nb");
        assert_eq!(outputs.render(), "notes=a\\nb\n");
    }

    #[test]
    fn test_append_to_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "existing=1\n").unwrap();

        let mut outputs = StepOutputs::new();
        outputs.set("latest_tag", "1.2.0");
        outputs.append_to(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "existing=1\nlatest_tag=1.2.0\n");
    }
}
