use crate::domain::merge::ReleaseKind;
use crate::domain::version::{Version, VersionBump};
use crate::error::{GatekeeperError, Result};

const PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "{version}", "v{version}", "Release v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern, requiring exactly one `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches(PLACEHOLDER).count() != 1 {
            return Err(GatekeeperError::tag(format!(
                "Pattern '{}' must contain exactly one {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }

    /// Extract the version embedded in a tag that follows this pattern
    pub fn extract_version(&self, tag: &str) -> Result<Version> {
        let escaped = regex::escape(&self.pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"[vV]?(\d+\.\d+\.\d+)");

        let re = regex::Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| GatekeeperError::tag(format!("Invalid pattern: {}", e)))?;

        let captures = re.captures(tag.trim()).ok_or_else(|| {
            GatekeeperError::tag(format!(
                "Tag '{}' does not match pattern '{}'",
                tag, self.pattern
            ))
        })?;

        Version::parse(&captures[1])
    }
}

/// Compute the tag that follows `latest_tag` for a merged branch of `kind`.
pub fn next_tag(latest_tag: &str, kind: ReleaseKind, pattern: &TagPattern) -> Result<String> {
    let current = pattern.extract_version(latest_tag)?;
    let next = current.bump(&VersionBump::for_kind(kind))?;
    tracing::debug!(%current, %next, kind = kind.as_str(), "computed next version");
    Ok(pattern.format(&next))
}
