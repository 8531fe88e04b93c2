use crate::domain::merge::ReleaseKind;
use crate::error::{GatekeeperError, Result};
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    pub fn parse(tag: &str) -> Result<Self> {
        // Remove 'v' or 'V' prefix
        let clean_tag = tag.trim().trim_start_matches('v').trim_start_matches('V');

        let parts: Vec<&str> = clean_tag.split('.').collect();
        if parts.len() != 3 {
            return Err(GatekeeperError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                tag
            )));
        }

        let major = parts[0].parse::<u32>().map_err(|_| {
            GatekeeperError::version(format!("Invalid major version: '{}'", parts[0]))
        })?;
        let minor = parts[1].parse::<u32>().map_err(|_| {
            GatekeeperError::version(format!("Invalid minor version: '{}'", parts[1]))
        })?;
        let patch = parts[2].parse::<u32>().map_err(|_| {
            GatekeeperError::version(format!("Invalid patch version: '{}'", parts[2]))
        })?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Bump version according to bump type
    ///
    /// # Returns
    /// * `Err(Version)` - If the bumped component would overflow `u32`
    pub fn bump(&self, bump_type: &VersionBump) -> Result<Self> {
        let overflow = || {
            GatekeeperError::version(format!("Cannot bump {}: component out of range", self))
        };
        match bump_type {
            VersionBump::Minor => Ok(Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            }),
            VersionBump::Patch => Ok(Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            }),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump applied when a release branch is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Minor,
    Patch,
}

impl VersionBump {
    /// Release branches ship features, hotfix branches ship fixes.
    pub fn for_kind(kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Release => VersionBump::Minor,
            ReleaseKind::Hotfix => VersionBump::Patch,
        }
    }
}
