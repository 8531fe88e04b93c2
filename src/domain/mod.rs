//! Domain logic - pure business rules independent of git and GitHub

pub mod branch;
pub mod merge;
pub mod policy;
pub mod tag;
pub mod version;

pub use branch::{extract_branch_type, BranchNameMode};
pub use merge::{merged_branch_from_message, ReleaseKind};
pub use policy::{
    BranchPolicyEngine, BranchSystemConfig, BranchTypePolicy, Decision, InvalidReason, Verdict,
};
pub use tag::{next_tag, TagPattern};
pub use version::{Version, VersionBump};
