//! User-facing text - terminal output and pull request comments.
//!
//! Separates concerns:
//! - `formatter` - Terminal status lines
//! - `comments` - Markdown bodies posted to pull requests

pub mod comments;
pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    decision_summary, display_decision, display_error, display_outputs, display_recorded_calls,
    display_status, display_success, display_warning,
};
