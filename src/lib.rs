pub mod cli;
pub mod config;
pub mod domain;
pub mod drafter;
pub mod error;
pub mod event;
pub mod git;
pub mod github;
pub mod outputs;
pub mod ui;
pub mod warning;

pub use error::{GatekeeperError, Result};
