//! # jira-pr-link
//!
//! Keeps a Jira ticket link in a pull request description in sync with the
//! ticket named in the pull request title.

pub mod app;
pub mod body;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod jira;
pub mod output;

// Re-export commonly used types
pub use body::{LinkPlacement, Reconciliation};
pub use config::Config;
pub use error::{Error, Result};
pub use jira::TicketPatterns;
