//! Run configuration
//!
//! Validates the raw inputs from [`Args`] into a typed [`Config`]. Everything
//! here fails before any call to GitHub is made.

use crate::body::LinkPlacement;
use crate::cli::Args;
use crate::error::{Error, Result};
use crate::jira::{self, TicketPatterns};

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Token handed to the GitHub CLI
    pub token: String,
    /// Jira base URL without trailing slash
    pub jira_base_url: String,
    /// Where a new link line goes
    pub placement: LinkPlacement,
    /// Ticket and link-line patterns for this run
    pub patterns: TicketPatterns,
    /// Skip the write-back
    pub dry_run: bool,
}

impl Config {
    /// Build the configuration from command line / environment inputs
    pub fn from_args(args: &Args) -> Result<Self> {
        let token = required(args.github_token.as_deref(), "github-token")?;
        let jira_base_url =
            jira::normalize_base_url(&required(args.jira_base_url.as_deref(), "jira-base-url")?)?;

        let placement = match non_empty(args.link_placement.as_deref()) {
            Some(raw) => raw.parse()?,
            None => LinkPlacement::default(),
        };

        let patterns = jira::build_patterns(non_empty(args.ticket_pattern.as_deref()))?;

        Ok(Self {
            token,
            jira_base_url,
            placement,
            patterns,
            dry_run: args.dry_run,
        })
    }
}

/// Treat blank inputs as missing
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: Option<&str>, name: &str) -> Result<String> {
    non_empty(value)
        .map(str::to_string)
        .ok_or_else(|| Error::Config(format!("input `{}` is required", name)))
}
