//! Jira ticket patterns and links
//!
//! This module knows what a ticket identifier looks like and how the link to
//! it is rendered into a PR description:
//! - Building the ticket and link-line patterns from a pattern fragment
//! - Extracting a ticket identifier from a PR title
//! - Formatting the canonical link line
//!
//! Patterns are compiled once per run by [`build_patterns`] and passed around
//! explicitly.

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Default ticket shape, e.g. `PROJ-123`
pub const DEFAULT_TICKET_PATTERN: &str = r"([A-Z][A-Z0-9_]*-\d+)";

/// Marker emitted in front of every link line
pub const LINK_EMOJI: &str = "🔗";

/// Label that identifies a link line
pub const LINK_LABEL: &str = "Linked to JIRA ticket:";

/// Compiled ticket pattern together with the link-line pattern derived from it
#[derive(Debug, Clone)]
pub struct TicketPatterns {
    /// Matches a ticket identifier; capture group 1 is the identifier
    pub ticket: Regex,
    /// Matches a whole link line anywhere in a multi-line body
    pub link_line: Regex,
}

/// Build both patterns from an optional custom fragment
///
/// A fragment containing `(` is used as is, anything else is wrapped in a
/// single capturing group. Blank fragments fall back to the default.
pub fn build_patterns(custom: Option<&str>) -> Result<TicketPatterns> {
    let fragment = match custom.map(str::trim) {
        Some(f) if f.contains('(') => f.to_string(),
        Some(f) if !f.is_empty() => format!("({})", f),
        _ => DEFAULT_TICKET_PATTERN.to_string(),
    };

    let ticket = Regex::new(&fragment)?;
    if ticket.captures_len() < 2 {
        return Err(Error::Config(format!(
            "ticket pattern {:?} has no capturing group",
            fragment
        )));
    }

    // The leading marker is optional so a line survives its emoji being
    // stripped or re-encoded by whatever renders the description. The label
    // identifies the line; the ticket slot also takes whatever a previous
    // pattern put there, as long as it stays inside the brackets.
    let link_line = Regex::new(&format!(
        r"(?m)^[ \t]*(?:\S+[ \t]+)?{}[ \t]*\[(?:(?:{})|[^\]\r\n]+)\]\(.*\)[ \t\r]*$",
        regex::escape(LINK_LABEL),
        fragment
    ))?;

    Ok(TicketPatterns { ticket, link_line })
}

impl TicketPatterns {
    /// Check whether `body` contains a link line
    pub fn has_link_line(&self, body: &str) -> bool {
        self.link_line.is_match(body)
    }
}

/// Extract the first ticket identifier from a title (e.g., "feat(PROJ-1): x" -> "PROJ-1")
///
/// With alternations like `ABC-(\d+)|DEF-(\d+)` the first group that took
/// part in the match is used.
pub fn extract_ticket(title: &str, patterns: &TicketPatterns) -> Option<String> {
    let caps = patterns.ticket.captures(title)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

/// Render the link line for a ticket
///
/// `base_url` is expected to be normalized already (see [`normalize_base_url`]).
pub fn format_link(base_url: &str, ticket: &str) -> String {
    format!(
        "{} {} [{}]({}/browse/{})",
        LINK_EMOJI, LINK_LABEL, ticket, base_url, ticket
    )
}

/// Validate the tracker base URL and strip one trailing slash
///
/// The URL is returned in its serialized form, so spaces and other
/// characters that cannot appear in a markdown link target are
/// percent-encoded.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();

    let parsed = Url::parse(raw)
        .map_err(|e| Error::Config(format!("invalid Jira base URL {:?}: {}", raw, e)))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(Error::Config(format!(
            "Jira base URL {:?} must be an absolute URL with a host",
            raw
        )));
    }

    let serialized = parsed.as_str();
    Ok(serialized
        .strip_suffix('/')
        .unwrap_or(serialized)
        .to_string())
}
