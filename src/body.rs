//! PR description reconciliation
//!
//! Computes the edit that brings a PR description in line with the ticket
//! found in its title: replace a stale link line, insert a new one, remove one
//! that no longer applies, or leave the text alone.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::jira::TicketPatterns;

/// Where a new link line goes when the body has none yet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LinkPlacement {
    #[default]
    BodyStart,
    BodyEnd,
}

impl LinkPlacement {
    pub const ALL: [LinkPlacement; 2] = [LinkPlacement::BodyStart, LinkPlacement::BodyEnd];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPlacement::BodyStart => "body-start",
            LinkPlacement::BodyEnd => "body-end",
        }
    }
}

impl fmt::Display for LinkPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkPlacement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "body-start" => Ok(LinkPlacement::BodyStart),
            "body-end" => Ok(LinkPlacement::BodyEnd),
            other => Err(Error::Config(format!(
                "unsupported link placement {:?}, expected one of: body-start, body-end",
                other
            ))),
        }
    }
}

/// The edit to apply to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEdit {
    /// Swap the existing link line for the new one
    Replace,
    /// Add the link line at the given end of the body
    Insert(LinkPlacement),
    /// Drop the existing link line
    Remove,
    /// Leave the body as it is
    Keep,
}

/// Decide what to do given whether a ticket was found, whether the body
/// already has a link line, and the placement policy.
pub fn plan(ticket_found: bool, link_present: bool, placement: LinkPlacement) -> BodyEdit {
    match (ticket_found, link_present) {
        (true, true) => BodyEdit::Replace,
        (true, false) => BodyEdit::Insert(placement),
        (false, true) => BodyEdit::Remove,
        (false, false) => BodyEdit::Keep,
    }
}

/// Result of reconciling a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub body: String,
    pub changed: bool,
}

impl Reconciliation {
    fn new(original: &str, body: String) -> Self {
        let changed = body != original;
        Self { body, changed }
    }
}

/// Bring `body` in line with `link` (if a ticket was found) or strip a stale
/// link line (if not).
pub fn reconcile(
    body: &str,
    link: Option<&str>,
    placement: LinkPlacement,
    patterns: &TicketPatterns,
) -> Reconciliation {
    let edit = plan(link.is_some(), patterns.has_link_line(body), placement);

    let updated = match (edit, link) {
        (BodyEdit::Replace, Some(link)) => replace_link_line(body, link, patterns),
        (BodyEdit::Insert(placement), Some(link)) => insert_link_line(body, link, placement),
        (BodyEdit::Remove, _) => remove_link_lines(body, patterns),
        _ => body.to_string(),
    };

    Reconciliation::new(body, updated)
}

/// Reconcile a body for a title that carries a ticket
pub fn reconcile_with_ticket(
    body: &str,
    link: &str,
    placement: LinkPlacement,
    patterns: &TicketPatterns,
) -> Reconciliation {
    reconcile(body, Some(link), placement, patterns)
}

/// Reconcile a body for a title without a ticket; never inserts anything
pub fn reconcile_without_ticket(body: &str, patterns: &TicketPatterns) -> Reconciliation {
    reconcile(body, None, LinkPlacement::default(), patterns)
}

fn insert_link_line(body: &str, link: &str, placement: LinkPlacement) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return link.to_string();
    }

    match placement {
        LinkPlacement::BodyStart => format!("{}\n\n{}", link, trimmed),
        LinkPlacement::BodyEnd => format!("{}\n\n{}", trimmed, link),
    }
}

/// Replace the first link line in place, then drop any further ones
fn replace_link_line(body: &str, link: &str, patterns: &TicketPatterns) -> String {
    let Some(first) = patterns.link_line.find(body) else {
        return body.to_string();
    };

    let mut updated = format!("{}{}{}", &body[..first.start()], link, &body[first.end()..]);
    let keep_until = first.start() + link.len();

    while let Some(m) = patterns.link_line.find_at(&updated, keep_until) {
        updated = cut_line(&updated, m.start(), m.end());
    }

    updated
}

fn remove_link_lines(body: &str, patterns: &TicketPatterns) -> String {
    let mut updated = body.to_string();

    while let Some(m) = patterns.link_line.find(&updated) {
        updated = cut_line(&updated, m.start(), m.end());
    }

    updated
}

/// Cut the line at `body[start..end]` along with the blank lines around it
/// and rejoin what remains. Paragraphs that were separated by a blank line
/// stay separated by one. Lines that are kept are not touched, so trailing
/// spaces (markdown hard breaks) survive.
fn cut_line(body: &str, start: usize, end: usize) -> String {
    let crlf = body[..start].ends_with("\r\n") || body[start..end].ends_with('\r');
    let (head, blank_before) = drop_trailing_blank_lines(&body[..start]);
    let (tail, blank_after) = drop_leading_blank_lines(&body[end..]);

    if head.is_empty() {
        return tail.to_string();
    }
    if tail.is_empty() {
        return head.to_string();
    }

    let eol = if crlf { "\r\n" } else { "\n" };
    if blank_before + blank_after > 0 {
        format!("{}{}{}{}", head, eol, eol, tail)
    } else {
        format!("{}{}{}", head, eol, tail)
    }
}

/// `text` ends at a line start. Returns it without its trailing blank lines
/// and final line break, plus the number of blank lines dropped.
fn drop_trailing_blank_lines(text: &str) -> (&str, usize) {
    let mut end = text.len();
    let mut blank = 0;

    while end > 0 {
        let line_start = text[..end - 1].rfind('\n').map_or(0, |i| i + 1);
        if !text[line_start..end].trim().is_empty() {
            break;
        }
        end = line_start;
        blank += 1;
    }

    let head = &text[..end];
    let head = head.strip_suffix('\n').unwrap_or(head);
    (head.strip_suffix('\r').unwrap_or(head), blank)
}

/// `text` starts with the line break of the cut line. Returns what follows
/// its leading blank lines, plus the number of blank lines dropped.
fn drop_leading_blank_lines(text: &str) -> (&str, usize) {
    let mut rest = text.strip_prefix('\n').unwrap_or(text);
    let mut blank = 0;

    loop {
        let (line, next) = match rest.find('\n') {
            Some(i) => (&rest[..=i], &rest[i + 1..]),
            None => (rest, ""),
        };
        if line.is_empty() || !line.trim().is_empty() {
            break;
        }
        rest = next;
        blank += 1;
    }

    (rest, blank)
}
