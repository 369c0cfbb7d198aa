//! Triggering event
//!
//! Reads the event name and JSON payload the CI runner provides and pulls out
//! the pull request this run is about.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

lazy_static! {
    static ref REPOSITORY: Regex = Regex::new(r"^[\w.-]+/[\w.-]+$").unwrap();
}

/// Event kinds this tool runs for
pub const SUPPORTED_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];

#[derive(Deserialize, Debug, Default)]
struct Payload {
    action: Option<String>,
    pull_request: Option<PullRequestRef>,
    repository: Option<RepositoryRef>,
}

#[derive(Deserialize, Debug)]
struct PullRequestRef {
    number: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct RepositoryRef {
    full_name: Option<String>,
}

/// The pull request event this run was triggered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Event name, e.g. "pull_request"
    pub name: String,
    /// Activity type, e.g. "opened" or "edited"
    pub action: Option<String>,
    /// Repository as owner/name
    pub repository: String,
    /// Pull request number
    pub number: u64,
}

impl TriggerEvent {
    /// Load the event from its name and payload file
    ///
    /// `repository` takes precedence over the payload's `repository.full_name`.
    pub fn load(
        name: Option<&str>,
        payload_path: Option<&Path>,
        repository: Option<&str>,
    ) -> Result<Self> {
        let name = name.map(str::trim).unwrap_or_default();
        ensure_supported(name)?;

        let path = payload_path
            .ok_or_else(|| Error::Event("event payload path is not set".to_string()))?;
        let contents = std::fs::read_to_string(path)?;

        Self::from_payload(name, &contents, repository)
    }

    /// Build the event from an already read payload
    pub fn from_payload(name: &str, payload: &str, repository: Option<&str>) -> Result<Self> {
        ensure_supported(name)?;

        let payload: Payload = serde_json::from_str(payload)?;

        let number = payload
            .pull_request
            .and_then(|pr| pr.number)
            .ok_or_else(|| {
                Error::Event("pull request number is missing from the event payload".to_string())
            })?;

        let repository = repository
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .or_else(|| payload.repository.and_then(|r| r.full_name))
            .ok_or_else(|| Error::Event("repository could not be determined".to_string()))?;

        if !REPOSITORY.is_match(&repository) {
            return Err(Error::Event(format!(
                "repository {:?} is not in owner/name form",
                repository
            )));
        }

        Ok(Self {
            name: name.to_string(),
            action: payload.action,
            repository,
            number,
        })
    }
}

fn ensure_supported(name: &str) -> Result<()> {
    if SUPPORTED_EVENTS.contains(&name) {
        Ok(())
    } else {
        Err(Error::Event(format!(
            "unsupported event {:?}, this tool only runs on {}",
            name,
            SUPPORTED_EVENTS.join(" or ")
        )))
    }
}
