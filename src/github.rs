use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Represents a GitHub Pull Request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// The PR number
    pub number: u64,
    /// The title of the PR
    pub title: String,
    /// The body/description of the PR; GitHub sends `null` for an empty one
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for updating a pull request description
#[derive(Serialize, Debug)]
struct UpdateBody<'a> {
    body: &'a str,
}

/// Reads and updates pull requests on the hosting service
pub trait PullRequestHost {
    /// Fetch the current state of a pull request
    fn fetch_pull_request(&self, repository: &str, number: u64) -> Result<PullRequest>;

    /// Overwrite the description of a pull request
    fn update_body(&self, repository: &str, number: u64, body: &str) -> Result<()>;
}

/// Talks to the GitHub REST API through the GitHub CLI
#[derive(Debug, Clone)]
pub struct GhCli {
    token: String,
    host: Option<String>,
}

impl GhCli {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            host: None,
        }
    }

    /// Point `gh` at a GitHub Enterprise host taken from the server URL.
    /// github.com needs no override.
    pub fn with_server_url(mut self, server_url: Option<&str>) -> Self {
        self.host = server_url
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .and_then(|url| url.host_str().map(str::to_string))
            .filter(|host| host != "github.com");
        self
    }

    /// Run `gh api`, feeding `input` on stdin when given
    fn api(&self, args: &[&str], input: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut cmd = Command::new("gh");
        cmd.arg("api")
            .args(["-H", "Accept: application/vnd.github+json"])
            .args(args)
            .env("GH_TOKEN", &self.token)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(host) = &self.host {
            cmd.env("GH_HOST", host);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::GitHubCli(format!("Failed to execute gh command: {}", e)))?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input)?;
        }

        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GitHubCli(stderr.trim().to_string()));
        }

        Ok(output.stdout)
    }
}

fn pull_endpoint(repository: &str, number: u64) -> String {
    format!("repos/{}/pulls/{}", repository, number)
}

/// JSON request for replacing a description
fn update_body_request(body: &str) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&UpdateBody { body })?)
}

impl PullRequestHost for GhCli {
    fn fetch_pull_request(&self, repository: &str, number: u64) -> Result<PullRequest> {
        let stdout = self.api(&[&pull_endpoint(repository, number)], None)?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    fn update_body(&self, repository: &str, number: u64, body: &str) -> Result<()> {
        // Sent on stdin; a description can exceed the size limit of a single argument
        let request = update_body_request(body)?;
        self.api(
            &["-X", "PATCH", &pull_endpoint(repository, number), "--input", "-"],
            Some(request.as_slice()),
        )?;
        Ok(())
    }
}
