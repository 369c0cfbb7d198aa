use std::path::PathBuf;

use clap::Parser;

/// Every input can be given as a flag or through the environment variable the
/// CI runner sets for it.
#[derive(Parser, Debug, Default, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Token used to read and update the pull request
    #[clap(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Jira base URL, e.g. https://company.atlassian.net
    #[clap(long, env = "INPUT_JIRA-BASE-URL")]
    pub jira_base_url: Option<String>,

    /// Where to insert a new link: body-start or body-end
    #[clap(long, env = "INPUT_LINK-PLACEMENT")]
    pub link_placement: Option<String>,

    /// Custom ticket pattern, wrapped in a capturing group if it has none
    #[clap(long, env = "INPUT_TICKET-PATTERN")]
    pub ticket_pattern: Option<String>,

    /// Compute the new description without writing it
    #[clap(long, env = "INPUT_DRY-RUN", default_value_t = false)]
    pub dry_run: bool,

    /// Name of the triggering event
    #[clap(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Path to the JSON payload of the triggering event
    #[clap(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Server URL of the GitHub instance
    #[clap(long, env = "GITHUB_SERVER_URL")]
    pub server_url: Option<String>,

    /// File that named outputs are appended to
    #[clap(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}
