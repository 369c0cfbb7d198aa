use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event error: {0}")]
    Event(String),

    #[error("GitHub CLI error: {0}")]
    GitHubCli(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(format!("invalid ticket pattern: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
