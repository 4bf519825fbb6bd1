use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Not found")]
    NotFound,
    #[error("{0} is not configured")]
    MissingApiKey(&'static str),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Upstream responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl UpstreamError {
    /// True when the service never attempted the call because a key was missing.
    pub fn is_config(&self) -> bool {
        matches!(self, UpstreamError::MissingApiKey(_))
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
