use thiserror::Error;

use forksync_sync::{HostError, OracleError};

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub returned {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{0} is not a fork and no upstream is configured")]
    NotAFork(String),
}

impl GithubError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<GithubError> for HostError {
    fn from(e: GithubError) -> Self {
        match e {
            GithubError::Status {
                status, message, ..
            } => HostError::Api { status, message },
            GithubError::Transport { .. } => HostError::Network(e.to_string()),
            GithubError::Decode { .. } | GithubError::NotAFork(_) => {
                HostError::Decode(e.to_string())
            }
        }
    }
}

impl From<GithubError> for OracleError {
    fn from(e: GithubError) -> Self {
        if e.is_not_found() {
            OracleError::NotFound(e.to_string())
        } else {
            OracleError::Network(e.to_string())
        }
    }
}
