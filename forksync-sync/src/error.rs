//! Error types for forksync-sync.

use std::path::PathBuf;

use thiserror::Error;

use forksync_core::{ConfigError, CoreError, Version, VersionError};

/// Failure of a version-control backend operation.
///
/// `Command` carries the captured output verbatim so an operator can resume
/// or retry by hand.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("`{command}` failed ({status})\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    Command {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to determine a fork or upstream version.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("version descriptor not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Local(CoreError),
}

impl From<CoreError> for OracleError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::ManifestNotFound { root, file_name } => {
                OracleError::NotFound(format!("no {file_name} under {}", root.display()))
            }
            CoreError::Version(v) => OracleError::Version(v),
            other => OracleError::Local(other),
        }
    }
}

/// Failure talking to the review-request host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode host response: {0}")]
    Decode(String),

    /// More than one open review request between the same branches. The sync
    /// flow never creates a second one, so this means something else did.
    #[error("{count} open review requests from {head} into {base}; expected at most one")]
    DuplicateRequests {
        base: String,
        head: String,
        count: usize,
    },
}

/// All errors that can abort a sync or release run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("version oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("review host error: {0}")]
    Host(#[from] HostError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("upstream license `{license}` is not in the allowed list")]
    LicenseNotAllowed { license: String },

    #[error("manifest version {manifest} must be greater than recorded release {recorded}")]
    ReleaseNotNewer { manifest: Version, recorded: Version },
}

/// Convenience constructor for [`BackendError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BackendError {
    BackendError::Io {
        path: path.into(),
        source,
    }
}
