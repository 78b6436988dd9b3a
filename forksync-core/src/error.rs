//! Error types for forksync-core.

use std::path::PathBuf;

use thiserror::Error;

/// A version string that is not dotted-numeric.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version format: {0:?}")]
    InvalidFormat(String),
}

/// Errors raised while loading or validating a fork configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, with the path that was being accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    #[error("invalid repository {0:?}; expected owner/name")]
    InvalidRepo(String),

    #[error("excluded path set must not be empty")]
    EmptyExcludedPaths,

    #[error("excluded path {path} is invalid: {reason}")]
    InvalidExcludedPath { path: PathBuf, reason: &'static str },

    #[error("release file {release_file} must be part of excluded_paths")]
    ReleaseFileNotExcluded { release_file: PathBuf },

    #[error("config field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    #[error("integration branch must differ from base branch `{0}`")]
    BranchCollision(String),
}

/// Errors from local manifest and release-descriptor access.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (write path).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no {file_name} found under {root}")]
    ManifestNotFound { root: PathBuf, file_name: String },

    #[error("{path} has no string `{field}` field")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path} is missing required field(s): {}", .missing.join(", "))]
    IncompleteManifest {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn config_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
