//! Sync state, derived fresh on every run.

use std::path::Path;

use serde::Serialize;

use forksync_core::{ForkConfig, RepoSlug, Version};

use crate::error::{OracleError, SyncError};
use crate::host::ReviewHost;
use crate::oracle::VersionOracle;

/// Where the fork stands relative to upstream. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncState {
    /// `None` until the fork has a manifest of its own (first sync).
    pub fork_version: Option<Version>,
    pub upstream_version: Version,
    pub pr_branch_exists: bool,
    pub pr_open: bool,
}

impl SyncState {
    /// Whether upstream is strictly ahead of the fork.
    pub fn update_needed(&self) -> bool {
        match &self.fork_version {
            Some(fork) => self.upstream_version > *fork,
            None => true,
        }
    }

    pub fn is_first_sync(&self) -> bool {
        self.fork_version.is_none()
    }
}

/// Read both versions and the review-request state.
///
/// `checkout_root` must have the fork's base branch checked out.
pub fn gather_state<O, H>(
    config: &ForkConfig,
    oracle: &O,
    host: &H,
    checkout_root: &Path,
    upstream: &RepoSlug,
    release_branch: &str,
) -> Result<SyncState, SyncError>
where
    O: VersionOracle + ?Sized,
    H: ReviewHost + ?Sized,
{
    let source_root = checkout_root.join(&config.source_root);
    let fork_version = match oracle.read_local_version(&source_root) {
        Ok(v) => Some(v),
        Err(OracleError::NotFound(what)) => {
            tracing::info!("no local version ({what}); treating as first sync");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let upstream_version =
        oracle.read_remote_version(upstream, release_branch, &config.manifest_name)?;

    let pr_open = host
        .find_open_request(&config.base_branch, &config.integration_branch)?
        .is_some();
    let pr_branch_exists = host.branch_exists(&config.integration_branch)?;

    Ok(SyncState {
        fork_version,
        upstream_version,
        pr_branch_exists,
        pr_open,
    })
}
