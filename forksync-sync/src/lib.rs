//! # forksync-sync
//!
//! Upstream reconciliation for integration forks.
//!
//! [`SyncReconciler`] sequences a [`VersionControlBackend`] (normally
//! [`GitCli`]) and a [`ReviewHost`] to merge a newer upstream release into the
//! fork's integration branch while keeping fork-owned paths intact.
//! [`pipeline::run`] wraps it with remote setup and state gathering.

pub mod backend;
pub mod error;
pub mod git;
pub mod host;
pub mod oracle;
pub mod pipeline;
pub mod reconciler;
pub mod release;
pub mod state;

pub use backend::{
    BranchOutcome, CommitOutcome, MergeOptions, MergeOutcome, MergeStrategy, PathRestore,
    VersionControlBackend,
};
pub use error::{BackendError, HostError, OracleError, SyncError};
pub use git::GitCli;
pub use host::{NewReviewRequest, ReviewHost, ReviewRequest};
pub use oracle::VersionOracle;
pub use reconciler::{ReconciliationResult, RequestAction, SyncReconciler};
pub use state::SyncState;
