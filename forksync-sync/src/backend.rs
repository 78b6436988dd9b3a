//! Version-control backend interface.
//!
//! The reconciler only sequences these primitives; it never shells out
//! itself. Every operation reports what happened as data (`BranchOutcome`,
//! `MergeOutcome`, ...) so callers branch on values, not on error text.

use std::path::PathBuf;

use forksync_core::GitIdentity;

use crate::error::BackendError;

/// Result of establishing a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Already on the branch; nothing was done.
    AlreadyCheckedOut,
    /// A local branch existed and was checked out.
    Switched,
    /// Created locally, tracking the remote branch of the same name.
    Tracked,
    /// Created fresh from the start point; not yet on any remote.
    Created,
}

/// Content bias applied to conflicting hunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Conflicting hunks take the merged-in side ("theirs").
    Theirs,
    /// Plain merge, conflicts left for resolution.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub strategy: MergeStrategy,
    pub allow_unrelated_histories: bool,
    pub no_commit: bool,
}

/// Result of a merge that the backend managed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Clean,
    /// Structural conflicts where the merged-in side had content, resolved by
    /// taking that side, plus conflicts on fork-owned paths left for restore.
    ConflictsResolved { paths: Vec<PathBuf> },
    /// Conflicts with no merged-in content to fall back on (deleted by them,
    /// added only by us, ...). Left in the working tree.
    Unresolved { paths: Vec<PathBuf>, output: String },
}

/// Per-path result of restoring a path from another ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRestore {
    Restored(PathBuf),
    Skipped { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { id: String },
    NothingToCommit,
}

/// Primitive operations the sync flow needs from a version-control system.
///
/// Paths are relative to the repository root.
pub trait VersionControlBackend {
    /// Set the author identity for commits made in this repository.
    fn configure_identity(&mut self, identity: &GitIdentity) -> Result<(), BackendError>;

    /// Add remote `name` pointing at `url`, or repoint it if it already exists.
    fn ensure_remote(&mut self, name: &str, url: &str) -> Result<(), BackendError>;

    /// Name of the checked-out branch (`HEAD` when detached).
    fn current_branch(&mut self) -> Result<String, BackendError>;

    /// Fetch `remote`, pruning deleted remote branches.
    fn fetch(&mut self, remote: &str) -> Result<(), BackendError>;

    /// Check out `name`: stay if already on it, switch to an existing local
    /// branch, track `<tracking_remote>/<name>` if that exists, otherwise
    /// create it from `start_point`. An existing local branch is brought up to
    /// `<tracking_remote>/<name>` when that ref exists.
    fn checkout_or_create_branch(
        &mut self,
        name: &str,
        tracking_remote: Option<&str>,
        start_point: &str,
    ) -> Result<BranchOutcome, BackendError>;

    /// Delete local branch `name`. Returns `false` if it did not exist.
    fn delete_local_branch(&mut self, name: &str) -> Result<bool, BackendError>;

    /// Delete files or whole trees from the working tree. Missing paths are
    /// skipped; returns the paths that were actually removed.
    fn remove_paths(&mut self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, BackendError>;

    /// Merge `reference` into the checked-out branch. Conflicts under
    /// `fork_owned` are dropped from the index and working tree; the caller
    /// restores those paths afterwards.
    fn merge(
        &mut self,
        reference: &str,
        options: &MergeOptions,
        fork_owned: &[PathBuf],
    ) -> Result<MergeOutcome, BackendError>;

    /// Make each path in index and working tree match `reference`.
    fn checkout_paths(
        &mut self,
        reference: &str,
        paths: &[PathBuf],
    ) -> Result<Vec<PathRestore>, BackendError>;

    fn add_paths(&mut self, paths: &[PathBuf]) -> Result<(), BackendError>;

    fn commit(&mut self, message: &str) -> Result<CommitOutcome, BackendError>;

    /// Push `refspec` (a branch name or `src:dst`) to `remote`.
    fn push(&mut self, remote: &str, refspec: &str) -> Result<(), BackendError>;
}
