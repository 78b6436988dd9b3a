//! Upstream reconciliation.
//!
//! ## `reconcile` sequence
//!
//! 1. Gate: stop unless upstream is strictly ahead of the fork.
//! 2. Drop a leftover integration branch whose review request was closed.
//! 3. Establish the integration branch (push it if freshly created).
//! 4. Remove excluded paths from the working tree.
//! 5. Merge the upstream release ref, upstream content winning conflicts.
//! 6. Restore excluded paths from the fork's base branch.
//! 7. Commit; an empty commit means there was nothing to sync.
//! 8. Push the integration branch.
//! 9. Create or retitle the single open review request.
//!
//! Nothing is rolled back on failure: the working tree is left as the failing
//! step found it, and the error carries the backend's captured output.

use serde::Serialize;

use forksync_core::{ExcludedPathSet, ForkConfig, Version};

use crate::backend::{
    BranchOutcome, CommitOutcome, MergeOptions, MergeOutcome, MergeStrategy, PathRestore,
    VersionControlBackend,
};
use crate::error::{BackendError, SyncError};
use crate::host::{NewReviewRequest, ReviewHost, ReviewRequest};
use crate::state::SyncState;

pub const REVIEW_BODY: &str = "Sync with the original repository";

/// What happened to the review request at the end of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "request", rename_all = "snake_case")]
pub enum RequestAction {
    Created(ReviewRequest),
    Retitled(ReviewRequest),
    Unchanged(ReviewRequest),
}

impl RequestAction {
    pub fn request(&self) -> &ReviewRequest {
        match self {
            RequestAction::Created(r) | RequestAction::Retitled(r) | RequestAction::Unchanged(r) => r,
        }
    }
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReconciliationResult {
    /// Upstream is not ahead, or merging it changed nothing.
    NoUpdateNeeded,
    Merged {
        conflicts_resolved: bool,
        request: RequestAction,
    },
    /// The merge hit conflicts it cannot settle in upstream's favour. Nothing
    /// was committed or pushed by the merge step.
    MergeFailed { reason: String },
}

/// Title of the review request for `version`.
pub fn review_title(version: &Version) -> String {
    format!("Version {version}")
}

/// Sequences backend and host operations for one fork.
pub struct SyncReconciler<'a, B: ?Sized, H: ?Sized> {
    config: &'a ForkConfig,
    excluded: ExcludedPathSet,
    upstream_ref: String,
    base_ref: String,
    backend: &'a mut B,
    host: &'a H,
}

impl<'a, B, H> SyncReconciler<'a, B, H>
where
    B: VersionControlBackend + ?Sized,
    H: ReviewHost + ?Sized,
{
    /// `release_branch` is the upstream branch merged from, as resolved for
    /// this run.
    pub fn new(
        config: &'a ForkConfig,
        release_branch: &str,
        backend: &'a mut B,
        host: &'a H,
    ) -> Result<Self, SyncError> {
        let excluded = config.excluded_path_set()?;
        Ok(Self {
            config,
            excluded,
            upstream_ref: format!("{}/{}", config.upstream_remote, release_branch),
            base_ref: config.base_ref(),
            backend,
            host,
        })
    }

    /// Run the full sequence for `state`.
    pub fn reconcile(&mut self, state: &SyncState) -> Result<ReconciliationResult, SyncError> {
        if !state.update_needed() {
            tracing::info!(
                "no new version to sync: upstream {}, fork {}",
                state.upstream_version,
                state
                    .fork_version
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            );
            return Ok(ReconciliationResult::NoUpdateNeeded);
        }
        match &state.fork_version {
            Some(fork) => tracing::info!(
                "upstream {} is ahead of fork {fork}; syncing",
                state.upstream_version
            ),
            None => tracing::info!(
                "no recorded fork version; first sync to upstream {}",
                state.upstream_version
            ),
        }

        self.drop_stale_branch(state)?;

        let branch = self.establish_branch()?;
        let allow_unrelated = state.is_first_sync() || branch == BranchOutcome::Created;

        self.backend.fetch(&self.config.upstream_remote)?;

        let removed = self.backend.remove_paths(self.excluded.as_slice())?;
        tracing::info!("removed {} excluded path(s) before merge", removed.len());

        let conflicts_resolved = match self.merge_upstream(allow_unrelated)? {
            Ok(resolved) => resolved,
            Err(reason) => return Ok(ReconciliationResult::MergeFailed { reason }),
        };

        self.restore_excluded()?;

        match self.backend.commit(&self.config.merge_message)? {
            CommitOutcome::Committed { id } => tracing::info!("committed merge {id}"),
            CommitOutcome::NothingToCommit => {
                tracing::info!("upstream content already present; nothing to publish");
                return Ok(ReconciliationResult::NoUpdateNeeded);
            }
        }

        self.backend
            .push(&self.config.fork_remote, &self.config.integration_branch)?;

        let request = self.ensure_review_request(&state.upstream_version)?;
        Ok(ReconciliationResult::Merged {
            conflicts_resolved,
            request,
        })
    }

    /// An integration branch without an open request belongs to a request
    /// that was closed or merged; start over from the base branch, both on
    /// the host and locally.
    fn drop_stale_branch(&mut self, state: &SyncState) -> Result<(), SyncError> {
        if state.pr_open {
            return Ok(());
        }
        let branch = &self.config.integration_branch;
        if state.pr_branch_exists {
            tracing::info!("removing {branch} branch because no review request is open");
            self.host.delete_branch(branch)?;
            self.backend.fetch(&self.config.fork_remote)?;
        }
        if self.backend.current_branch()? == *branch {
            self.backend.checkout_or_create_branch(
                &self.config.base_branch,
                Some(self.config.fork_remote.as_str()),
                &self.base_ref,
            )?;
        }
        if self.backend.delete_local_branch(branch)? {
            tracing::info!("deleted leftover local {branch} branch");
        }
        Ok(())
    }

    /// Idempotent: a second call on the checked-out branch changes nothing.
    pub fn establish_branch(&mut self) -> Result<BranchOutcome, SyncError> {
        let outcome = self.backend.checkout_or_create_branch(
            &self.config.integration_branch,
            Some(self.config.fork_remote.as_str()),
            &self.base_ref,
        )?;
        tracing::info!(
            "integration branch {}: {outcome:?}",
            self.config.integration_branch
        );
        if outcome == BranchOutcome::Created {
            self.backend
                .push(&self.config.fork_remote, &self.config.integration_branch)?;
        }
        Ok(outcome)
    }

    /// Outer error aborts the run; inner `Err` carries a merge-failure reason.
    fn merge_upstream(&mut self, allow_unrelated: bool) -> Result<Result<bool, String>, SyncError> {
        let options = MergeOptions {
            strategy: MergeStrategy::Theirs,
            allow_unrelated_histories: allow_unrelated,
            no_commit: true,
        };
        tracing::info!(
            "merging {} (unrelated histories allowed: {allow_unrelated})",
            self.upstream_ref
        );

        match self
            .backend
            .merge(&self.upstream_ref, &options, self.excluded.as_slice())
        {
            Ok(MergeOutcome::Clean) => Ok(Ok(false)),
            Ok(MergeOutcome::ConflictsResolved { paths }) => {
                tracing::info!("{} conflict(s) resolved", paths.len());
                Ok(Ok(true))
            }
            Ok(MergeOutcome::Unresolved { paths, output }) => {
                let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                tracing::warn!("merge left unresolved conflicts: {}", listed.join(", "));
                Ok(Err(format!(
                    "unresolved conflicts in {}\n{output}",
                    listed.join(", ")
                )))
            }
            Err(e @ BackendError::Command { .. }) => {
                tracing::warn!("merge of {} failed", self.upstream_ref);
                Ok(Err(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn restore_excluded(&mut self) -> Result<(), SyncError> {
        let results = self
            .backend
            .checkout_paths(&self.base_ref, self.excluded.as_slice())?;
        for result in results {
            match result {
                PathRestore::Restored(path) => {
                    tracing::debug!("restored {} from {}", path.display(), self.base_ref)
                }
                PathRestore::Skipped { path, reason } => tracing::warn!(
                    "cannot restore {} from {}: {reason}",
                    path.display(),
                    self.base_ref
                ),
            }
        }
        Ok(())
    }

    /// Keep exactly one open request, titled with the newest upstream version.
    pub fn ensure_review_request(&self, version: &Version) -> Result<RequestAction, SyncError> {
        let title = review_title(version);
        let existing = self
            .host
            .find_open_request(&self.config.base_branch, &self.config.integration_branch)?;

        let action = match existing {
            Some(request) if request.title == title => RequestAction::Unchanged(request),
            Some(mut request) => {
                tracing::info!("updating review request #{} title to {title}", request.number);
                self.host.update_title(&request, &title)?;
                request.title = title;
                RequestAction::Retitled(request)
            }
            None => {
                tracing::info!("creating review request for version {version}");
                let created = self.host.create_request(&NewReviewRequest {
                    base: self.config.base_branch.clone(),
                    head: self.config.integration_branch.clone(),
                    title,
                    body: REVIEW_BODY.to_string(),
                    labels: vec![self.config.review_label.clone()],
                })?;
                RequestAction::Created(created)
            }
        };
        Ok(action)
    }
}
