//! Shared sync pipeline entrypoint used by the CLI commands.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use forksync_core::{ForkConfig, RepoSlug};

use crate::backend::VersionControlBackend;
use crate::error::SyncError;
use crate::host::ReviewHost;
use crate::oracle::VersionOracle;
use crate::reconciler::{ReconciliationResult, SyncReconciler};
use crate::state::{gather_state, SyncState};

/// Host-side facts about the fork, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFork {
    pub upstream: RepoSlug,
    /// Clone URL registered as the upstream remote.
    pub upstream_url: String,
    /// Upstream branch that carries releases.
    pub release_branch: String,
    /// Authenticated push URL for the fork remote, when a token is available.
    pub fork_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Gather state and report the gate decision without touching the
    /// repository or the host.
    pub dry_run: bool,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub fork: String,
    pub upstream: String,
    pub release_branch: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub state: SyncState,
    /// `None` for dry runs.
    pub result: Option<ReconciliationResult>,
}

impl SyncReport {
    pub fn update_needed(&self) -> bool {
        self.state.update_needed()
    }
}

/// Upstream must carry one of the `allowed` license keys (case-insensitive).
pub fn ensure_license_allowed(key: Option<&str>, allowed: &[String]) -> Result<(), SyncError> {
    let Some(key) = key else {
        return Err(SyncError::LicenseNotAllowed {
            license: "none".to_string(),
        });
    };
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(key)) {
        tracing::debug!("upstream license {key} is allowed");
        Ok(())
    } else {
        Err(SyncError::LicenseNotAllowed {
            license: key.to_string(),
        })
    }
}

/// Point the repository at the right identity and remotes, fetch the fork and
/// check out its base branch.
pub fn prepare<B>(config: &ForkConfig, fork: &ResolvedFork, backend: &mut B) -> Result<(), SyncError>
where
    B: VersionControlBackend + ?Sized,
{
    backend.configure_identity(&config.bot)?;
    if let Some(url) = &fork.fork_url {
        backend.ensure_remote(&config.fork_remote, url)?;
    }
    backend.ensure_remote(&config.upstream_remote, &fork.upstream_url)?;
    backend.fetch(&config.fork_remote)?;
    backend.checkout_or_create_branch(
        &config.base_branch,
        Some(config.fork_remote.as_str()),
        &config.base_ref(),
    )?;
    Ok(())
}

/// Run one sync for a fork checked out at `checkout_root`.
pub fn run<B, O, H>(
    config: &ForkConfig,
    fork: &ResolvedFork,
    checkout_root: &Path,
    backend: &mut B,
    oracle: &O,
    host: &H,
    options: SyncOptions,
) -> Result<SyncReport, SyncError>
where
    B: VersionControlBackend + ?Sized,
    O: VersionOracle + ?Sized,
    H: ReviewHost + ?Sized,
{
    let started_at = Utc::now();
    let timer = Instant::now();

    if !options.dry_run {
        prepare(config, fork, backend)?;
    }

    let state = gather_state(
        config,
        oracle,
        host,
        checkout_root,
        &fork.upstream,
        &fork.release_branch,
    )?;

    let result = if options.dry_run {
        tracing::info!(
            "[dry-run] update needed: {} (upstream {})",
            state.update_needed(),
            state.upstream_version
        );
        None
    } else {
        let mut reconciler = SyncReconciler::new(config, &fork.release_branch, backend, host)?;
        Some(reconciler.reconcile(&state)?)
    };

    Ok(SyncReport {
        fork: config.fork.full_name(),
        upstream: fork.upstream.full_name(),
        release_branch: fork.release_branch.clone(),
        started_at,
        duration_ms: timer.elapsed().as_millis(),
        state,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_check() {
        let allowed = vec!["mit".to_string(), "gpl-3.0".to_string()];
        ensure_license_allowed(Some("MIT"), &allowed).unwrap();
        ensure_license_allowed(Some("gpl-3.0"), &allowed).unwrap();

        let err = ensure_license_allowed(Some("apache-2.0"), &allowed).unwrap_err();
        assert!(
            matches!(&err, SyncError::LicenseNotAllowed { license } if license == "apache-2.0"),
            "{err}"
        );
        assert!(ensure_license_allowed(None, &allowed).is_err());
    }
}
