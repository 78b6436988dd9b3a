//! Release recording and the release version gate.

use std::path::Path;

use forksync_core::{release, ForkConfig, ReleaseDescriptor, Version};

use crate::backend::{CommitOutcome, VersionControlBackend};
use crate::error::SyncError;
use crate::git::GitCli;

/// Write `descriptor` to the release file, commit it and push it straight to
/// the fork's base branch.
///
/// Returns [`CommitOutcome::NothingToCommit`] (and pushes nothing) when the
/// same descriptor is already recorded.
pub fn record_release<B>(
    config: &ForkConfig,
    backend: &mut B,
    checkout_root: &Path,
    descriptor: &ReleaseDescriptor,
) -> Result<CommitOutcome, SyncError>
where
    B: VersionControlBackend + ?Sized,
{
    let path = checkout_root.join(&config.release_file);
    release::save_at(&path, descriptor)?;
    tracing::info!(
        "wrote {} for {} ({} asset(s))",
        config.release_file.display(),
        descriptor.tag_name,
        descriptor.assets.len()
    );

    backend.add_paths(std::slice::from_ref(&config.release_file))?;
    let outcome = backend.commit(&config.release_commit_message())?;
    if let CommitOutcome::Committed { .. } = outcome {
        let refspec = format!("HEAD:{}", config.base_branch);
        backend.push(&config.fork_remote, &refspec)?;
    }
    Ok(outcome)
}

/// Descriptor recorded on the fork's base branch, if any.
pub fn recorded_release(
    git: &GitCli,
    config: &ForkConfig,
) -> Result<Option<ReleaseDescriptor>, SyncError> {
    let Some(contents) = git.show_file(&config.base_ref(), &config.release_file)? else {
        return Ok(None);
    };
    Ok(Some(ReleaseDescriptor::from_json(
        &config.release_file,
        &contents,
    )?))
}

/// A new release must carry a version strictly greater than the recorded one;
/// clients only pick up strictly newer versions. No recorded release passes.
pub fn check_release_version(
    manifest: &Version,
    recorded: Option<&ReleaseDescriptor>,
) -> Result<(), SyncError> {
    let Some(recorded) = recorded else {
        tracing::info!("no recorded release; {manifest} will be the first");
        return Ok(());
    };
    let recorded = recorded.version()?;
    if *manifest > recorded {
        Ok(())
    } else {
        Err(SyncError::ReleaseNotNewer {
            manifest: manifest.clone(),
            recorded,
        })
    }
}
