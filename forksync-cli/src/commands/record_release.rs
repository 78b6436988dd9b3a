//! `forksync record-release`: write the release descriptor to the base branch.

use anyhow::{Context, Result};
use clap::Args;

use forksync_github::{push_url, release_descriptor};
use forksync_sync::{
    oracle::local_manifest_version, release::record_release, CommitOutcome, GitCli,
    VersionControlBackend,
};

use super::{RepoArgs, TokenArgs};

#[derive(Args, Debug)]
pub struct RecordReleaseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub auth: TokenArgs,

    /// Release tag to record; defaults to the manifest version.
    #[arg(long)]
    pub tag: Option<String>,
}

impl RecordReleaseArgs {
    pub fn run(self) -> Result<()> {
        let config = self.repo.load()?;
        let token = self.auth.require()?;
        let client = self.auth.client(&config);

        let tag = match self.tag {
            Some(tag) => tag,
            None => local_manifest_version(&self.repo.source_root(&config), &config.manifest_name)
                .with_context(|| format!("cannot read {}", config.manifest_name))?
                .to_string(),
        };
        let descriptor = release_descriptor(&client, &config.fork, &tag)
            .with_context(|| format!("cannot read release {tag} of {}", config.fork))?;

        let fork_repo = client
            .repository(&config.fork)
            .with_context(|| format!("cannot read {}", config.fork))?;
        let mut git = GitCli::new(&self.repo.repo_dir);
        git.configure_identity(&config.bot)?;
        git.ensure_remote(
            &config.fork_remote,
            &push_url(&fork_repo.clone_url, &config.fork.owner, token),
        )?;

        let outcome = record_release(&config, &mut git, &self.repo.repo_dir, &descriptor)
            .context("failed to record release")?;
        match outcome {
            CommitOutcome::Committed { id } => println!(
                "✓ recorded {} ({} asset(s)) in {} on {} ({})",
                descriptor.tag_name,
                descriptor.assets.len(),
                config.release_file.display(),
                config.base_branch,
                &id[..id.len().min(8)]
            ),
            CommitOutcome::NothingToCommit => println!(
                "✓ {} already records {}",
                config.release_file.display(),
                descriptor.tag_name
            ),
        }
        Ok(())
    }
}
