//! `forksync check-version`: release gate for CI. The manifest must carry
//! every required field and a version above the recorded release.

use anyhow::{Context, Result};
use clap::Args;

use forksync_core::manifest;
use forksync_sync::{
    release::{check_release_version, recorded_release},
    GitCli, VersionControlBackend,
};

use super::RepoArgs;

#[derive(Args, Debug)]
pub struct CheckVersionArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Compare against the base branch as last fetched instead of fetching.
    #[arg(long)]
    pub no_fetch: bool,
}

impl CheckVersionArgs {
    pub fn run(self) -> Result<()> {
        let config = self.repo.load()?;
        let mut git = GitCli::new(&self.repo.repo_dir);
        if !self.no_fetch {
            git.fetch(&config.fork_remote)
                .with_context(|| format!("failed to fetch {}", config.fork_remote))?;
        }

        let source_root = self.repo.source_root(&config);
        let manifest_path = manifest::locate(&source_root, &config.manifest_name)
            .with_context(|| format!("cannot find {}", config.manifest_name))?;
        tracing::debug!(path = %manifest_path.display(), "checking manifest");
        manifest::check_required_fields(&manifest_path)?;
        let manifest = manifest::read_version(&manifest_path)
            .with_context(|| format!("cannot read {}", manifest_path.display()))?;
        let recorded = recorded_release(&git, &config)?;

        check_release_version(&manifest, recorded.as_ref())?;
        match &recorded {
            Some(r) => println!("✓ version {manifest} is newer than released {}", r.tag_name),
            None => println!("✓ version {manifest} (no release recorded yet)"),
        }
        Ok(())
    }
}
