//! `forksync init --fork <owner/name>`

use anyhow::{bail, Context, Result};
use clap::Args;

use forksync_core::{config, ForkConfig, RepoSlug};

use super::RepoArgs;

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Fork repository, `owner/name`.
    #[arg(long)]
    pub fork: RepoSlug,

    /// Upstream repository; resolved from the fork's parent when omitted.
    #[arg(long)]
    pub upstream: Option<RepoSlug>,

    /// Upstream branch to merge from; defaults to `fog_release` when upstream
    /// has it, otherwise upstream's default branch.
    #[arg(long)]
    pub release_branch: Option<String>,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let path = self.repo.config_path();
        if path.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                path.display()
            );
        }

        let mut cfg = ForkConfig::new(self.fork);
        cfg.upstream = self.upstream;
        cfg.release_branch = self.release_branch;
        config::save_at(&path, &cfg)
            .with_context(|| format!("failed to write {}", path.display()))?;

        println!("✓ wrote {} for {}", path.display(), cfg.fork);
        Ok(())
    }
}
