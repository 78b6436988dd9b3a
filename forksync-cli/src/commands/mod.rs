pub mod check_version;
pub mod init;
pub mod record_release;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use forksync_core::{config, ForkConfig};
use forksync_github::GithubClient;

/// Repository location and configuration file, shared by every command.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Fork checkout to operate on.
    #[arg(long, default_value = ".")]
    pub repo_dir: PathBuf,

    /// Configuration file (defaults to `<repo-dir>/forksync.yaml`).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RepoArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| config::config_path_at(&self.repo_dir))
    }

    /// Load and validate the fork configuration.
    pub fn load(&self) -> Result<ForkConfig> {
        let path = self.config_path();
        config::load_at(&path).with_context(|| {
            format!(
                "failed to load {} (run `forksync init` first)",
                path.display()
            )
        })
    }

    /// Where the manifest search starts.
    pub fn source_root(&self, config: &ForkConfig) -> PathBuf {
        self.repo_dir.join(&config.source_root)
    }
}

/// GitHub credentials.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Token with repo access to the fork.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl TokenArgs {
    pub fn client(&self, config: &ForkConfig) -> GithubClient {
        GithubClient::new(&config.api_url, self.token.clone())
    }

    pub fn require(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("GitHub token not found; pass --token or set GITHUB_TOKEN")
    }
}
