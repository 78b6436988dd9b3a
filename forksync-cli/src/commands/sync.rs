//! `forksync sync`: merge a newer upstream release into the fork.

use anyhow::{bail, Context, Result};
use clap::Args;

use forksync_core::ForkConfig;
use forksync_github::{resolve_fork, GithubClient, GithubHost, GithubOracle};
use forksync_sync::{
    pipeline::{self, ensure_license_allowed, ResolvedFork, SyncOptions, SyncReport},
    GitCli, ReconciliationResult, RequestAction,
};

use super::{RepoArgs, TokenArgs};

#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub auth: TokenArgs,

    /// Report whether an update is needed without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not require an allowed upstream license.
    #[arg(long)]
    pub skip_license_check: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = self.repo.load()?;
        if !self.dry_run {
            self.auth.require()?;
        }
        let client = self.auth.client(&config);
        let resolved = resolve(&client, &config)?;

        tracing::info!(
            upstream = %resolved.upstream,
            release_branch = %resolved.release_branch,
            "resolved upstream"
        );

        if self.skip_license_check {
            tracing::warn!(upstream = %resolved.upstream, "license check skipped");
        } else {
            let key = client
                .license_key(&resolved.upstream)
                .with_context(|| format!("cannot read license of {}", resolved.upstream))?;
            ensure_license_allowed(key.as_deref(), &config.allowed_licenses)?;
        }

        let report = run_pipeline(
            &self.repo,
            &config,
            &client,
            &resolved,
            SyncOptions {
                dry_run: self.dry_run,
            },
        )?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize sync report")?
            );
        } else {
            print_report(&report);
        }

        tracing::debug!(duration_ms = report.duration_ms as u64, "sync finished");
        if let Some(ReconciliationResult::MergeFailed { reason }) = &report.result {
            bail!("merge of upstream {} failed:\n{reason}", report.upstream);
        }
        Ok(())
    }
}

pub(crate) fn resolve(client: &GithubClient, config: &ForkConfig) -> Result<ResolvedFork> {
    resolve_fork(client, config).with_context(|| format!("cannot resolve upstream of {}", config.fork))
}

pub(crate) fn run_pipeline(
    repo: &RepoArgs,
    config: &ForkConfig,
    client: &GithubClient,
    resolved: &ResolvedFork,
    options: SyncOptions,
) -> Result<SyncReport> {
    let mut backend = GitCli::new(&repo.repo_dir);
    let oracle = GithubOracle::new(client.clone(), config.manifest_name.clone());
    let host = GithubHost::new(client.clone(), config.fork.clone());

    pipeline::run(
        config,
        resolved,
        &repo.repo_dir,
        &mut backend,
        &oracle,
        &host,
        options,
    )
    .with_context(|| format!("sync failed for {}", config.fork))
}

fn print_report(report: &SyncReport) {
    let fork_version = report
        .state
        .fork_version
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "none".to_string());
    let versions = format!(
        "{} {fork_version} <- {} {} ({})",
        report.fork, report.upstream, report.state.upstream_version, report.release_branch
    );

    match &report.result {
        None => {
            let verdict = if report.update_needed() {
                "update needed"
            } else {
                "up to date"
            };
            println!("[dry-run] {versions}: {verdict}");
        }
        Some(ReconciliationResult::NoUpdateNeeded) => {
            println!("✓ {versions}: nothing to sync");
        }
        Some(ReconciliationResult::Merged {
            conflicts_resolved,
            request,
        }) => {
            let verb = match request {
                RequestAction::Created(_) => "opened",
                RequestAction::Retitled(_) => "retitled",
                RequestAction::Unchanged(_) => "kept",
            };
            let pr = request.request();
            println!("✓ {versions}: merged");
            if *conflicts_resolved {
                println!("  conflicts resolved with upstream content");
            }
            println!("  {verb} #{} \"{}\" {}", pr.number, pr.title, pr.url);
        }
        Some(ReconciliationResult::MergeFailed { .. }) => {
            println!("✗ {versions}: merge failed");
        }
    }
}
