//! forksync: keep an integration fork in step with its upstream.
//!
//! # Usage
//!
//! ```text
//! forksync init --fork <owner/name> [--upstream <owner/name>] [--force]
//! forksync sync [--dry-run] [--skip-license-check] [--json]
//! forksync status [--json]
//! forksync record-release [--tag <tag>]
//! forksync check-version
//! ```
//!
//! Every command takes `--repo-dir` (default `.`), `--config` (default
//! `<repo-dir>/forksync.yaml`) and, where GitHub is involved, `--token`
//! (falls back to `GITHUB_TOKEN`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    check_version::CheckVersionArgs, init::InitArgs, record_release::RecordReleaseArgs,
    status::StatusArgs, sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "forksync",
    version,
    about = "Sync integration forks with their upstream releases",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a forksync.yaml for a fork checkout.
    Init(InitArgs),

    /// Merge a newer upstream release into the integration branch and open
    /// or retitle its pull request.
    Sync(SyncArgs),

    /// Show fork and upstream versions and the pull request state.
    Status(StatusArgs),

    /// Record the release for the current manifest version on the base branch.
    RecordRelease(RecordReleaseArgs),

    /// Fail unless the manifest version is newer than the recorded release.
    CheckVersion(CheckVersionArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::RecordRelease(args) => args.run(),
        Commands::CheckVersion(args) => args.run(),
    }
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
