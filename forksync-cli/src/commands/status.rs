//! `forksync status`: versions, gate decision and pull request state.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use forksync_sync::pipeline::{SyncOptions, SyncReport};

use super::sync::{resolve, run_pipeline};
use super::{RepoArgs, TokenArgs};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub auth: TokenArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    update_needed: bool,
    #[serde(flatten)]
    report: &'a SyncReport,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "field")]
    field: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config = self.repo.load()?;
        let client = self.auth.client(&config);
        let resolved = resolve(&client, &config)?;
        let report = run_pipeline(
            &self.repo,
            &config,
            &client,
            &resolved,
            SyncOptions { dry_run: true },
        )?;

        if self.json {
            let payload = StatusJson {
                update_needed: report.update_needed(),
                report: &report,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&report, &config.integration_branch);
        Ok(())
    }
}

fn print_table(report: &SyncReport, integration_branch: &str) {
    println!(
        "forksync v{} | {} <- {}",
        env!("CARGO_PKG_VERSION"),
        report.fork,
        report.upstream
    );

    let state = &report.state;
    let verdict = if report.update_needed() {
        "UPDATE NEEDED".yellow().bold().to_string()
    } else {
        "UP TO DATE".green().bold().to_string()
    };
    let rows = vec![
        StatusRow {
            field: "fork version",
            value: state
                .fork_version
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none (first sync)".to_string()),
        },
        StatusRow {
            field: "upstream version",
            value: format!("{} ({})", state.upstream_version, report.release_branch),
        },
        StatusRow {
            field: "status",
            value: verdict,
        },
        StatusRow {
            field: "pull request",
            value: (if state.pr_open { "open" } else { "none" }).to_string(),
        },
        StatusRow {
            field: "branch",
            value: format!(
                "{integration_branch} {}",
                if state.pr_branch_exists {
                    "exists"
                } else {
                    "absent"
                }
            ),
        },
        StatusRow {
            field: "checked at",
            value: report
                .started_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if state.pr_branch_exists && !state.pr_open {
        println!("Branch {integration_branch} has no open pull request; the next sync deletes it.");
    }
}
