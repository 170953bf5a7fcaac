//! batchsync — sync local files with a remote batch-processing API.
//!
//! # Usage
//!
//! ```text
//! batchsync <source-directory> <target-directory> <mode>
//!
//! mode: 0 — upload stale files and create a processing job per upload
//!       1 — download completed job results
//!       2 — both (upload first, then download)
//! ```
//!
//! Remote endpoint and credentials come from `BATCHSYNC_API_URL` /
//! `BATCHSYNC_API_KEY`. Setup errors (missing directory, bad mode, missing
//! key) exit non-zero before any remote call; per-item failures are
//! reported and counted but leave the exit code at zero.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use batchsync_client::RemoteStore;
use batchsync_sync::{pipeline, ItemOutcome, Mode, RunKind, RunSummary};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "batchsync",
    version,
    about = "Sync local files with a remote batch-processing API",
    long_about = None,
)]
struct Cli {
    /// Directory holding input files to upload.
    source_directory: PathBuf,

    /// Directory where job results are written.
    target_directory: PathBuf,

    /// 0 = upload and create jobs, 1 = download results, 2 = both.
    mode: ModeArg,
}

// ---------------------------------------------------------------------------
// Mode argument — parsed from the numeric CLI string, converts to sync Mode
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse [`Mode`] from `0 | 1 | 2`.
#[derive(Debug, Clone)]
struct ModeArg(Mode);

impl FromStr for ModeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self(Mode::Upload)),
            "1" => Ok(Self(Mode::Download)),
            "2" => Ok(Self(Mode::Both)),
            other => Err(format!(
                "unknown mode '{other}'; expected: 0 (upload), 1 (download), 2 (both)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mode = cli.mode.0;

    let source = ensure_dir(&cli.source_directory, "source")?;
    let target = ensure_dir(&cli.target_directory, "target")?;
    println!("Source directory: {}", source.display());
    println!("Target directory: {}", target.display());
    println!("Mode: {mode}\n");

    let store = RemoteStore::from_env().context("remote store configuration")?;

    // Ctrl-C stops between items; the item in flight finishes first.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received; stopping after the current item");
                cancel.cancel();
            }
        });
    }

    let summaries = pipeline::run(&store, &source, &target, mode, &cancel).await?;
    for summary in &summaries {
        print_summary(summary);
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Resolve `path` against the working directory and require it to exist.
fn ensure_dir(path: &Path, role: &str) -> Result<PathBuf> {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("could not determine working directory")?
            .join(path)
    };
    if !resolved.is_dir() {
        bail!("{role} directory {} doesn't exist", resolved.display());
    }
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_summary(summary: &RunSummary) {
    let label = match summary.kind {
        RunKind::Upload => "upload",
        RunKind::Download => "download",
    };

    if summary.outcomes.is_empty() {
        println!("{} {label} run — nothing to do", "✓".green());
        return;
    }

    for outcome in &summary.outcomes {
        match outcome {
            ItemOutcome::Uploaded {
                name,
                resource,
                job,
            } => println!("  ↑  {name} (resource {resource}, job {job})"),
            ItemOutcome::Downloaded { path, job } => {
                println!("  ↓  {} (job {job})", path.display())
            }
            ItemOutcome::SkippedFresh { name } => println!("  ·  {name} — already fresh"),
            ItemOutcome::SkippedStatus { job, status } => {
                println!("  ·  {job} — not ready (status: {status})")
            }
            ItemOutcome::Failed { item, reason } => {
                println!("  {}  {item}: {reason}", "✗".red())
            }
        }
    }

    let counts = match summary.kind {
        RunKind::Upload => format!(
            "{} uploaded, {} skipped, {} failed",
            summary.uploaded(),
            summary.skipped(),
            summary.failed()
        ),
        RunKind::Download => format!(
            "{} downloaded, {} skipped, {} failed",
            summary.downloaded(),
            summary.skipped(),
            summary.failed()
        ),
    };
    println!("{} {label} run — {counts}", "✓".green());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
