//! Download orchestration.
//!
//! Walks the remote job list once, acts only on jobs in a downloadable
//! status, and writes each stale result into the target directory with the
//! `.batchsync.tmp` + rename protocol so readers never observe a partial
//! file. Non-downloadable statuses are observed and skipped, never retried
//! here. Each job gets its own error boundary.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use batchsync_client::RemoteStore;
use batchsync_core::Job;

use crate::error::{io_err, SyncError};
use crate::report::{ItemOutcome, RunKind, RunSummary};
use crate::staleness;

/// Download completed job results into `target_dir`.
///
/// The job listing is fetched once up front; a failure there aborts the run
/// before any transfer starts.
pub async fn download_run(
    store: &RemoteStore,
    target_dir: &Path,
    cancel: &CancellationToken,
) -> Result<RunSummary, SyncError> {
    let jobs = store.list_jobs().await?;
    tracing::info!(jobs = jobs.len(), "starting download run");

    let mut summary = RunSummary::new(RunKind::Download);
    for job in jobs {
        if cancel.is_cancelled() {
            tracing::info!("download run cancelled");
            break;
        }
        let outcome = match process_job(store, &job, target_dir).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(job = %job.id, error = %err, "job failed; continuing");
                ItemOutcome::Failed {
                    item: job.id.to_string(),
                    reason: err.to_string(),
                }
            }
        };
        summary.outcomes.push(outcome);
    }
    Ok(summary)
}

async fn process_job(
    store: &RemoteStore,
    job: &Job,
    target_dir: &Path,
) -> Result<ItemOutcome, SyncError> {
    if !job.status.is_downloadable() {
        tracing::info!(job = %job.id, status = %job.status, "job not ready; skipped");
        return Ok(ItemOutcome::SkippedStatus {
            job: job.id.clone(),
            status: job.status,
        });
    }

    let Some(output_id) = &job.output_file_id else {
        return Ok(ItemOutcome::Failed {
            item: job.id.to_string(),
            reason: "completed job has no output resource".to_string(),
        });
    };

    let resource = store.get_resource(output_id).await?;

    // Re-enumerate per job: an earlier download in this run may have
    // created the file this job's result would match.
    let local_files = staleness::scan_dir(target_dir)?;
    let local = local_files.iter().find(|f| f.name == resource.filename);
    if !staleness::needs_download(local, &resource) {
        tracing::info!(job = %job.id, file = %resource.filename, "skipped: local copy is fresh");
        return Ok(ItemOutcome::SkippedFresh {
            name: resource.filename.clone(),
        });
    }

    let content = store.get_resource_content(output_id).await?;
    let path = target_dir.join(&resource.filename);
    write_atomic(&path, &content)?;
    tracing::info!(job = %job.id, path = %path.display(), "result written");

    Ok(ItemOutcome::Downloaded {
        path,
        job: job.id.clone(),
    })
}

/// Write `content` to `path` via a temp file and rename, overwriting any
/// existing file of that name.
fn write_atomic(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.batchsync.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, err));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
