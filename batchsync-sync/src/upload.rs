//! Upload orchestration.
//!
//! Walks a source directory, matches each file against the remote resource
//! listing by filename + purpose, uploads the stale ones, and creates one
//! processing job per upload. Each file is wrapped in its own error
//! boundary: a failed upload or job creation is logged and recorded, and
//! the loop moves on. No retry within a run.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use batchsync_client::RemoteStore;
use batchsync_core::{LocalFile, Resource, SYNC_PURPOSE};

use crate::error::SyncError;
use crate::report::{ItemOutcome, RunKind, RunSummary};
use crate::staleness;

/// Upload stale files from `source_dir` and create a job for each upload.
///
/// The remote listing is fetched once up front; a failure there (or an
/// unreadable source directory) aborts the run before any transfer starts.
pub async fn upload_run(
    store: &RemoteStore,
    source_dir: &Path,
    cancel: &CancellationToken,
) -> Result<RunSummary, SyncError> {
    let remote = store.list_resources().await?;
    let files = staleness::scan_dir(source_dir)?;
    tracing::info!(
        files = files.len(),
        remote = remote.len(),
        "starting upload run"
    );

    let mut summary = RunSummary::new(RunKind::Upload);
    for file in files {
        if cancel.is_cancelled() {
            tracing::info!("upload run cancelled");
            break;
        }
        let outcome = match process_file(store, &file, &remote).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(file = %file.name, error = %err, "file failed; continuing");
                ItemOutcome::Failed {
                    item: file.name.clone(),
                    reason: err.to_string(),
                }
            }
        };
        summary.outcomes.push(outcome);
    }
    Ok(summary)
}

async fn process_file(
    store: &RemoteStore,
    file: &LocalFile,
    remote: &[Resource],
) -> Result<ItemOutcome, SyncError> {
    // At most one counterpart; first match wins when duplicates exist.
    let counterpart = remote.iter().find(|r| r.matches(&file.name));
    if !staleness::needs_upload(file, counterpart) {
        tracing::info!(file = %file.name, "skipped: remote copy is fresh");
        return Ok(ItemOutcome::SkippedFresh {
            name: file.name.clone(),
        });
    }

    let resource = store.upload_resource(&file.path, SYNC_PURPOSE).await?;
    tracing::info!(file = %file.name, resource = %resource.id, "uploaded");

    let job = store.create_job(&resource.id).await?;
    tracing::info!(file = %file.name, job = %job.id, "job created");

    Ok(ItemOutcome::Uploaded {
        name: file.name.clone(),
        resource: resource.id,
        job: job.id,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
