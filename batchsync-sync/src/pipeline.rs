//! Shared pipeline entrypoint used by the CLI.

use std::fmt;
use std::path::Path;

use tokio_util::sync::CancellationToken;

use batchsync_client::RemoteStore;

use crate::{download_run, upload_run, RunSummary, SyncError};

/// What a pipeline run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Upload stale files and create jobs for them.
    Upload,
    /// Download completed job results.
    Download,
    /// Upload first, then download.
    Both,
}

impl Mode {
    fn uploads(self) -> bool {
        matches!(self, Mode::Upload | Mode::Both)
    }

    fn downloads(self) -> bool {
        matches!(self, Mode::Download | Mode::Both)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Upload => write!(f, "upload"),
            Mode::Download => write!(f, "download"),
            Mode::Both => write!(f, "upload+download"),
        }
    }
}

/// Run the sync pipeline.
///
/// Summaries are returned in execution order; in [`Mode::Both`] the upload
/// run completes before the download run starts, and each run reads its
/// remote listing fresh.
pub async fn run(
    store: &RemoteStore,
    source_dir: &Path,
    target_dir: &Path,
    mode: Mode,
    cancel: &CancellationToken,
) -> Result<Vec<RunSummary>, SyncError> {
    let mut summaries = Vec::new();
    if mode.uploads() {
        summaries.push(upload_run(store, source_dir, cancel).await?);
    }
    if mode.downloads() && !cancel.is_cancelled() {
        summaries.push(download_run(store, target_dir, cancel).await?);
    }
    Ok(summaries)
}
