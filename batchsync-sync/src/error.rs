//! Error types for batchsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use batchsync_client::ClientError;

/// All errors that can arise from sync orchestration.
///
/// Only failures that abort a whole run surface as `SyncError`; per-item
/// failures are caught inside the orchestrator loops and recorded in the
/// run summary instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the remote store client.
    #[error("remote store error: {0}")]
    Client(#[from] ClientError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
