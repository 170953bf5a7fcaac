//! Error types for batchsync-client.

use std::path::PathBuf;

use thiserror::Error;

use batchsync_core::ResourceId;

/// All errors that can arise from remote store operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote service answered with a non-success HTTP status.
    #[error("remote service returned {status}: {body}")]
    Transport { status: u16, body: String },

    /// The requested resource id is unknown to the remote service.
    #[error("resource {id} not found")]
    NotFound { id: ResourceId },

    /// Connection, timeout, or body-decode failure below the HTTP layer.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local I/O failure while reading a file for upload, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No API key available when building the client from the environment.
    #[error("missing API key; set {0}")]
    MissingApiKey(&'static str),
}

/// Convenience constructor for [`ClientError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ClientError {
    ClientError::Io {
        path: path.into(),
        source,
    }
}
