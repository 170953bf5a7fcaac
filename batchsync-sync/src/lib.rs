//! # batchsync-sync
//!
//! Staleness resolution and transfer orchestration.
//!
//! [`upload::upload_run`] walks a source directory and uploads files newer
//! than their remote counterpart, creating one processing job per upload.
//! [`download::download_run`] walks the remote job list and writes completed
//! results that are newer than any local copy. [`pipeline::run`] is the
//! canonical entrypoint combining both.

pub mod download;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod staleness;
pub mod upload;

pub use download::download_run;
pub use error::SyncError;
pub use pipeline::{run, Mode};
pub use report::{ItemOutcome, RunKind, RunSummary};
pub use upload::upload_run;
