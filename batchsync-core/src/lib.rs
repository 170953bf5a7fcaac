//! # batchsync-core
//!
//! Domain types shared by the remote store client and the sync
//! orchestrators: resources, jobs, the job status lifecycle, and local
//! file descriptors. Pure data — no I/O lives here.

pub mod types;

pub use types::{Job, JobStatus, JobId, LocalFile, Resource, ResourceId, SYNC_PURPOSE};
