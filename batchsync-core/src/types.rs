//! Domain types for the batchsync remote object model.
//!
//! Wire shapes follow the remote batch API: identifiers are opaque strings,
//! timestamps travel as integer Unix seconds and are always handled as
//! `DateTime<Utc>` in memory. Naive local-time comparisons are a bug.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purpose tag attached to every resource this tool uploads; only resources
/// carrying it are considered during matching.
pub const SYNC_PURPOSE: &str = "batch";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a remote processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Job status lifecycle
// ---------------------------------------------------------------------------

/// Server-driven job lifecycle. Transitions are monotonic and observed by
/// polling, never driven locally:
///
/// ```text
/// validating -> in_progress -> finalizing -> completed
/// validating -> failed
/// in_progress -> expired
/// * -> cancelling -> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Validating,
    Failed,
    InProgress,
    Finalizing,
    Completed,
    Expired,
    Cancelling,
    Cancelled,
}

impl JobStatus {
    /// Only completed jobs have an output resource worth fetching.
    pub fn is_downloadable(self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    /// Terminal states — the server will not move the job again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Expired | JobStatus::Cancelled
        )
    }

    /// Still moving server-side; worth re-polling on a later run.
    pub fn is_in_flight(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Validating => "validating",
            JobStatus::Failed => "failed",
            JobStatus::InProgress => "in_progress",
            JobStatus::Finalizing => "finalizing",
            JobStatus::Completed => "completed",
            JobStatus::Expired => "expired",
            JobStatus::Cancelling => "cancelling",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Remote objects
// ---------------------------------------------------------------------------

/// A remote-stored input or output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub filename: String,
    #[serde(default)]
    pub bytes: u64,
    pub purpose: String,
}

impl Resource {
    /// Whether this resource belongs to the sync set for `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.filename == name && self.purpose == SYNC_PURPOSE
    }
}

/// A remote asynchronous processing unit created from an uploaded resource.
///
/// Lifecycle stamps are present only once the corresponding transition has
/// occurred server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub endpoint: String,
    pub completion_window: String,
    pub input_file_id: ResourceId,
    #[serde(default)]
    pub output_file_id: Option<ResourceId>,
    #[serde(default)]
    pub error_file_id: Option<ResourceId>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub in_progress_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub finalizing_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub cancelling_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// A file on disk, as seen by the orchestrators.
///
/// `name` is the base filename and is the join key against
/// [`Resource::filename`]. `modified_at` is the filesystem mtime normalized
/// to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
