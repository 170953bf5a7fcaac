//! Per-item outcomes and end-of-run summaries.

use std::path::PathBuf;

use batchsync_core::{JobId, JobStatus, ResourceId};

/// Which orchestrator produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Upload,
    Download,
}

/// Outcome of processing a single file or job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A local file was uploaded and a job created for it.
    Uploaded {
        name: String,
        resource: ResourceId,
        job: JobId,
    },
    /// A completed job's output was written to disk.
    Downloaded { path: PathBuf, job: JobId },
    /// The name-matched counterpart is at least as fresh; nothing to do.
    SkippedFresh { name: String },
    /// The job is not in a downloadable status; observed, never retried here.
    SkippedStatus { job: JobId, status: JobStatus },
    /// The item's work failed; the run continued with the remaining items.
    Failed { item: String, reason: String },
}

/// Outcome of one orchestrator run.
#[derive(Debug)]
pub struct RunSummary {
    pub kind: RunKind,
    pub outcomes: Vec<ItemOutcome>,
}

impl RunSummary {
    pub fn new(kind: RunKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Uploaded { .. }))
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ItemOutcome::SkippedFresh { .. } | ItemOutcome::SkippedStatus { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_outcome() {
        let mut summary = RunSummary::new(RunKind::Upload);
        summary.outcomes.push(ItemOutcome::Uploaded {
            name: "a.jsonl".into(),
            resource: ResourceId::from("file-1"),
            job: JobId::from("batch-1"),
        });
        summary.outcomes.push(ItemOutcome::SkippedFresh {
            name: "b.jsonl".into(),
        });
        summary.outcomes.push(ItemOutcome::Failed {
            item: "c.jsonl".into(),
            reason: "remote service returned 500".into(),
        });

        assert_eq!(summary.uploaded(), 1);
        assert_eq!(summary.downloaded(), 0);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn skipped_covers_both_skip_variants() {
        let mut summary = RunSummary::new(RunKind::Download);
        summary.outcomes.push(ItemOutcome::SkippedStatus {
            job: JobId::from("batch-1"),
            status: JobStatus::InProgress,
        });
        summary.outcomes.push(ItemOutcome::SkippedFresh {
            name: "out.jsonl".into(),
        });
        assert_eq!(summary.skipped(), 2);
    }
}
