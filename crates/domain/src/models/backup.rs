//! Backup orchestration result model.

use serde::{Deserialize, Serialize};

use super::export::ExportSummary;

/// Result of one orchestrated backup run.
///
/// A typed union instead of a thrown error: the orchestrator is fail-soft and
/// callers distinguish full success, partial failure and outright failure
/// through this value, never through exceptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BackupResult {
    /// The export ran to completion. `summary.success` distinguishes a clean
    /// run from one with per-table failures.
    Completed {
        /// Backup kind; always `logical` for row-level exports.
        kind: String,
        summary: ExportSummary,
    },

    /// The backup could not run at all.
    Failed { error: String },
}

impl BackupResult {
    /// Backup kind for row-level table exports.
    pub const KIND_LOGICAL: &'static str = "logical";

    /// A completed logical backup.
    pub fn completed(summary: ExportSummary) -> Self {
        BackupResult::Completed {
            kind: Self::KIND_LOGICAL.to_string(),
            summary,
        }
    }

    /// A backup that never produced a summary.
    pub fn failed(error: impl Into<String>) -> Self {
        BackupResult::Failed {
            error: error.into(),
        }
    }

    /// True only for a completed run with every table exported.
    pub fn is_success(&self) -> bool {
        matches!(self, BackupResult::Completed { summary, .. } if summary.success)
    }
}
