//! Per-table and per-job export result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of exporting a single table.
///
/// Owned by the [`ExportSummary`] of the job that produced it; results are
/// never shared across jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableExportResult {
    /// Table name as requested by the caller.
    pub table: String,

    /// Number of rows handed to the sink. Zero when the table failed.
    pub row_count: u64,

    /// Error message when the read or the sink write failed.
    pub error: Option<String>,
}

impl TableExportResult {
    /// A table that exported cleanly.
    pub fn ok(table: impl Into<String>, row_count: u64) -> Self {
        Self {
            table: table.into(),
            row_count,
            error: None,
        }
    }

    /// A table whose read or sink write failed.
    pub fn failed(table: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            row_count: 0,
            error: Some(error.into()),
        }
    }

    /// Whether this table exported without error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate outcome of one export run.
///
/// Carries exactly one [`TableExportResult`] per requested table, in the
/// order the tables were requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Logical destination the rows were written to.
    pub destination: String,

    /// When the export run started.
    pub started_at: DateTime<Utc>,

    /// True only if every requested table exported without error.
    pub success: bool,

    /// Per-table results, in input order.
    pub tables: Vec<TableExportResult>,
}

impl ExportSummary {
    /// Total rows exported across all tables.
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.row_count).sum()
    }

    /// Names of the tables that failed, in input order.
    pub fn failed_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| !t.succeeded())
            .map(|t| t.table.as_str())
            .collect()
    }
}
