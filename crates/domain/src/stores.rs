//! Collaborator traits consumed by the backup services.
//!
//! The services only depend on these seams; production implementations live
//! in the persistence crate and the runner's sink modules, tests substitute
//! in-memory doubles.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::models::{AuditEvent, CreateAuditEventInput};

/// Errors surfaced by the backing row/audit store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors surfaced by an export sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink write failed for table {table}: {message}")]
    Write { table: String, message: String },
}

/// Read-only access to all rows of a named table.
#[async_trait::async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch every row of `table` as a JSON document.
    ///
    /// An unrecognized table name is an error on that table only; callers
    /// treat it as a per-table failure.
    async fn fetch_all_rows(&self, table: &str) -> Result<Vec<JsonValue>, StoreError>;
}

/// Destination abstraction receiving exported rows.
///
/// `destination` is an opaque location string understood by the sink
/// implementation (a filesystem path, an object-storage URI, a log stream).
#[async_trait::async_trait]
pub trait ExportSink: Send + Sync {
    /// Deliver the full row set of one table to `destination`.
    async fn write_table(
        &self,
        destination: &str,
        table: &str,
        rows: &[JsonValue],
    ) -> Result<(), SinkError>;
}

/// Append-only audit event persistence.
#[async_trait::async_trait]
pub trait AuditStore: Send + Sync {
    /// Insert a new audit event and return the persisted record.
    async fn insert(&self, input: &CreateAuditEventInput) -> Result<AuditEvent, StoreError>;
}
