//! Domain models for the backup runner.

pub mod audit_event;
pub mod backup;
pub mod export;

pub use audit_event::{AuditEvent, AuditStatus, CreateAuditEventInput};
pub use backup::BackupResult;
pub use export::{ExportSummary, TableExportResult};
