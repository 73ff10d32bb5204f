//! Backup, export and audit service logic.

pub mod audit;
pub mod backup;
pub mod export;

pub use audit::AuditRecorder;
pub use backup::BackupService;
pub use export::{ExportError, ExportService};
