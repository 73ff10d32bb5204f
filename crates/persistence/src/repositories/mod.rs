//! Repository implementations.

pub mod audit_log;
pub mod row_store;

pub use audit_log::AuditLogRepository;
pub use row_store::PgRowStore;
