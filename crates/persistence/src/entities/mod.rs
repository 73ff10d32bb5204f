//! Database entities (row mappings).

pub mod audit_event;

pub use audit_event::AuditEventEntity;
