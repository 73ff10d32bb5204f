//! Audit event entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for audit log rows.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEventEntity {
    /// Unique identifier.
    pub id: Uuid,

    /// Organization this event belongs to; NULL for system-level events.
    pub organization_id: Option<Uuid>,

    /// Event type (e.g. `backup_created`).
    pub event_type: String,

    /// Outcome of the audited action (`success` or `failure`).
    pub status: String,

    /// Arbitrary event context.
    pub metadata: serde_json::Value,

    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_event_entity_creation() {
        let entity = AuditEventEntity {
            id: Uuid::new_v4(),
            organization_id: Some(Uuid::new_v4()),
            event_type: "backup_created".to_string(),
            status: "success".to_string(),
            metadata: serde_json::json!({
                "tables": ["profiles", "organizations"],
                "destination": "local_backups/2025-01-01T02-00-00-000Z"
            }),
            created_at: Utc::now(),
        };

        assert_eq!(entity.event_type, "backup_created");
        assert_eq!(entity.status, "success");
        assert!(entity.organization_id.is_some());
    }
}
