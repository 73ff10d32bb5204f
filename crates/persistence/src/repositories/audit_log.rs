//! Audit log repository for database operations.

use domain::models::{AuditEvent, AuditStatus, CreateAuditEventInput};
use domain::stores::{AuditStore, StoreError};
use sqlx::PgPool;

use crate::entities::AuditEventEntity;
use crate::metrics::QueryTimer;

/// Repository for the append-only `audit_logs` table.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new audit event.
    pub async fn insert_event(
        &self,
        input: &CreateAuditEventInput,
    ) -> Result<AuditEvent, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_event");

        let entity = sqlx::query_as::<_, AuditEventEntity>(
            r#"
            INSERT INTO audit_logs (organization_id, event_type, status, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, event_type, status, metadata, created_at
            "#,
        )
        .bind(input.organization_id)
        .bind(&input.event_type)
        .bind(input.status.to_string())
        .bind(&input.metadata)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(entity_to_domain(entity))
    }
}

#[async_trait::async_trait]
impl AuditStore for AuditLogRepository {
    async fn insert(&self, input: &CreateAuditEventInput) -> Result<AuditEvent, StoreError> {
        self.insert_event(input)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

/// Convert entity to domain model.
fn entity_to_domain(entity: AuditEventEntity) -> AuditEvent {
    let status = entity
        .status
        .parse::<AuditStatus>()
        .unwrap_or(AuditStatus::Failure);

    AuditEvent {
        id: entity.id,
        organization_id: entity.organization_id,
        event_type: entity.event_type,
        status,
        metadata: entity.metadata,
        created_at: entity.created_at,
    }
}
