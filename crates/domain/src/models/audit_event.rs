//! Audit event domain models.
//!
//! Audit events form an append-only trail: created once per orchestrated
//! backup, never mutated, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;

/// Outcome recorded on an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(AuditStatus::Success),
            "failure" => Ok(AuditStatus::Failure),
            _ => Err(format!("Unknown audit status: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "success"),
            AuditStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Input for creating a new audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEventInput {
    /// Organization scope. `None` marks a system-level event not tied to any
    /// tenant.
    pub organization_id: Option<Uuid>,

    /// Event type, e.g. `backup_created`.
    pub event_type: String,

    /// Outcome of the audited action.
    pub status: AuditStatus,

    /// Arbitrary key/value context for the event.
    pub metadata: JsonValue,
}

impl CreateAuditEventInput {
    /// Create a new audit event input.
    pub fn new(
        organization_id: Option<Uuid>,
        event_type: impl Into<String>,
        status: AuditStatus,
        metadata: JsonValue,
    ) -> Self {
        Self {
            organization_id,
            event_type: event_type.into(),
            status,
            metadata,
        }
    }
}

/// A persisted audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier.
    pub id: Uuid,

    /// Organization scope, `None` for system-level events.
    pub organization_id: Option<Uuid>,

    /// Event type, e.g. `backup_created`.
    pub event_type: String,

    /// Outcome of the audited action.
    pub status: AuditStatus,

    /// Arbitrary key/value context.
    pub metadata: JsonValue,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
