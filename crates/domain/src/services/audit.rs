//! Audit recorder: fail-silent persistence of audit events.

use std::sync::Arc;

use tracing::{debug, error};

use crate::models::CreateAuditEventInput;
use crate::stores::AuditStore;

/// Records audit events without ever surfacing an error.
///
/// Audit logging must not break the job that triggered it: persistence
/// failures are logged and swallowed, and callers get no success signal.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    /// Create a new recorder backed by the given store.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Persist an audit event, swallowing any failure.
    ///
    /// Events without an organization scope are system-level and are not
    /// persisted; the store is not touched for them.
    pub async fn record(&self, input: CreateAuditEventInput) {
        if input.organization_id.is_none() {
            debug!(
                event_type = %input.event_type,
                "Skipping audit persistence for system-level event"
            );
            return;
        }

        if let Err(e) = self.store.insert(&input).await {
            error!(
                event_type = %input.event_type,
                error = %e,
                "Failed to persist audit event"
            );
        }
    }
}
