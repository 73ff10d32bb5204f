//! Backup orchestrator: critical-table export plus audit trail.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{AuditStatus, BackupResult, CreateAuditEventInput};
use crate::services::export::ExportService;
use crate::services::AuditRecorder;

/// Tables that must be present in every daily backup, in export order.
/// The order is fixed so logs and destinations stay reproducible.
pub const CRITICAL_TABLES: [&str; 4] = [
    "profiles",
    "organizations",
    "organization_members",
    "audit_logs",
];

/// Audit event type written after each orchestrated backup.
pub const BACKUP_CREATED_EVENT: &str = "backup_created";

/// Orchestrates a full backup of the critical table set.
///
/// Fail-soft by contract: `create_backup` never returns an error, so a
/// scheduled invocation can never crash its host. Export failures surface in
/// the returned [`BackupResult`]; audit failures are swallowed by the
/// recorder.
#[derive(Clone)]
pub struct BackupService {
    export: ExportService,
    audit: AuditRecorder,
    destination_prefix: String,
}

impl BackupService {
    /// Create a new backup service.
    ///
    /// `destination_prefix` namespaces each run's destination, e.g.
    /// `local_backups`.
    pub fn new(
        export: ExportService,
        audit: AuditRecorder,
        destination_prefix: impl Into<String>,
    ) -> Self {
        Self {
            export,
            audit,
            destination_prefix: destination_prefix.into(),
        }
    }

    /// Run a logical backup of the critical table set.
    ///
    /// Two calls with identical arguments produce two independent runs and
    /// two independent audit events; nothing is deduplicated.
    pub async fn create_backup(
        &self,
        organization_id: Option<Uuid>,
        description: &str,
    ) -> BackupResult {
        let tables: Vec<String> = CRITICAL_TABLES.iter().map(|s| s.to_string()).collect();
        let destination = self.destination_for(Utc::now());

        info!(destination = %destination, description = %description, "Starting logical backup");

        let summary = match self.export.export_tables(&tables, &destination).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "Backup could not run");
                return BackupResult::failed(e.to_string());
            }
        };

        let status = if summary.success {
            AuditStatus::Success
        } else {
            AuditStatus::Failure
        };

        let row_counts: serde_json::Map<String, serde_json::Value> = summary
            .tables
            .iter()
            .map(|t| (t.table.clone(), json!(t.row_count)))
            .collect();

        let metadata = json!({
            "description": description,
            "tables": CRITICAL_TABLES,
            "destination": destination,
            "started_at": summary.started_at.to_rfc3339(),
            "row_counts": row_counts,
            "failed_tables": summary.failed_tables(),
        });

        self.audit
            .record(CreateAuditEventInput::new(
                organization_id,
                BACKUP_CREATED_EVENT,
                status,
                metadata,
            ))
            .await;

        BackupResult::completed(summary)
    }

    /// Destination for a run started at `ts`: the configured prefix plus an
    /// RFC 3339 timestamp with path-hostile characters substituted.
    fn destination_for(&self, ts: DateTime<Utc>) -> String {
        let stamp = ts
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("{}/{}", self.destination_prefix, stamp)
    }
}
