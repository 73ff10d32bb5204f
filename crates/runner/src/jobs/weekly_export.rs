//! Weekly cloud export job.

use std::time::Duration;

use chrono::Weekday;
use domain::services::ExportService;
use metrics::counter;
use tracing::{info, warn};

use super::lock::BackupLock;
use super::scheduler::{Job, JobSchedule};

/// Background job exporting a configured table list to the cloud destination
/// once a week. Invokes the export executor directly; no audit entry is
/// written for this path.
pub struct WeeklyExportJob {
    export: ExportService,
    tables: Vec<String>,
    destination: String,
    lock: BackupLock,
    weekday: Weekday,
    hour: u32,
    minute: u32,
    job_timeout: Duration,
}

impl WeeklyExportJob {
    /// Create a new weekly export job.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        export: ExportService,
        tables: Vec<String>,
        destination: String,
        lock: BackupLock,
        weekday: Weekday,
        hour: u32,
        minute: u32,
        job_timeout: Duration,
    ) -> Self {
        Self {
            export,
            tables,
            destination,
            lock,
            weekday,
            hour,
            minute,
            job_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Job for WeeklyExportJob {
    fn name(&self) -> &'static str {
        "weekly_export"
    }

    fn schedule(&self) -> JobSchedule {
        JobSchedule::WeeklyAt {
            weekday: self.weekday,
            hour: self.hour,
            minute: self.minute,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.job_timeout)
    }

    async fn execute(&self) -> Result<(), String> {
        let Some(_guard) = self.lock.try_acquire() else {
            warn!(job = "weekly_export", "Backup already in progress; skipping this cycle");
            counter!("backup_jobs_skipped_total", "job" => "weekly_export").increment(1);
            return Ok(());
        };

        let summary = self
            .export
            .export_tables(&self.tables, &self.destination)
            .await
            .map_err(|e| e.to_string())?;

        if summary.success {
            info!(
                destination = %summary.destination,
                tables = summary.tables.len(),
                rows = summary.total_rows(),
                "Weekly export completed"
            );
            Ok(())
        } else {
            Err(format!(
                "weekly export failed for tables: {}",
                summary.failed_tables().join(", ")
            ))
        }
    }
}
