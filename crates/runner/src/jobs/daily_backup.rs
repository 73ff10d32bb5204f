//! Daily logical backup job.

use std::time::Duration;

use domain::models::BackupResult;
use domain::services::BackupService;
use metrics::counter;
use tracing::{info, warn};

use super::lock::BackupLock;
use super::scheduler::{Job, JobSchedule};

/// Description recorded on every scheduled daily run.
const DAILY_DESCRIPTION: &str = "scheduled daily backup";

/// Background job running the critical-table backup once a day.
pub struct DailyBackupJob {
    service: BackupService,
    lock: BackupLock,
    hour: u32,
    minute: u32,
    job_timeout: Duration,
}

impl DailyBackupJob {
    /// Create a new daily backup job.
    ///
    /// # Arguments
    /// * `service` - Backup orchestrator to invoke
    /// * `lock` - Overlap guard shared with the weekly export
    /// * `hour`, `minute` - UTC wall-clock time to fire at
    /// * `job_timeout` - Deadline for one full run
    pub fn new(
        service: BackupService,
        lock: BackupLock,
        hour: u32,
        minute: u32,
        job_timeout: Duration,
    ) -> Self {
        Self {
            service,
            lock,
            hour,
            minute,
            job_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Job for DailyBackupJob {
    fn name(&self) -> &'static str {
        "daily_backup"
    }

    fn schedule(&self) -> JobSchedule {
        JobSchedule::DailyAt {
            hour: self.hour,
            minute: self.minute,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.job_timeout)
    }

    async fn execute(&self) -> Result<(), String> {
        let Some(_guard) = self.lock.try_acquire() else {
            warn!(job = "daily_backup", "Backup already in progress; skipping this cycle");
            counter!("backup_jobs_skipped_total", "job" => "daily_backup").increment(1);
            return Ok(());
        };

        // Scheduled runs are system-level: no organization scope.
        match self.service.create_backup(None, DAILY_DESCRIPTION).await {
            BackupResult::Completed { summary, .. } if summary.success => {
                info!(
                    destination = %summary.destination,
                    rows = summary.total_rows(),
                    "Daily backup completed"
                );
                Ok(())
            }
            BackupResult::Completed { summary, .. } => Err(format!(
                "backup completed with failed tables: {}",
                summary.failed_tables().join(", ")
            )),
            BackupResult::Failed { error } => Err(error),
        }
    }
}
