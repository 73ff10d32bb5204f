//! Background job scheduler and job implementations.

mod daily_backup;
mod lock;
mod pool_metrics;
mod scheduler;
mod weekly_export;

pub use daily_backup::DailyBackupJob;
pub use lock::{BackupLock, BackupLockGuard};
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobSchedule, JobScheduler};
pub use weekly_export::WeeklyExportJob;
