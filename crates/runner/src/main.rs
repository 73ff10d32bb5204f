use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use domain::services::{AuditRecorder, BackupService, ExportService};
use domain::stores::{AuditStore, ExportSink, RowStore};
use matchday_backup_runner::config::Config;
use matchday_backup_runner::jobs::{
    BackupLock, DailyBackupJob, JobScheduler, PoolMetricsJob, WeeklyExportJob,
};
use matchday_backup_runner::logging;
use matchday_backup_runner::sinks::{FsSink, LogSink};
use persistence::repositories::{AuditLogRepository, PgRowStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting Matchday backup runner v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Start the Prometheus exporter if enabled
    if config.metrics.enabled {
        let addr: SocketAddr = config.metrics.listen_addr.parse()?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!("Prometheus exporter listening on {}", addr);
    }

    // Wire the services
    let row_store: Arc<dyn RowStore> = Arc::new(PgRowStore::new(pool.clone()));
    let audit_store: Arc<dyn AuditStore> = Arc::new(AuditLogRepository::new(pool.clone()));
    let recorder = AuditRecorder::new(audit_store);
    let table_timeout = Duration::from_secs(config.backup.table_timeout_secs);
    let job_timeout = Duration::from_secs(config.backup.job_timeout_secs);
    let output_dir = PathBuf::from(&config.backup.output_dir);

    let daily_sink: Arc<dyn ExportSink> = Arc::new(FsSink::new(output_dir.clone()));
    let daily_export = ExportService::new(Arc::clone(&row_store), daily_sink, table_timeout);
    let backup_service = BackupService::new(
        daily_export,
        recorder,
        config.backup.local_prefix.clone(),
    );

    let weekly_sink: Arc<dyn ExportSink> = match config.backup.weekly_sink.as_str() {
        "fs" => Arc::new(FsSink::new(output_dir)),
        _ => Arc::new(LogSink::new()),
    };
    let weekly_export = ExportService::new(row_store, weekly_sink, table_timeout);

    // Both triggers share one lock so runs never overlap
    let lock = BackupLock::new();

    let mut scheduler = JobScheduler::new();
    scheduler.register(DailyBackupJob::new(
        backup_service,
        lock.clone(),
        config.backup.daily_hour,
        config.backup.daily_minute,
        job_timeout,
    ));
    scheduler.register(WeeklyExportJob::new(
        weekly_export,
        config.backup.weekly_tables.clone(),
        config.backup.weekly_destination.clone(),
        lock,
        config.backup.weekday(),
        config.backup.weekly_hour,
        config.backup.weekly_minute,
        job_timeout,
    ));
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.start();

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(30)).await;

    Ok(())
}
