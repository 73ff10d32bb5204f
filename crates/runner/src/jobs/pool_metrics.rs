//! Background job to record connection pool metrics.

use sqlx::PgPool;

use super::scheduler::{Job, JobSchedule};

/// Job that periodically records database connection pool metrics.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    /// Create a new pool metrics job.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn schedule(&self) -> JobSchedule {
        // Record pool metrics every 10 seconds for real-time monitoring
        JobSchedule::Every(std::time::Duration::from_secs(10))
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
