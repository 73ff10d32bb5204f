//! Job scheduler infrastructure for background tasks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc, Weekday};
use metrics::counter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// When a job should fire.
#[derive(Debug, Clone, Copy)]
pub enum JobSchedule {
    /// Run on a fixed interval, first run one interval after start.
    Every(Duration),
    /// Run once a day at the given UTC wall-clock time.
    DailyAt { hour: u32, minute: u32 },
    /// Run once a week at the given UTC weekday and wall-clock time.
    WeeklyAt {
        weekday: Weekday,
        hour: u32,
        minute: u32,
    },
}

impl JobSchedule {
    /// Time until the next firing, measured from `now`.
    ///
    /// Wall-clock variants never fire immediately: a target equal to `now`
    /// schedules the following day or week.
    pub fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        match self {
            JobSchedule::Every(interval) => *interval,
            JobSchedule::DailyAt { hour, minute } => {
                let today = at_time(now, *hour, *minute);
                let target = if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                };
                to_std(target - now)
            }
            JobSchedule::WeeklyAt {
                weekday,
                hour,
                minute,
            } => {
                let days_ahead = (weekday.num_days_from_monday() + 7
                    - now.weekday().num_days_from_monday())
                    % 7;
                let candidate =
                    at_time(now + ChronoDuration::days(i64::from(days_ahead)), *hour, *minute);
                let target = if candidate > now {
                    candidate
                } else {
                    candidate + ChronoDuration::days(7)
                };
                to_std(target - now)
            }
        }
    }
}

/// `now` moved to the given wall-clock time on the same date. Hour and
/// minute are validated at config load, so out-of-range values cannot reach
/// this point; the fallback keeps the arithmetic total anyway.
fn at_time(now: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(hour, minute, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

fn to_std(delta: ChronoDuration) -> Duration {
    delta.to_std().unwrap_or(Duration::ZERO)
}

/// Trait for implementing background jobs.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// The name of this job (used for logging and metrics).
    fn name(&self) -> &'static str;

    /// When this job should run.
    fn schedule(&self) -> JobSchedule;

    /// Optional deadline for one execution. A run exceeding it is treated as
    /// a failed run; the timer keeps firing either way.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Execute the job. Returns Ok(()) on success, Err with message on failure.
    async fn execute(&self) -> Result<(), String>;
}

/// Background job scheduler.
///
/// One tokio task per registered job. A failed or timed-out run is logged
/// and counted; it never stops the timer or the host process.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    /// Create a new job scheduler.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Register a job with the scheduler.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Start all registered jobs. Callers must start the scheduler at most
    /// once; a second start would double-register the timers.
    pub fn start(&mut self) {
        info!("Starting job scheduler with {} jobs", self.jobs.len());

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let schedule = job.schedule();

                info!(job = name, schedule = ?schedule, "Job scheduled");

                loop {
                    let delay = schedule.next_delay(Utc::now());

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            run_job(job.as_ref()).await;
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Initiate graceful shutdown of all jobs.
    /// Returns immediately after signaling shutdown.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all jobs to complete with timeout.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        info!("Waiting for jobs to complete (timeout: {:?})", timeout);

        let shutdown_future = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, shutdown_future).await {
            Ok(()) => info!("All jobs completed gracefully"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}

/// Run one job invocation at the trigger boundary: apply the deadline, log
/// the outcome, count it, and recover from any failure.
async fn run_job(job: &dyn Job) {
    let name = job.name();
    let start = std::time::Instant::now();
    info!(job = name, "Job starting");

    let result = match job.timeout() {
        Some(limit) => match tokio::time::timeout(limit, job.execute()).await {
            Ok(result) => result,
            Err(_) => Err(format!("timed out after {}s", limit.as_secs())),
        },
        None => job.execute().await,
    };

    let elapsed = start.elapsed();
    match result {
        Ok(()) => {
            counter!("backup_jobs_total", "job" => name, "outcome" => "success").increment(1);
            info!(
                job = name,
                elapsed_ms = elapsed.as_millis(),
                "Job completed successfully"
            );
        }
        Err(e) => {
            counter!("backup_jobs_total", "job" => name, "outcome" => "failure").increment(1);
            error!(
                job = name,
                elapsed_ms = elapsed.as_millis(),
                error = %e,
                "Job failed"
            );
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestJob {
        run_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Job for TestJob {
        fn name(&self) -> &'static str {
            "test_job"
        }

        fn schedule(&self) -> JobSchedule {
            JobSchedule::Every(Duration::from_millis(50))
        }

        async fn execute(&self) -> Result<(), String> {
            self.run_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err("Test failure".to_string())
            } else {
                Ok(())
            }
        }
    }

    /// Job that sleeps longer than its deadline.
    struct SlowJob;

    #[async_trait::async_trait]
    impl Job for SlowJob {
        fn name(&self) -> &'static str {
            "slow_job"
        }

        fn schedule(&self) -> JobSchedule {
            JobSchedule::Every(Duration::from_secs(3600))
        }

        fn timeout(&self) -> Option<Duration> {
            Some(Duration::from_millis(10))
        }

        async fn execute(&self) -> Result<(), String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[test]
    fn test_every_schedule_delay_is_fixed() {
        let schedule = JobSchedule::Every(Duration::from_secs(30));
        assert_eq!(schedule.next_delay(Utc::now()), Duration::from_secs(30));
    }

    #[test]
    fn test_daily_schedule_later_today() {
        // 2025-01-01 was a Wednesday.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap();
        let schedule = JobSchedule::DailyAt { hour: 2, minute: 0 };
        assert_eq!(schedule.next_delay(now), Duration::from_secs(3600));
    }

    #[test]
    fn test_daily_schedule_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap();
        let schedule = JobSchedule::DailyAt { hour: 2, minute: 0 };
        // Exactly at the target fires next day, never immediately.
        assert_eq!(schedule.next_delay(now), Duration::from_secs(86400));
    }

    #[test]
    fn test_weekly_schedule_targets_next_sunday() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let schedule = JobSchedule::WeeklyAt {
            weekday: Weekday::Sun,
            hour: 3,
            minute: 0,
        };
        // Wednesday noon to Sunday 03:00 is 3 days and 15 hours.
        let expected = Duration::from_secs((3 * 24 + 15) * 3600);
        assert_eq!(schedule.next_delay(now), expected);
    }

    #[test]
    fn test_weekly_schedule_same_day_past_time_rolls_a_week() {
        // Sunday 2025-01-05 at 04:00, target Sunday 03:00.
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 4, 0, 0).unwrap();
        let schedule = JobSchedule::WeeklyAt {
            weekday: Weekday::Sun,
            hour: 3,
            minute: 0,
        };
        let expected = Duration::from_secs(7 * 86400 - 3600);
        assert_eq!(schedule.next_delay(now), expected);
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = JobScheduler::new();
        assert!(scheduler.jobs.is_empty());
        assert!(scheduler.handles.is_empty());
    }

    #[test]
    fn test_scheduler_register() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(TestJob {
            run_count: Arc::new(AtomicUsize::new(0)),
            should_fail: false,
        });
        assert_eq!(scheduler.jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_scheduler_runs_and_shuts_down() {
        let mut scheduler = JobScheduler::new();
        let run_count = Arc::new(AtomicUsize::new(0));
        scheduler.register(TestJob {
            run_count: Arc::clone(&run_count),
            should_fail: false,
        });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(200)).await;

        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;

        assert!(run_count.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_failing_job_keeps_timer_alive() {
        let mut scheduler = JobScheduler::new();
        let run_count = Arc::new(AtomicUsize::new(0));
        scheduler.register(TestJob {
            run_count: Arc::clone(&run_count),
            should_fail: true,
        });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(250)).await;

        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;

        // Failures did not stop subsequent cycles.
        assert!(run_count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_deadline_converts_hang_into_failure() {
        // run_job must come back despite the 60s sleep inside the job.
        run_job(&SlowJob).await;
    }
}
