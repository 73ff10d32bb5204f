use chrono::Weekday;
use serde::Deserialize;

pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The `[database]` section deserializes into the persistence layer's
    /// pool configuration directly.
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub backup: BackupConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Backup cadence and destination configuration.
///
/// Defaults preserve the historical schedule: daily at 02:00 UTC, weekly on
/// Sunday at 03:00 UTC.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupConfig {
    /// Hour of day (UTC) for the daily logical backup.
    #[serde(default = "default_daily_hour")]
    pub daily_hour: u32,

    /// Minute of hour for the daily logical backup.
    #[serde(default = "default_daily_minute")]
    pub daily_minute: u32,

    /// Weekday for the weekly cloud export (e.g. "sun", "monday").
    #[serde(default = "default_weekly_weekday")]
    pub weekly_weekday: String,

    /// Hour of day (UTC) for the weekly cloud export.
    #[serde(default = "default_weekly_hour")]
    pub weekly_hour: u32,

    /// Minute of hour for the weekly cloud export.
    #[serde(default = "default_weekly_minute")]
    pub weekly_minute: u32,

    /// Tables exported by the weekly run. The daily run always uses the
    /// fixed critical-table set.
    #[serde(default = "default_weekly_tables")]
    pub weekly_tables: Vec<String>,

    /// Destination URI for the weekly export.
    #[serde(default = "default_weekly_destination")]
    pub weekly_destination: String,

    /// Sink for the weekly export: "log" or "fs".
    #[serde(default = "default_weekly_sink")]
    pub weekly_sink: String,

    /// Destination prefix for daily backups.
    #[serde(default = "default_local_prefix")]
    pub local_prefix: String,

    /// Root directory the filesystem sink writes under.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Deadline for exporting a single table.
    #[serde(default = "default_table_timeout")]
    pub table_timeout_secs: u64,

    /// Deadline for a whole scheduled run.
    #[serde(default = "default_job_timeout")]
    pub job_timeout_secs: u64,
}

impl BackupConfig {
    /// Parsed weekly weekday. Falls back to Sunday; `validate` rejects
    /// unparseable values at load time.
    pub fn weekday(&self) -> Weekday {
        self.weekly_weekday.parse().unwrap_or(Weekday::Sun)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is started.
    #[serde(default)]
    pub enabled: bool,

    /// Listen address for the exporter.
    #[serde(default = "default_metrics_addr")]
    pub listen_addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_metrics_addr(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_daily_hour() -> u32 {
    2
}
fn default_daily_minute() -> u32 {
    0
}
fn default_weekly_weekday() -> String {
    "sun".to_string()
}
fn default_weekly_hour() -> u32 {
    3
}
fn default_weekly_minute() -> u32 {
    0
}
fn default_weekly_tables() -> Vec<String> {
    ["profiles", "organizations", "organization_members", "audit_logs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_weekly_destination() -> String {
    "s3://matchday-backups/weekly".to_string()
}
fn default_weekly_sink() -> String {
    "log".to_string()
}
fn default_local_prefix() -> String {
    "local_backups".to_string()
}
fn default_output_dir() -> String {
    ".".to_string()
}
fn default_table_timeout() -> u64 {
    300
}
fn default_job_timeout() -> u64 {
    3600
}
fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with MB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MB").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config entirely from embedded defaults and overrides so
    /// tests do not depend on config files being present.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [database]
            url = "postgres://localhost/matchday_test"

            [logging]
            level = "info"
            format = "json"

            [backup]
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MB__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.backup.daily_hour > 23 || self.backup.weekly_hour > 23 {
            return Err(ConfigValidationError::InvalidValue(
                "backup hours must be in 0..=23".to_string(),
            ));
        }

        if self.backup.daily_minute > 59 || self.backup.weekly_minute > 59 {
            return Err(ConfigValidationError::InvalidValue(
                "backup minutes must be in 0..=59".to_string(),
            ));
        }

        if self.backup.weekly_weekday.parse::<Weekday>().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "unrecognized weekday: {}",
                self.backup.weekly_weekday
            )));
        }

        if self.backup.weekly_tables.is_empty() {
            return Err(ConfigValidationError::InvalidValue(
                "weekly_tables cannot be empty".to_string(),
            ));
        }

        match self.backup.weekly_sink.as_str() {
            "log" | "fs" => {}
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "weekly_sink must be \"log\" or \"fs\", got \"{}\"",
                    other
                )))
            }
        }

        // The fs sink joins the destination under output_dir; a URI there
        // would become a literal directory name.
        if self.backup.weekly_sink == "fs" && self.backup.weekly_destination.contains("://") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "weekly_sink \"fs\" needs a path destination, got URI \"{}\"",
                self.backup.weekly_destination
            )));
        }

        if self.backup.table_timeout_secs == 0 || self.backup.job_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "timeouts must be positive".to_string(),
            ));
        }

        if self.backup.job_timeout_secs < self.backup.table_timeout_secs {
            return Err(ConfigValidationError::InvalidValue(
                "job_timeout_secs cannot be smaller than table_timeout_secs".to_string(),
            ));
        }

        Ok(())
    }
}
