//! Log export sink.
//!
//! Records what would be delivered to the cloud destination without moving
//! any bytes off the host. Used for the weekly export until a real
//! object-storage sink is wired in; cloud delivery stays behind the
//! `ExportSink` seam either way.

use domain::stores::{ExportSink, SinkError};
use serde_json::Value as JsonValue;
use tracing::info;

/// Sink that logs table name, row count and destination only.
#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ExportSink for LogSink {
    async fn write_table(
        &self,
        destination: &str,
        table: &str,
        rows: &[JsonValue],
    ) -> Result<(), SinkError> {
        info!(
            destination = %destination,
            table = %table,
            rows = rows.len(),
            "Export delivered to log sink"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_log_sink_never_fails() {
        let sink = LogSink::new();
        let rows = vec![json!({"id": 1})];
        assert!(sink
            .write_table("s3://matchday-backups/weekly", "profiles", &rows)
            .await
            .is_ok());
        assert!(sink
            .write_table("s3://matchday-backups/weekly", "profiles", &[])
            .await
            .is_ok());
    }
}
