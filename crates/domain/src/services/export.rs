//! Export executor: full-table logical export to a sink.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{ExportSummary, TableExportResult};
use crate::stores::{ExportSink, RowStore};

/// Errors that abort an export run before any table is processed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No tables requested for export")]
    NoTables,
}

/// Executes logical exports: reads all rows of each requested table and
/// delivers them to the configured sink.
///
/// Tables are processed sequentially in input order. A failed table is
/// recorded in its result and does not block the remaining tables; the
/// summary's `success` flag is true only when every table exported cleanly.
#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn RowStore>,
    sink: Arc<dyn ExportSink>,
    table_timeout: Duration,
}

impl ExportService {
    /// Create a new export service.
    ///
    /// `table_timeout` bounds the fetch-and-write step of each table so a
    /// hung read cannot stall the run indefinitely.
    pub fn new(
        store: Arc<dyn RowStore>,
        sink: Arc<dyn ExportSink>,
        table_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sink,
            table_timeout,
        }
    }

    /// Export all rows of the given tables to `destination`.
    ///
    /// Returns one [`TableExportResult`] per requested table, in input order.
    /// An empty table list is a validation error, not an empty summary.
    pub async fn export_tables(
        &self,
        tables: &[String],
        destination: &str,
    ) -> Result<ExportSummary, ExportError> {
        if tables.is_empty() {
            return Err(ExportError::NoTables);
        }

        let started_at = Utc::now();
        let mut results = Vec::with_capacity(tables.len());

        for table in tables {
            let result = match tokio::time::timeout(
                self.table_timeout,
                self.export_one(table, destination),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => TableExportResult::failed(
                    table,
                    format!("timed out after {}s", self.table_timeout.as_secs()),
                ),
            };

            if let Some(error) = &result.error {
                warn!(table = %table, error = %error, "Table export failed");
            }
            results.push(result);
        }

        let success = results.iter().all(TableExportResult::succeeded);
        let summary = ExportSummary {
            destination: destination.to_string(),
            started_at,
            success,
            tables: results,
        };

        info!(
            destination = %destination,
            tables = summary.tables.len(),
            rows = summary.total_rows(),
            success = summary.success,
            "Export run finished"
        );

        Ok(summary)
    }

    /// Read one table and hand its rows to the sink. The source is never
    /// written to.
    async fn export_one(&self, table: &str, destination: &str) -> TableExportResult {
        let rows = match self.store.fetch_all_rows(table).await {
            Ok(rows) => rows,
            Err(e) => return TableExportResult::failed(table, e.to_string()),
        };

        match self.sink.write_table(destination, table, &rows).await {
            Ok(()) => TableExportResult::ok(table, rows.len() as u64),
            Err(e) => TableExportResult::failed(table, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{SinkError, StoreError};
    use serde_json::{json, Value as JsonValue};
    use tokio_test::assert_err;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory row store with injectable per-table failures.
    struct FakeStore {
        tables: HashMap<String, Vec<JsonValue>>,
        failures: HashMap<String, String>,
        delay: Option<Duration>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                tables: HashMap::new(),
                failures: HashMap::new(),
                delay: None,
            }
        }

        fn with_table(mut self, name: &str, rows: usize) -> Self {
            let rows = (0..rows).map(|i| json!({"id": i})).collect();
            self.tables.insert(name.to_string(), rows);
            self
        }

        fn with_failure(mut self, name: &str, message: &str) -> Self {
            self.failures.insert(name.to_string(), message.to_string());
            self
        }
    }

    #[async_trait::async_trait]
    impl RowStore for FakeStore {
        async fn fetch_all_rows(&self, table: &str) -> Result<Vec<JsonValue>, StoreError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = self.failures.get(table) {
                return Err(StoreError::Query(message.clone()));
            }
            self.tables
                .get(table)
                .cloned()
                .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
        }
    }

    /// Sink that records every write; optionally fails a given table.
    struct RecordingSink {
        writes: Mutex<Vec<(String, String, usize)>>,
        fail_table: Option<String>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_table: None,
            }
        }

        fn failing_on(table: &str) -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_table: Some(table.to_string()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ExportSink for RecordingSink {
        async fn write_table(
            &self,
            destination: &str,
            table: &str,
            rows: &[JsonValue],
        ) -> Result<(), SinkError> {
            if self.fail_table.as_deref() == Some(table) {
                return Err(SinkError::Write {
                    table: table.to_string(),
                    message: "destination unreachable".to_string(),
                });
            }
            self.writes.lock().unwrap().push((
                destination.to_string(),
                table.to_string(),
                rows.len(),
            ));
            Ok(())
        }
    }

    fn service(store: FakeStore, sink: RecordingSink) -> ExportService {
        ExportService::new(Arc::new(store), Arc::new(sink), Duration::from_secs(5))
    }

    fn critical_tables() -> Vec<String> {
        ["profiles", "organizations", "organization_members", "audit_logs"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_table_list_is_rejected() {
        let svc = service(FakeStore::new(), RecordingSink::new());
        let err = assert_err!(svc.export_tables(&[], "local_backups/x").await);
        assert!(matches!(err, ExportError::NoTables));
    }

    #[tokio::test]
    async fn test_one_result_per_table_in_input_order() {
        let store = FakeStore::new()
            .with_table("profiles", 10)
            .with_table("organizations", 0)
            .with_table("organization_members", 0)
            .with_table("audit_logs", 0);
        let svc = service(store, RecordingSink::new());

        let summary = svc
            .export_tables(&critical_tables(), "local_backups/2025-01-01T02-00-00-000Z")
            .await
            .unwrap();

        assert!(summary.success);
        assert_eq!(summary.tables.len(), 4);
        let names: Vec<_> = summary.tables.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(
            names,
            vec!["profiles", "organizations", "organization_members", "audit_logs"]
        );
        assert_eq!(summary.tables[0].row_count, 10);
        assert_eq!(summary.tables[1].row_count, 0);
        assert_eq!(summary.total_rows(), 10);
    }

    #[tokio::test]
    async fn test_failed_table_does_not_block_others() {
        let store = FakeStore::new()
            .with_table("profiles", 10)
            .with_table("organizations", 2)
            .with_failure("organization_members", "permission denied")
            .with_table("audit_logs", 5);
        let svc = service(store, RecordingSink::new());

        let summary = svc
            .export_tables(&critical_tables(), "local_backups/x")
            .await
            .unwrap();

        assert!(!summary.success);
        assert_eq!(summary.tables.len(), 4);
        assert_eq!(summary.tables[0].row_count, 10);
        assert_eq!(summary.tables[1].row_count, 2);
        assert!(summary.tables[2]
            .error
            .as_deref()
            .unwrap()
            .contains("permission denied"));
        assert_eq!(summary.tables[3].row_count, 5);
        assert_eq!(summary.failed_tables(), vec!["organization_members"]);
    }

    #[tokio::test]
    async fn test_unknown_table_is_a_per_table_failure() {
        let store = FakeStore::new().with_table("profiles", 1);
        let svc = service(store, RecordingSink::new());

        let tables = vec!["profiles".to_string(), "nonexistent".to_string()];
        let summary = svc.export_tables(&tables, "local_backups/x").await.unwrap();

        assert!(!summary.success);
        assert!(summary.tables[0].succeeded());
        assert!(summary.tables[1]
            .error
            .as_deref()
            .unwrap()
            .contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_sink_failure_is_recorded_per_table() {
        let store = FakeStore::new()
            .with_table("profiles", 3)
            .with_table("organizations", 1);
        let sink = RecordingSink::failing_on("profiles");
        let svc = service(store, sink);

        let tables = vec!["profiles".to_string(), "organizations".to_string()];
        let summary = svc.export_tables(&tables, "local_backups/x").await.unwrap();

        assert!(!summary.success);
        assert!(summary.tables[0]
            .error
            .as_deref()
            .unwrap()
            .contains("destination unreachable"));
        assert!(summary.tables[1].succeeded());
    }

    #[tokio::test]
    async fn test_sink_receives_destination_and_rows() {
        let store = FakeStore::new().with_table("profiles", 7);
        let sink = Arc::new(RecordingSink::new());
        let svc = ExportService::new(
            Arc::new(store),
            Arc::clone(&sink) as Arc<dyn ExportSink>,
            Duration::from_secs(5),
        );

        svc.export_tables(&["profiles".to_string()], "s3://bucket/weekly")
            .await
            .unwrap();

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0], ("s3://bucket/weekly".to_string(), "profiles".to_string(), 7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_table_times_out_and_run_continues() {
        let mut store = FakeStore::new()
            .with_table("profiles", 1)
            .with_table("organizations", 1);
        store.delay = Some(Duration::from_secs(30));
        let svc = ExportService::new(
            Arc::new(store),
            Arc::new(RecordingSink::new()),
            Duration::from_secs(1),
        );

        let tables = vec!["profiles".to_string(), "organizations".to_string()];
        let summary = svc.export_tables(&tables, "local_backups/x").await.unwrap();

        assert!(!summary.success);
        assert_eq!(summary.tables.len(), 2);
        for table in &summary.tables {
            assert!(table.error.as_deref().unwrap().contains("timed out"));
        }
    }
}
