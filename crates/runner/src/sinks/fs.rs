//! Filesystem export sink.

use std::path::PathBuf;

use domain::stores::{ExportSink, SinkError};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Writes each exported table as an NDJSON file under
/// `<root>/<destination>/<table>.ndjson`.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    /// Create a sink rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn table_path(&self, destination: &str, table: &str) -> PathBuf {
        self.root.join(destination).join(format!("{}.ndjson", table))
    }
}

#[async_trait::async_trait]
impl ExportSink for FsSink {
    async fn write_table(
        &self,
        destination: &str,
        table: &str,
        rows: &[JsonValue],
    ) -> Result<(), SinkError> {
        let path = self.table_path(destination, table);
        let dir = self.root.join(destination);

        let write_err = |message: String| SinkError::Write {
            table: table.to_string(),
            message,
        };

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| write_err(format!("create {}: {}", dir.display(), e)))?;

        let mut contents = String::new();
        for row in rows {
            let line = serde_json::to_string(row)
                .map_err(|e| write_err(format!("serialize row: {}", e)))?;
            contents.push_str(&line);
            contents.push('\n');
        }

        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| write_err(format!("write {}: {}", path.display(), e)))?;

        debug!(
            table = %table,
            rows = rows.len(),
            path = %path.display(),
            "Wrote table export"
        );
        Ok(())
    }
}
