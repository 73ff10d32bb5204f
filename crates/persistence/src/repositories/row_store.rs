//! PostgreSQL row store for full-table logical reads.

use domain::stores::{RowStore, StoreError};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Undefined-table SQLSTATE code.
const UNDEFINED_TABLE: &str = "42P01";

/// Reads entire tables as JSON documents.
///
/// Table names are interpolated into the query text, so they are validated
/// as plain identifiers first; anything else is rejected before touching the
/// database.
#[derive(Clone)]
pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    /// Create a new row store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Accepts unquoted PostgreSQL identifiers only: leading letter or
/// underscore, then letters, digits or underscores, at most 63 bytes.
fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > 63 {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait::async_trait]
impl RowStore for PgRowStore {
    async fn fetch_all_rows(&self, table: &str) -> Result<Vec<JsonValue>, StoreError> {
        if !is_valid_identifier(table) {
            return Err(StoreError::InvalidTableName(table.to_string()));
        }

        let timer = QueryTimer::new("fetch_table_rows");
        let sql = format!(r#"SELECT row_to_json(t) FROM "{}" t"#, table);

        let rows = sqlx::query_scalar::<_, JsonValue>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNDEFINED_TABLE) => {
                    StoreError::UnknownTable(table.to_string())
                }
                _ => StoreError::Query(e.to_string()),
            })?;

        timer.record();
        tracing::debug!(table = %table, rows = rows.len(), "Fetched table rows");
        Ok(rows)
    }
}
