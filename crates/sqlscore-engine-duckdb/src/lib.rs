//! DuckDB engine implementation for sqlscore.

use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::Connection;
use sqlscore_engine::{Engine, EngineError, Row, Value};
use std::path::Path;
use std::time::Duration;

/// DuckDB engine for sqlscore.
///
/// Every `fetch_all` call opens its own connection. DuckDB operations are
/// synchronous, so they run inside `spawn_blocking`; DuckDB offers no
/// interrupt handle, so when the time limit expires the blocking task is
/// disowned — its private connection is dropped whenever the statement
/// eventually returns, and the caller is never left blocked.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDbEngine;

impl DuckDbEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for DuckDbEngine {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn file_extension(&self) -> &'static str {
        "duckdb"
    }

    async fn fetch_all(
        &self,
        database: &Path,
        sql: &str,
        time_limit: Duration,
    ) -> Result<Vec<Row>, EngineError> {
        let database = database.to_owned();
        let sql = sql.to_string();

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<Row>, EngineError> {
            let conn = Connection::open(&database)
                .map_err(|e| EngineError::open_failed(&database, e.to_string()))?;

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| EngineError::execution_failed(e.to_string()))?;

            let mut rows = stmt
                .query([])
                .map_err(|e| EngineError::execution_failed(e.to_string()))?;

            let mut fetched = Vec::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| EngineError::execution_failed(e.to_string()))?
            {
                // Probe columns by index; DuckDB only exposes result arity
                // reliably through the rows themselves.
                let mut values = Vec::new();
                let mut idx = 0;
                while let Ok(value) = row.get_ref(idx) {
                    values.push(value_from_duckdb(value));
                    idx += 1;
                }
                fetched.push(values);
            }

            Ok(fetched)
        });

        match tokio::time::timeout(time_limit, task).await {
            Ok(joined) => joined.map_err(|e| EngineError::Other(e.into()))?,
            Err(_) => Err(EngineError::timed_out(time_limit)),
        }
    }
}

fn value_from_duckdb(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(v) => Value::Integer(v as i64),
        ValueRef::TinyInt(v) => Value::Integer(v as i64),
        ValueRef::SmallInt(v) => Value::Integer(v as i64),
        ValueRef::Int(v) => Value::Integer(v as i64),
        ValueRef::BigInt(v) => Value::Integer(v),
        ValueRef::UTinyInt(v) => Value::Integer(v as i64),
        ValueRef::USmallInt(v) => Value::Integer(v as i64),
        ValueRef::UInt(v) => Value::Integer(v as i64),
        ValueRef::Float(v) => Value::Real(v as f64),
        ValueRef::Double(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        // Temporal, decimal, and nested types stringify through their debug
        // form; set comparison only needs a stable representation.
        other => Value::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TIME_LIMIT: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_fetch_all_rows() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.duckdb");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE users (id INTEGER, name TEXT);
                 INSERT INTO users VALUES (1, 'alice'), (2, 'bob');",
            )
            .unwrap();
        }

        let engine = DuckDbEngine::new();
        let rows = engine
            .fetch_all(&db_path, "SELECT id, name FROM users ORDER BY id", TIME_LIMIT)
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![
                vec![Value::Integer(1), Value::Text("alice".to_string())],
                vec![Value::Integer(2), Value::Text("bob".to_string())],
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_sql_is_execution_failed() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.duckdb");

        let engine = DuckDbEngine::new();
        let err = engine
            .fetch_all(&db_path, "SELEC 1", TIME_LIMIT)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::ExecutionFailed { .. }));
    }
}
