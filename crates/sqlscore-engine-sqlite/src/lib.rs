//! SQLite engine implementation for sqlscore.

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use sqlscore_engine::{Engine, EngineError, Row, Value};
use std::path::Path;
use std::time::Duration;

/// SQLite engine for sqlscore.
///
/// Every `fetch_all` call opens its own connection, so a hung statement can
/// never block an unrelated query. SQLite operations are synchronous, so
/// they run inside `spawn_blocking`; when the time limit expires the
/// connection's interrupt handle is fired, which aborts the in-flight
/// statement with SQLITE_INTERRUPT and unblocks the worker thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteEngine;

impl SqliteEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for SqliteEngine {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn file_extension(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch_all(
        &self,
        database: &Path,
        sql: &str,
        time_limit: Duration,
    ) -> Result<Vec<Row>, EngineError> {
        let database = database.to_owned();
        let sql = sql.to_string();
        let (handle_tx, mut handle_rx) = tokio::sync::oneshot::channel();

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<Row>, EngineError> {
            let conn = Connection::open(&database)
                .map_err(|e| EngineError::open_failed(&database, e.to_string()))?;

            // Hand the interrupt handle back before executing, so the caller
            // can abort this statement once the time limit expires.
            let _ = handle_tx.send(conn.get_interrupt_handle());

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| EngineError::execution_failed(e.to_string()))?;
            let column_count = stmt.column_count();

            let mut rows = stmt
                .query([])
                .map_err(|e| EngineError::execution_failed(e.to_string()))?;

            let mut fetched = Vec::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| EngineError::execution_failed(e.to_string()))?
            {
                let mut values = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    let value = row
                        .get_ref(idx)
                        .map_err(|e| EngineError::execution_failed(e.to_string()))?;
                    values.push(value_from_sqlite(value));
                }
                fetched.push(values);
            }

            Ok(fetched)
        });

        match tokio::time::timeout(time_limit, task).await {
            Ok(joined) => joined.map_err(|e| EngineError::Other(e.into()))?,
            Err(_) => {
                if let Ok(handle) = handle_rx.try_recv() {
                    handle.interrupt();
                }
                Err(EngineError::timed_out(time_limit))
            }
        }
    }
}

fn value_from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
