//! Engine trait and row types for sqlscore execution engines.
//!
//! This crate defines the abstract interface that all sqlscore engines must
//! implement, enabling multi-engine support (SQLite, DuckDB, etc.).

mod error;
mod types;

pub use error::EngineError;
pub use types::{Row, Value};

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Abstract interface for sqlscore execution engines.
///
/// Engines are responsible for:
/// - Opening a database file, executing one statement, fetching all rows,
///   and closing the connection again — once per call, no pooling
/// - Enforcing the wall-clock time limit with whatever abort mechanism the
///   underlying engine offers
/// - Reporting the file extension used to derive database placements
#[async_trait]
pub trait Engine: Send + Sync {
    /// Short engine identifier ("sqlite", "duckdb").
    fn name(&self) -> &'static str;

    /// File extension of database files this engine reads, without the dot.
    ///
    /// Placements are derived as `root/db_id/db_id.<extension>`.
    fn file_extension(&self) -> &'static str;

    /// Open the database at `database`, execute `sql` as a single statement,
    /// fetch all result rows, and close the connection.
    ///
    /// A fresh connection is opened on every call so that a hung statement
    /// can never block an unrelated query. Execution past `time_limit` must
    /// return [`EngineError::TimedOut`] without leaving the caller blocked.
    async fn fetch_all(
        &self,
        database: &Path,
        sql: &str,
        time_limit: Duration,
    ) -> Result<Vec<Row>, EngineError>;
}
