use sqlscore_engine::{Engine, Row};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Default wall-clock bound per query.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Tagged result of running one query.
///
/// `Timeout` and `Error` replace the fabricated one-element sentinel rows
/// the comparison scheme was originally built on; their comparability is
/// preserved by [`QueryOutcome::set_eq`].
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The statement completed; all fetched rows, in fetch order.
    Rows(Vec<Row>),
    /// The statement exceeded the time limit.
    Timeout,
    /// The statement failed; the engine's error message.
    Error(String),
}

impl QueryOutcome {
    /// The equality rule used for scoring.
    ///
    /// Row collections compare as sets: duplicates collapse and row order is
    /// irrelevant. `Timeout` only matches `Timeout`, and `Error` matches
    /// `Error` regardless of message — two sides failing identically count
    /// as equal, exactly like matching sentinel rows.
    pub fn set_eq(&self, other: &QueryOutcome) -> bool {
        match (self, other) {
            (QueryOutcome::Rows(a), QueryOutcome::Rows(b)) => {
                let a: HashSet<&Row> = a.iter().collect();
                let b: HashSet<&Row> = b.iter().collect();
                a == b
            }
            (QueryOutcome::Timeout, QueryOutcome::Timeout) => true,
            (QueryOutcome::Error(_), QueryOutcome::Error(_)) => true,
            _ => false,
        }
    }
}

/// Executes one SQL statement against one database file.
#[derive(Clone)]
pub struct QueryRunner {
    engine: Arc<dyn Engine>,
    time_limit: Duration,
}

impl QueryRunner {
    pub fn new(engine: Arc<dyn Engine>, time_limit: Duration) -> Self {
        Self { engine, time_limit }
    }

    /// Run `sql` against `database` and absorb every failure into the
    /// outcome. Timeouts and execution errors are data, not errors: the
    /// batch must always complete with one outcome per submitted item.
    pub async fn run(&self, database: &Path, sql: &str) -> QueryOutcome {
        match self.engine.fetch_all(database, sql, self.time_limit).await {
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(err) if err.is_timeout() => QueryOutcome::Timeout,
            Err(err) => {
                error!(sql, error = %err, "query execution failed");
                QueryOutcome::Error(err.to_string())
            }
        }
    }
}
