use crate::runner::{QueryOutcome, QueryRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Default worker pool size per batch.
pub const DEFAULT_CONCURRENCY: usize = 120;

/// One unit of work: a SQL statement and the database it runs against.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub sql: String,
    pub database: PathBuf,
}

/// A query outcome tagged with the submission index of its item.
#[derive(Debug, Clone)]
pub struct IndexedOutcome {
    pub index: usize,
    pub outcome: QueryOutcome,
}

/// Fans a batch of items out across a bounded worker pool.
pub struct BatchExecutor {
    runner: QueryRunner,
    concurrency: usize,
}

impl BatchExecutor {
    pub fn new(runner: QueryRunner, concurrency: usize) -> Self {
        Self {
            runner,
            concurrency: concurrency.max(1),
        }
    }

    /// Run every item to completion and return one outcome per item, in
    /// completion order.
    ///
    /// Items execute independently: a timeout or error on one item never
    /// cancels or delays another. The returned vector is the only structure
    /// workers write into, and it is owned by this call.
    pub async fn run_batch(&self, items: Vec<BatchItem>) -> Vec<IndexedOutcome> {
        let total = items.len();
        debug!(items = total, concurrency = self.concurrency, "executing batch");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let runner = self.runner.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                let outcome = runner.run(&item.database, &item.sql).await;
                IndexedOutcome { index, outcome }
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                // The runner absorbs all query failures; only a panic lands
                // here, and it is confined to its own item.
                Err(err) => error!(error = %err, "batch worker failed"),
            }
        }
        results
    }
}

/// Restore the submission order of an unordered completion stream.
pub fn sort_by_index(mut results: Vec<IndexedOutcome>) -> Vec<IndexedOutcome> {
    results.sort_by_key(|result| result.index);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::DEFAULT_TIME_LIMIT;
    use sqlscore_engine::Value;
    use sqlscore_engine_sqlite::SqliteEngine;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn seed_database(path: &std::path::Path) {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (7);")
            .unwrap();
    }

    fn executor(concurrency: usize) -> BatchExecutor {
        let runner = QueryRunner::new(Arc::new(SqliteEngine::new()), DEFAULT_TIME_LIMIT);
        BatchExecutor::new(runner, concurrency)
    }

    #[tokio::test]
    async fn test_batch_returns_every_index_exactly_once() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");
        seed_database(&db_path);

        let items: Vec<BatchItem> = (0..25)
            .map(|i| BatchItem {
                sql: format!("SELECT v + {} FROM t", i),
                database: db_path.clone(),
            })
            .collect();

        let results = executor(4).run_batch(items).await;

        assert_eq!(results.len(), 25);
        let indices: HashSet<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..25).collect());
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_item() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");
        seed_database(&db_path);

        let items = vec![
            BatchItem {
                sql: "SELECT v FROM t".to_string(),
                database: db_path.clone(),
            },
            BatchItem {
                sql: "SELECT v FROM no_such_table".to_string(),
                database: db_path.clone(),
            },
            BatchItem {
                sql: "SELECT v * 2 FROM t".to_string(),
                database: db_path.clone(),
            },
        ];

        let results = sort_by_index(executor(2).run_batch(items).await);

        assert!(matches!(&results[0].outcome, QueryOutcome::Rows(rows) if rows == &vec![vec![Value::Integer(7)]]));
        assert!(matches!(&results[1].outcome, QueryOutcome::Error(_)));
        assert!(matches!(&results[2].outcome, QueryOutcome::Rows(rows) if rows == &vec![vec![Value::Integer(14)]]));
    }

    #[tokio::test]
    async fn test_sort_by_index_is_idempotent() {
        let unordered = vec![
            IndexedOutcome {
                index: 2,
                outcome: QueryOutcome::Timeout,
            },
            IndexedOutcome {
                index: 0,
                outcome: QueryOutcome::Timeout,
            },
            IndexedOutcome {
                index: 1,
                outcome: QueryOutcome::Timeout,
            },
        ];

        let sorted = sort_by_index(unordered);
        let indices: Vec<usize> = sorted.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let sorted_again = sort_by_index(sorted);
        let indices: Vec<usize> = sorted_again.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
