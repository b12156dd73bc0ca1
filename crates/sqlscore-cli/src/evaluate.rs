use crate::accuracy::{compare, AccuracyReport};
use crate::batch::{sort_by_index, BatchExecutor, BatchItem, DEFAULT_CONCURRENCY};
use crate::errors::EvalError;
use crate::runner::{QueryRunner, DEFAULT_TIME_LIMIT};
use sqlscore_engine::Engine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One gold example: the reference query and the database it runs against.
#[derive(Debug, Clone)]
pub struct GoldExample {
    pub query: String,
    pub db_id: String,
    pub db_root: PathBuf,
}

impl GoldExample {
    /// Resolved location of this example's database file:
    /// `db_root/db_id/db_id.<extension>`.
    pub fn database_placement(&self, extension: &str) -> PathBuf {
        self.db_root
            .join(&self.db_id)
            .join(format!("{}.{}", self.db_id, extension))
    }
}

/// Evaluation options.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Worker pool size shared by all items of one batch.
    pub concurrency: usize,
    /// Wall-clock bound per query.
    pub time_limit: Duration,
    /// Strip a leading `"<db_id> | "` prefix from every prediction.
    pub strip_db_id_prefix: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            time_limit: DEFAULT_TIME_LIMIT,
            strip_db_id_prefix: false,
        }
    }
}

/// Runs predictions and gold queries through the execution pipeline and
/// scores them.
pub struct Evaluator {
    engine: Arc<dyn Engine>,
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(engine: Arc<dyn Engine>, options: EvalOptions) -> Self {
        Self { engine, options }
    }

    /// Score `predictions` against `golds` by executing both sides and
    /// comparing result sets positionally.
    ///
    /// The prediction batch runs first and fully drains before the gold
    /// batch is submitted; the two runs never interleave. Both run against
    /// the placements derived from the gold examples.
    pub async fn evaluate(
        &self,
        predictions: &[String],
        golds: &[GoldExample],
    ) -> Result<AccuracyReport, EvalError> {
        if predictions.len() != golds.len() {
            return Err(EvalError::LengthMismatch {
                predictions: predictions.len(),
                golds: golds.len(),
            });
        }

        let extension = self.engine.file_extension();
        let placements: Vec<PathBuf> = golds
            .iter()
            .map(|gold| gold.database_placement(extension))
            .collect();

        let runner = QueryRunner::new(Arc::clone(&self.engine), self.options.time_limit);
        let executor = BatchExecutor::new(runner, self.options.concurrency);

        let predicted_items = predictions
            .iter()
            .zip(&placements)
            .map(|(prediction, database)| BatchItem {
                sql: self.clean_prediction(prediction).to_string(),
                database: database.clone(),
            })
            .collect();
        info!(examples = golds.len(), "executing prediction batch");
        let predicted = sort_by_index(executor.run_batch(predicted_items).await);

        let gold_items = golds
            .iter()
            .zip(&placements)
            .map(|(gold, database)| BatchItem {
                sql: gold.query.clone(),
                database: database.clone(),
            })
            .collect();
        info!(examples = golds.len(), "executing gold batch");
        let gold_results = sort_by_index(executor.run_batch(gold_items).await);

        compare(&gold_results, &predicted)
    }

    fn clean_prediction<'a>(&self, prediction: &'a str) -> &'a str {
        if self.options.strip_db_id_prefix {
            strip_db_id_prefix(prediction)
        } else {
            prediction
        }
    }
}

/// Drop the `"<db_id> | "` prefix some seq2seq outputs carry: split on the
/// first `|`, keep the trailing part, trim. A prediction without `|` passes
/// through trimmed.
pub fn strip_db_id_prefix(prediction: &str) -> &str {
    match prediction.split_once('|') {
        Some((_, sql)) => sql.trim(),
        None => prediction.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_db_id_prefix() {
        assert_eq!(strip_db_id_prefix("dbid123 | SELECT 1"), "SELECT 1");
        assert_eq!(strip_db_id_prefix("  SELECT 1  "), "SELECT 1");
        assert_eq!(
            strip_db_id_prefix("db | SELECT a FROM t WHERE b = '|'"),
            "SELECT a FROM t WHERE b = '|'"
        );
    }

    #[test]
    fn test_database_placement() {
        let gold = GoldExample {
            query: "SELECT 1".to_string(),
            db_id: "concert_singer".to_string(),
            db_root: PathBuf::from("/data/databases"),
        };

        assert_eq!(
            gold.database_placement("sqlite"),
            PathBuf::from("/data/databases/concert_singer/concert_singer.sqlite")
        );
    }
}
