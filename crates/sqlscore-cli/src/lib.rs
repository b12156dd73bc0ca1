pub mod accuracy;
pub mod batch;
pub mod dataset;
pub mod errors;
pub mod evaluate;
pub mod runner;

pub use accuracy::{compare, AccuracyReport};
pub use batch::{sort_by_index, BatchExecutor, BatchItem, IndexedOutcome, DEFAULT_CONCURRENCY};
pub use errors::{CliError, EvalError};
pub use evaluate::{strip_db_id_prefix, EvalOptions, Evaluator, GoldExample};
pub use runner::{QueryOutcome, QueryRunner, DEFAULT_TIME_LIMIT};
