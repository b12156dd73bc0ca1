use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the evaluation pipeline itself.
///
/// Per-query failures never surface here; they are absorbed into
/// [`crate::runner::QueryOutcome`] so that a batch always completes.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Prediction count ({predictions}) does not match gold count ({golds})\nHint: every prediction is scored against the gold example at the same position")]
    LengthMismatch { predictions: usize, golds: usize },

    #[error("Cannot score an empty batch: no examples were provided")]
    EmptyBatch,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load dataset file: {path}\n{source}")]
    DatasetLoadError {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Unsupported prediction file format: {path}\nExpected a JSON array of SQL strings, a JSON object keyed by example index, or one query per line")]
    PredictionFormat { path: PathBuf },
}
