use crate::batch::IndexedOutcome;
use crate::errors::EvalError;

/// Aggregate result of scoring one prediction set.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    /// Positions where predicted and gold outcomes matched.
    pub correct: usize,
    /// Total positions compared.
    pub total: usize,
    /// Positions that did not match, ascending.
    pub mismatches: Vec<usize>,
}

impl AccuracyReport {
    /// Execution accuracy as a percentage in `[0, 100]`.
    pub fn accuracy(&self) -> f64 {
        (self.correct as f64 / self.total as f64) * 100.0
    }
}

/// Compare two index-ordered outcome sequences position by position.
///
/// Both sequences must already be ordered by the same index scheme; the
/// comparison is purely positional. Equality per position is
/// [`QueryOutcome::set_eq`](crate::runner::QueryOutcome::set_eq).
///
/// Zero-length input is rejected with [`EvalError::EmptyBatch`] rather than
/// producing a 0/0 score, and skewed lengths with
/// [`EvalError::LengthMismatch`].
pub fn compare(
    gold: &[IndexedOutcome],
    predicted: &[IndexedOutcome],
) -> Result<AccuracyReport, EvalError> {
    if gold.len() != predicted.len() {
        return Err(EvalError::LengthMismatch {
            predictions: predicted.len(),
            golds: gold.len(),
        });
    }
    if gold.is_empty() {
        return Err(EvalError::EmptyBatch);
    }

    let total = gold.len();
    let mut correct = 0;
    let mut mismatches = Vec::new();

    for (position, (gold, predicted)) in gold.iter().zip(predicted).enumerate() {
        if gold.outcome.set_eq(&predicted.outcome) {
            correct += 1;
        } else {
            mismatches.push(position);
        }
    }

    Ok(AccuracyReport {
        correct,
        total,
        mismatches,
    })
}
