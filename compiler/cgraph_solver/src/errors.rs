//! Solver errors.

use cgraph_eval::EvalError;
use cgraph_fmt::PrintError;

/// Failure while staging, running or printing a solve.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SolverError {
    #[error("`{buffer}` has length {got}, operator dimension is {expected}")]
    DimensionMismatch {
        buffer: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("a position update was configured but no position buffer was given")]
    MissingPosition,
    #[error("execution left `{name}` unbound or of the wrong kind")]
    MissingResult { name: &'static str },
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Print(#[from] PrintError),
}
