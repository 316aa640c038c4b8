//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O and process-layer errors, and provides semantic
//! variants for missing inputs, solver failures, and cancellation.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process error: {0}")]
    Process(#[from] crate::io::ProcessError),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Solver exited with code {exit_code} and produced no result file")]
    SolverFailed { exit_code: i32, tail: String },

    #[error("Solve cancelled")]
    Cancelled,
}
