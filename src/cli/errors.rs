use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid angle for {arg}: '{value}'. Use decimal or sexagesimal like '5 34 31.9'")]
    InvalidAngle { arg: &'static str, value: String },

    #[error("No solution found for {input}")]
    NoSolution { input: String },
}
