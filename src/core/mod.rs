//! Core building blocks: the `Angle` value type and solver command
//! construction. These are the pure pieces consumed by the high-level
//! `api` module.
pub mod angle;
pub mod command;

pub use angle::Angle;
pub use command::{AUX_FLAGS, SolveCommand, SolverOptions};
