//! Command Line Interface (CLI) layer for ASTROSOLVE.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for a plate-solving run. It wires
//! user-provided options to the underlying library functionality exposed
//! via `astrosolve::api`.
//!
//! If you are embedding ASTROSOLVE into another application, prefer using
//! the high-level `astrosolve::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
