//! Shared types and enums used across ASTROSOLVE.
//! Includes `SolverSpeed` and the `FlagValue` union used when rendering
//! optional solver flags to the command line.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Solver search speed (`-speed` flag)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum SolverSpeed {
    Slow,
    Auto,
}

impl std::fmt::Display for SolverSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverSpeed::Slow => "slow",
            SolverSpeed::Auto => "auto",
        };
        write!(f, "{}", s)
    }
}

/// Value of an optional solver flag: boolean, numeric, or free text.
///
/// Booleans render as `y`/`n` (or as a bare flag for the auxiliary set),
/// numbers and text are stringified verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Bool(true) => write!(f, "y"),
            FlagValue::Bool(false) => write!(f, "n"),
            FlagValue::Number(n) => write!(f, "{}", n),
            FlagValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<f64> for FlagValue {
    fn from(v: f64) -> Self {
        FlagValue::Number(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Number(v as f64)
    }
}

impl From<i32> for FlagValue {
    fn from(v: i32) -> Self {
        FlagValue::Number(f64::from(v))
    }
}

impl From<u32> for FlagValue {
    fn from(v: u32) -> Self {
        FlagValue::Number(f64::from(v))
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::Text(v.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::Text(v)
    }
}

impl From<SolverSpeed> for FlagValue {
    fn from(v: SolverSpeed) -> Self {
        FlagValue::Text(v.to_string())
    }
}
