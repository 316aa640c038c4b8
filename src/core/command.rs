//! Solver command construction: turns normalized numeric inputs and the
//! optional flag set into the exact argument vector ASTAP expects.
//!
//! Flag names are bit-exact wire names (`-z`, `-spd`, `-fov`, ...). The
//! auxiliary subset renders as a bare flag when true and disappears when
//! false; every other boolean renders as `-<name> y|n`.
use std::path::PathBuf;

use tracing::debug;

use crate::types::{FlagValue, SolverSpeed};

/// Boolean flags rendered bare when true, omitted when false.
pub const AUX_FLAGS: &[&str] = &["update", "log", "annotate", "debug"];

/// Every optional flag name ASTAP understands; anything else is dropped.
const RECOGNIZED_FLAGS: &[&str] = &[
    "z", "s", "t", "m", "check", "d", "D", "sip", "speed", "update", "log", "analyse", "extract",
    "extract2", "annotate", "debug", "sqm",
];

/// Insertion-ordered set of optional solver flags.
///
/// Unknown flag names are silently ignored; setting a known name twice
/// replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverOptions {
    entries: Vec<(String, FlagValue)>,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag by its wire name. Names outside the recognized set are
    /// dropped without error.
    pub fn set(&mut self, name: &str, value: impl Into<FlagValue>) -> &mut Self {
        if !RECOGNIZED_FLAGS.contains(&name) {
            debug!("ignoring unrecognized solver flag: {}", name);
            return self;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Downsampling factor (`-z`); 0 lets the solver choose.
    pub fn downsample(&mut self, factor: u32) -> &mut Self {
        self.set("z", factor)
    }

    /// Maximum number of stars used for solving (`-s`).
    pub fn max_stars(&mut self, count: u32) -> &mut Self {
        self.set("s", count)
    }

    /// Quad tolerance (`-t`).
    pub fn tolerance(&mut self, value: f64) -> &mut Self {
        self.set("t", value)
    }

    /// Minimum star size in arcseconds (`-m`).
    pub fn min_star_size(&mut self, arcsec: f64) -> &mut Self {
        self.set("m", arcsec)
    }

    /// Check fits header for position data first (`-check`).
    pub fn check(&mut self, enabled: bool) -> &mut Self {
        self.set("check", enabled)
    }

    /// Star database path or abbreviation (`-d`).
    pub fn database(&mut self, path: &str) -> &mut Self {
        self.set("d", path)
    }

    /// Add SIP polynomial distortion terms to the solution (`-sip`).
    pub fn sip(&mut self, enabled: bool) -> &mut Self {
        self.set("sip", enabled)
    }

    /// Search speed mode (`-speed`).
    pub fn speed(&mut self, speed: SolverSpeed) -> &mut Self {
        self.set("speed", speed)
    }

    /// Write the solution back into the input file header (`-update`).
    pub fn update(&mut self, enabled: bool) -> &mut Self {
        self.set("update", enabled)
    }

    /// Ask the solver to write its own log file (`-log`).
    pub fn solver_log(&mut self, enabled: bool) -> &mut Self {
        self.set("log", enabled)
    }

    /// Produce an annotated image (`-annotate`).
    pub fn annotate(&mut self, enabled: bool) -> &mut Self {
        self.set("annotate", enabled)
    }

    /// Solver debug output (`-debug`).
    pub fn debug(&mut self, enabled: bool) -> &mut Self {
        self.set("debug", enabled)
    }

    /// Sky quality measurement (`-sqm`).
    pub fn sqm(&mut self, pedestal: f64) -> &mut Self {
        self.set("sqm", pedestal)
    }
}

/// A fully-normalized solver invocation.
///
/// `ra_hours` is the right-ascension hint in hours; `spd_deg` is the
/// south-polar distance (90 + declination) in degrees, which is how ASTAP
/// takes its declination hint.
#[derive(Debug, Clone)]
pub struct SolveCommand {
    pub exe: String,
    pub file: PathBuf,
    pub radius_deg: f64,
    pub ra_hours: f64,
    pub spd_deg: f64,
    pub fov_deg: f64,
    pub output_prefix: PathBuf,
    pub options: SolverOptions,
}

impl SolveCommand {
    /// Render the full argument vector, executable first.
    ///
    /// The six mandatory flags always come first and in fixed order;
    /// optional flags follow in insertion order.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = vec![
            self.exe.clone(),
            "-f".into(),
            self.file.display().to_string(),
            "-r".into(),
            self.radius_deg.to_string(),
            "-ra".into(),
            self.ra_hours.to_string(),
            "-spd".into(),
            self.spd_deg.to_string(),
            "-fov".into(),
            self.fov_deg.to_string(),
            "-o".into(),
            self.output_prefix.display().to_string(),
        ];

        for (name, value) in self.options.iter() {
            match value {
                FlagValue::Bool(enabled) => {
                    if AUX_FLAGS.contains(&name) {
                        if *enabled {
                            argv.push(format!("-{}", name));
                        }
                    } else {
                        argv.push(format!("-{}", name));
                        argv.push(if *enabled { "y".into() } else { "n".into() });
                    }
                }
                other => {
                    argv.push(format!("-{}", name));
                    argv.push(other.to_string());
                }
            }
        }

        argv
    }
}
