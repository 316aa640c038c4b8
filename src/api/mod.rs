//! High-level, ergonomic entry point: configure a solve with typed angles
//! and options, run ASTAP, and get back the parsed WCS header document.
//! Prefer this over driving `io::process` and `io::wcs` by hand.
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::{Angle, SolveCommand, SolverOptions};
use crate::error::{Error, Result};
use crate::io::process::{CancelFlag, ProcessRunner};
use crate::io::wcs::{self, HeaderDocument};

const PRODUCT_STEM: &str = "solution";

/// Builder for one plate-solving run.
///
/// Angles are typed; the conversion to ASTAP's mixed units (RA in hours,
/// declination as south-polar distance) happens at the command boundary.
/// Each `solve` call allocates a unique scratch directory next to the input
/// file, so concurrent solves over the same directory never collide.
#[derive(Debug, Clone)]
pub struct Solver {
    file: PathBuf,
    exe: String,
    radius: Angle,
    ra: Angle,
    dec: Angle,
    fov: Angle,
    options: SolverOptions,
    runner: ProcessRunner,
}

impl Solver {
    /// Create a solver for `file` with the defaults of the command-line
    /// tool: `astap` on PATH, 10 deg search radius, 1 deg field of view,
    /// pointing hint at RA 0 h / Dec 0 deg.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            exe: "astap".into(),
            radius: Angle::from_deg(10.0),
            ra: Angle::default(),
            dec: Angle::default(),
            fov: Angle::from_deg(1.0),
            options: SolverOptions::new(),
            runner: ProcessRunner::new(),
        }
    }

    /// Name or path of the ASTAP executable.
    pub fn executable(mut self, exe: &str) -> Self {
        self.exe = exe.to_string();
        self
    }

    /// Search radius around the pointing hint.
    pub fn radius(mut self, radius: Angle) -> Self {
        self.radius = radius;
        self
    }

    /// Right-ascension hint.
    pub fn ra(mut self, ra: Angle) -> Self {
        self.ra = ra;
        self
    }

    /// Declination hint.
    pub fn dec(mut self, dec: Angle) -> Self {
        self.dec = dec;
        self
    }

    /// Field of view of the image.
    pub fn fov(mut self, fov: Angle) -> Self {
        self.fov = fov;
        self
    }

    /// Replace the optional flag set.
    pub fn options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options_mut(&mut self) -> &mut SolverOptions {
        &mut self.options
    }

    /// Handle for cancelling an in-flight solve from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.runner.cancel_flag()
    }

    /// The normalized invocation this solver would run for a given output
    /// prefix.
    pub fn command(&self, output_prefix: &Path) -> SolveCommand {
        SolveCommand {
            exe: self.exe.clone(),
            file: self.file.clone(),
            radius_deg: self.radius.to_deg(),
            ra_hours: self.ra.to_hours(),
            spd_deg: 90.0 + self.dec.to_deg(),
            fov_deg: self.fov.to_deg(),
            output_prefix: output_prefix.to_path_buf(),
            options: self.options.clone(),
        }
    }

    /// Run the solver and extract the WCS header document.
    ///
    /// With `stream = true` the solver's console output is forwarded to
    /// stdout as it arrives. With `delete = false` the scratch directory
    /// with the raw `.wcs`/`.ini` products is kept and its path logged.
    ///
    /// An empty document means the solver exited cleanly without finding a
    /// solution. A nonzero exit that produced no result file surfaces as
    /// [`Error::SolverFailed`]; cancellation surfaces as [`Error::Cancelled`].
    pub fn solve(&self, stream: bool, delete: bool) -> Result<HeaderDocument> {
        if !self.file.exists() {
            return Err(Error::InputNotFound {
                path: self.file.display().to_string(),
            });
        }
        // ASTAP treats these as magnitudes; catch a stray minus sign (or a
        // NaN from a bad parse) here instead of handing it to the solver.
        if !(self.radius.to_deg() > 0.0) {
            return Err(Error::InvalidArgument {
                arg: "radius",
                value: self.radius.to_string(),
            });
        }
        if !(self.fov.to_deg() >= 0.0) {
            return Err(Error::InvalidArgument {
                arg: "fov",
                value: self.fov.to_string(),
            });
        }

        let parent = match self.file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        // Unique per invocation; dropped (and thus removed) on every exit
        // path unless explicitly kept below.
        let workdir = tempfile::Builder::new()
            .prefix("astrosolve-")
            .tempdir_in(&parent)?;
        let command = self.command(&workdir.path().join(PRODUCT_STEM));

        let outcome = self.runner.run(&command.to_argv(), stream)?;
        if outcome.cancelled {
            return Err(Error::Cancelled);
        }

        // A present result file wins regardless of exit code; a nonzero
        // exit without one is a solver failure, not "no solution".
        let solved = workdir.path().join(format!("{}.wcs", PRODUCT_STEM)).exists();
        if !solved {
            if let Some(code) = outcome.exit_code.filter(|&c| c != 0) {
                return Err(Error::SolverFailed {
                    exit_code: code,
                    tail: outcome.tail,
                });
            }
            info!("solver exited cleanly without a solution");
        }

        let doc = wcs::extract_wcs(workdir.path(), PRODUCT_STEM, delete)?;

        if !delete {
            let kept = workdir.keep();
            info!("keeping solver products in {}", kept.display());
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::wcs::{HeaderEntry, HeaderValue};

    #[test]
    fn command_normalizes_units() {
        let solver = Solver::new("/data/m42.fits")
            .ra(Angle::from_hms(5.0, 30.0, 0.0))
            .dec(Angle::from_deg(-5.0))
            .radius(Angle::from_deg(15.0))
            .fov(Angle::from_dms(1.0, 30.0, 0.0));
        let cmd = solver.command(Path::new("/tmp/x/solution"));
        assert_eq!(cmd.ra_hours, 5.5);
        assert_eq!(cmd.spd_deg, 85.0);
        assert_eq!(cmd.radius_deg, 15.0);
        assert_eq!(cmd.fov_deg, 1.5);
        assert_eq!(cmd.exe, "astap");
    }

    #[test]
    fn missing_input_is_rejected_before_spawning() {
        let solver = Solver::new("/no/such/image.fits");
        assert!(matches!(
            solver.solve(false, true),
            Err(Error::InputNotFound { .. })
        ));
    }

    #[test]
    fn negative_angles_are_rejected_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("image.fits");
        std::fs::write(&input, b"SIMPLE").unwrap();

        let bad_radius = Solver::new(&input).radius(Angle::from_deg(-3.0));
        assert!(matches!(
            bad_radius.solve(false, true),
            Err(Error::InvalidArgument { arg: "radius", .. })
        ));

        let bad_fov = Solver::new(&input).fov(Angle::from_deg(-1.5));
        assert!(matches!(
            bad_fov.solve(false, true),
            Err(Error::InvalidArgument { arg: "fov", .. })
        ));
    }

    #[cfg(unix)]
    mod with_fake_solver {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        /// Install a shell script standing in for the ASTAP binary.
        fn fake_solver(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-astap");
            let script = format!(
                "#!/bin/sh\nprefix=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-o\" ]; then prefix=\"$2\"; fi\n  shift\ndone\n{}\n",
                body
            );
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn solver_in(dir: &Path, exe: &Path) -> Solver {
            let input = dir.join("image.fits");
            fs::write(&input, b"SIMPLE").unwrap();
            Solver::new(input).executable(&exe.display().to_string())
        }

        #[test]
        fn solve_extracts_the_header_and_cleans_up() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_solver(
                dir.path(),
                "printf \"CTYPE1  = 'RA---TAN'\\nCRVAL1  = 83.8 / RA ref\\n\" > \"$prefix.wcs\"\n\
                 echo settings > \"$prefix.ini\"\necho Solution found",
            );
            let solver = solver_in(dir.path(), &exe);

            let doc = solver.solve(false, true).unwrap();
            assert_eq!(doc.len(), 2);
            match &doc[1] {
                HeaderEntry::Card(c) => {
                    assert_eq!(c.key, "CRVAL1");
                    assert_eq!(c.value, HeaderValue::Number(83.8));
                }
                other => panic!("unexpected entry {:?}", other),
            }
            // Scratch directory gone with its products.
            let leftovers: Vec<_> = fs::read_dir(dir.path())
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with("astrosolve-"))
                .collect();
            assert!(leftovers.is_empty());
        }

        #[test]
        fn clean_exit_without_result_is_an_empty_document() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_solver(dir.path(), "echo no stars; exit 0");
            let solver = solver_in(dir.path(), &exe);
            assert!(solver.solve(false, true).unwrap().is_empty());
        }

        #[test]
        fn nonzero_exit_without_result_is_solver_failed() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_solver(dir.path(), "echo database missing >&2; exit 2");
            let solver = solver_in(dir.path(), &exe);
            match solver.solve(false, true) {
                Err(Error::SolverFailed { exit_code, tail }) => {
                    assert_eq!(exit_code, 2);
                    assert!(tail.contains("database missing"));
                }
                other => panic!("expected SolverFailed, got {:?}", other.map(|d| d.len())),
            }
        }

        #[test]
        fn result_file_wins_over_nonzero_exit() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_solver(
                dir.path(),
                "printf \"CTYPE1  = 'RA---TAN'\\n\" > \"$prefix.wcs\"\nexit 1",
            );
            let solver = solver_in(dir.path(), &exe);
            assert_eq!(solver.solve(false, true).unwrap().len(), 1);
        }

        #[test]
        fn cancellation_surfaces_as_a_distinct_error() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_solver(dir.path(), "sleep 30");
            let solver = solver_in(dir.path(), &exe);

            let flag = solver.cancel_flag();
            let canceller = std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(150));
                flag.cancel();
            });
            let result = solver.solve(false, true);
            canceller.join().unwrap();
            assert!(matches!(result, Err(Error::Cancelled)));
        }
    }
}
