#![doc = r#"
ASTROSOLVE — a typed Rust interface to the ASTAP plate solver.

This crate wraps an [ASTAP](https://www.hnsky.org/astap.htm) command-line
invocation: it builds the argument vector from typed angles and options,
runs the solver as a subprocess with live output streaming and cooperative
cancellation, and parses the resulting WCS (World Coordinate System) header
into an ordered document of structured cards. It powers the ASTROSOLVE CLI
and can be embedded in your own Rust applications.

The crate does not implement plate solving itself; it drives an external
ASTAP binary and interprets its textual output.

Requirements
------------
- An ASTAP executable (plus a star database) installed on the system.

Quick start: solve an image
---------------------------
```rust,no_run
use astrosolve::{Angle, Solver};

fn main() -> astrosolve::Result<()> {
    let mut solver = Solver::new("/data/m42.fits")
        .ra(Angle::from_hms(5.0, 35.0, 17.0))
        .dec(Angle::from_dms(-5.0, 23.0, 28.0))
        .fov(Angle::from_deg(1.5));
    solver.options_mut().downsample(2).sip(true);

    // stream = false: run silently; delete = true: drop the raw products.
    let document = solver.solve(false, true)?;
    for entry in &document {
        println!("{:?}", entry);
    }
    Ok(())
}
```

An empty document means the solver exited cleanly without finding a
solution. A nonzero exit without a result file surfaces as
`Error::SolverFailed` with the trailing solver output attached.

Cancelling a solve
------------------
`Solver::cancel_flag` returns a cloneable handle; calling `cancel()` on it
from any thread terminates the running solver within one output flush
window and makes `solve` return `Error::Cancelled`.

```rust,no_run
use astrosolve::Solver;

fn main() -> astrosolve::Result<()> {
    let solver = Solver::new("/data/m42.fits");
    let flag = solver.cancel_flag();
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_secs(60));
        flag.cancel();
    });
    let document = solver.solve(true, true)?;
    println!("{} header entries", document.len());
    Ok(())
}
```

Low-level pieces
----------------
The layers underneath the high-level API are public and usable on their
own: [`core::command`] renders argument vectors, [`io::process`] runs an
arbitrary argv with merged, time-boxed output streaming, and [`io::wcs`]
parses header documents from text you obtained elsewhere.

Error handling
--------------
All public functions return `astrosolve::Result<T>`; match on
`astrosolve::Error` to handle specific cases, e.g. a missing executable or
a solver failure.

```rust,no_run
use astrosolve::{Error, Solver};

fn main() {
    match Solver::new("/data/m42.fits").solve(false, true) {
        Ok(doc) if doc.is_empty() => eprintln!("no solution"),
        Ok(doc) => println!("{} entries", doc.len()),
        Err(Error::Process(e)) => eprintln!("solver did not start: {e}"),
        Err(Error::SolverFailed { exit_code, tail }) => {
            eprintln!("solver failed ({exit_code}): {tail}")
        }
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry point (`Solver`).
- [`core`] — `Angle` conversions and solver command construction.
- [`io`] — subprocess supervision and WCS header extraction.
- [`types`] — shared enums (`SolverSpeed`, `FlagValue`).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::angle::Angle;
pub use core::command::{SolveCommand, SolverOptions};
pub use error::{Error, Result};
pub use types::{FlagValue, SolverSpeed};

// Process and extraction layers
pub use io::process::{CancelFlag, ProcessError, ProcessRunner, RunOutcome};
pub use io::wcs::{Card, HeaderDocument, HeaderEntry, HeaderValue, extract_wcs, parse_document};

// High-level API re-exports
pub use api::Solver;
