use clap::Parser;
use std::path::PathBuf;

use astrosolve::SolverSpeed;

#[derive(Parser)]
#[command(name = "astrosolve", version, about = "ASTAP plate-solving front end")]
pub struct CliArgs {
    /// Input image (FITS or anything else ASTAP reads)
    #[arg(short, long)]
    pub input: PathBuf,

    /// ASTAP executable name or path
    #[arg(long, default_value = "astap")]
    pub exe: String,

    /// Right-ascension hint: decimal hours or sexagesimal "h m s"
    #[arg(long, default_value = "0")]
    pub ra: String,

    /// Declination hint: decimal degrees or sexagesimal "d m s"
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dec: String,

    /// Search radius around the hint, in degrees
    #[arg(short, long, default_value_t = 10.0)]
    pub radius: f64,

    /// Field of view height of the image, in degrees
    #[arg(long, default_value_t = 1.0)]
    pub fov: f64,

    /// Downsample factor (0 lets the solver choose)
    #[arg(short = 'z', long)]
    pub downsample: Option<u32>,

    /// Maximum number of stars used for solving
    #[arg(long)]
    pub max_stars: Option<u32>,

    /// Quad tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Minimum star size in arcseconds
    #[arg(long)]
    pub min_star_size: Option<f64>,

    /// Check the FITS header for position data before searching
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Star database path or abbreviation (e.g. d50)
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Add SIP polynomial distortion terms to the solution
    #[arg(long, default_value_t = false)]
    pub sip: bool,

    /// Search speed mode (slow or auto)
    #[arg(long, value_enum)]
    pub speed: Option<SolverSpeed>,

    /// Write the solution back into the input file header
    #[arg(long, default_value_t = false)]
    pub update: bool,

    /// Produce an annotated image next to the input
    #[arg(long, default_value_t = false)]
    pub annotate: bool,

    /// Ask the solver to write its own log file
    #[arg(long, default_value_t = false)]
    pub solver_log: bool,

    /// Sky quality measurement pedestal
    #[arg(long)]
    pub sqm: Option<f64>,

    /// Stream solver console output while it runs
    #[arg(long, default_value_t = false)]
    pub stream: bool,

    /// Keep the raw .wcs/.ini products instead of deleting them
    #[arg(long, default_value_t = false)]
    pub keep: bool,

    /// Print the solved header as JSON instead of aligned text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
