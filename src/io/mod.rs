//! I/O layer: solver subprocess supervision and WCS result extraction.
pub mod process;
pub use process::{CancelFlag, ProcessError, ProcessRunner, RunOutcome};

pub mod wcs;
pub use wcs::{Card, HeaderDocument, HeaderEntry, HeaderValue, extract_wcs, parse_document};
