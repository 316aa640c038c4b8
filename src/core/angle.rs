//! Angular value type with degree/hour/sexagesimal conversions.
//! ASTAP takes its pointing hints in mixed units (search radius and FOV in
//! degrees, RA in hours, declination as south-polar distance), so the rest
//! of the crate works in `Angle` and converts at the command boundary.
use serde::{Deserialize, Serialize};

/// An angle stored internally in decimal degrees.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    /// Create an angle from decimal degrees.
    pub fn from_deg(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Create an angle from degrees, arcminutes, and arcseconds.
    ///
    /// For negative angles put the sign on the degrees component only;
    /// it is applied to the whole value.
    pub fn from_dms(d: f64, m: f64, s: f64) -> Self {
        let sign = if d < 0.0 { -1.0 } else { 1.0 };
        Self {
            degrees: sign * (d.abs() + m / 60.0 + s / 3600.0),
        }
    }

    /// Create an angle from decimal hours (1 h = 15 deg).
    pub fn from_hours(hours: f64) -> Self {
        Self {
            degrees: hours * 15.0,
        }
    }

    /// Create an angle from hours, minutes, and seconds of time.
    pub fn from_hms(h: f64, m: f64, s: f64) -> Self {
        Self::from_hours(h + m / 60.0 + s / 3600.0)
    }

    /// Value in decimal degrees.
    pub fn to_deg(self) -> f64 {
        self.degrees
    }

    /// Value in decimal hours.
    pub fn to_hours(self) -> f64 {
        self.degrees / 15.0
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}°", self.degrees)
    }
}
