//! Length unit conversion.
//!
//! Every configured length goes through [`to_pixels`] (or [`Unit::to_pixels`]) exactly once,
//! before any geometry is computed.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Output resolution used for physical units.
pub const PX_PER_INCH: f64 = 96.0;

/// CSS-style `em` base size.
pub const PX_PER_EM: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Em,
}

impl Unit {
    pub const ALL: [Unit; 6] = [Unit::Px, Unit::In, Unit::Cm, Unit::Mm, Unit::Pt, Unit::Em];

    pub fn px_per_unit(self) -> f64 {
        match self {
            Unit::Px => 1.0,
            Unit::In => PX_PER_INCH,
            Unit::Cm => PX_PER_INCH / 2.54,
            Unit::Mm => PX_PER_INCH / 25.4,
            Unit::Pt => PX_PER_INCH / 72.0,
            Unit::Em => PX_PER_EM,
        }
    }

    pub fn to_pixels(self, value: f64) -> f64 {
        if value == 0.0 || !value.is_finite() {
            return 0.0;
        }
        value * self.px_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Pt => "pt",
            Unit::Em => "em",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "px" => Ok(Unit::Px),
            "in" | "inch" | "inches" => Ok(Unit::In),
            "cm" => Ok(Unit::Cm),
            "mm" => Ok(Unit::Mm),
            "pt" => Ok(Unit::Pt),
            "em" => Ok(Unit::Em),
            _ => Err(Error::UnsupportedUnit {
                unit: s.to_string(),
            }),
        }
    }
}

/// Converts `value` expressed in `unit` into pixels.
///
/// A missing value converts to `0.0` so callers can pass optional lengths straight through.
pub fn to_pixels(value: impl Into<Option<f64>>, unit: &str) -> Result<f64> {
    let unit = unit.parse::<Unit>()?;
    Ok(value.into().map(|v| unit.to_pixels(v)).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_converts_to_zero_for_every_unit() {
        for unit in Unit::ALL {
            assert_eq!(to_pixels(0.0, unit.as_str()).unwrap(), 0.0, "{unit}");
        }
        assert_eq!(to_pixels(None, "in").unwrap(), 0.0);
    }

    #[test]
    fn conversion_is_linear() {
        for unit in Unit::ALL {
            let one = unit.to_pixels(1.0);
            let seven = unit.to_pixels(7.0);
            assert!((seven - one * 7.0).abs() < 1e-9, "{unit}");
            let half = unit.to_pixels(0.5);
            assert!((half * 2.0 - one).abs() < 1e-9, "{unit}");
        }
    }

    #[test]
    fn physical_units_use_96_dpi() {
        assert_eq!(to_pixels(1.0, "in").unwrap(), 96.0);
        assert_eq!(to_pixels(2.54, "cm").unwrap(), 96.0);
        assert_eq!(to_pixels(72.0, "pt").unwrap(), 96.0);
        assert_eq!(to_pixels(25.4, "mm").unwrap(), 96.0);
        assert_eq!(to_pixels(12.5, "px").unwrap(), 12.5);
        assert_eq!(to_pixels(2.0, "EM").unwrap(), 32.0);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = to_pixels(1.0, "furlong").unwrap_err();
        assert!(matches!(err, Error::UnsupportedUnit { ref unit } if unit == "furlong"));
    }
}
