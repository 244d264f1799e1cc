//! Physical measurements and their conversion to pixels.
//!
//! Every dimension in a contact sheet config is a value in some unit at some
//! resolution. Sheet width and height share one unit/resolution pair, the two
//! gaps share another, and the caption size has its own. Each pair is
//! converted independently, up front, before any layout math runs:
//!
//! ```text
//! pixel       value
//! inch        value × resolution
//! millimeter  value / 25.4 × resolution
//! point       value / 72 × resolution
//! ```
//!
//! Resolution is always pixels per inch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Millimeters in one inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Typographic points in one inch.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Invalid unit '{0}' (expected pixel, inch, millimeter or point)")]
    InvalidUnit(String),
}

/// Unit a measurement is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Pixel,
    Inch,
    Millimeter,
    Point,
}

impl Unit {
    /// Canonical lowercase tag used in config files.
    pub fn tag(self) -> &'static str {
        match self {
            Unit::Pixel => "pixel",
            Unit::Inch => "inch",
            Unit::Millimeter => "millimeter",
            Unit::Point => "point",
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixel" | "pixels" | "px" => Ok(Unit::Pixel),
            "inch" | "inches" | "in" => Ok(Unit::Inch),
            "millimeter" | "millimeters" | "mm" => Ok(Unit::Millimeter),
            "point" | "points" | "pt" => Ok(Unit::Point),
            _ => Err(UnitError::InvalidUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.tag().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Convert a measurement to pixels.
///
/// `resolution` is in pixels per inch and must be positive; callers validate
/// it (see [`Measurement::validate`]). The conversion is linear in `value`.
pub fn to_pixels(value: f64, unit: Unit, resolution: f64) -> f64 {
    match unit {
        Unit::Pixel => value,
        Unit::Inch => value * resolution,
        Unit::Millimeter => value / MM_PER_INCH * resolution,
        Unit::Point => value / POINTS_PER_INCH * resolution,
    }
}

/// A single value with the unit and resolution it was entered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
    pub resolution: f64,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit, resolution: f64) -> Self {
        Self {
            value,
            unit,
            resolution,
        }
    }

    /// Shorthand for a measurement already in pixels.
    pub fn pixels(value: f64) -> Self {
        Self::new(value, Unit::Pixel, 72.0)
    }

    /// Exact pixel value.
    pub fn to_pixels(&self) -> f64 {
        to_pixels(self.value, self.unit, self.resolution)
    }

    /// Pixel value rounded to the nearest whole pixel.
    pub fn to_whole_pixels(&self) -> i64 {
        self.to_pixels().round() as i64
    }

    /// Check that both the value and the resolution are finite and positive.
    ///
    /// Returns a human-readable reason on failure; `name` identifies the
    /// field in that message.
    pub fn validate(&self, name: &str) -> Result<(), String> {
        self.check(name, false)
    }

    /// Like [`validate`](Self::validate) but accepts a zero value. Gaps use
    /// this: a sheet without gutters is fine.
    pub fn validate_non_negative(&self, name: &str) -> Result<(), String> {
        self.check(name, true)
    }

    fn check(&self, name: &str, allow_zero: bool) -> Result<(), String> {
        let in_range = self.value > 0.0 || (allow_zero && self.value == 0.0);
        if !self.value.is_finite() || !in_range {
            let bound = if allow_zero { ">= 0" } else { "> 0" };
            return Err(format!("{name} must be {bound} (got {})", self.value));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(format!(
                "{name} resolution must be > 0 (got {})",
                self.resolution
            ));
        }
        Ok(())
    }
}
