//! Metric Thread Geometry (ISO 261 / ISO 898-1 / EN 1092-1)
//!
//! Coarse-pitch thread data for the bolt sizes the sizing search sweeps:
//! tensile stress area, EN 1092-1 bolt hole diameter, and the washer / nut
//! dimensions used for the bolt spacing and edge clearance checks.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Geometry of one coarse metric thread size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThreadSpec {
    /// Designation, e.g. "M24"
    pub designation: &'static str,
    /// Nominal diameter d (mm)
    pub diameter_mm: f64,
    /// Coarse pitch P (mm)
    pub pitch_mm: f64,
    /// Tensile stress area As (mm²)
    pub stress_area_mm2: f64,
    /// Flange bolt hole diameter (mm)
    pub hole_diameter_mm: f64,
    /// Plain washer outside diameter (mm), ISO 7089 / 7091
    pub washer_od_mm: Option<f64>,
    /// Hex nut width across flats (mm), ISO 4032
    pub nut_across_flats_mm: Option<f64>,
}

const fn thread(
    designation: &'static str,
    diameter_mm: f64,
    pitch_mm: f64,
    stress_area_mm2: f64,
    hole_diameter_mm: f64,
    washer_od_mm: Option<f64>,
    nut_across_flats_mm: Option<f64>,
) -> ThreadSpec {
    ThreadSpec {
        designation,
        diameter_mm,
        pitch_mm,
        stress_area_mm2,
        hole_diameter_mm,
        washer_od_mm,
        nut_across_flats_mm,
    }
}

/// Cataloged thread sizes, ascending
pub const THREADS: [ThreadSpec; 14] = [
    thread("M16", 16.0, 2.0, 157.0, 18.0, Some(30.0), Some(24.0)),
    thread("M20", 20.0, 2.5, 245.0, 22.0, Some(37.0), Some(30.0)),
    thread("M24", 24.0, 3.0, 353.0, 26.0, Some(44.0), Some(36.0)),
    thread("M27", 27.0, 3.0, 459.0, 30.0, Some(50.0), Some(41.0)),
    thread("M30", 30.0, 3.5, 561.0, 33.0, Some(56.0), Some(46.0)),
    thread("M33", 33.0, 3.5, 694.0, 36.0, Some(60.0), Some(50.0)),
    thread("M36", 36.0, 4.0, 817.0, 39.0, Some(66.0), Some(55.0)),
    thread("M39", 39.0, 4.0, 976.0, 42.0, Some(72.0), Some(60.0)),
    thread("M42", 42.0, 4.5, 1120.0, 45.0, Some(78.0), Some(65.0)),
    thread("M45", 45.0, 4.5, 1310.0, 48.0, Some(85.0), Some(70.0)),
    thread("M48", 48.0, 5.0, 1470.0, 52.0, Some(92.0), Some(75.0)),
    thread("M52", 52.0, 5.0, 1760.0, 56.0, Some(98.0), Some(80.0)),
    thread("M56", 56.0, 5.5, 2030.0, 62.0, Some(105.0), Some(85.0)),
    thread("M64", 64.0, 6.0, 2680.0, 70.0, None, Some(95.0)),
];

/// Bolt sizes swept by the custom sizing search
pub const SEARCH_BOLT_SIZES: [&str; 14] = [
    "M16", "M20", "M24", "M27", "M30", "M33", "M36", "M39", "M42", "M45", "M48", "M52", "M56", "M64",
];

fn normalize(designation: &str) -> String {
    designation.trim().to_ascii_uppercase().replace(' ', "")
}

/// Look up a thread by designation ("M24", "m24", " M 24 ")
pub fn find_thread(designation: &str) -> Option<&'static ThreadSpec> {
    let key = normalize(designation);
    THREADS.iter().find(|t| t.designation == key)
}

/// Look up a thread, returning a structured error for unknown sizes
pub fn thread_spec(designation: &str) -> CalcResult<&'static ThreadSpec> {
    find_thread(designation).ok_or_else(|| CalcError::unknown_bolt_size(designation))
}

/// A bolt size as carried on inputs and results (e.g. "M24")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoltSize(pub String);

impl BoltSize {
    /// Parse and normalize a designation, rejecting sizes not in the catalog
    pub fn parse(designation: &str) -> CalcResult<Self> {
        let spec = thread_spec(designation)?;
        Ok(BoltSize(spec.designation.to_string()))
    }

    /// Thread geometry for this size, if cataloged
    pub fn spec(&self) -> Option<&'static ThreadSpec> {
        find_thread(&self.0)
    }
}

impl std::fmt::Display for BoltSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&ThreadSpec> for BoltSize {
    fn from(spec: &ThreadSpec) -> Self {
        BoltSize(spec.designation.to_string())
    }
}
