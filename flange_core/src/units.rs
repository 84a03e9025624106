//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI units used by the engine.
//!
//! The engine works in a consistent N-mm-MPa system internally. Pressures
//! arrive in bar (the unit engineers quote PN and design pressure in) and are
//! converted once at the boundary of each formula.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::units::{Bar, MegaPascals};
//!
//! let p = Bar(16.0);
//! let p_mpa: MegaPascals = p.into();
//! assert!((p_mpa.0 - 1.6).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Pressure / Stress Units
// ============================================================================

/// Pressure in bar
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

/// Pressure or stress in MPa (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

/// 1 bar = 0.1 MPa
pub const MPA_PER_BAR: f64 = 0.1;

impl From<Bar> for MegaPascals {
    fn from(bar: Bar) -> Self {
        MegaPascals(bar.0 * MPA_PER_BAR)
    }
}

impl From<MegaPascals> for Bar {
    fn from(mpa: MegaPascals) -> Self {
        Bar(mpa.0 / MPA_PER_BAR)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

/// Convert a volume in mm³ to m³
#[inline]
pub fn mm3_to_m3(volume_mm3: f64) -> f64 {
    volume_mm3 * 1.0e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_to_mpa() {
        let p: MegaPascals = Bar(40.0).into();
        assert!((p.0 - 4.0).abs() < 1e-12);
        let back: Bar = p.into();
        assert!((back.0 - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_mm_to_m() {
        let d: Meters = Millimeters(24.0).into();
        assert!((d.0 - 0.024).abs() < 1e-15);
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Bar(10.0)).unwrap();
        assert_eq!(json, "10.0");
    }
}
