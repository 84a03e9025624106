//! # Gasket Geometry
//!
//! Empirical sealing geometry for a flat gasket on a blind flange.
//!
//! ```text
//! w0   = 0.08·DN + 6                       base width (mm)
//! w    = min(w0 · k_PN · k_face · k_t, 32)
//! id   = max(10, DN - 6)
//! od   = id + 2·w
//! G    = (id + od) / 2                     effective diameter
//! b    = clamp(0.8·w, 6, 25)               effective width
//! ```
//!
//! | Factor  | Condition            | Value |
//! |---------|----------------------|-------|
//! | k_PN    | PN ≥ 320             | 1.15  |
//! |         | PN ≥ 250             | 1.10  |
//! |         | PN ≥ 160             | 1.05  |
//! |         | otherwise            | 1.00  |
//! | k_face  | FF / IBC / RF        | 1.10 / 0.95 / 1.00 |
//! | k_t     | thickness ≥ 3 mm     | 1.08  |
//!
//! The chain never fails. Validating DN and thickness is the caller's job.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::gasket_factors;

/// Cap on the derived gasket width (mm)
pub const MAX_GASKET_WIDTH_MM: f64 = 32.0;
/// Lower clamp on effective width (mm)
pub const MIN_EFFECTIVE_WIDTH_MM: f64 = 6.0;
/// Upper clamp on effective width (mm)
pub const MAX_EFFECTIVE_WIDTH_MM: f64 = 25.0;
/// Smallest gasket inner diameter (mm)
pub const MIN_GASKET_ID_MM: f64 = 10.0;

/// Flange facing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    /// Flat face
    #[serde(rename = "FF")]
    FlatFace,
    /// Raised face
    #[serde(rename = "RF")]
    #[default]
    RaisedFace,
    /// Inside bolt circle (confined) gasket
    #[serde(rename = "IBC")]
    InsideBoltCircle,
}

impl Facing {
    pub const ALL: [Facing; 3] = [Facing::FlatFace, Facing::RaisedFace, Facing::InsideBoltCircle];

    pub fn code(&self) -> &'static str {
        match self {
            Facing::FlatFace => "FF",
            Facing::RaisedFace => "RF",
            Facing::InsideBoltCircle => "IBC",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_uppercase().replace([' ', '-', '_'], "").as_str() {
            "FF" | "FLATFACE" => Ok(Facing::FlatFace),
            "RF" | "RAISEDFACE" => Ok(Facing::RaisedFace),
            "IBC" | "INSIDEBOLTCIRCLE" => Ok(Facing::InsideBoltCircle),
            _ => Err(CalcError::invalid_input("facing", s, "Expected FF, RF or IBC")),
        }
    }

    /// Width multiplier for this facing
    #[inline]
    pub fn width_factor(&self) -> f64 {
        match self {
            Facing::FlatFace => 1.10,
            Facing::InsideBoltCircle => 0.95,
            Facing::RaisedFace => 1.0,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Gasket as specified by the user
///
/// ## JSON Example
///
/// ```json
/// { "facing": "RF", "thickness_mm": 2.0, "material": "fiber" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasketSpec {
    pub facing: Facing,
    pub thickness_mm: f64,
    pub material: String,
}

impl Default for GasketSpec {
    fn default() -> Self {
        GasketSpec {
            facing: Facing::RaisedFace,
            thickness_mm: 2.0,
            material: "fiber".to_string(),
        }
    }
}

/// Derived gasket geometry and factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasketGeometry {
    /// Effective sealing diameter G (mm)
    pub effective_diameter_mm: f64,
    /// Effective sealing width b (mm)
    pub effective_width_mm: f64,
    /// Derived (capped) gasket width (mm)
    pub width_mm: f64,
    /// Inner diameter (mm)
    pub id_mm: f64,
    /// Outer diameter (mm)
    pub od_mm: f64,
    pub material: String,
    pub thickness_mm: f64,
    pub facing: Facing,
    /// Maintenance factor m
    pub m: f64,
    /// Seating stress y (MPa)
    pub y_mpa: f64,
    /// Gasket material unknown, default factors used
    pub factors_fallback: bool,
}

/// Pressure-class width multiplier
#[inline]
pub fn class_factor(pressure_class: u32) -> f64 {
    if pressure_class >= 320 {
        1.15
    } else if pressure_class >= 250 {
        1.10
    } else if pressure_class >= 160 {
        1.05
    } else {
        1.0
    }
}

/// Thickness width multiplier
#[inline]
pub fn thickness_factor(thickness_mm: f64) -> f64 {
    if thickness_mm >= 3.0 {
        1.08
    } else {
        1.0
    }
}

/// Derived gasket width before the effective-width clamp (mm)
pub fn gasket_width(nominal_size: f64, pressure_class: u32, facing: Facing, thickness_mm: f64) -> f64 {
    let base = nominal_size * 0.08 + 6.0;
    let width = base * class_factor(pressure_class) * facing.width_factor() * thickness_factor(thickness_mm);
    width.min(MAX_GASKET_WIDTH_MM)
}

/// Gasket geometry for a nominal size, class, facing, thickness and material.
///
/// ```rust
/// use flange_core::equations::gasket::{gasket_geometry, Facing};
///
/// let g = gasket_geometry(100.0, 16, Facing::RaisedFace, 2.0, "fiber");
/// // w = 0.08·100 + 6 = 14, id = 94, od = 122
/// assert!((g.od_mm - 122.0).abs() < 1e-9);
/// assert!((g.effective_diameter_mm - 108.0).abs() < 1e-9);
/// ```
pub fn gasket_geometry(
    nominal_size: f64,
    pressure_class: u32,
    facing: Facing,
    thickness_mm: f64,
    material: &str,
) -> GasketGeometry {
    let width_mm = gasket_width(nominal_size, pressure_class, facing, thickness_mm);
    let id_mm = (nominal_size - 6.0).max(MIN_GASKET_ID_MM);
    let od_mm = id_mm + 2.0 * width_mm;
    let effective_diameter_mm = (id_mm + od_mm) / 2.0;
    let effective_width_mm = (0.8 * width_mm).clamp(MIN_EFFECTIVE_WIDTH_MM, MAX_EFFECTIVE_WIDTH_MM);
    let (factors, factors_fallback) = gasket_factors(material);

    GasketGeometry {
        effective_diameter_mm,
        effective_width_mm,
        width_mm,
        id_mm,
        od_mm,
        material: material.to_string(),
        thickness_mm,
        facing,
        m: factors.m,
        y_mpa: factors.y_mpa,
        factors_fallback,
    }
}

/// [`gasket_geometry`] from a [`GasketSpec`]
pub fn gasket_geometry_for(nominal_size: f64, pressure_class: u32, spec: &GasketSpec) -> GasketGeometry {
    gasket_geometry(nominal_size, pressure_class, spec.facing, spec.thickness_mm, &spec.material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rf_dn100_pn16() {
        let g = gasket_geometry(100.0, 16, Facing::RaisedFace, 2.0, "fiber");
        assert!((g.width_mm - 14.0).abs() < 1e-12);
        assert_eq!(g.id_mm, 94.0);
        assert!((g.effective_width_mm - 11.2).abs() < 1e-12);
        assert_eq!(g.m, 2.0);
        assert_eq!(g.y_mpa, 11.0);
        assert!(!g.factors_fallback);
    }

    #[test]
    fn test_all_factors_multiply() {
        // 14 · 1.15 · 1.10 · 1.08 = 19.1268
        let w = gasket_width(100.0, 400, Facing::FlatFace, 3.0);
        assert!((w - 19.1268).abs() < 1e-9);
    }

    #[test]
    fn test_width_cap() {
        let g = gasket_geometry(1000.0, 16, Facing::RaisedFace, 2.0, "fiber");
        assert_eq!(g.width_mm, MAX_GASKET_WIDTH_MM);
        assert_eq!(g.effective_width_mm, MAX_EFFECTIVE_WIDTH_MM);
    }

    #[test]
    fn test_small_dn_floors() {
        let g = gasket_geometry(10.0, 16, Facing::InsideBoltCircle, 1.0, "ptfe");
        assert_eq!(g.id_mm, MIN_GASKET_ID_MM);
        assert_eq!(g.effective_width_mm, MIN_EFFECTIVE_WIDTH_MM);
    }

    #[test]
    fn test_degenerate_input_still_returns() {
        let g = gasket_geometry(-50.0, 0, Facing::RaisedFace, -1.0, "unknown");
        assert!(g.od_mm > g.id_mm);
        assert!(g.factors_fallback);
    }

    #[test]
    fn test_class_factor_steps() {
        assert_eq!(class_factor(100), 1.0);
        assert_eq!(class_factor(160), 1.05);
        assert_eq!(class_factor(250), 1.10);
        assert_eq!(class_factor(320), 1.15);
    }

    #[test]
    fn test_facing_serialization() {
        let json = serde_json::to_string(&Facing::InsideBoltCircle).unwrap();
        assert_eq!(json, "\"IBC\"");
        assert_eq!(Facing::from_str_flexible("raised face").unwrap(), Facing::RaisedFace);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn od_exceeds_id_and_width_bounded(
            dn in 10.0_f64..2000.0,
            pn in 1_u32..500,
            facing_idx in 0_usize..3,
            thickness in 0.5_f64..8.0,
        ) {
            let g = gasket_geometry(dn, pn, Facing::ALL[facing_idx], thickness, "spiral_wound");
            prop_assert!(g.od_mm > g.id_mm);
            prop_assert!(g.effective_width_mm <= MAX_EFFECTIVE_WIDTH_MM);
            prop_assert!(g.effective_width_mm >= MIN_EFFECTIVE_WIDTH_MM);
            prop_assert!(g.width_mm <= MAX_GASKET_WIDTH_MM);
        }
    }
}
