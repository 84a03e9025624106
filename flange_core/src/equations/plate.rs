//! # Blind Flange Plate Equations
//!
//! Required plate thickness of a bolted blind flange under two closed-form
//! rules, the standard plate ladder, and plate weight.
//!
//! ## ASME (UG-34 with edge moment)
//!
//! ```text
//! t = G · √( C·P/S + 1.9·W·h_G / (S·G³) )      C = 0.3
//! ```
//!
//! ## EN (flat end, simply supported, plus gasket moment)
//!
//! ```text
//! t = √( (k·G²·P + (3/π)·W·h_G / G) / (0.95·S) )      k = 3(3 + ν)/32, ν = 0.3
//! ```
//!
//! Both are evaluated for the operating case (design pressure, bolt load
//! max(Wm1, Wm2_op), operating allowable at design temperature) and the test
//! case (test pressure, Wm2_hydro, test allowable at test temperature). The
//! larger result per rule is that rule's requirement; the larger rule governs.

use serde::{Deserialize, Serialize};

use crate::equations::stress::DesignCode;
use crate::units::{mm3_to_m3, Bar, MegaPascals};

/// UG-34 attachment factor for a bolted blind flange
pub const ASME_ATTACHMENT_FACTOR: f64 = 0.3;
/// Edge-moment coefficient in the ASME formula
pub const ASME_EDGE_MOMENT_FACTOR: f64 = 1.9;
/// Poisson's ratio for steel
pub const POISSON_RATIO: f64 = 0.3;
/// Bending capacity factor in the EN formula
pub const EN_BENDING_FACTOR: f64 = 0.95;
/// Smallest gasket moment arm h_G (mm)
pub const MIN_LEVER_ARM_MM: f64 = 4.0;

/// Standard plate thicknesses (mm), ascending
pub const PLATE_LADDER_MM: [f64; 39] = [
    6.0, 8.0, 10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 25.0, 28.0, 30.0, 32.0, 35.0, 38.0, 40.0,
    45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0, 110.0, 120.0, 130.0, 140.0,
    150.0, 160.0, 180.0, 200.0, 220.0, 250.0,
];

/// Pressure coefficient k = 3(3 + ν)/32 of a simply supported circular plate
#[inline]
pub fn en_pressure_coefficient() -> f64 {
    3.0 * (3.0 + POISSON_RATIO) / 32.0
}

/// Gasket moment arm h_G = max((C − G)/2, 4)
#[inline]
pub fn lever_arm(bolt_circle_mm: f64, gasket_diameter_mm: f64) -> f64 {
    ((bolt_circle_mm - gasket_diameter_mm) / 2.0).max(MIN_LEVER_ARM_MM)
}

/// ASME blind flange thickness (mm). Infinite when `s_mpa` is not positive.
pub fn asme_thickness(g_mm: f64, p: MegaPascals, w_n: f64, h_g_mm: f64, s_mpa: f64) -> f64 {
    if s_mpa <= 0.0 || g_mm <= 0.0 {
        return f64::INFINITY;
    }
    let term = ASME_ATTACHMENT_FACTOR * p.0 / s_mpa + ASME_EDGE_MOMENT_FACTOR * w_n * h_g_mm / (s_mpa * g_mm.powi(3));
    g_mm * term.max(0.0).sqrt()
}

/// EN flat-end thickness (mm). Infinite when `s_mpa` is not positive.
pub fn en_thickness(g_mm: f64, p: MegaPascals, w_n: f64, h_g_mm: f64, s_mpa: f64) -> f64 {
    if s_mpa <= 0.0 || g_mm <= 0.0 {
        return f64::INFINITY;
    }
    let pressure = en_pressure_coefficient() * g_mm * g_mm * p.0;
    let moment = (3.0 / std::f64::consts::PI) * w_n * h_g_mm / g_mm;
    ((pressure + moment).max(0.0) / (EN_BENDING_FACTOR * s_mpa)).sqrt()
}

/// Rule that sets the required thickness, with its value (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", content = "thickness_mm")]
pub enum ThicknessGoverning {
    #[serde(rename = "ASME")]
    Asme(f64),
    #[serde(rename = "EN")]
    En(f64),
}

impl ThicknessGoverning {
    /// Pick the larger requirement; equal values go to ASME
    pub fn select(asme_mm: f64, en_mm: f64) -> Self {
        if en_mm > asme_mm {
            ThicknessGoverning::En(en_mm)
        } else {
            ThicknessGoverning::Asme(asme_mm)
        }
    }

    pub fn thickness_mm(&self) -> f64 {
        match *self {
            ThicknessGoverning::Asme(t) | ThicknessGoverning::En(t) => t,
        }
    }

    pub fn code(&self) -> DesignCode {
        match self {
            ThicknessGoverning::Asme(_) => DesignCode::Asme,
            ThicknessGoverning::En(_) => DesignCode::En,
        }
    }
}

/// Plate allowables for both rules and both cases (MPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateAllowables {
    /// ASME operating allowable at design temperature
    pub asme_op_mpa: f64,
    /// ASME test allowable at test temperature
    pub asme_test_mpa: f64,
    /// EN operating allowable at design temperature
    pub en_op_mpa: f64,
    /// EN test allowable at test temperature
    pub en_test_mpa: f64,
}

/// Loads acting on the plate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessDemand {
    /// Effective gasket diameter G (mm)
    pub gasket_diameter_mm: f64,
    /// Gasket moment arm h_G (mm)
    pub lever_arm_mm: f64,
    pub design_pressure_bar: f64,
    pub test_pressure_bar: f64,
    /// max(Wm1, Wm2_op) (N)
    pub operating_load_n: f64,
    /// Wm2_hydro (N)
    pub test_load_n: f64,
}

/// Thickness requirement with the per-case trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredThickness {
    pub asme_operating_mm: f64,
    pub asme_test_mm: f64,
    pub en_operating_mm: f64,
    pub en_test_mm: f64,
    /// max of the two ASME cases
    pub asme_mm: f64,
    /// max of the two EN cases
    pub en_mm: f64,
    pub governing: ThicknessGoverning,
    pub corrosion_allowance_mm: f64,
    /// governing + corrosion allowance
    pub final_mm: f64,
    /// Smallest ladder plate ≥ final
    pub recommended_mm: f64,
}

impl RequiredThickness {
    /// Governing requirement without corrosion allowance
    pub fn raw_mm(&self) -> f64 {
        self.governing.thickness_mm()
    }
}

/// Required thickness under both rules for both cases.
///
/// ```rust
/// use flange_core::equations::plate::{required_thickness, PlateAllowables, ThicknessDemand};
///
/// let demand = ThicknessDemand {
///     gasket_diameter_mm: 108.0,
///     lever_arm_mm: 36.0,
///     design_pressure_bar: 16.0,
///     test_pressure_bar: 22.88,
///     operating_load_n: 41_000.0,
///     test_load_n: 52_000.0,
/// };
/// let s = PlateAllowables { asme_op_mpa: 150.0, asme_test_mpa: 230.0, en_op_mpa: 150.0, en_test_mpa: 240.0 };
/// let t = required_thickness(&demand, &s, 1.0);
/// assert!(t.final_mm > t.raw_mm());
/// assert!(t.recommended_mm >= t.final_mm);
/// ```
pub fn required_thickness(
    demand: &ThicknessDemand,
    allowables: &PlateAllowables,
    corrosion_allowance_mm: f64,
) -> RequiredThickness {
    let g = demand.gasket_diameter_mm;
    let h = demand.lever_arm_mm;
    let p_design: MegaPascals = Bar(demand.design_pressure_bar).into();
    let p_test: MegaPascals = Bar(demand.test_pressure_bar).into();

    let asme_operating_mm = asme_thickness(g, p_design, demand.operating_load_n, h, allowables.asme_op_mpa);
    let asme_test_mm = asme_thickness(g, p_test, demand.test_load_n, h, allowables.asme_test_mpa);
    let en_operating_mm = en_thickness(g, p_design, demand.operating_load_n, h, allowables.en_op_mpa);
    let en_test_mm = en_thickness(g, p_test, demand.test_load_n, h, allowables.en_test_mpa);

    let asme_mm = asme_operating_mm.max(asme_test_mm);
    let en_mm = en_operating_mm.max(en_test_mm);
    let governing = ThicknessGoverning::select(asme_mm, en_mm);
    let final_mm = governing.thickness_mm() + corrosion_allowance_mm;

    RequiredThickness {
        asme_operating_mm,
        asme_test_mm,
        en_operating_mm,
        en_test_mm,
        asme_mm,
        en_mm,
        governing,
        corrosion_allowance_mm,
        final_mm,
        recommended_mm: recommended_plate_thickness(final_mm),
    }
}

/// Smallest standard plate ≥ `thickness_mm`; above the ladder, the next
/// whole millimetre.
pub fn recommended_plate_thickness(thickness_mm: f64) -> f64 {
    PLATE_LADDER_MM
        .iter()
        .copied()
        .find(|&plate| plate >= thickness_mm)
        .unwrap_or_else(|| thickness_mm.ceil())
}

/// Estimated plate weight (kg) of the undrilled disc
///
/// Layouts on the same plate weigh the same, so ranking falls through to
/// thickness and bolt count.
///
/// # Formula
/// m = π/4·D² · t · ρ
pub fn blind_flange_weight(outer_diameter_mm: f64, thickness_mm: f64, density_kg_m3: f64) -> f64 {
    let disc = std::f64::consts::PI / 4.0 * outer_diameter_mm * outer_diameter_mm;
    mm3_to_m3(disc * thickness_mm) * density_kg_m3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowables(s: f64) -> PlateAllowables {
        PlateAllowables {
            asme_op_mpa: s,
            asme_test_mpa: s,
            en_op_mpa: s,
            en_test_mpa: s,
        }
    }

    #[test]
    fn test_asme_pressure_only() {
        // No bolt moment: t = G·√(0.3·P/S)
        let t = asme_thickness(200.0, MegaPascals(1.0), 0.0, 10.0, 150.0);
        assert!((t - 200.0 * (0.3_f64 / 150.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_en_pressure_only() {
        let t = en_thickness(200.0, MegaPascals(1.0), 0.0, 10.0, 150.0);
        let expected = (0.309375_f64 * 200.0 * 200.0 / (0.95 * 150.0)).sqrt();
        assert!((t - expected).abs() < 1e-9);
        assert!((en_pressure_coefficient() - 0.309375).abs() < 1e-12);
    }

    #[test]
    fn test_bolt_moment_increases_thickness() {
        let base = asme_thickness(200.0, MegaPascals(1.0), 0.0, 20.0, 150.0);
        let with_moment = asme_thickness(200.0, MegaPascals(1.0), 200_000.0, 20.0, 150.0);
        assert!(with_moment > base);
    }

    #[test]
    fn test_zero_allowable_is_infinite() {
        assert!(asme_thickness(100.0, MegaPascals(1.0), 1.0, 4.0, 0.0).is_infinite());
        assert!(en_thickness(100.0, MegaPascals(1.0), 1.0, 4.0, -5.0).is_infinite());
    }

    #[test]
    fn test_governing_selection_and_tie() {
        assert_eq!(ThicknessGoverning::select(10.0, 12.0), ThicknessGoverning::En(12.0));
        assert_eq!(ThicknessGoverning::select(12.0, 10.0), ThicknessGoverning::Asme(12.0));
        assert_eq!(ThicknessGoverning::select(10.0, 10.0).code(), DesignCode::Asme);
    }

    #[test]
    fn test_required_thickness_takes_worst_case() {
        let demand = ThicknessDemand {
            gasket_diameter_mm: 300.0,
            lever_arm_mm: 30.0,
            design_pressure_bar: 40.0,
            test_pressure_bar: 57.2,
            operating_load_n: 400_000.0,
            test_load_n: 450_000.0,
        };
        let t = required_thickness(&demand, &allowables(140.0), 3.0);
        assert_eq!(t.asme_mm, t.asme_operating_mm.max(t.asme_test_mm));
        assert_eq!(t.en_mm, t.en_operating_mm.max(t.en_test_mm));
        assert_eq!(t.raw_mm(), t.asme_mm.max(t.en_mm));
        assert!((t.final_mm - t.raw_mm() - 3.0).abs() < 1e-12);
        assert!(PLATE_LADDER_MM.contains(&t.recommended_mm));
    }

    #[test]
    fn test_lever_arm_floor() {
        assert_eq!(lever_arm(180.0, 108.0), 36.0);
        assert_eq!(lever_arm(110.0, 108.0), MIN_LEVER_ARM_MM);
    }

    #[test]
    fn test_plate_ladder() {
        assert_eq!(recommended_plate_thickness(0.5), 6.0);
        assert_eq!(recommended_plate_thickness(25.0), 25.0);
        assert_eq!(recommended_plate_thickness(25.01), 28.0);
        assert_eq!(recommended_plate_thickness(250.0), 250.0);
        assert_eq!(recommended_plate_thickness(263.2), 264.0);
    }

    #[test]
    fn test_weight() {
        // Undrilled 1 m disc, 10 mm, steel: π/4 · 1e6 · 10 · 7850e-9
        let w = blind_flange_weight(1000.0, 10.0, 7850.0);
        assert!((w - std::f64::consts::PI / 4.0 * 78.5).abs() < 1e-9);
        assert!((blind_flange_weight(1000.0, 20.0, 7850.0) - 2.0 * w).abs() < 1e-9);
    }

    #[test]
    fn test_governing_serialization() {
        let json = serde_json::to_string(&ThicknessGoverning::En(12.5)).unwrap();
        assert_eq!(json, r#"{"code":"EN","thickness_mm":12.5}"#);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn recommended_is_at_least_final(t in 0.0_f64..400.0) {
            let r = recommended_plate_thickness(t);
            prop_assert!(r >= t);
        }

        #[test]
        fn thickness_grows_with_pressure(
            g in 50.0_f64..1500.0,
            p in 0.1_f64..10.0,
            w in 0.0_f64..5.0e6,
            s in 50.0_f64..300.0,
        ) {
            let lo = en_thickness(g, MegaPascals(p), w, 10.0, s);
            let hi = en_thickness(g, MegaPascals(p * 1.5), w, 10.0, s);
            prop_assert!(hi >= lo);
            let lo = asme_thickness(g, MegaPascals(p), w, 10.0, s);
            let hi = asme_thickness(g, MegaPascals(p * 1.5), w, 10.0, s);
            prop_assert!(hi >= lo);
        }
    }
}
