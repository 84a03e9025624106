//! # Bolting Equations
//!
//! Gasket-reaction bolt loads, required bolt area, fastener envelope for the
//! spacing checks, and tightening torque.
//!
//! ## Notation
//!
//! - `G` = effective gasket diameter (mm)
//! - `b` = effective gasket width (mm)
//! - `m`, `y` = gasket maintenance factor and seating stress (MPa)
//! - `P` = pressure (MPa; inputs in bar are scaled by 0.1)
//! - `C` = bolt circle diameter (mm)
//! - `D` = flange outer diameter (mm)
//! - `n` = number of bolts
//! - `f` = fastener feature diameter, washer or nut corners (mm)
//!
//! ## References
//!
//! - ASME Section VIII Division 1, Mandatory Appendix 2 (bolt loads)
//! - EN 1591-1 / VDI 2230 (K-factor torque method)

use serde::{Deserialize, Serialize};

use crate::materials::{FastenerStandard, ThreadSpec};
use crate::units::{Bar, MegaPascals, Meters, Millimeters};

/// Minimum clearance between fastener envelope and flange rim (mm)
pub const MIN_EDGE_CLEARANCE_MM: f64 = 3.0;
/// Minimum gap between neighbouring fastener envelopes (mm)
pub const MIN_BOLT_GAP_MM: f64 = 2.0;
/// Preload ceiling as a fraction of proof load
pub const PRELOAD_PROOF_FRACTION: f64 = 0.7;
/// Nut factor, dry threads
pub const K_DRY: f64 = 0.20;
/// Nut factor, lubricated threads
pub const K_LUBRICATED: f64 = 0.15;
/// Spread applied to K for the torque bracket
pub const K_TOLERANCE: f64 = 0.02;
/// Washer multiplier used to approximate ASME hardware from the metric table
pub const ASME_WASHER_FACTOR: f64 = 1.1;
/// Envelope multiplier on nominal diameter when no hardware data exists
pub const FEATURE_DIAMETER_FACTOR: f64 = 2.1;

// =============================================================================
// BOLT LOADS
// =============================================================================

/// Load case that can govern the bolting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadCase {
    Seating,
    Operating,
    Hydrotest,
}

impl LoadCase {
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadCase::Seating => "Gasket seating",
            LoadCase::Operating => "Operating",
            LoadCase::Hydrotest => "Hydrotest",
        }
    }
}

impl std::fmt::Display for LoadCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Required bolt loads for the three load cases (N)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltingLoads {
    /// Gasket seating load Wm1
    pub wm1_n: f64,
    /// Operating load Wm2 at operating pressure
    pub wm2_op_n: f64,
    /// Operating load Wm2 at hydrotest pressure
    pub wm2_hydro_n: f64,
}

impl BoltingLoads {
    /// Load for one case
    pub fn load(&self, case: LoadCase) -> f64 {
        match case {
            LoadCase::Seating => self.wm1_n,
            LoadCase::Operating => self.wm2_op_n,
            LoadCase::Hydrotest => self.wm2_hydro_n,
        }
    }
}

/// Gasket seating load
///
/// # Formula (ASME VIII-1 App. 2)
/// Wm1 = π·G·b·y
#[inline]
pub fn seating_load(g_mm: f64, b_mm: f64, y_mpa: f64) -> f64 {
    std::f64::consts::PI * g_mm * b_mm * y_mpa
}

/// Operating bolt load at pressure `p`
///
/// # Formula (ASME VIII-1 App. 2)
/// Wm2 = π·G²·P/4 + 2π·b·G·m·P
///
/// The first term is the hydrostatic end force, the second the gasket
/// compression needed to stay tight.
#[inline]
pub fn operating_load(g_mm: f64, b_mm: f64, m: f64, p: MegaPascals) -> f64 {
    let pi = std::f64::consts::PI;
    pi * g_mm * g_mm * p.0 / 4.0 + 2.0 * pi * b_mm * g_mm * m * p.0
}

/// Required bolt loads for seating, operating and hydrotest.
///
/// Pressures are in bar.
pub fn required_bolt_loads(g_mm: f64, b_mm: f64, m: f64, y_mpa: f64, p_op_bar: f64, p_test_bar: f64) -> BoltingLoads {
    BoltingLoads {
        wm1_n: seating_load(g_mm, b_mm, y_mpa),
        wm2_op_n: operating_load(g_mm, b_mm, m, Bar(p_op_bar).into()),
        wm2_hydro_n: operating_load(g_mm, b_mm, m, Bar(p_test_bar).into()),
    }
}

// =============================================================================
// BOLT AREA
// =============================================================================

/// Case with the largest requirement.
///
/// Ties resolve toward operating. When operating is not the maximum,
/// seating is checked before hydrotest.
pub fn governing_case(seating: f64, operating: f64, hydrotest: f64) -> LoadCase {
    let max = seating.max(operating).max(hydrotest);
    if operating == max {
        LoadCase::Operating
    } else if seating == max {
        LoadCase::Seating
    } else {
        LoadCase::Hydrotest
    }
}

/// Required versus provided bolt area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltAreaCheck {
    pub required_area_seating_mm2: f64,
    pub required_area_oper_mm2: f64,
    pub required_area_hydro_mm2: f64,
    pub provided_area_mm2: f64,
    pub governing_case: LoadCase,
    pub pass: bool,
}

impl BoltAreaCheck {
    /// Required area for one case
    pub fn required(&self, case: LoadCase) -> f64 {
        match case {
            LoadCase::Seating => self.required_area_seating_mm2,
            LoadCase::Operating => self.required_area_oper_mm2,
            LoadCase::Hydrotest => self.required_area_hydro_mm2,
        }
    }

    /// Largest of the three requirements
    pub fn max_required(&self) -> f64 {
        self.required(self.governing_case)
    }

    /// required / provided for one case
    pub fn utilization(&self, case: LoadCase) -> f64 {
        if self.provided_area_mm2 > 0.0 {
            self.required(case) / self.provided_area_mm2
        } else {
            f64::INFINITY
        }
    }

    /// Area missing for the governing case (negative when there is margin)
    pub fn shortfall_mm2(&self) -> f64 {
        self.max_required() - self.provided_area_mm2
    }
}

fn required_area(load_n: f64, allowable_mpa: f64) -> f64 {
    if allowable_mpa > 0.0 {
        load_n / allowable_mpa
    } else {
        f64::INFINITY
    }
}

/// Bolt area check with separate allowables: seating and operating use
/// `allowable_op_mpa`, hydrotest uses `allowable_test_mpa`.
pub fn bolt_area_check_split(
    loads: &BoltingLoads,
    allowable_op_mpa: f64,
    allowable_test_mpa: f64,
    bolt_count: u32,
    stress_area_per_bolt_mm2: f64,
) -> BoltAreaCheck {
    let seating = required_area(loads.wm1_n, allowable_op_mpa);
    let oper = required_area(loads.wm2_op_n, allowable_op_mpa);
    let hydro = required_area(loads.wm2_hydro_n, allowable_test_mpa);
    let provided = bolt_count as f64 * stress_area_per_bolt_mm2;

    BoltAreaCheck {
        required_area_seating_mm2: seating,
        required_area_oper_mm2: oper,
        required_area_hydro_mm2: hydro,
        provided_area_mm2: provided,
        governing_case: governing_case(seating, oper, hydro),
        pass: provided >= seating && provided >= oper && provided >= hydro,
    }
}

/// Bolt area check with a single allowable bolt stress for all cases.
///
/// ```rust
/// use flange_core::equations::bolting::{bolt_area_check, BoltingLoads, LoadCase};
///
/// let loads = BoltingLoads { wm1_n: 50_000.0, wm2_op_n: 80_000.0, wm2_hydro_n: 95_000.0 };
/// let check = bolt_area_check(&loads, 300.0, 4, 157.0);
/// assert_eq!(check.governing_case, LoadCase::Hydrotest);
/// assert!(check.pass); // 628 mm² ≥ 316.7 mm²
/// ```
pub fn bolt_area_check(
    loads: &BoltingLoads,
    allowable_bolt_stress_mpa: f64,
    bolt_count: u32,
    stress_area_per_bolt_mm2: f64,
) -> BoltAreaCheck {
    bolt_area_check_split(
        loads,
        allowable_bolt_stress_mpa,
        allowable_bolt_stress_mpa,
        bolt_count,
        stress_area_per_bolt_mm2,
    )
}

// =============================================================================
// FASTENER ENVELOPE AND LAYOUT GEOMETRY
// =============================================================================

/// What the feature diameter was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    WasherOd,
    NutAcrossCorners,
    DiameterMultiple,
}

/// Diameter that neighbouring fasteners and the rim must clear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureOd {
    pub diameter_mm: f64,
    pub source: FeatureSource,
    /// Derived from metric hardware for an ASME fastener; check before
    /// relying on it for tight layouts
    pub approximated: bool,
}

/// Across-corners dimension of a hex from its across-flats width
#[inline]
pub fn across_corners(across_flats_mm: f64) -> f64 {
    across_flats_mm / (std::f64::consts::PI / 6.0).cos()
}

/// Fastener envelope: washer OD, else nut across corners, else 2.1·d.
pub fn fastener_feature_od(standard: FastenerStandard, thread: &ThreadSpec) -> FeatureOd {
    let approximated = standard == FastenerStandard::Asme;

    if let Some(washer) = thread.washer_od_mm {
        let diameter_mm = if approximated { washer * ASME_WASHER_FACTOR } else { washer };
        return FeatureOd {
            diameter_mm,
            source: FeatureSource::WasherOd,
            approximated,
        };
    }

    if let Some(af) = thread.nut_across_flats_mm {
        return FeatureOd {
            diameter_mm: across_corners(af),
            source: FeatureSource::NutAcrossCorners,
            approximated,
        };
    }

    FeatureOd {
        diameter_mm: FEATURE_DIAMETER_FACTOR * thread.diameter_mm,
        source: FeatureSource::DiameterMultiple,
        approximated,
    }
}

/// Bolt pitch along the bolt circle: π·C/n
#[inline]
pub fn bolt_pitch(bolt_circle_mm: f64, bolt_count: u32) -> f64 {
    if bolt_count == 0 {
        return 0.0;
    }
    std::f64::consts::PI * bolt_circle_mm / bolt_count as f64
}

/// Smallest bolt circle that gives every fastener its spacing gap
#[inline]
pub fn min_bolt_circle_for_spacing(bolt_count: u32, feature_od_mm: f64) -> f64 {
    bolt_count as f64 * (feature_od_mm + MIN_BOLT_GAP_MM) / std::f64::consts::PI
}

/// Edge and spacing check of a bolt layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryCheck {
    /// Radius needed to the rim: C/2 + f/2 + 3 (mm)
    pub required_radius_mm: f64,
    /// Available radius D/2 (mm)
    pub available_radius_mm: f64,
    pub edge_pass: bool,
    /// π·C/n (mm)
    pub pitch_mm: f64,
    /// f + 2 (mm)
    pub required_pitch_mm: f64,
    pub spacing_pass: bool,
    pub pass: bool,
    /// One diagnostic per failed check
    pub messages: Vec<String>,
}

/// Check that fasteners clear the flange rim and each other.
pub fn geometry_check(
    bolt_circle_mm: f64,
    outer_diameter_mm: f64,
    bolt_count: u32,
    feature_od_mm: f64,
) -> GeometryCheck {
    let required_radius_mm = bolt_circle_mm / 2.0 + feature_od_mm / 2.0 + MIN_EDGE_CLEARANCE_MM;
    let available_radius_mm = outer_diameter_mm / 2.0;
    let edge_pass = required_radius_mm <= available_radius_mm;

    let pitch_mm = bolt_pitch(bolt_circle_mm, bolt_count);
    let required_pitch_mm = feature_od_mm + MIN_BOLT_GAP_MM;
    let spacing_pass = pitch_mm >= required_pitch_mm;

    let mut messages = Vec::new();
    if !edge_pass {
        messages.push(format!(
            "Edge clearance: bolt circle {:.1} mm with {:.1} mm fastener needs outer diameter {:.1} mm, \
             got {:.1} mm (short by {:.1} mm on radius)",
            bolt_circle_mm,
            feature_od_mm,
            2.0 * required_radius_mm,
            outer_diameter_mm,
            required_radius_mm - available_radius_mm
        ));
    }
    if !spacing_pass {
        messages.push(format!(
            "Bolt spacing: pitch {:.1} mm for {} bolts is below the {:.1} mm required (short by {:.1} mm)",
            pitch_mm,
            bolt_count,
            required_pitch_mm,
            required_pitch_mm - pitch_mm
        ));
    }

    GeometryCheck {
        required_radius_mm,
        available_radius_mm,
        edge_pass,
        pitch_mm,
        required_pitch_mm,
        spacing_pass,
        pass: edge_pass && spacing_pass,
        messages,
    }
}

// =============================================================================
// TORQUE
// =============================================================================

/// Thread lubrication condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lubrication {
    #[default]
    Dry,
    Lubricated,
}

impl Lubrication {
    /// Nominal nut factor K
    pub fn k_factor(&self) -> f64 {
        match self {
            Lubrication::Dry => K_DRY,
            Lubrication::Lubricated => K_LUBRICATED,
        }
    }
}

/// Tightening torque per bolt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorqueResult {
    pub lubrication: Lubrication,
    pub k_factor: f64,
    pub k_min: f64,
    pub k_max: f64,
    /// Load case the preload is sized for
    pub governing_case: LoadCase,
    /// Governing total bolt load (N)
    pub governing_load_n: f64,
    /// Governing load / n (N)
    pub required_preload_n: f64,
    /// As · proof (N)
    pub proof_load_n: f64,
    /// 70 % of proof load (N)
    pub preload_cap_n: f64,
    /// min(required, cap) (N)
    pub preload_per_bolt_n: f64,
    /// The cap bound: the joint is tightened below the governing load
    pub capped_by_proof: bool,
    /// K · F · d (N·m)
    pub torque_nm: f64,
    pub torque_min_nm: f64,
    pub torque_max_nm: f64,
}

/// Bolt torque by the K-factor method.
///
/// # Formulas
/// - F_req = W_gov / n
/// - F_cap = 0.7 · As · R_proof
/// - F = min(F_req, F_cap)
/// - T = K · F · d   (d in metres)
pub fn bolt_torque(
    governing_case: LoadCase,
    governing_load_n: f64,
    bolt_count: u32,
    diameter_mm: f64,
    stress_area_mm2: f64,
    proof_mpa: f64,
    lubrication: Lubrication,
) -> TorqueResult {
    let required_preload_n = if bolt_count > 0 {
        governing_load_n / bolt_count as f64
    } else {
        governing_load_n
    };
    let proof_load_n = stress_area_mm2 * proof_mpa;
    let preload_cap_n = proof_load_n * PRELOAD_PROOF_FRACTION;
    let capped_by_proof = required_preload_n > preload_cap_n;
    let preload_per_bolt_n = required_preload_n.min(preload_cap_n);

    let d: Meters = Millimeters(diameter_mm).into();
    let k = lubrication.k_factor();
    let k_min = k - K_TOLERANCE;
    let k_max = k + K_TOLERANCE;

    TorqueResult {
        lubrication,
        k_factor: k,
        k_min,
        k_max,
        governing_case,
        governing_load_n,
        required_preload_n,
        proof_load_n,
        preload_cap_n,
        preload_per_bolt_n,
        capped_by_proof,
        torque_nm: k * preload_per_bolt_n * d.0,
        torque_min_nm: k_min * preload_per_bolt_n * d.0,
        torque_max_nm: k_max * preload_per_bolt_n * d.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::find_thread;

    #[test]
    fn test_seating_and_operating_loads() {
        let loads = required_bolt_loads(108.0, 11.2, 2.0, 11.0, 16.0, 22.88);
        let pi = std::f64::consts::PI;
        assert!((loads.wm1_n - pi * 108.0 * 11.2 * 11.0).abs() < 1e-6);
        let expected_op = pi * 108.0 * 108.0 * 1.6 / 4.0 + 2.0 * pi * 11.2 * 108.0 * 2.0 * 1.6;
        assert!((loads.wm2_op_n - expected_op).abs() < 1e-6);
        assert!(loads.wm2_hydro_n > loads.wm2_op_n);
    }

    #[test]
    fn test_governing_case_scenario() {
        let loads = BoltingLoads { wm1_n: 50_000.0, wm2_op_n: 80_000.0, wm2_hydro_n: 95_000.0 };
        let check = bolt_area_check(&loads, 300.0, 8, 157.0);
        assert_eq!(check.governing_case, LoadCase::Hydrotest);
        assert!((check.required_area_hydro_mm2 - 316.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_governing_ties() {
        assert_eq!(governing_case(10.0, 10.0, 10.0), LoadCase::Operating);
        assert_eq!(governing_case(10.0, 10.0, 5.0), LoadCase::Operating);
        assert_eq!(governing_case(10.0, 5.0, 10.0), LoadCase::Seating);
        assert_eq!(governing_case(12.0, 5.0, 10.0), LoadCase::Seating);
        assert_eq!(governing_case(5.0, 8.0, 10.0), LoadCase::Hydrotest);
    }

    #[test]
    fn test_area_pass_requires_all_cases() {
        let loads = BoltingLoads { wm1_n: 100_000.0, wm2_op_n: 10_000.0, wm2_hydro_n: 10_000.0 };
        let check = bolt_area_check(&loads, 200.0, 2, 200.0);
        assert!(!check.pass);
        assert_eq!(check.governing_case, LoadCase::Seating);
        assert!((check.shortfall_mm2() - 100.0).abs() < 1e-9);
        assert!((check.utilization(LoadCase::Seating) - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_split_allowables_use_test_for_hydro() {
        let loads = BoltingLoads { wm1_n: 0.0, wm2_op_n: 0.0, wm2_hydro_n: 30_000.0 };
        let check = bolt_area_check_split(&loads, 100.0, 150.0, 4, 100.0);
        assert!((check.required_area_hydro_mm2 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_allowable_never_passes() {
        let loads = BoltingLoads { wm1_n: 1.0, wm2_op_n: 1.0, wm2_hydro_n: 1.0 };
        assert!(!bolt_area_check(&loads, 0.0, 36, 2680.0).pass);
    }

    #[test]
    fn test_feature_od_sources() {
        let m24 = find_thread("M24").unwrap();
        let en = fastener_feature_od(FastenerStandard::En, m24);
        assert_eq!(en.diameter_mm, 44.0);
        assert_eq!(en.source, FeatureSource::WasherOd);
        assert!(!en.approximated);

        let asme = fastener_feature_od(FastenerStandard::Asme, m24);
        assert!((asme.diameter_mm - 48.4).abs() < 1e-9);
        assert!(asme.approximated);

        let m64 = find_thread("M64").unwrap();
        let nut = fastener_feature_od(FastenerStandard::En, m64);
        assert_eq!(nut.source, FeatureSource::NutAcrossCorners);
        assert!((nut.diameter_mm - 95.0 / (30.0_f64).to_radians().cos()).abs() < 1e-9);
    }

    #[test]
    fn test_feature_od_without_hardware() {
        let bare = ThreadSpec {
            designation: "M80",
            diameter_mm: 80.0,
            pitch_mm: 6.0,
            stress_area_mm2: 4340.0,
            hole_diameter_mm: 86.0,
            washer_od_mm: None,
            nut_across_flats_mm: None,
        };
        let f = fastener_feature_od(FastenerStandard::En, &bare);
        assert_eq!(f.source, FeatureSource::DiameterMultiple);
        assert!((f.diameter_mm - 168.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_check_pass() {
        // EN 1092-1 DN100 PN16: D 220, K 180, 8 x M16
        let g = geometry_check(180.0, 220.0, 8, 30.0);
        assert!(g.pass, "{:?}", g.messages);
        assert!(g.messages.is_empty());
    }

    #[test]
    fn test_geometry_check_edge_failure_message() {
        let g = geometry_check(180.0, 200.0, 8, 30.0);
        assert!(!g.edge_pass);
        assert!(g.spacing_pass);
        assert_eq!(g.messages.len(), 1);
        // needs 90 + 15 + 3 = 108 on radius, has 100
        assert!(g.messages[0].contains("short by 8.0 mm"));
    }

    #[test]
    fn test_geometry_check_spacing_failure() {
        let g = geometry_check(100.0, 400.0, 12, 30.0);
        assert!(!g.spacing_pass);
        assert!(!g.pass);
        assert!(g.messages[0].starts_with("Bolt spacing"));
    }

    #[test]
    fn test_spacing_minimum_is_consistent_with_check() {
        let c = min_bolt_circle_for_spacing(16, 44.0);
        let g = geometry_check(c, c + 200.0, 16, 44.0);
        assert!((g.pitch_mm - g.required_pitch_mm).abs() < 1e-9);
    }

    #[test]
    fn test_torque_capping_scenario() {
        // 8 bolts x 160 kN required preload
        let t = bolt_torque(LoadCase::Operating, 8.0 * 160_000.0, 8, 24.0, 353.0, 580.0, Lubrication::Dry);
        assert!((t.proof_load_n - 204_740.0).abs() < 1e-6);
        assert!((t.preload_cap_n - 143_318.0).abs() < 1e-6);
        assert!(t.capped_by_proof);
        assert!((t.preload_per_bolt_n - 143_318.0).abs() < 1e-6);
        assert!((t.torque_nm - 0.20 * 143_318.0 * 0.024).abs() < 1e-6);
        assert!(t.torque_min_nm < t.torque_nm && t.torque_nm < t.torque_max_nm);
    }

    #[test]
    fn test_torque_uncapped_lubricated() {
        let t = bolt_torque(LoadCase::Seating, 400_000.0, 8, 24.0, 353.0, 580.0, Lubrication::Lubricated);
        assert!(!t.capped_by_proof);
        assert_eq!(t.preload_per_bolt_n, 50_000.0);
        assert!((t.torque_nm - 0.15 * 50_000.0 * 0.024).abs() < 1e-9);
        assert!((t.k_min - 0.13).abs() < 1e-12);
        assert!((t.k_max - 0.17).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn area_pass_iff_provided_covers_max(
            wm1 in 0.0_f64..2.0e6,
            wm2_op in 0.0_f64..2.0e6,
            wm2_hydro in 0.0_f64..2.0e6,
            allowable in 50.0_f64..400.0,
            n in 1_u32..40,
            area in 50.0_f64..3000.0,
        ) {
            let loads = BoltingLoads { wm1_n: wm1, wm2_op_n: wm2_op, wm2_hydro_n: wm2_hydro };
            let check = bolt_area_check(&loads, allowable, n, area);
            let max_required = check
                .required_area_seating_mm2
                .max(check.required_area_oper_mm2)
                .max(check.required_area_hydro_mm2);
            prop_assert_eq!(check.pass, check.provided_area_mm2 >= max_required);
            prop_assert_eq!(check.max_required(), max_required);
        }

        #[test]
        fn preload_never_exceeds_cap(
            load in 0.0_f64..5.0e6,
            n in 1_u32..40,
            area in 100.0_f64..3000.0,
            proof in 200.0_f64..1000.0,
        ) {
            let t = bolt_torque(LoadCase::Operating, load, n, 24.0, area, proof, Lubrication::Dry);
            prop_assert!(t.preload_per_bolt_n <= t.preload_cap_n + 1e-9);
            prop_assert_eq!(t.capped_by_proof, t.required_preload_n > t.preload_cap_n);
        }
    }
}
