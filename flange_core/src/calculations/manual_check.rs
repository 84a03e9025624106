//! # Manual Geometry Verification
//!
//! Checks a fully specified blind flange (bolt circle, bolt count and size,
//! outer diameter, thickness) against the same physics the sizing search
//! uses.
//!
//! ## Order of checks
//!
//! 1. Every geometric field present and positive. Failures stop here.
//! 2. Hydrotest and gasket load summary, then edge and spacing clearances.
//!    Clearance failures stop here with the summaries filled in.
//! 3. Placeholder fastener data is recorded as a blocking error.
//! 4. Bolt area for seating, operating and hydrotest.
//! 5. Plate thickness: supplied ≥ required + corrosion allowance.
//!
//! Torque is reported only when the bolt area passes with real fastener data.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::input::{fastener_note, DesignBasis, FlangeInput};
use crate::equations::{
    bolt_area_check_split, bolt_torque, fastener_feature_od, geometry_check, lever_arm, required_thickness,
    BoltAreaCheck, BoltingLoads, DesignCode, FeatureOd, GasketGeometry, GeometryCheck, HydrotestResult, LoadCase,
    RequiredThickness, ThicknessDemand, TorqueResult,
};
use crate::materials::{resolve_fastener, BoltSize, FastenerSelection, FastenerSpec, ThreadSpec};

/// User-specified flange geometry.
///
/// ## JSON Example
///
/// ```json
/// {
///   "bolt_circle_mm": 180.0,
///   "bolt_count": 8,
///   "bolt_size": "M16",
///   "outer_diameter_mm": 220.0,
///   "thickness_mm": 24.0,
///   "fastener": { "standard": "EN", "fastener_type": "BOLT", "grade_id": "8.8" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualGeometry {
    #[serde(default)]
    pub bolt_circle_mm: Option<f64>,
    #[serde(default)]
    pub bolt_count: Option<u32>,
    #[serde(default)]
    pub bolt_size: Option<String>,
    #[serde(default)]
    pub outer_diameter_mm: Option<f64>,
    #[serde(default)]
    pub thickness_mm: Option<f64>,
    pub fastener: FastenerSelection,
}

/// Geometry that passed presence and positivity validation
#[derive(Debug, Clone, Copy)]
struct ValidGeometry {
    bolt_circle_mm: f64,
    bolt_count: u32,
    thread: &'static ThreadSpec,
    outer_diameter_mm: f64,
    thickness_mm: f64,
}

fn positive(name: &str, value: Option<f64>, errors: &mut Vec<String>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            errors.push(format!("{} must be positive (got {})", name, v));
            0.0
        }
        None => {
            errors.push(format!("{} is required", name));
            0.0
        }
    }
}

impl ManualGeometry {
    /// Collect every presence and positivity error at once
    fn validate(&self) -> Result<ValidGeometry, Vec<String>> {
        let mut errors = Vec::new();

        let bolt_circle_mm = positive("Bolt circle", self.bolt_circle_mm, &mut errors);
        let outer_diameter_mm = positive("Outer diameter", self.outer_diameter_mm, &mut errors);
        let thickness_mm = positive("Thickness", self.thickness_mm, &mut errors);

        let bolt_count = match self.bolt_count {
            Some(n) if n > 0 => n,
            Some(_) => {
                errors.push("Bolt count must be positive (got 0)".to_string());
                0
            }
            None => {
                errors.push("Bolt count is required".to_string());
                0
            }
        };

        let thread = match self.bolt_size.as_deref().map(BoltSize::parse) {
            Some(Ok(size)) => size.spec(),
            Some(Err(e)) => {
                errors.push(e.to_string());
                None
            }
            None => {
                errors.push("Bolt size is required".to_string());
                None
            }
        };

        match thread {
            Some(thread) if errors.is_empty() => Ok(ValidGeometry {
                bolt_circle_mm,
                bolt_count,
                thread,
                outer_diameter_mm,
                thickness_mm,
            }),
            _ => Err(errors),
        }
    }
}

/// Gasket geometry with the loads it produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasketLoadSummary {
    pub geometry: GasketGeometry,
    pub loads: BoltingLoads,
}

/// Bolt-area check with per-case utilization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoltCheckSummary {
    pub fastener: FastenerSpec,
    pub check: BoltAreaCheck,
    pub utilization_seating: f64,
    pub utilization_operating: f64,
    pub utilization_hydro: f64,
}

impl BoltCheckSummary {
    fn new(fastener: FastenerSpec, check: BoltAreaCheck) -> Self {
        BoltCheckSummary {
            fastener,
            utilization_seating: check.utilization(LoadCase::Seating),
            utilization_operating: check.utilization(LoadCase::Operating),
            utilization_hydro: check.utilization(LoadCase::Hydrotest),
            check,
        }
    }
}

/// Supplied thickness against the requirement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThicknessCheckSummary {
    pub supplied_mm: f64,
    pub required: RequiredThickness,
    pub corrosion_allowance_mm: f64,
    /// Governing requirement + corrosion allowance
    pub required_with_ca_mm: f64,
    /// required_with_ca / supplied
    pub utilization: f64,
    pub pass: bool,
}

/// Verification result; summaries are `None` for steps never reached
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ManualCheckResult {
    pub pass: bool,
    pub errors: Vec<String>,
    pub hydrotest: Option<HydrotestResult>,
    pub gasket: Option<GasketLoadSummary>,
    pub feature: Option<FeatureOd>,
    pub geometry: Option<GeometryCheck>,
    pub bolts: Option<BoltCheckSummary>,
    pub thickness: Option<ThicknessCheckSummary>,
    pub torque: Option<TorqueResult>,
    pub governing_case: Option<LoadCase>,
    pub governing_code: Option<DesignCode>,
    pub notes: Vec<String>,
}

impl ManualCheckResult {
    fn rejected(errors: Vec<String>) -> Self {
        ManualCheckResult {
            errors,
            ..Default::default()
        }
    }
}

/// Verify a user-specified geometry at a pressure class.
pub fn verify_manual_geometry(
    input: &FlangeInput,
    geometry: &ManualGeometry,
    pressure_class: u32,
) -> ManualCheckResult {
    // Step 1: presence and positivity
    let mut errors = Vec::new();
    if let Err(e) = input.validate() {
        errors.push(e.to_string());
    }
    let valid = match geometry.validate() {
        Ok(valid) if errors.is_empty() => valid,
        Ok(_) => return ManualCheckResult::rejected(errors),
        Err(geometry_errors) => {
            errors.extend(geometry_errors);
            debug!(count = errors.len(), "manual geometry rejected by validation");
            return ManualCheckResult::rejected(errors);
        }
    };

    // Step 2: summaries, then clearances
    let basis = DesignBasis::derive(input, pressure_class);
    let mut result = ManualCheckResult {
        hydrotest: Some(basis.hydrotest.clone()),
        gasket: Some(GasketLoadSummary {
            geometry: basis.gasket.clone(),
            loads: basis.loads,
        }),
        notes: basis.notes.clone(),
        ..Default::default()
    };

    let thread = valid.thread;
    let fastener = resolve_fastener(&geometry.fastener, Some(thread.diameter_mm));
    if let Some(note) = fastener_note(&fastener) {
        result.notes.push(note);
    }

    let feature = fastener_feature_od(fastener.standard, thread);
    if feature.approximated {
        warn!(size = thread.designation, "ASME fastener envelope approximated from metric hardware");
        result.notes.push(format!(
            "{} fastener envelope approximated from metric washer dimensions",
            fastener.standard
        ));
    }
    result.feature = Some(feature);

    let clearances = geometry_check(
        valid.bolt_circle_mm,
        valid.outer_diameter_mm,
        valid.bolt_count,
        feature.diameter_mm,
    );
    let clearances_pass = clearances.pass;
    errors.extend(clearances.messages.iter().cloned());
    result.geometry = Some(clearances);
    if !clearances_pass {
        result.errors = errors;
        return result;
    }

    // Step 3: placeholder data blocks
    let placeholder = fastener.is_placeholder();
    if placeholder {
        warn!(grade = %fastener.grade_id, "verification blocked: placeholder fastener grade");
        errors.push(format!(
            "Fastener grade {} {} has placeholder property data; verification cannot pass",
            fastener.standard, fastener.grade_id
        ));
    }

    // Step 4: bolt area
    let check = bolt_area_check_split(
        &basis.loads,
        fastener.properties.allowable_op_mpa,
        fastener.properties.allowable_test_mpa,
        valid.bolt_count,
        thread.stress_area_mm2,
    );
    if !check.pass {
        errors.push(format!(
            "Bolt area: {} x {} provides {:.0} mm², {} requires {:.0} mm²",
            valid.bolt_count,
            thread.designation,
            check.provided_area_mm2,
            check.governing_case,
            check.max_required()
        ));
    }
    result.governing_case = Some(check.governing_case);

    // Step 5: thickness
    let demand = ThicknessDemand {
        gasket_diameter_mm: basis.gasket.effective_diameter_mm,
        lever_arm_mm: lever_arm(valid.bolt_circle_mm, basis.gasket.effective_diameter_mm),
        design_pressure_bar: input.design_pressure_bar,
        test_pressure_bar: basis.hydrotest.test_pressure_bar,
        operating_load_n: basis.operating_plate_load(),
        test_load_n: basis.loads.wm2_hydro_n,
    };
    let required = required_thickness(&demand, &basis.plate_allowables, input.corrosion_allowance_mm);
    let thickness_pass = valid.thickness_mm >= required.final_mm;
    if !thickness_pass {
        errors.push(format!(
            "Thickness: {:.1} mm supplied, {:.1} mm required ({:.1} mm {} + {:.1} mm corrosion allowance)",
            valid.thickness_mm,
            required.final_mm,
            required.raw_mm(),
            required.governing.code(),
            required.corrosion_allowance_mm
        ));
    }
    result.governing_code = Some(required.governing.code());
    result.thickness = Some(ThicknessCheckSummary {
        supplied_mm: valid.thickness_mm,
        corrosion_allowance_mm: required.corrosion_allowance_mm,
        required_with_ca_mm: required.final_mm,
        utilization: required.final_mm / valid.thickness_mm,
        pass: thickness_pass,
        required,
    });

    if check.pass && !placeholder {
        result.torque = Some(bolt_torque(
            check.governing_case,
            basis.loads.load(check.governing_case),
            valid.bolt_count,
            thread.diameter_mm,
            thread.stress_area_mm2,
            fastener.properties.proof_mpa,
            input.lubrication,
        ));
    }

    result.pass = errors.is_empty() && clearances_pass && check.pass && thickness_pass;
    result.bolts = Some(BoltCheckSummary::new(fastener, check));
    result.errors = errors;

    debug!(pass = result.pass, errors = result.errors.len(), "manual verification complete");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{FastenerStandard, FastenerType};
    use crate::standards;

    fn input() -> FlangeInput {
        let mut input = FlangeInput::new(100, 16.0, 150.0, "P265GH");
        input.corrosion_allowance_mm = 1.0;
        input
    }

    /// EN 1092-1 DN100 PN16 blind flange with 8.8 bolts
    fn catalog_geometry(thickness_mm: f64) -> ManualGeometry {
        let f = standards::lookup(100, 16).unwrap();
        ManualGeometry {
            bolt_circle_mm: Some(f.bolt_circle_mm),
            bolt_count: Some(f.bolt_count),
            bolt_size: Some(f.thread_size.to_string()),
            outer_diameter_mm: Some(f.outer_diameter_mm),
            thickness_mm: Some(thickness_mm),
            fastener: FastenerSelection::new(FastenerStandard::En, FastenerType::Bolt, "8.8"),
        }
    }

    #[test]
    fn test_catalog_flange_passes() {
        let r = verify_manual_geometry(&input(), &catalog_geometry(40.0), 16);
        assert!(r.pass, "{:?}", r.errors);
        assert!(r.errors.is_empty());
        assert!(r.torque.is_some());
        assert!(r.governing_code.is_some());
        let bolts = r.bolts.unwrap();
        assert!(bolts.utilization_seating <= 1.0);
        assert!(bolts.utilization_hydro <= 1.0);
    }

    #[test]
    fn test_thin_plate_fails_thickness_only() {
        let r = verify_manual_geometry(&input(), &catalog_geometry(6.0), 16);
        assert!(!r.pass);
        let t = r.thickness.unwrap();
        assert!(!t.pass);
        assert!(t.utilization > 1.0);
        assert!((t.required_with_ca_mm - t.required.raw_mm() - 1.0).abs() < 1e-9);
        assert!(r.bolts.unwrap().check.pass);
        assert!(r.torque.is_some());
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].starts_with("Thickness"));
    }

    #[test]
    fn test_validation_short_circuits_with_all_errors() {
        let mut g = catalog_geometry(30.0);
        g.bolt_circle_mm = None;
        g.thickness_mm = Some(-2.0);
        g.bolt_size = Some("M17".to_string());
        let r = verify_manual_geometry(&input(), &g, 16);
        assert!(!r.pass);
        assert_eq!(r.errors.len(), 3);
        assert!(r.hydrotest.is_none());
        assert!(r.gasket.is_none());
        assert!(r.geometry.is_none());
    }

    #[test]
    fn test_invalid_input_short_circuits() {
        let mut bad = input();
        bad.design_pressure_bar = -1.0;
        let r = verify_manual_geometry(&bad, &catalog_geometry(30.0), 16);
        assert!(!r.pass);
        assert_eq!(r.errors.len(), 1);
        assert!(r.hydrotest.is_none());
    }

    #[test]
    fn test_geometry_failure_keeps_partial_summaries() {
        let mut g = catalog_geometry(30.0);
        g.outer_diameter_mm = Some(190.0);
        let r = verify_manual_geometry(&input(), &g, 16);
        assert!(!r.pass);
        assert!(r.hydrotest.is_some());
        assert!(r.gasket.is_some());
        assert!(!r.geometry.as_ref().unwrap().pass);
        assert!(r.bolts.is_none());
        assert!(r.thickness.is_none());
        assert!(r.torque.is_none());
        assert!(r.errors[0].starts_with("Edge clearance"));
    }

    #[test]
    fn test_spacing_failure_alone_short_circuits() {
        // 24 x M16 on C = 180: pitch 23.6 mm against 32 mm needed, rim still clear
        let mut g = catalog_geometry(40.0);
        g.bolt_count = Some(24);
        let r = verify_manual_geometry(&input(), &g, 16);
        assert!(!r.pass);
        let geometry = r.geometry.as_ref().unwrap();
        assert!(geometry.edge_pass);
        assert!(!geometry.spacing_pass);
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].starts_with("Bolt spacing"));
        assert!(r.errors[0].contains("short by"));
        assert!(r.hydrotest.is_some());
        assert!(r.bolts.is_none());
        assert!(r.thickness.is_none());
        assert!(r.torque.is_none());
    }

    #[test]
    fn test_verification_is_idempotent() {
        let passing = catalog_geometry(40.0);
        assert_eq!(
            verify_manual_geometry(&input(), &passing, 16),
            verify_manual_geometry(&input(), &passing, 16)
        );

        let mut failing = catalog_geometry(6.0);
        failing.bolt_count = Some(24);
        assert_eq!(
            verify_manual_geometry(&input(), &failing, 16),
            verify_manual_geometry(&input(), &failing, 16)
        );
    }

    #[test]
    fn test_placeholder_never_passes() {
        let mut g = catalog_geometry(60.0);
        g.fastener = FastenerSelection::new(FastenerStandard::En, FastenerType::Stud, "21CrMoV5-7");
        let r = verify_manual_geometry(&input(), &g, 16);
        assert!(!r.pass);
        assert!(r.torque.is_none());
        assert!(r.errors.iter().any(|e| e.contains("placeholder")));
    }

    #[test]
    fn test_insufficient_bolts() {
        let mut g = catalog_geometry(60.0);
        g.bolt_count = Some(1);
        g.fastener = FastenerSelection::new(FastenerStandard::En, FastenerType::Bolt, "5.6");
        let r = verify_manual_geometry(&input(), &g, 16);
        assert!(!r.pass);
        let bolts = r.bolts.unwrap();
        assert!(!bolts.check.pass);
        assert!(bolts.utilization_seating > 1.0);
        assert!(r.torque.is_none());
        assert!(r.errors.iter().any(|e| e.starts_with("Bolt area")));
    }

    #[test]
    fn test_result_serializes() {
        let r = verify_manual_geometry(&input(), &catalog_geometry(40.0), 16);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["pass"], true);
        assert!(json["thickness"]["required"]["governing"]["code"].is_string());
    }

    #[test]
    fn test_geometry_json() {
        let json = r#"{
            "bolt_circle_mm": 180.0,
            "bolt_count": 8,
            "bolt_size": "m16",
            "outer_diameter_mm": 220.0,
            "thickness_mm": 24.0,
            "fastener": { "standard": "EN", "grade_id": "8.8" }
        }"#;
        let g: ManualGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(g.bolt_count, Some(8));
        assert!(g.validate().is_ok());
    }
}
