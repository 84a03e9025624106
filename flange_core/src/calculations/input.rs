//! # Flange Design Input
//!
//! The physical inputs shared by the sizing search and the manual verifier,
//! and the [`DesignBasis`] both derive from them: hydrotest pressure, gasket
//! geometry, required bolt loads and plate allowables.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::equations::{
    allowable_stress_detail, gasket_geometry_for, hydrotest_pressure, required_bolt_loads, BoltingLoads, DesignCode,
    GasketGeometry, GasketSpec, HydrotestResult, Lubrication, PlateAllowables, StressUsage,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{find_material, FastenerSpec};

/// Density assumed for an unknown plate material (kg/m³)
pub const DEFAULT_DENSITY_KG_M3: f64 = 7850.0;

fn default_test_temp() -> f64 {
    20.0
}

/// Physical design input for one blind flange.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "N1 manway cover",
///   "nominal_size": 100,
///   "design_pressure_bar": 16.0,
///   "operating_pressure_bar": 10.0,
///   "design_temp_c": 150.0,
///   "test_temp_c": 20.0,
///   "material": "P265GH",
///   "code": "EN",
///   "corrosion_allowance_mm": 1.0,
///   "gasket": { "facing": "RF", "thickness_mm": 2.0, "material": "fiber" },
///   "lubrication": "dry"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlangeInput {
    /// User label, e.g. "N1" or "Manway cover"
    #[serde(default)]
    pub label: String,

    /// Nominal size DN
    pub nominal_size: u32,

    /// Design pressure (bar)
    pub design_pressure_bar: f64,

    /// Operating pressure (bar); the design pressure when omitted
    #[serde(default)]
    pub operating_pressure_bar: Option<f64>,

    /// Design temperature (°C)
    pub design_temp_c: f64,

    /// Hydrotest temperature (°C)
    #[serde(default = "default_test_temp")]
    pub test_temp_c: f64,

    /// Plate material id, e.g. "P265GH"
    pub material: String,

    /// Code used for the hydrotest pressure
    #[serde(default)]
    pub code: DesignCode,

    #[serde(default)]
    pub corrosion_allowance_mm: f64,

    #[serde(default)]
    pub gasket: GasketSpec,

    #[serde(default)]
    pub lubrication: Lubrication,
}

impl FlangeInput {
    /// Input with defaults for everything but the essentials
    pub fn new(nominal_size: u32, design_pressure_bar: f64, design_temp_c: f64, material: impl Into<String>) -> Self {
        FlangeInput {
            label: String::new(),
            nominal_size,
            design_pressure_bar,
            operating_pressure_bar: None,
            design_temp_c,
            test_temp_c: default_test_temp(),
            material: material.into(),
            code: DesignCode::default(),
            corrosion_allowance_mm: 0.0,
            gasket: GasketSpec::default(),
            lubrication: Lubrication::default(),
        }
    }

    /// Operating pressure, defaulting to the design pressure (bar)
    pub fn operating_pressure(&self) -> f64 {
        self.operating_pressure_bar.unwrap_or(self.design_pressure_bar)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.nominal_size == 0 {
            return Err(CalcError::invalid_input(
                "nominal_size",
                self.nominal_size.to_string(),
                "Nominal size must be positive",
            ));
        }
        if !(self.design_pressure_bar.is_finite() && self.design_pressure_bar > 0.0) {
            return Err(CalcError::invalid_input(
                "design_pressure_bar",
                self.design_pressure_bar.to_string(),
                "Design pressure must be positive",
            ));
        }
        if let Some(p) = self.operating_pressure_bar {
            if !(p.is_finite() && p >= 0.0) {
                return Err(CalcError::invalid_input(
                    "operating_pressure_bar",
                    p.to_string(),
                    "Operating pressure cannot be negative",
                ));
            }
        }
        if !self.design_temp_c.is_finite() {
            return Err(CalcError::invalid_input(
                "design_temp_c",
                self.design_temp_c.to_string(),
                "Design temperature must be a number",
            ));
        }
        if !self.test_temp_c.is_finite() {
            return Err(CalcError::invalid_input(
                "test_temp_c",
                self.test_temp_c.to_string(),
                "Test temperature must be a number",
            ));
        }
        if self.material.trim().is_empty() {
            return Err(CalcError::missing_field("material"));
        }
        if !(self.corrosion_allowance_mm.is_finite() && self.corrosion_allowance_mm >= 0.0) {
            return Err(CalcError::invalid_input(
                "corrosion_allowance_mm",
                self.corrosion_allowance_mm.to_string(),
                "Corrosion allowance cannot be negative",
            ));
        }
        if !(self.gasket.thickness_mm.is_finite() && self.gasket.thickness_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "gasket.thickness_mm",
                self.gasket.thickness_mm.to_string(),
                "Gasket thickness must be positive",
            ));
        }
        Ok(())
    }
}

/// Quantities every check derives from the input before looking at a bolt
/// layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignBasis {
    pub pressure_class: u32,
    pub hydrotest: HydrotestResult,
    pub gasket: GasketGeometry,
    pub loads: BoltingLoads,
    pub plate_allowables: PlateAllowables,
    /// Plate density (kg/m³)
    pub density_kg_m3: f64,
    /// Fallbacks and assumptions made while deriving the basis
    pub notes: Vec<String>,
}

impl DesignBasis {
    /// Derive the basis for an input at a target pressure class
    pub fn derive(input: &FlangeInput, pressure_class: u32) -> Self {
        let mut notes = Vec::new();

        let hydrotest = hydrotest_pressure(
            input.code,
            input.design_pressure_bar,
            input.operating_pressure(),
            input.design_temp_c,
            input.test_temp_c,
            &input.material,
        );

        let gasket = gasket_geometry_for(input.nominal_size as f64, pressure_class, &input.gasket);
        if gasket.factors_fallback {
            notes.push(format!(
                "Gasket material '{}' not recognized; default gasket factors m = {}, y = {} MPa used",
                input.gasket.material, gasket.m, gasket.y_mpa
            ));
        }

        let loads = required_bolt_loads(
            gasket.effective_diameter_mm,
            gasket.effective_width_mm,
            gasket.m,
            gasket.y_mpa,
            input.operating_pressure(),
            hydrotest.test_pressure_bar,
        );

        let material = input.material.as_str();
        let operating = |code| allowable_stress_detail(material, input.design_temp_c, code, StressUsage::Operating);
        let test = |code| allowable_stress_detail(material, input.test_temp_c, code, StressUsage::Test);
        let asme_op = operating(DesignCode::Asme);
        let asme_test = test(DesignCode::Asme);
        let en_op = operating(DesignCode::En);
        let en_test = test(DesignCode::En);

        let density_kg_m3 = match find_material(&input.material) {
            Some(m) => m.density_kg_m3,
            None => {
                warn!(material = %input.material, "unknown plate material, using fallback allowable and density");
                notes.push(format!(
                    "Plate material '{}' not found; fallback allowable {} MPa and density {} kg/m³ used",
                    input.material, asme_op.stress_mpa, DEFAULT_DENSITY_KG_M3
                ));
                DEFAULT_DENSITY_KG_M3
            }
        };

        if hydrotest.clamped_to_op {
            notes.push(format!(
                "Hydrotest pressure raised to operating pressure {:.2} bar",
                hydrotest.test_pressure_bar
            ));
        }

        DesignBasis {
            pressure_class,
            hydrotest,
            gasket,
            loads,
            plate_allowables: PlateAllowables {
                asme_op_mpa: asme_op.stress_mpa,
                asme_test_mpa: asme_test.stress_mpa,
                en_op_mpa: en_op.stress_mpa,
                en_test_mpa: en_test.stress_mpa,
            },
            density_kg_m3,
            notes,
        }
    }

    /// Plate bolt load for the operating thickness case: max(Wm1, Wm2_op)
    pub fn operating_plate_load(&self) -> f64 {
        self.loads.wm1_n.max(self.loads.wm2_op_n)
    }
}

/// Trace note for a fastener that fell back or carries placeholder data
pub fn fastener_note(fastener: &FastenerSpec) -> Option<String> {
    if fastener.properties.fallback {
        Some(format!(
            "Fastener grade {} {} not found; {}",
            fastener.standard, fastener.grade_id, fastener.properties.source
        ))
    } else if fastener.is_placeholder() {
        Some(format!(
            "Fastener grade {} {} has no verified strength data",
            fastener.standard, fastener.grade_id
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlangeInput {
        let mut input = FlangeInput::new(100, 16.0, 150.0, "P265GH");
        input.operating_pressure_bar = Some(10.0);
        input.corrosion_allowance_mm = 1.0;
        input
    }

    #[test]
    fn test_valid_input() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut input = sample();
        input.design_pressure_bar = 0.0;
        assert!(matches!(input.validate(), Err(CalcError::InvalidInput { .. })));

        let mut input = sample();
        input.material = "  ".to_string();
        assert!(matches!(input.validate(), Err(CalcError::MissingField { .. })));

        let mut input = sample();
        input.gasket.thickness_mm = -1.0;
        assert!(input.validate().is_err());

        let mut input = sample();
        input.corrosion_allowance_mm = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_operating_pressure_defaults_to_design() {
        let input = FlangeInput::new(100, 16.0, 20.0, "P265GH");
        assert_eq!(input.operating_pressure(), 16.0);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "nominal_size": 150,
            "design_pressure_bar": 25.0,
            "design_temp_c": 200.0,
            "material": "P355GH"
        }"#;
        let input: FlangeInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.test_temp_c, 20.0);
        assert_eq!(input.code, DesignCode::En);
        assert_eq!(input.gasket, GasketSpec::default());
        assert_eq!(input.lubrication, Lubrication::Dry);
    }

    #[test]
    fn test_basis_uses_operating_and_test_pressures() {
        let input = sample();
        let basis = DesignBasis::derive(&input, 16);
        let expected = required_bolt_loads(
            basis.gasket.effective_diameter_mm,
            basis.gasket.effective_width_mm,
            basis.gasket.m,
            basis.gasket.y_mpa,
            10.0,
            basis.hydrotest.test_pressure_bar,
        );
        assert_eq!(basis.loads, expected);
        assert!(basis.plate_allowables.en_test_mpa > basis.plate_allowables.en_op_mpa);
        assert!(basis.notes.is_empty());
    }

    #[test]
    fn test_basis_notes_fallbacks() {
        let mut input = sample();
        input.material = "UNOBTAINIUM".to_string();
        input.gasket.material = "cork".to_string();
        let basis = DesignBasis::derive(&input, 16);
        assert_eq!(basis.density_kg_m3, DEFAULT_DENSITY_KG_M3);
        assert_eq!(basis.notes.len(), 2);
        assert_eq!(basis.plate_allowables.asme_op_mpa, 150.0);
    }
}
