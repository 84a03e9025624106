//! # Flange Design Equations
//!
//! Closed-form equations used by the sizing search and the manual verifier.
//! Keeping them in one place makes each formula checkable against its code
//! clause without reading the search logic.
//!
//! ## Modules
//!
//! - [`stress`] - Allowable stress and hydrotest pressure
//! - [`gasket`] - Effective gasket geometry and factors
//! - [`bolting`] - Bolt loads, bolt area, layout clearances, torque
//! - [`plate`] - Required plate thickness, plate ladder, weight
//!
//! ## Units
//!
//! - Lengths in mm, forces in N, stresses in MPa
//! - Pressures enter in bar and are converted to MPa inside each formula
//! - Torque in N·m, weight in kg
//!
//! ## References
//!
//! - ASME BPVC Section VIII Division 1: UG-34, UG-99, Mandatory Appendix 2
//! - EN 13445-3 (flat ends) and EN 13445-5 (pressure test)
//! - EN 1092-1 (flange dimensions and bolt holes)

pub mod bolting;
pub mod gasket;
pub mod plate;
pub mod stress;

pub use bolting::{
    bolt_area_check, bolt_area_check_split, bolt_torque, fastener_feature_od, geometry_check, governing_case,
    min_bolt_circle_for_spacing, required_bolt_loads, BoltAreaCheck, BoltingLoads, FeatureOd, FeatureSource,
    GeometryCheck, LoadCase,
    Lubrication, TorqueResult,
};
pub use gasket::{gasket_geometry, gasket_geometry_for, Facing, GasketGeometry, GasketSpec};
pub use plate::{
    blind_flange_weight, lever_arm, recommended_plate_thickness, required_thickness, PlateAllowables,
    RequiredThickness, ThicknessDemand, ThicknessGoverning, PLATE_LADDER_MM,
};
pub use stress::{
    allowable_stress, allowable_stress_detail, allowable_stress_for, hydrotest_pressure, safety_factor,
    AllowableStress, DesignCode, HydrotestResult, StressUsage,
};
