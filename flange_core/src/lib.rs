//! # flange_core - Blind Flange Sizing & Verification Engine
//!
//! `flange_core` sizes and verifies bolted blind flanges for pressure vessels
//! under EN 13445-3 / ASME VIII-1 style rules: plate thickness, bolt pattern,
//! gasket geometry and bolt torque. All inputs and outputs are plain
//! serde-serializable records.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from input to result
//! - **Failures are data**: No feasible layout, placeholder fastener data and
//!   clearance violations come back in the result, not as errors
//! - **Visible fallbacks**: Unknown materials and grades resolve to
//!   conservative defaults, flagged in every trace
//!
//! ## Quick Start
//!
//! ```rust
//! use flange_core::{size_custom_flange, verify_manual_geometry};
//! use flange_core::calculations::{FlangeInput, ManualGeometry, SizingPreference};
//! use flange_core::materials::{FastenerSelection, FastenerStandard, FastenerType};
//!
//! let input = FlangeInput::new(150, 25.0, 200.0, "P265GH");
//! let bolts = FastenerSelection::new(FastenerStandard::En, FastenerType::Bolt, "8.8");
//!
//! let sized = size_custom_flange(&input, 25, &bolts, SizingPreference::MinWeight).unwrap();
//! let d = &sized.design;
//! println!("{} x {}, t = {} mm", d.bolt_count, d.bolt_size, d.thickness.recommended_mm);
//!
//! let geometry = ManualGeometry {
//!     bolt_circle_mm: Some(sized.design.bolt_circle_mm),
//!     bolt_count: Some(sized.design.bolt_count),
//!     bolt_size: Some(sized.design.bolt_size.to_string()),
//!     outer_diameter_mm: Some(sized.design.outer_diameter_mm),
//!     thickness_mm: Some(sized.design.thickness.recommended_mm),
//!     fastener: bolts.clone(),
//! };
//! assert!(verify_manual_geometry(&input, &geometry, 25).pass);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Sizing search and manual verification
//! - [`equations`] - Stress, gasket, bolting and plate formulas
//! - [`materials`] - Plate, fastener, thread and gasket tables
//! - [`standards`] - EN 1092-1 catalog dimensions
//! - [`job`] - TOML / JSON job files
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod job;
pub mod materials;
pub mod standards;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    diagnose_sizing_failure, size_custom_flange, size_flange, verify_manual_geometry, FailureReason, FlangeInput,
    ManualCheckResult, ManualGeometry, SizedResult, SizingOutcome, SizingPreference,
};
pub use equations::gasket::gasket_geometry as compute_gasket_geometry;
pub use equations::stress::allowable_stress as compute_allowable_stress;
pub use equations::stress::hydrotest_pressure as compute_hydrotest_pressure;
pub use equations::{DesignCode, Facing, GasketGeometry, HydrotestResult, StressUsage};
pub use errors::{CalcError, CalcResult};
pub use job::Job;
pub use materials::{FastenerSelection, FastenerStandard, FastenerType};
pub use standards::StandardFlange;
