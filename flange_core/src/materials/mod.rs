//! # Materials Database
//!
//! Read-only property tables used by the engine. Every table is either a
//! `const` array or embedded TOML parsed once behind a `Lazy`, so lookups are
//! safe from any number of threads without locking.
//!
//! ## Tables
//!
//! - **Plate materials** ([`plate`]): yield vs temperature and density
//! - **Fastener grades** ([`fastener`]): proof, yield and allowable bolt stresses
//! - **Thread geometry** ([`threads`]): stress area, hole, washer and nut sizes
//! - **Gasket materials** ([`gasket`]): m and y factors
//!
//! ## Example
//!
//! ```rust
//! use flange_core::materials::{find_material, find_thread};
//!
//! let p265 = find_material("P265GH").unwrap();
//! assert_eq!(p265.yield_at(150.0), Some(223.0));
//!
//! let m24 = find_thread("M24").unwrap();
//! assert_eq!(m24.stress_area_mm2, 353.0);
//! ```

pub mod fastener;
pub mod gasket;
pub mod plate;
pub mod threads;

pub use fastener::{
    fastener_grades, find_grade, grades_for, resolve_fastener, FastenerGrade, FastenerProperties,
    FastenerSelection, FastenerSpec, FastenerStandard, FastenerType,
};
pub use gasket::{find_gasket_material, gasket_factors, GasketFactors, GasketMaterial, GASKET_MATERIALS};
pub use plate::{find_material, plate_materials, MaterialSpec, YieldPoint};
pub use threads::{find_thread, thread_spec, BoltSize, ThreadSpec, SEARCH_BOLT_SIZES, THREADS};
