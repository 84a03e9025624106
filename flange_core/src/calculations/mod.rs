//! # Blind Flange Calculations
//!
//! The two top-level calculations the engine offers. Each follows the
//! pattern:
//!
//! - [`FlangeInput`] - Physical input shared by both (JSON-serializable)
//! - `*Result` - Full numeric trace (JSON-serializable)
//! - A pure function from input to result
//!
//! ## Available Calculations
//!
//! - [`sizing`] - Custom sizing search over bolt count × bolt size
//! - [`manual_check`] - Verification of a user-specified geometry
//!
//! Expected domain failures (no feasible layout, placeholder fastener data,
//! clearance violations) are reported in the result. [`CalcError`] is only
//! returned for malformed input.
//!
//! [`CalcError`]: crate::errors::CalcError

pub mod input;
pub mod manual_check;
pub mod sizing;

pub use input::{DesignBasis, FlangeInput};
pub use manual_check::{
    verify_manual_geometry, BoltCheckSummary, GasketLoadSummary, ManualCheckResult, ManualGeometry,
    ThicknessCheckSummary,
};
pub use sizing::{
    compare_rank_keys, diagnose_sizing_failure, size_custom_flange, size_flange, BoltLayout, FailureReason, RankKey,
    SizedResult, SizingCandidate, SizingOutcome, SizingPreference, SizingSearch,
};
