//! # Custom Blind Flange Sizing
//!
//! Searches bolt count × bolt size for a flange that no catalog entry covers.
//!
//! ## Procedure
//!
//! 1. Derive the [`DesignBasis`] once: hydrotest pressure, gasket geometry,
//!    bolt loads, plate allowables.
//! 2. For every bolt count in [`BOLT_COUNTS`] and bolt size in
//!    [`SEARCH_BOLT_SIZES`], lay out a bolt circle:
//!    `C = ceil(max(n·(f + 2)/π, gasket od + 12, catalog C of the highest class))`.
//! 3. Keep layouts whose bolt area passes all three load cases.
//! 4. Size each survivor: outer diameter, thickness under both rules,
//!    recommended plate, weight, torque.
//! 5. Reduce with [`compare_rank_keys`] for the requested preference.
//!
//! When nothing passes, [`diagnose_sizing_failure`] reports the layout that
//! came closest.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::{FlangeInput, SizingPreference, size_custom_flange};
//! use flange_core::materials::{FastenerSelection, FastenerStandard, FastenerType};
//!
//! let input = FlangeInput::new(100, 16.0, 150.0, "P265GH");
//! let bolts = FastenerSelection::new(FastenerStandard::En, FastenerType::Bolt, "8.8");
//!
//! let sized = size_custom_flange(&input, 16, &bolts, SizingPreference::MinBolts).unwrap();
//! assert_eq!(sized.design.bolt_count, 4);
//! assert!(sized.design.thickness.recommended_mm >= sized.design.thickness.final_mm);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::input::{fastener_note, DesignBasis, FlangeInput};
use crate::equations::{
    blind_flange_weight, bolt_area_check_split, bolt_torque, fastener_feature_od, geometry_check, lever_arm,
    min_bolt_circle_for_spacing, required_thickness, BoltAreaCheck, BoltingLoads, FeatureOd, GasketGeometry,
    GeometryCheck, HydrotestResult, LoadCase, RequiredThickness, ThicknessDemand, TorqueResult,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{
    find_thread, resolve_fastener, BoltSize, FastenerSelection, FastenerSpec, ThreadSpec, SEARCH_BOLT_SIZES,
};
use crate::standards::max_class_bolt_circle;

/// Bolt counts swept by the search
pub const BOLT_COUNTS: [u32; 9] = [4, 8, 12, 16, 20, 24, 28, 32, 36];
/// Radial gap between gasket OD and bolt circle (mm)
pub const GASKET_TO_BOLT_CIRCLE_MM: f64 = 12.0;
/// Outer diameter floor above nominal size (mm)
pub const OD_MARGIN_OVER_DN_MM: f64 = 120.0;
/// Outer diameter floor above gasket OD (mm)
pub const OD_MARGIN_OVER_GASKET_MM: f64 = 100.0;
/// Edge-clearance floor on D − C beyond the fastener envelope (mm)
pub const EDGE_ALLOWANCE_MM: f64 = 6.0;

/// What the search optimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SizingPreference {
    #[default]
    MinWeight,
    MinBolts,
}

impl SizingPreference {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "min_weight" | "weight" => Ok(SizingPreference::MinWeight),
            "min_bolts" | "bolts" => Ok(SizingPreference::MinBolts),
            _ => Err(CalcError::invalid_input("preference", s, "Expected min_weight or min_bolts")),
        }
    }
}

// =============================================================================
// LAYOUTS AND CANDIDATES
// =============================================================================

/// A bolt count and size placed on a bolt circle, with its bolt-area check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoltLayout {
    pub bolt_count: u32,
    pub bolt_size: BoltSize,
    #[serde(skip)]
    pub thread: &'static ThreadSpec,
    pub fastener: FastenerSpec,
    pub feature: FeatureOd,
    pub bolt_circle_mm: f64,
    /// The catalog bolt circle floor set C
    pub bolt_circle_clamped: bool,
    pub bolt_check: BoltAreaCheck,
}

/// A fully sized passing layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingCandidate {
    pub bolt_count: u32,
    pub bolt_size: BoltSize,
    pub fastener: FastenerSpec,
    pub feature: FeatureOd,
    pub hole_diameter_mm: f64,
    pub bolt_circle_mm: f64,
    pub bolt_circle_clamped: bool,
    pub outer_diameter_mm: f64,
    /// Gasket moment arm h_G (mm)
    pub lever_arm_mm: f64,
    pub bolt_check: BoltAreaCheck,
    pub geometry: GeometryCheck,
    pub thickness: RequiredThickness,
    /// At the recommended plate thickness (kg)
    pub weight_kg: f64,
    pub torque: TorqueResult,
}

impl SizingCandidate {
    pub fn rank_key(&self) -> RankKey {
        RankKey {
            bolt_count: self.bolt_count,
            weight_kg: self.weight_kg,
            recommended_thickness_mm: self.thickness.recommended_mm,
        }
    }
}

/// Winning design with the full trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizedResult {
    pub label: String,
    pub nominal_size: u32,
    pub pressure_class: u32,
    pub preference: SizingPreference,
    pub hydrotest: HydrotestResult,
    pub gasket: GasketGeometry,
    pub loads: BoltingLoads,
    pub design: SizingCandidate,
    /// Layouts swept
    pub candidates_evaluated: usize,
    /// Layouts that passed the bolt-area check
    pub candidates_passing: usize,
    /// Fallbacks and assumptions
    pub notes: Vec<String>,
}

/// Closest miss when no layout passes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReason {
    pub bolt_count: u32,
    pub bolt_size: BoltSize,
    pub governing_case: LoadCase,
    pub required_area_mm2: f64,
    pub provided_area_mm2: f64,
    pub shortfall_mm2: f64,
    pub message: String,
}

impl FailureReason {
    fn from_layout(layout: &BoltLayout) -> Self {
        let check = &layout.bolt_check;
        let message = format!(
            "No bolt layout passes. Closest: {} x {} provides {:.0} mm² against {:.0} mm² required for {} \
             (short by {:.0} mm²)",
            layout.bolt_count,
            layout.bolt_size,
            check.provided_area_mm2,
            check.max_required(),
            check.governing_case,
            check.shortfall_mm2()
        );
        FailureReason {
            bolt_count: layout.bolt_count,
            bolt_size: layout.bolt_size.clone(),
            governing_case: check.governing_case,
            required_area_mm2: check.max_required(),
            provided_area_mm2: check.provided_area_mm2,
            shortfall_mm2: check.shortfall_mm2(),
            message,
        }
    }
}

/// Result of [`size_flange`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SizingOutcome {
    Sized(Box<SizedResult>),
    Infeasible { closest: Option<FailureReason> },
    Blocked { grade_id: String, reason: String },
}

impl SizingOutcome {
    pub fn sized(&self) -> Option<&SizedResult> {
        match self {
            SizingOutcome::Sized(result) => Some(result),
            _ => None,
        }
    }
}

// =============================================================================
// RANKING
// =============================================================================

/// Fields the ranking compares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankKey {
    pub bolt_count: u32,
    pub weight_kg: f64,
    pub recommended_thickness_mm: f64,
}

/// Order two candidates; `Less` ranks better.
///
/// `MinBolts` compares bolt count first. Both preferences then compare
/// weight, recommended thickness and bolt count, all ascending.
pub fn compare_rank_keys(a: &RankKey, b: &RankKey, preference: SizingPreference) -> Ordering {
    let tail = |a: &RankKey, b: &RankKey| {
        a.weight_kg
            .total_cmp(&b.weight_kg)
            .then(a.recommended_thickness_mm.total_cmp(&b.recommended_thickness_mm))
            .then(a.bolt_count.cmp(&b.bolt_count))
    };
    match preference {
        SizingPreference::MinBolts => a.bolt_count.cmp(&b.bolt_count).then_with(|| tail(a, b)),
        SizingPreference::MinWeight => tail(a, b),
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// One sizing problem: input, class and fastener selection with the derived
/// basis.
#[derive(Debug, Clone)]
pub struct SizingSearch<'a> {
    input: &'a FlangeInput,
    selection: &'a FastenerSelection,
    basis: DesignBasis,
    catalog_bolt_circle_mm: Option<f64>,
}

impl<'a> SizingSearch<'a> {
    pub fn new(input: &'a FlangeInput, pressure_class: u32, selection: &'a FastenerSelection) -> Self {
        SizingSearch {
            input,
            selection,
            basis: DesignBasis::derive(input, pressure_class),
            catalog_bolt_circle_mm: max_class_bolt_circle(input.nominal_size),
        }
    }

    pub fn basis(&self) -> &DesignBasis {
        &self.basis
    }

    /// The selected grade has no verified data at nominal properties
    pub fn is_blocked(&self) -> bool {
        resolve_fastener(self.selection, None).is_placeholder()
    }

    /// Bolt circle for a layout and whether the catalog floor set it
    pub fn bolt_circle(&self, bolt_count: u32, feature_od_mm: f64) -> (f64, bool) {
        let spacing = min_bolt_circle_for_spacing(bolt_count, feature_od_mm);
        let gasket = self.basis.gasket.od_mm + GASKET_TO_BOLT_CIRCLE_MM;
        let catalog = self.catalog_bolt_circle_mm.unwrap_or(0.0);
        let clamped = catalog > spacing && catalog > gasket;
        (spacing.max(gasket).max(catalog).ceil(), clamped)
    }

    /// Lay out one bolt count and size; `None` for placeholder fastener data
    pub fn layout(&self, bolt_count: u32, thread: &'static ThreadSpec) -> Option<BoltLayout> {
        let fastener = resolve_fastener(self.selection, Some(thread.diameter_mm));
        if fastener.is_placeholder() {
            debug!(bolt_count, size = thread.designation, "skipped: placeholder fastener data");
            return None;
        }

        let feature = fastener_feature_od(fastener.standard, thread);
        let (bolt_circle_mm, bolt_circle_clamped) = self.bolt_circle(bolt_count, feature.diameter_mm);
        let bolt_check = bolt_area_check_split(
            &self.basis.loads,
            fastener.properties.allowable_op_mpa,
            fastener.properties.allowable_test_mpa,
            bolt_count,
            thread.stress_area_mm2,
        );

        Some(BoltLayout {
            bolt_count,
            bolt_size: BoltSize::from(thread),
            thread,
            fastener,
            feature,
            bolt_circle_mm,
            bolt_circle_clamped,
            bolt_check,
        })
    }

    /// Every layout the search sweeps, bolt count outer, size inner
    pub fn layouts(&self) -> impl Iterator<Item = BoltLayout> + '_ {
        BOLT_COUNTS.into_iter().flat_map(move |n| {
            SEARCH_BOLT_SIZES.into_iter().filter_map(move |size| {
                let thread = match find_thread(size) {
                    Some(t) => t,
                    None => {
                        debug!(size, "skipped: no thread geometry");
                        return None;
                    }
                };
                self.layout(n, thread)
            })
        })
    }

    /// Outer diameter of a layout (mm)
    pub fn outer_diameter(&self, layout: &BoltLayout) -> f64 {
        let c = layout.bolt_circle_mm;
        let thread = layout.thread;
        let by_bolts = c + 3.0 * thread.diameter_mm + thread.hole_diameter_mm;
        let by_dn = self.input.nominal_size as f64 + OD_MARGIN_OVER_DN_MM;
        let by_gasket = self.basis.gasket.od_mm + OD_MARGIN_OVER_GASKET_MM;
        let by_edge = c + layout.feature.diameter_mm + EDGE_ALLOWANCE_MM;
        by_bolts.max(by_dn).max(by_gasket).max(by_edge).ceil()
    }

    /// Size a layout that passed the bolt-area check
    pub fn evaluate(&self, layout: &BoltLayout) -> SizingCandidate {
        let basis = &self.basis;
        let outer_diameter_mm = self.outer_diameter(layout);
        let lever_arm_mm = lever_arm(layout.bolt_circle_mm, basis.gasket.effective_diameter_mm);

        let demand = ThicknessDemand {
            gasket_diameter_mm: basis.gasket.effective_diameter_mm,
            lever_arm_mm,
            design_pressure_bar: self.input.design_pressure_bar,
            test_pressure_bar: basis.hydrotest.test_pressure_bar,
            operating_load_n: basis.operating_plate_load(),
            test_load_n: basis.loads.wm2_hydro_n,
        };
        let thickness = required_thickness(&demand, &basis.plate_allowables, self.input.corrosion_allowance_mm);

        let weight_kg = blind_flange_weight(outer_diameter_mm, thickness.recommended_mm, basis.density_kg_m3);

        let thread = layout.thread;
        let governing = layout.bolt_check.governing_case;
        let torque = bolt_torque(
            governing,
            basis.loads.load(governing),
            layout.bolt_count,
            thread.diameter_mm,
            thread.stress_area_mm2,
            layout.fastener.properties.proof_mpa,
            self.input.lubrication,
        );

        SizingCandidate {
            bolt_count: layout.bolt_count,
            bolt_size: layout.bolt_size.clone(),
            fastener: layout.fastener.clone(),
            feature: layout.feature,
            hole_diameter_mm: thread.hole_diameter_mm,
            bolt_circle_mm: layout.bolt_circle_mm,
            bolt_circle_clamped: layout.bolt_circle_clamped,
            outer_diameter_mm,
            lever_arm_mm,
            bolt_check: layout.bolt_check,
            geometry: geometry_check(
                layout.bolt_circle_mm,
                outer_diameter_mm,
                layout.bolt_count,
                layout.feature.diameter_mm,
            ),
            thickness,
            weight_kg,
            torque,
        }
    }

    /// All passing layouts, sized
    pub fn candidates(&self) -> impl Iterator<Item = SizingCandidate> + '_ {
        self.layouts()
            .filter(|layout| {
                if !layout.bolt_check.pass {
                    debug!(
                        bolt_count = layout.bolt_count,
                        size = %layout.bolt_size,
                        shortfall_mm2 = layout.bolt_check.shortfall_mm2(),
                        "rejected: bolt area"
                    );
                }
                layout.bolt_check.pass
            })
            .map(|layout| self.evaluate(&layout))
    }

    /// Best passing candidate for a preference
    pub fn run(&self, preference: SizingPreference) -> Option<SizedResult> {
        if self.is_blocked() {
            warn!(grade = %self.selection.grade_id, "sizing blocked: placeholder fastener grade");
            return None;
        }

        let candidates_evaluated = self.layouts().count();
        let mut candidates_passing = 0usize;
        let design = self
            .candidates()
            .inspect(|_| candidates_passing += 1)
            .min_by(|a, b| {
                let order = compare_rank_keys(&a.rank_key(), &b.rank_key(), preference);
                debug!(
                    a = %format!("{} x {}", a.bolt_count, a.bolt_size),
                    b = %format!("{} x {}", b.bolt_count, b.bolt_size),
                    ?order,
                    "ranked"
                );
                order
            })?;

        info!(
            dn = self.input.nominal_size,
            pn = self.basis.pressure_class,
            evaluated = candidates_evaluated,
            passing = candidates_passing,
            winner = %format!("{} x {}", design.bolt_count, design.bolt_size),
            thickness_mm = design.thickness.recommended_mm,
            "sizing complete"
        );

        let mut notes = self.basis.notes.clone();
        if let Some(note) = fastener_note(&design.fastener) {
            notes.push(note);
        }
        if design.feature.approximated {
            warn!(size = %design.bolt_size, "ASME fastener envelope approximated from metric hardware");
            notes.push(format!(
                "{} fastener envelope approximated from metric washer dimensions (x{})",
                design.fastener.standard,
                crate::equations::bolting::ASME_WASHER_FACTOR
            ));
        }
        if design.bolt_circle_clamped {
            notes.push(format!(
                "Bolt circle raised to the highest EN 1092-1 class bolt circle for DN{}",
                self.input.nominal_size
            ));
        }
        if design.torque.capped_by_proof {
            notes.push(format!(
                "Preload capped at 70 % of proof load ({:.0} N per bolt)",
                design.torque.preload_cap_n
            ));
        }

        Some(SizedResult {
            label: self.input.label.clone(),
            nominal_size: self.input.nominal_size,
            pressure_class: self.basis.pressure_class,
            preference,
            hydrotest: self.basis.hydrotest.clone(),
            gasket: self.basis.gasket.clone(),
            loads: self.basis.loads,
            design,
            candidates_evaluated,
            candidates_passing,
            notes,
        })
    }

    /// Layout with the smallest bolt-area shortfall, when nothing passes
    pub fn diagnose(&self) -> Option<FailureReason> {
        if self.is_blocked() {
            return None;
        }
        let layouts: Vec<BoltLayout> = self.layouts().collect();
        if layouts.iter().any(|l| l.bolt_check.pass) {
            return None;
        }
        layouts
            .iter()
            .min_by(|a, b| a.bolt_check.shortfall_mm2().total_cmp(&b.bolt_check.shortfall_mm2()))
            .map(FailureReason::from_layout)
    }
}

/// Size a custom blind flange; `None` when no layout passes or the fastener
/// grade is a placeholder.
///
/// The input is not validated here; [`size_flange`] validates first.
pub fn size_custom_flange(
    input: &FlangeInput,
    pressure_class: u32,
    selection: &FastenerSelection,
    preference: SizingPreference,
) -> Option<SizedResult> {
    SizingSearch::new(input, pressure_class, selection).run(preference)
}

/// Closest miss of a search that found nothing.
///
/// `None` when some layout passes or the grade is a placeholder.
pub fn diagnose_sizing_failure(
    input: &FlangeInput,
    pressure_class: u32,
    selection: &FastenerSelection,
) -> Option<FailureReason> {
    SizingSearch::new(input, pressure_class, selection).diagnose()
}

/// Validate, then size, reporting why nothing was returned.
pub fn size_flange(
    input: &FlangeInput,
    pressure_class: u32,
    selection: &FastenerSelection,
    preference: SizingPreference,
) -> CalcResult<SizingOutcome> {
    input.validate()?;
    if pressure_class == 0 {
        return Err(CalcError::invalid_input("pressure_class", "0", "Pressure class must be positive"));
    }

    let search = SizingSearch::new(input, pressure_class, selection);
    if search.is_blocked() {
        warn!(grade = %selection.grade_id, "sizing blocked: placeholder fastener grade");
        return Ok(SizingOutcome::Blocked {
            grade_id: selection.grade_id.clone(),
            reason: format!(
                "Fastener grade {} {} has placeholder property data and cannot be used for sizing",
                selection.standard, selection.grade_id
            ),
        });
    }

    Ok(match search.run(preference) {
        Some(result) => SizingOutcome::Sized(Box::new(result)),
        None => SizingOutcome::Infeasible { closest: search.diagnose() },
    })
}
