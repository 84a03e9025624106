//! Fastener Grades
//!
//! Bolt and stud material properties for EN (ISO 898-1, EN 10269, ISO 3506)
//! and ASME (SA-193, SA-320) grades. The catalog is embedded from
//! `data/fastener_grades.toml` and parsed once.
//!
//! ## Size-dependent grades
//!
//! Some grades publish lower properties for larger diameters (8.8 above and
//! below M16, B7 above 64 mm). A grade may carry `band` entries; when the
//! nominal diameter falls inside a band, the band values replace the grade
//! defaults.
//!
//! ## Placeholders
//!
//! A grade with any stress at or below 1 MPa, or with `placeholder = true`,
//! has no verified data. It resolves normally but `placeholder` is set, and
//! the sizing search and manual verifier treat it as a blocking condition.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};

/// Stress values at or below this are treated as missing data (MPa)
pub const PLACEHOLDER_THRESHOLD_MPA: f64 = 1.0;

/// Fastener standard family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FastenerStandard {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "ASME")]
    Asme,
}

impl FastenerStandard {
    pub const ALL: [FastenerStandard; 2] = [FastenerStandard::En, FastenerStandard::Asme];

    pub fn code(&self) -> &'static str {
        match self {
            FastenerStandard::En => "EN",
            FastenerStandard::Asme => "ASME",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EN" | "ISO" | "DIN" => Ok(FastenerStandard::En),
            "ASME" | "ASTM" => Ok(FastenerStandard::Asme),
            _ => Err(CalcError::invalid_input("fastener.standard", s, "Expected EN or ASME")),
        }
    }
}

impl std::fmt::Display for FastenerStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fastener form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FastenerType {
    /// Hex head bolt with nut
    #[serde(rename = "BOLT")]
    #[default]
    Bolt,
    /// Stud bolt with two nuts
    #[serde(rename = "STUD")]
    Stud,
}

/// The fastener a user picked: standard, form and grade id.
///
/// ## JSON Example
///
/// ```json
/// { "standard": "EN", "fastener_type": "STUD", "grade_id": "42CrMo4" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastenerSelection {
    pub standard: FastenerStandard,
    #[serde(default)]
    pub fastener_type: FastenerType,
    pub grade_id: String,
}

impl FastenerSelection {
    pub fn new(standard: FastenerStandard, fastener_type: FastenerType, grade_id: impl Into<String>) -> Self {
        FastenerSelection {
            standard,
            fastener_type,
            grade_id: grade_id.into(),
        }
    }
}

/// Resolved mechanical properties of a fastener at a given diameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerProperties {
    /// Proof stress (MPa)
    pub proof_mpa: f64,
    /// Yield strength (MPa)
    pub yield_mpa: f64,
    /// Allowable bolt stress for seating and operating (MPa)
    pub allowable_op_mpa: f64,
    /// Allowable bolt stress for the hydrotest (MPa)
    pub allowable_test_mpa: f64,
    /// No verified data; must never pass a check
    pub placeholder: bool,
    /// The grade was not found and conservative defaults were used
    pub fallback: bool,
    /// Where the values came from, e.g. "8.8 (d <= 16 mm)"
    pub source: String,
}

impl FastenerProperties {
    /// True when any stress value is missing or the data is flagged as pending
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
            || self.proof_mpa <= PLACEHOLDER_THRESHOLD_MPA
            || self.yield_mpa <= PLACEHOLDER_THRESHOLD_MPA
            || self.allowable_op_mpa <= PLACEHOLDER_THRESHOLD_MPA
            || self.allowable_test_mpa <= PLACEHOLDER_THRESHOLD_MPA
    }
}

/// A fastener selection with its properties resolved for one diameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerSpec {
    pub standard: FastenerStandard,
    pub fastener_type: FastenerType,
    pub grade_id: String,
    pub properties: FastenerProperties,
}

impl FastenerSpec {
    pub fn is_placeholder(&self) -> bool {
        self.properties.is_placeholder()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct DiameterBand {
    #[serde(default)]
    min_diameter_mm: f64,
    max_diameter_mm: f64,
    proof_mpa: f64,
    yield_mpa: f64,
    allowable_op_mpa: f64,
    allowable_test_mpa: f64,
}

impl DiameterBand {
    fn contains(&self, diameter_mm: f64) -> bool {
        diameter_mm > self.min_diameter_mm && diameter_mm <= self.max_diameter_mm
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FastenerGrade {
    pub standard: FastenerStandard,
    pub id: String,
    pub name: String,
    pub proof_mpa: f64,
    pub yield_mpa: f64,
    pub allowable_op_mpa: f64,
    pub allowable_test_mpa: f64,
    #[serde(default)]
    pub placeholder: bool,
    #[serde(default, rename = "band")]
    bands: Vec<DiameterBand>,
}

impl FastenerGrade {
    /// Properties at a nominal diameter, applying a matching band if any
    pub fn properties_at(&self, diameter_mm: Option<f64>) -> FastenerProperties {
        let band = diameter_mm.and_then(|d| self.bands.iter().find(|b| b.contains(d)));
        match band {
            Some(b) => FastenerProperties {
                proof_mpa: b.proof_mpa,
                yield_mpa: b.yield_mpa,
                allowable_op_mpa: b.allowable_op_mpa,
                allowable_test_mpa: b.allowable_test_mpa,
                placeholder: self.placeholder,
                fallback: false,
                source: format!(
                    "{} ({} < d <= {} mm)",
                    self.id, b.min_diameter_mm, b.max_diameter_mm
                ),
            },
            None => FastenerProperties {
                proof_mpa: self.proof_mpa,
                yield_mpa: self.yield_mpa,
                allowable_op_mpa: self.allowable_op_mpa,
                allowable_test_mpa: self.allowable_test_mpa,
                placeholder: self.placeholder,
                fallback: false,
                source: self.id.clone(),
            },
        }
    }

    /// Whether this grade has size-dependent data
    pub fn is_size_dependent(&self) -> bool {
        !self.bands.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct GradeTable {
    grade: Vec<FastenerGrade>,
}

/// Parse a fastener grade table in the embedded TOML layout
pub fn parse_grade_table(source: &str) -> CalcResult<Vec<FastenerGrade>> {
    let table: GradeTable = toml::from_str(source)
        .map_err(|e| CalcError::config_error("fastener_grades.toml", e.to_string()))?;
    Ok(table.grade)
}

static FASTENER_GRADES: Lazy<Vec<FastenerGrade>> = Lazy::new(|| {
    parse_grade_table(include_str!("../../data/fastener_grades.toml"))
        .expect("embedded fastener grade table must parse")
});

/// Conservative properties used when a grade id cannot be resolved
/// (ISO 898-1 class 5.6 values).
pub fn fallback_properties(requested: &str) -> FastenerProperties {
    FastenerProperties {
        proof_mpa: 280.0,
        yield_mpa: 300.0,
        allowable_op_mpa: 100.0,
        allowable_test_mpa: 150.0,
        placeholder: false,
        fallback: true,
        source: format!("default 5.6 properties (grade '{}' not found)", requested),
    }
}

/// All cataloged grades
pub fn fastener_grades() -> &'static [FastenerGrade] {
    &FASTENER_GRADES
}

/// Grades for one standard
pub fn grades_for(standard: FastenerStandard) -> impl Iterator<Item = &'static FastenerGrade> {
    FASTENER_GRADES.iter().filter(move |g| g.standard == standard)
}

/// Find a grade by standard and id (case-insensitive)
pub fn find_grade(standard: FastenerStandard, grade_id: &str) -> Option<&'static FastenerGrade> {
    let id = grade_id.trim();
    grades_for(standard).find(|g| g.id.eq_ignore_ascii_case(id))
}

/// Resolve a selection to properties at the given nominal diameter.
///
/// Unknown grades never fail: they fall back to conservative defaults with
/// `fallback` set so the substitution shows up in every result trace.
pub fn resolve_fastener(selection: &FastenerSelection, diameter_mm: Option<f64>) -> FastenerSpec {
    let properties = match find_grade(selection.standard, &selection.grade_id) {
        Some(grade) => grade.properties_at(diameter_mm),
        None => {
            warn!(
                standard = %selection.standard,
                grade = %selection.grade_id,
                "unknown fastener grade, using conservative defaults"
            );
            fallback_properties(&selection.grade_id)
        }
    };

    FastenerSpec {
        standard: selection.standard,
        fastener_type: selection.fastener_type,
        grade_id: selection.grade_id.clone(),
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(grade: &str) -> FastenerSelection {
        FastenerSelection::new(FastenerStandard::En, FastenerType::Bolt, grade)
    }

    #[test]
    fn test_catalog_loads() {
        assert!(grades_for(FastenerStandard::En).count() >= 4);
        assert!(grades_for(FastenerStandard::Asme).count() >= 4);
    }

    #[test]
    fn test_size_band_override() {
        let small = resolve_fastener(&en("8.8"), Some(16.0));
        assert_eq!(small.properties.proof_mpa, 580.0);

        let large = resolve_fastener(&en("8.8"), Some(24.0));
        assert_eq!(large.properties.proof_mpa, 600.0);
        assert_eq!(large.properties.source, "8.8");
    }

    #[test]
    fn test_no_diameter_uses_defaults() {
        let spec = resolve_fastener(&en("8.8"), None);
        assert_eq!(spec.properties.proof_mpa, 600.0);
    }

    #[test]
    fn test_b7_large_diameter_band() {
        let sel = FastenerSelection::new(FastenerStandard::Asme, FastenerType::Stud, "sa-193-b7");
        assert_eq!(resolve_fastener(&sel, Some(64.0)).properties.yield_mpa, 725.0);
        assert_eq!(resolve_fastener(&sel, Some(72.0)).properties.yield_mpa, 655.0);
    }

    #[test]
    fn test_placeholder_detection() {
        let spec = resolve_fastener(&en("21CrMoV5-7"), Some(24.0));
        assert!(spec.is_placeholder());

        let asme = FastenerSelection::new(FastenerStandard::Asme, FastenerType::Stud, "SA-193-B16");
        assert!(resolve_fastener(&asme, Some(24.0)).is_placeholder());
    }

    #[test]
    fn test_low_values_are_placeholder_without_flag() {
        let mut props = resolve_fastener(&en("8.8"), Some(24.0)).properties;
        assert!(!props.is_placeholder());
        props.allowable_test_mpa = 0.5;
        assert!(props.is_placeholder());
    }

    #[test]
    fn test_unknown_grade_falls_back() {
        let spec = resolve_fastener(&en("99.9"), Some(24.0));
        assert!(spec.properties.fallback);
        assert!(!spec.is_placeholder());
        assert!(spec.properties.source.contains("99.9"));
    }

    #[test]
    fn test_standard_scopes_lookup() {
        assert!(find_grade(FastenerStandard::Asme, "8.8").is_none());
        assert!(find_grade(FastenerStandard::En, "8.8").unwrap().is_size_dependent());
    }

    #[test]
    fn test_selection_serialization() {
        let sel = FastenerSelection::new(FastenerStandard::Asme, FastenerType::Stud, "SA-193-B7");
        let json = serde_json::to_string(&sel).unwrap();
        assert!(json.contains("\"ASME\""));
        assert!(json.contains("\"STUD\""));
        let parsed: FastenerSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(sel, parsed);
    }

    #[test]
    fn test_standard_parsing() {
        assert_eq!(FastenerStandard::from_str_flexible("asme").unwrap(), FastenerStandard::Asme);
        assert!(FastenerStandard::from_str_flexible("JIS").is_err());
    }
}
