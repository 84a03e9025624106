//! Flange Plate Materials
//!
//! Yield strength versus temperature for pressure-vessel plate and forging
//! grades. The table is embedded at compile time from
//! `data/plate_materials.toml` and parsed once on first access.
//!
//! ## Temperature lookup
//!
//! Yield is a step function of temperature: the greatest tabulated point not
//! above the query temperature is used. Below the lowest point the lowest
//! point applies, above the highest point the highest point applies. There is
//! no linear interpolation and no extrapolation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Yield strength at one tabulated temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldPoint {
    /// Temperature (°C)
    pub temp_c: f64,
    /// Yield strength Rp0.2 / Rp1.0 (MPa)
    pub yield_mpa: f64,
}

/// A plate material with its yield-vs-temperature table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "P265GH",
///   "name": "P265GH (EN 10028-2)",
///   "density_kg_m3": 7850.0,
///   "points": [
///     { "temp_c": 20.0, "yield_mpa": 265.0 },
///     { "temp_c": 100.0, "yield_mpa": 241.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Short identifier used in inputs (e.g., "P265GH", "1.4404")
    pub id: String,
    /// Display name
    pub name: String,
    /// Density (kg/m³) for weight estimates
    pub density_kg_m3: f64,
    /// Yield strength at discrete temperatures, any order
    pub points: Vec<YieldPoint>,
}

impl MaterialSpec {
    /// Build a material from `(temp_c, yield_mpa)` pairs
    pub fn new(id: impl Into<String>, name: impl Into<String>, density_kg_m3: f64, points: &[(f64, f64)]) -> Self {
        MaterialSpec {
            id: id.into(),
            name: name.into(),
            density_kg_m3,
            points: points
                .iter()
                .map(|&(temp_c, yield_mpa)| YieldPoint { temp_c, yield_mpa })
                .collect(),
        }
    }

    /// Select the tabulated point that applies at `temp_c`.
    ///
    /// Returns `None` only when the table is empty.
    pub fn point_at(&self, temp_c: f64) -> Option<YieldPoint> {
        let at_or_below = self
            .points
            .iter()
            .filter(|p| p.temp_c <= temp_c)
            .max_by(|a, b| a.temp_c.total_cmp(&b.temp_c));

        at_or_below
            .or_else(|| self.points.iter().min_by(|a, b| a.temp_c.total_cmp(&b.temp_c)))
            .copied()
    }

    /// Yield strength (MPa) at `temp_c` using the step-function lookup
    pub fn yield_at(&self, temp_c: f64) -> Option<f64> {
        self.point_at(temp_c).map(|p| p.yield_mpa)
    }

    fn validate(&self) -> CalcResult<()> {
        if self.points.is_empty() {
            return Err(CalcError::invalid_input(
                format!("{}.points", self.id),
                "[]",
                "Material needs at least one temperature point",
            ));
        }
        if self.density_kg_m3 <= 0.0 {
            return Err(CalcError::invalid_input(
                format!("{}.density_kg_m3", self.id),
                self.density_kg_m3.to_string(),
                "Density must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct MaterialTable {
    material: Vec<MaterialSpec>,
}

/// Parse a plate material table in the embedded TOML layout
pub fn parse_material_table(source: &str) -> CalcResult<Vec<MaterialSpec>> {
    let table: MaterialTable = toml::from_str(source)
        .map_err(|e| CalcError::config_error("plate_materials.toml", e.to_string()))?;
    for material in &table.material {
        material.validate()?;
    }
    Ok(table.material)
}

static PLATE_MATERIALS: Lazy<Vec<MaterialSpec>> = Lazy::new(|| {
    parse_material_table(include_str!("../../data/plate_materials.toml"))
        .expect("embedded plate material table must parse")
});

/// All cataloged plate materials
pub fn plate_materials() -> &'static [MaterialSpec] {
    &PLATE_MATERIALS
}

/// Find a material by id (case-insensitive)
pub fn find_material(id: &str) -> Option<&'static MaterialSpec> {
    let id = id.trim();
    PLATE_MATERIALS.iter().find(|m| m.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_material() -> MaterialSpec {
        // Deliberately unordered
        MaterialSpec::new("T", "Test", 7850.0, &[(200.0, 215.0), (20.0, 265.0), (100.0, 243.0)])
    }

    #[test]
    fn test_step_lookup_selects_lower_point() {
        let mat = scenario_material();
        assert_eq!(mat.yield_at(150.0), Some(243.0));
        assert_eq!(mat.yield_at(100.0), Some(243.0));
        assert_eq!(mat.yield_at(199.9), Some(243.0));
    }

    #[test]
    fn test_below_range_uses_lowest_point() {
        let mat = scenario_material();
        assert_eq!(mat.yield_at(-40.0), Some(265.0));
    }

    #[test]
    fn test_above_range_uses_highest_point() {
        let mat = scenario_material();
        assert_eq!(mat.yield_at(650.0), Some(215.0));
    }

    #[test]
    fn test_empty_table() {
        let mat = MaterialSpec::new("E", "Empty", 7850.0, &[]);
        assert_eq!(mat.yield_at(20.0), None);
        assert!(mat.validate().is_err());
    }

    #[test]
    fn test_embedded_table_loads() {
        assert!(plate_materials().len() >= 5);
        let p265 = material("p265gh").unwrap();
        assert_eq!(p265.yield_at(20.0), Some(265.0));
        assert_eq!(p265.density_kg_m3, 7850.0);
    }

    #[test]
    fn test_unknown_material() {
        assert!(find_material("UNOBTAINIUM").is_none());
        assert_eq!(material("UNOBTAINIUM").unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_parse_rejects_empty_points() {
        let src = r#"
            [[material]]
            id = "X"
            name = "X"
            density_kg_m3 = 7850.0
            points = []
        "#;
        assert!(parse_material_table(src).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let err = parse_material_table("[[material]\nid=").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
