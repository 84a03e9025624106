//! Gasket Materials
//!
//! Maintenance factor m and minimum seating stress y per gasket material,
//! after the ASME Section VIII Div. 1 Appendix 2 (Table 2-5.1) values.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Gasket factors for bolt-load calculations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasketFactors {
    /// Maintenance factor m (-)
    pub m: f64,
    /// Minimum design seating stress y (MPa)
    pub y_mpa: f64,
}

/// One gasket material entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasketMaterial {
    pub id: &'static str,
    pub name: &'static str,
    pub factors: GasketFactors,
}

const fn entry(id: &'static str, name: &'static str, m: f64, y_mpa: f64) -> GasketMaterial {
    GasketMaterial {
        id,
        name,
        factors: GasketFactors { m, y_mpa },
    }
}

/// Id of the entry used when a material is not recognized
pub const DEFAULT_GASKET_MATERIAL: &str = "fiber";

/// Cataloged gasket materials
pub const GASKET_MATERIALS: [GasketMaterial; 7] = [
    entry("elastomer", "Elastomer, 75A Shore or harder", 1.0, 1.4),
    entry("ptfe", "PTFE sheet", 2.5, 17.2),
    entry("fiber", "Compressed non-asbestos fibre", 2.0, 11.0),
    entry("graphite", "Flexible graphite, metal reinforced", 2.0, 6.9),
    entry("spiral_wound", "Spiral wound, graphite filled", 3.0, 69.0),
    entry("metal_jacketed", "Metal jacketed, soft steel", 3.5, 55.2),
    entry("solid_metal", "Solid flat soft iron", 5.5, 124.0),
];

/// Find a gasket material by id (case-insensitive, '-' and ' ' accepted for '_')
pub fn find_gasket_material(id: &str) -> Option<&'static GasketMaterial> {
    let key = id.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    GASKET_MATERIALS.iter().find(|g| g.id == key)
}

/// Gasket factors for a material; the boolean is true when the default
/// entry was substituted for an unknown material.
pub fn gasket_factors(id: &str) -> (GasketFactors, bool) {
    match find_gasket_material(id) {
        Some(g) => (g.factors, false),
        None => {
            warn!(material = id, "unknown gasket material, using '{}' factors", DEFAULT_GASKET_MATERIAL);
            let default = GASKET_MATERIALS
                .iter()
                .find(|g| g.id == DEFAULT_GASKET_MATERIAL)
                .map(|g| g.factors)
                .unwrap_or(GasketFactors { m: 2.0, y_mpa: 11.0 });
            (default, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_forgiving() {
        assert_eq!(find_gasket_material("Spiral-Wound").unwrap().factors.m, 3.0);
        assert_eq!(find_gasket_material("PTFE").unwrap().id, "ptfe");
    }

    #[test]
    fn test_unknown_material_falls_back() {
        let (factors, fallback) = gasket_factors("cork");
        assert!(fallback);
        assert_eq!(factors, find_gasket_material("fiber").unwrap().factors);
    }

    #[test]
    fn test_factors_are_positive() {
        for g in GASKET_MATERIALS.iter() {
            assert!(g.factors.m > 0.0 && g.factors.y_mpa > 0.0, "{}", g.id);
        }
    }
}
