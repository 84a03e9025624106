//! # EN 1092-1 Blind Flange Dimensions
//!
//! Catalog dimensions of type 05 (blind) flanges, keyed by nominal size and
//! pressure class. The engine only reads from this table; it is consulted
//! for the reference entry of a (DN, PN) pair and for the bolt circle floor
//! used by the custom sizing search.
//!
//! ```rust
//! use flange_core::standards;
//!
//! let f = standards::lookup(100, 40).unwrap();
//! assert_eq!(f.outer_diameter_mm, 235.0);
//! assert_eq!(f.bolt_count, 8);
//! assert_eq!(f.thread_size, "M20");
//! ```

use serde::Serialize;

/// One catalog flange
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardFlange {
    /// Nominal size DN
    pub dn: u32,
    /// Pressure class PN
    pub pn: u32,
    /// Outer diameter D (mm)
    pub outer_diameter_mm: f64,
    /// Bolt circle K (mm)
    pub bolt_circle_mm: f64,
    pub bolt_count: u32,
    pub thread_size: &'static str,
    /// Bolt hole L (mm)
    pub hole_diameter_mm: f64,
}

const fn row(dn: u32, pn: u32, d: f64, k: f64, n: u32, thread_size: &'static str, hole: f64) -> StandardFlange {
    StandardFlange {
        dn,
        pn,
        outer_diameter_mm: d,
        bolt_circle_mm: k,
        bolt_count: n,
        thread_size,
        hole_diameter_mm: hole,
    }
}

/// Cataloged pressure classes
pub const PRESSURE_CLASSES: [u32; 6] = [10, 16, 25, 40, 63, 100];

/// Type 05 dimensions, grouped by class then size
pub const EN1092_TABLE: &[StandardFlange] = &[
    // PN 10
    row(50, 10, 165.0, 125.0, 4, "M16", 18.0),
    row(65, 10, 185.0, 145.0, 8, "M16", 18.0),
    row(80, 10, 200.0, 160.0, 8, "M16", 18.0),
    row(100, 10, 220.0, 180.0, 8, "M16", 18.0),
    row(125, 10, 250.0, 210.0, 8, "M16", 18.0),
    row(150, 10, 285.0, 240.0, 8, "M20", 22.0),
    row(200, 10, 340.0, 295.0, 8, "M20", 22.0),
    row(250, 10, 395.0, 350.0, 12, "M20", 22.0),
    row(300, 10, 445.0, 400.0, 12, "M20", 22.0),
    row(350, 10, 505.0, 460.0, 16, "M20", 22.0),
    row(400, 10, 565.0, 515.0, 16, "M24", 26.0),
    row(450, 10, 615.0, 565.0, 20, "M24", 26.0),
    row(500, 10, 670.0, 620.0, 20, "M24", 26.0),
    row(600, 10, 780.0, 725.0, 20, "M27", 30.0),
    // PN 16
    row(50, 16, 165.0, 125.0, 4, "M16", 18.0),
    row(65, 16, 185.0, 145.0, 8, "M16", 18.0),
    row(80, 16, 200.0, 160.0, 8, "M16", 18.0),
    row(100, 16, 220.0, 180.0, 8, "M16", 18.0),
    row(125, 16, 250.0, 210.0, 8, "M16", 18.0),
    row(150, 16, 285.0, 240.0, 8, "M20", 22.0),
    row(200, 16, 340.0, 295.0, 12, "M20", 22.0),
    row(250, 16, 405.0, 355.0, 12, "M24", 26.0),
    row(300, 16, 460.0, 410.0, 12, "M24", 26.0),
    row(350, 16, 520.0, 470.0, 16, "M24", 26.0),
    row(400, 16, 580.0, 525.0, 16, "M27", 30.0),
    row(450, 16, 640.0, 585.0, 20, "M27", 30.0),
    row(500, 16, 715.0, 650.0, 20, "M30", 33.0),
    row(600, 16, 840.0, 770.0, 20, "M33", 36.0),
    // PN 25
    row(50, 25, 165.0, 125.0, 4, "M16", 18.0),
    row(65, 25, 185.0, 145.0, 8, "M16", 18.0),
    row(80, 25, 200.0, 160.0, 8, "M16", 18.0),
    row(100, 25, 235.0, 190.0, 8, "M20", 22.0),
    row(125, 25, 270.0, 220.0, 8, "M24", 26.0),
    row(150, 25, 300.0, 250.0, 8, "M24", 26.0),
    row(200, 25, 360.0, 310.0, 12, "M24", 26.0),
    row(250, 25, 425.0, 370.0, 12, "M27", 30.0),
    row(300, 25, 485.0, 430.0, 16, "M27", 30.0),
    row(350, 25, 555.0, 490.0, 16, "M30", 33.0),
    row(400, 25, 620.0, 550.0, 16, "M33", 36.0),
    row(450, 25, 670.0, 600.0, 20, "M33", 36.0),
    row(500, 25, 730.0, 660.0, 20, "M33", 36.0),
    row(600, 25, 845.0, 770.0, 20, "M36", 39.0),
    // PN 40
    row(50, 40, 165.0, 125.0, 4, "M16", 18.0),
    row(65, 40, 185.0, 145.0, 8, "M16", 18.0),
    row(80, 40, 200.0, 160.0, 8, "M16", 18.0),
    row(100, 40, 235.0, 190.0, 8, "M20", 22.0),
    row(125, 40, 270.0, 220.0, 8, "M24", 26.0),
    row(150, 40, 300.0, 250.0, 8, "M24", 26.0),
    row(200, 40, 375.0, 320.0, 12, "M27", 30.0),
    row(250, 40, 450.0, 385.0, 12, "M30", 33.0),
    row(300, 40, 515.0, 450.0, 16, "M30", 33.0),
    row(350, 40, 580.0, 510.0, 16, "M33", 36.0),
    row(400, 40, 660.0, 585.0, 16, "M36", 39.0),
    row(450, 40, 685.0, 610.0, 20, "M36", 39.0),
    row(500, 40, 755.0, 670.0, 20, "M39", 42.0),
    row(600, 40, 890.0, 795.0, 20, "M45", 48.0),
    // PN 63
    row(50, 63, 180.0, 135.0, 4, "M20", 22.0),
    row(65, 63, 205.0, 160.0, 8, "M20", 22.0),
    row(80, 63, 215.0, 170.0, 8, "M20", 22.0),
    row(100, 63, 250.0, 200.0, 8, "M24", 26.0),
    row(125, 63, 295.0, 240.0, 8, "M27", 30.0),
    row(150, 63, 345.0, 280.0, 8, "M30", 33.0),
    row(200, 63, 415.0, 345.0, 12, "M33", 36.0),
    row(250, 63, 470.0, 400.0, 12, "M33", 36.0),
    row(300, 63, 530.0, 460.0, 16, "M33", 36.0),
    row(350, 63, 600.0, 525.0, 16, "M36", 39.0),
    row(400, 63, 670.0, 585.0, 16, "M39", 42.0),
    // PN 100
    row(50, 100, 195.0, 145.0, 4, "M24", 26.0),
    row(65, 100, 220.0, 170.0, 8, "M24", 26.0),
    row(80, 100, 230.0, 180.0, 8, "M24", 26.0),
    row(100, 100, 265.0, 210.0, 8, "M27", 30.0),
    row(125, 100, 315.0, 250.0, 8, "M30", 33.0),
    row(150, 100, 355.0, 290.0, 12, "M30", 33.0),
    row(200, 100, 430.0, 360.0, 12, "M33", 36.0),
    row(250, 100, 505.0, 430.0, 12, "M36", 39.0),
    row(300, 100, 585.0, 500.0, 16, "M39", 42.0),
    row(350, 100, 655.0, 560.0, 16, "M45", 48.0),
];

/// Catalog entry for a (DN, PN) pair
pub fn lookup(dn: u32, pn: u32) -> Option<StandardFlange> {
    EN1092_TABLE.iter().copied().find(|f| f.dn == dn && f.pn == pn)
}

/// Classes cataloged for a nominal size, ascending
pub fn classes_for(dn: u32) -> Vec<u32> {
    let mut classes: Vec<u32> = EN1092_TABLE.iter().filter(|f| f.dn == dn).map(|f| f.pn).collect();
    classes.sort_unstable();
    classes
}

/// Bolt circle of the highest cataloged class for a nominal size.
///
/// The custom sizing search never places bolts inside this circle.
pub fn max_class_bolt_circle(dn: u32) -> Option<f64> {
    EN1092_TABLE
        .iter()
        .filter(|f| f.dn == dn)
        .max_by_key(|f| f.pn)
        .map(|f| f.bolt_circle_mm)
}
