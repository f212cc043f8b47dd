//! # U-Beam (WSDOT)
//!
//! Open-topped trough with two sloped webs and top flanges. D1 is the
//! overall depth, D2 the bottom slab, D3 the flange thickness. D4/W5 size
//! the fillet at the bottom of the inside web face, D5 the fillet under the
//! flange. W4/D6 and D7 describe the optional bevels at the top outside
//! corner. T is the web thickness measured normal to the web.

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{polygon_from_sides, sloped_web_regions, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING, SPREAD_ONLY};
use crate::geometry::Point2;
use crate::persistence::{Correction, MissingFieldDefault, PersistenceRules, VersionContext};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint, TOLERANCE};

const FAMILY: &str = "UBeam";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("D1", 54.0),
            ("D2", 6.0),
            ("D3", 6.0),
            ("D4", 0.0),
            ("D5", 0.0),
            ("D6", 0.0),
            ("D7", 0.0),
            ("T", 7.0),
            ("W1", 48.0),
            ("W2", 63.425),
            ("W3", 12.0),
            ("W4", 0.0),
            ("W5", 0.0),
        ],
    )
});

typed_dimensions! {
    pub struct UBeamDims for "UBeam" {
        d1 => "D1",
        d2 => "D2",
        d3 => "D3",
        d4 => "D4",
        d5 => "D5",
        d6 => "D6",
        d7 => "D7",
        t => "T",
        w1 => "W1",
        w2 => "W2",
        w3 => "W3",
        w4 => "W4",
        w5 => "W5",
    }
}

impl UBeamDims {
    /// Horizontal run of the outside web face
    fn web_run(&self) -> f64 {
        (self.w2 - self.w1) / 2.0 - self.w4
    }

    /// Rise over run of the web
    pub fn web_slope(&self) -> f64 {
        (self.d1 - self.d6) / self.web_run()
    }

    /// Web thickness measured horizontally
    pub fn web_width(&self) -> f64 {
        let s = self.web_slope();
        self.t * (s * s + 1.0).sqrt() / s
    }

    pub fn width(&self) -> f64 {
        self.w1.max(self.w2)
    }
}

type Rule = Constraint<UBeamDims>;

static RULES: &[Rule] = &[
    Rule::formatted(|d| d.d1 > 0.0, |_, u| {
        format!("D1 must be greater than 0.0 {}", u.component_length().tag())
    }),
    Rule::formatted(|d| d.d2 > 0.0, |_, u| {
        format!("D2 must be greater than 0.0{}", u.component_length().tag())
    }),
    Rule::formatted(|d| d.d3 >= 0.0, |_, u| {
        format!("D3 must be greater than or equal to 0.0{}", u.component_length().tag())
    }),
    Rule::formatted(|d| d.d1 >= d.d2 + d.d3, |d, u| {
        format!(
            "D1 must be greater than or equal to D2 + D3 ({})",
            u.format_length(d.d2 + d.d3)
        )
    }),
    Rule::formatted(|d| d.w1 > 0.0, |_, u| {
        format!("W1 must be greater than 0.0 {}", u.component_length().tag())
    }),
    Rule::fixed(|d| d.w2 > 0.0, "W2 must be greater than 0.0"),
    Rule::formatted(|d| d.w3 >= 0.0, |_, u| {
        format!("W3 must be greater than or equal to 0.0 {}", u.component_length().tag())
    }),
    Rule::formatted(|d| d.t > 0.0, |_, u| {
        format!("T must be greater than 0.0 {}", u.component_length().tag())
    }),
    Rule::fixed(
        |d| d.web_run() > 0.0 && d.d1 - d.d6 > 0.0,
        "Dimensions are such that the web thickness is zero.",
    ),
];

// ============================================================================
// Persistence
// ============================================================================

fn early_writer(ctx: VersionContext) -> bool {
    let parent_is = |v: f64| (ctx.parent - v).abs() < 1.0e-9;
    ctx.block < 2.0 && (parent_is(1.2) || parent_is(1.3))
}

macro_rules! early_default {
    ($($field:literal),+) => {
        &[$(MissingFieldDefault { field: $field, default: 0.0, applies: early_writer }),+]
    };
}

/// Writers at version 1.3 stored the bottom fillet offset in W4, measured
/// from the outside face. The web slope is taken with W4 already cleared.
fn move_fillet_offset(dims: &mut DimensionSet) -> SectionResult<()> {
    let mut d = UBeamDims::from_set(dims)?;
    let offset = d.w4;
    // Older files from the 1.3 writer had their slope taken from the stored
    // W4, which still held the offset. That slope is not reproduced here.
    d.w4 = 0.0;
    let w5 = offset - d.web_width();
    let w5 = if w5.abs() < TOLERANCE { 0.0 } else { w5 };
    dims.set(FAMILY, "W5", w5)?;
    dims.set(FAMILY, "W4", 0.0)
}

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "UBeamDimensions",
    block_version: 1.0,
    legacy: None,
    missing: early_default!("D1", "D2", "D3", "D4", "D5", "D6", "D7", "T", "W1", "W2", "W3", "W4", "W5"),
    corrections: &[Correction {
        description: "move fillet offset from W4 to W5",
        applies: |ctx| (ctx.parent - 1.3).abs() < 1.0e-9,
        apply: move_fillet_offset,
    }],
};

// ============================================================================
// Family
// ============================================================================

pub struct UBeam;

impl UBeam {
    /// Right half, outside bottom corner around to the inside floor.
    fn right_side(d: &UBeamDims) -> Vec<Point2> {
        let slope = d.web_slope();
        let outside = |y: f64| d.w1 / 2.0 + y / slope;
        let inside = |y: f64| outside(y) - d.web_width();

        let half = d.w2 / 2.0;
        let flange_bottom = d.d1 - d.d3;
        let fillet_top = flange_bottom - d.d5;
        let floor = d.d2 + d.d4;
        let floor_x = inside(floor);

        vec![
            Point2::new(d.w1 / 2.0, 0.0),
            Point2::new(half - d.w4, d.d1 - d.d6),
            Point2::new(half, d.d1 - d.d7),
            Point2::new(half, d.d1),
            Point2::new(half - d.w3, d.d1),
            Point2::new(half - d.w3, flange_bottom),
            Point2::new(inside(fillet_top), fillet_top),
            Point2::new(floor_x, floor),
            Point2::new(floor_x - d.w5, d.d2),
        ]
    }
}

impl SectionFamily for UBeam {
    fn family(&self) -> BeamFamily {
        BeamFamily::UBeam
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &UBeamDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(UBeamDims::from_set(dims)?.d1)
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(UBeamDims::from_set(dims)?.width())
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        SPREAD_ONLY
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        Ok((UBeamDims::from_set(dims)?.width(), MAX_GIRDER_SPACING))
    }

    fn build_shape(&self, dims: &DimensionSet, _options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = UBeamDims::from_set(dims)?;
        let right = Self::right_side(&d);
        Ok(SectionShape::solid(polygon_from_sides(&right, &right)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = UBeamDims::from_set(dims)?;
        Ok(sloped_web_regions(d.w1 / 2.0, depth, d.web_slope(), d.t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{load_dimensions, Archive, StructuredLoad, Unit};
    use crate::section::{build_outline, OutlineOptions};
    use crate::units::inches;
    use crate::validation::validate_dimensions;
    use approx::assert_relative_eq;

    fn message(dims: &DimensionSet, units: UnitSystem) -> String {
        validate_dimensions(BeamFamily::UBeam, dims, units).unwrap_err().to_string()
    }

    #[test]
    fn test_defaults_valid() {
        for units in UnitSystem::ALL {
            assert!(validate_dimensions(BeamFamily::UBeam, &SCHEMA.default_set(), units).is_ok());
        }
    }

    #[test]
    fn test_messages_carry_unit_tags() {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "D1", 0.0).unwrap();
        assert_eq!(message(&dims, UnitSystem::Us), "UBeam: D1 must be greater than 0.0 in");
        assert_eq!(message(&dims, UnitSystem::Si), "UBeam: D1 must be greater than 0.0 mm");

        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "D2", 0.0).unwrap();
        assert_eq!(message(&dims, UnitSystem::Us), "UBeam: D2 must be greater than 0.0in");

        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "D1", inches(10.0)).unwrap();
        assert_eq!(
            message(&dims, UnitSystem::Us),
            "UBeam: D1 must be greater than or equal to D2 + D3 (12 in)"
        );

        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "W2", 0.0).unwrap();
        assert_eq!(message(&dims, UnitSystem::Si), "UBeam: W2 must be greater than 0.0");
    }

    #[test]
    fn test_vertical_webs_rejected() {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "W2", inches(48.0)).unwrap();
        assert_eq!(
            message(&dims, UnitSystem::Us),
            "UBeam: Dimensions are such that the web thickness is zero."
        );
    }

    #[test]
    fn test_web_geometry() {
        let d = UBeamDims::from_set(&SCHEMA.default_set()).unwrap();
        let run = (63.425 - 48.0) / 2.0;
        assert_relative_eq!(d.web_slope(), 54.0 / run, epsilon = 1e-12);
        let s = 54.0 / run;
        assert_relative_eq!(d.web_width(), inches(7.0 * (s * s + 1.0).sqrt() / s), epsilon = 1e-12);
        assert_relative_eq!(d.width(), inches(63.425), epsilon = 1e-12);
    }

    #[test]
    fn test_outline_is_open_topped() {
        let dims = SCHEMA.default_set();
        let outline = build_outline(BeamFamily::UBeam, &dims, &OutlineOptions::default()).unwrap();
        let solid = &outline.shape.solids[0];
        assert!(outline.shape.voids.is_empty());
        // mid-depth on the centerline is the open trough
        assert!(!solid.contains(Point2::new(0.0, -inches(27.0))));
        // the bottom slab is solid
        assert!(solid.contains(Point2::new(0.0, -inches(51.0))));
        assert_eq!(outline.spacing, BeamSpacing::UniformSpread);
    }

    fn block_without_w5_and_d7(parent: f64) -> Unit {
        let mut block = Unit::new("UBeamDimensions", 1.0);
        for (name, value) in SCHEMA.default_set().iter() {
            if name != "W5" && name != "D7" {
                block = block.with_property(name, value);
            }
        }
        Unit::new("GirderLibraryEntry", parent).with_unit(block)
    }

    fn load(unit: Unit) -> SectionResult<DimensionSet> {
        let archive = Archive::from_units([unit]);
        let mut reader = archive.reader();
        assert!(reader.begin_unit("GirderLibraryEntry"));
        load_dimensions(&mut reader, BeamFamily::UBeam)
    }

    #[test]
    fn test_early_writer_tolerated() {
        // parent 1.2 predates nested blocks
        let flat = SCHEMA
            .default_set()
            .iter()
            .filter(|(name, _)| *name != "W5")
            .fold(Unit::new("GirderLibraryEntry", 1.2), |unit, (name, value)| {
                unit.with_property(name, value)
            });
        let dims = load(flat).unwrap();
        assert_eq!(dims.get("W5"), Some(0.0));

        let flat = SCHEMA
            .default_set()
            .iter()
            .filter(|(name, _)| *name != "W5")
            .fold(Unit::new("GirderLibraryEntry", 1.4), |unit, (name, value)| {
                unit.with_property(name, value)
            });
        assert!(load(flat).is_err());
    }

    #[test]
    fn test_version_1_3_moves_fillet_offset() {
        let flat = SCHEMA
            .default_set()
            .iter()
            .map(|(name, value)| if name == "W4" { (name, inches(10.0)) } else { (name, value) })
            .fold(Unit::new("GirderLibraryEntry", 1.3), |unit, (name, value)| {
                unit.with_property(name, value)
            });
        let dims = load(flat).unwrap();

        let d = UBeamDims::from_set(&SCHEMA.default_set()).unwrap();
        let expected = inches(10.0) - d.web_width();
        assert!(expected > 0.0);
        assert_relative_eq!(dims.get("W5").unwrap(), expected, epsilon = 1e-12);
        assert_eq!(dims.get("W4"), Some(0.0));
        assert_eq!(dims.len(), SCHEMA.specs().len());
    }

    #[test]
    fn test_version_1_3_slope_ignores_stored_offset() {
        let offset = inches(10.0);
        let flat = SCHEMA
            .default_set()
            .iter()
            .map(|(name, value)| if name == "W4" { (name, offset) } else { (name, value) })
            .fold(Unit::new("GirderLibraryEntry", 1.3), |unit, (name, value)| {
                unit.with_property(name, value)
            });
        let w5 = load(flat).unwrap().get("W5").unwrap();

        // a slope taken from the stored W4 runs the web backwards
        let d = UBeamDims::from_set(&SCHEMA.default_set()).unwrap();
        let stored = UBeamDims { w4: offset, ..d };
        assert!(stored.web_slope() < 0.0);
        assert!((w5 - (offset - stored.web_width())).abs() > inches(1.0));
        assert_relative_eq!(w5, offset - d.web_width(), epsilon = 1e-12);
    }

    #[test]
    fn test_missing_fields_fatal_for_later_writers() {
        // W5 and D7 are required outside the early writer versions
        assert!(load(block_without_w5_and_d7(15.0)).is_err());
    }
}
