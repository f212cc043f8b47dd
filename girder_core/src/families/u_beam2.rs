//! # U-Beam (TxDOT)
//!
//! Open-topped trough with sloped webs and horizontal top flanges. Unlike
//! the WSDOT U-beam, the web is sized by horizontal offsets: W6 is the
//! flange-edge-to-inside-flange distance, W7 the step from the inside flange
//! edge to the inside web face, W5 the flange overhang and W4 the bevel at
//! the top of the outside web face. D6 is carried for compatibility with
//! stored libraries but does not enter the geometry.

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{polygon_from_sides, sloped_web_regions, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING, SPREAD_ONLY};
use crate::geometry::Point2;
use crate::persistence::{MissingFieldDefault, PersistenceRules};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint};

const FAMILY: &str = "UBeam2";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("C1", 0.75),
            ("D1", 40.0),
            ("D2", 8.25),
            ("D3", 3.0),
            ("D4", 0.875),
            ("D5", 5.875),
            ("D6", 21.625),
            ("EndBlockLength", 0.0),
            ("W1", 55.0),
            ("W2", 89.0),
            ("W3", 3.0),
            ("W4", 0.375),
            ("W5", 8.25),
            ("W6", 15.75),
            ("W7", 1.75),
        ],
    )
});

typed_dimensions! {
    pub struct UBeam2Dims for "UBeam2" {
        c1 => "C1",
        d1 => "D1",
        d2 => "D2",
        d3 => "D3",
        d4 => "D4",
        d5 => "D5",
        d6 => "D6",
        end_block_length => "EndBlockLength",
        w1 => "W1",
        w2 => "W2",
        w3 => "W3",
        w4 => "W4",
        w5 => "W5",
        w6 => "W6",
        w7 => "W7",
    }
}

impl UBeam2Dims {
    /// Rise over run of the outside web face
    pub fn web_slope(&self) -> f64 {
        let rise = self.d1 - self.d5 - self.d4;
        let run = (self.w2 - self.w1) / 2.0 - self.w5 - self.w4;
        rise / run
    }

    /// Web thickness measured horizontally
    pub fn web_width(&self) -> f64 {
        self.w6 - self.w5 - self.w4 - self.w7
    }

    /// Web thickness measured normal to the web
    pub fn web_thickness(&self) -> f64 {
        let s = self.web_slope();
        self.web_width() * s / (s * s + 1.0).sqrt()
    }

    pub fn width(&self) -> f64 {
        self.w1.max(self.w2)
    }
}

type Rule = Constraint<UBeam2Dims>;

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
    Rule::formatted(|d| d.c1 >= 0.0, |_, u| {
        format!("C1 must be greater than or equal to 0.0 {}", u.component_length().tag())
    }),
    Rule::fixed(|d| d.c1 <= d.w5, "C1 must be less than or equal to W5"),
    Rule::fixed(|d| d.c1 <= d.d5, "C1 must be less than or equal to D5"),
    Rule::fixed(
        |d| d.w1 < d.w2 - 2.0 * (d.w4 + d.w5),
        "W1 must be less than w2 - 2 * (w4+w5)",
    ),
    Rule::fixed(
        |d| d.web_width() > 0.0 && d.web_slope() > 0.0,
        "Dimensions are such that the web thickness is zero.",
    ),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "UBeam2Dimensions",
    // v2 added EndBlockLength
    block_version: 2.0,
    legacy: None,
    missing: &[
        MissingFieldDefault {
            field: "C1",
            default: 0.0,
            applies: |ctx| ctx.block < 2.0 && ctx.parent < 3.0,
        },
        MissingFieldDefault {
            field: "EndBlockLength",
            default: 0.0,
            applies: |ctx| ctx.block < 2.0,
        },
    ],
    corrections: &[],
};

pub struct UBeam2;

impl UBeam2 {
    /// Right half, outside bottom corner around to the inside floor.
    fn right_side(d: &UBeam2Dims) -> Vec<Point2> {
        let slope = d.web_slope();
        let inside = |y: f64| d.w1 / 2.0 + y / slope - d.web_width();

        let half = d.w2 / 2.0;
        let flange_bottom = d.d1 - d.d5;
        let bevel_bottom = flange_bottom - d.d4;
        let floor = d.d2 + d.d3;
        let floor_x = inside(floor);

        vec![
            Point2::new(d.w1 / 2.0, 0.0),
            Point2::new(half - d.w5 - d.w4, bevel_bottom),
            Point2::new(half - d.w5, flange_bottom),
            Point2::new(half - d.c1, flange_bottom),
            Point2::new(half, flange_bottom + d.c1),
            Point2::new(half, d.d1),
            Point2::new(half - d.w6, d.d1),
            Point2::new(half - d.w6, flange_bottom),
            Point2::new(half - d.w6 + d.w7, bevel_bottom),
            Point2::new(floor_x, floor),
            Point2::new(floor_x - d.w3, d.d2),
        ]
    }
}

impl SectionFamily for UBeam2 {
    fn family(&self) -> BeamFamily {
        BeamFamily::UBeam2
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &UBeam2Dims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(UBeam2Dims::from_set(dims)?.d1)
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(UBeam2Dims::from_set(dims)?.width())
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        SPREAD_ONLY
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        Ok((UBeam2Dims::from_set(dims)?.width(), MAX_GIRDER_SPACING))
    }

    fn build_shape(&self, dims: &DimensionSet, _options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = UBeam2Dims::from_set(dims)?;
        let right = Self::right_side(&d);
        Ok(SectionShape::solid(polygon_from_sides(&right, &right)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = UBeam2Dims::from_set(dims)?;
        Ok(sloped_web_regions(d.w1 / 2.0, depth, d.web_slope(), d.web_thickness()))
    }

    fn end_block_length(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(UBeam2Dims::from_set(dims)?.end_block_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{load_dimensions, Archive, StructuredLoad, Unit};
    use crate::section::{build_outline, is_prismatic, OutlineOptions};
    use crate::units::inches;
    use crate::validation::validate_dimensions;
    use approx::assert_relative_eq;

    fn message(dims: &DimensionSet, units: UnitSystem) -> String {
        validate_dimensions(BeamFamily::UBeam2, dims, units).unwrap_err().to_string()
    }

    fn with(name: &str, value_in: f64) -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, name, inches(value_in)).unwrap();
        dims
    }

    #[test]
    fn test_schema_is_sorted_by_name() {
        let names: Vec<_> = SCHEMA.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_defaults() {
        let dims = SCHEMA.default_set();
        assert!(validate_dimensions(BeamFamily::UBeam2, &dims, UnitSystem::Us).is_ok());
        assert!(is_prismatic(BeamFamily::UBeam2, &dims).unwrap());
        assert!(!is_prismatic(BeamFamily::UBeam2, &with("EndBlockLength", 30.0)).unwrap());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            message(&with("D1", 10.0), UnitSystem::Si),
            "UBeam2: D1 must be greater than or equal to D2 + D3 (285.75 mm)"
        );
        assert_eq!(
            message(&with("C1", 9.0), UnitSystem::Us),
            "UBeam2: C1 must be less than or equal to W5"
        );
        assert_eq!(
            message(&with("C1", 6.0), UnitSystem::Us),
            "UBeam2: C1 must be less than or equal to D5"
        );
        assert_eq!(
            message(&with("W1", 75.0), UnitSystem::Us),
            "UBeam2: W1 must be less than w2 - 2 * (w4+w5)"
        );
        assert_eq!(
            message(&with("W7", 7.125), UnitSystem::Us),
            "UBeam2: Dimensions are such that the web thickness is zero."
        );
    }

    #[test]
    fn test_web_thickness() {
        let d = UBeam2Dims::from_set(&SCHEMA.default_set()).unwrap();
        let s = 33.25 / 8.375;
        assert_relative_eq!(d.web_slope(), s, epsilon = 1e-9);
        assert_relative_eq!(d.web_width(), inches(5.375), epsilon = 1e-12);
        assert_relative_eq!(d.web_thickness(), inches(5.375 * s / (s * s + 1.0).sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn test_inside_web_face_meets_flange_step() {
        // the inside face at the bevel line lands W7 in from the flange edge
        let d = UBeam2Dims::from_set(&SCHEMA.default_set()).unwrap();
        let y = d.d1 - d.d5 - d.d4;
        let inside = d.w1 / 2.0 + y / d.web_slope() - d.web_width();
        assert_relative_eq!(inside, d.w2 / 2.0 - d.w6 + d.w7, epsilon = 1e-12);
    }

    #[test]
    fn test_outline() {
        let outline = build_outline(BeamFamily::UBeam2, &SCHEMA.default_set(), &OutlineOptions::default()).unwrap();
        assert_relative_eq!(outline.width, inches(89.0), epsilon = 1e-12);
        assert_relative_eq!(outline.height, inches(40.0), epsilon = 1e-12);
        assert!(!outline.shape.solids[0].contains(Point2::new(0.0, -inches(20.0))));
    }

    fn load(unit: Unit) -> SectionResult<DimensionSet> {
        let archive = Archive::from_units([unit]);
        let mut reader = archive.reader();
        assert!(reader.begin_unit("GirderLibraryEntry"));
        load_dimensions(&mut reader, BeamFamily::UBeam2)
    }

    fn unit_without(parent: f64, block_version: Option<f64>, skip: &[&str]) -> Unit {
        let props = SCHEMA
            .default_set()
            .iter()
            .filter(|(name, _)| !skip.contains(name))
            .map(|(name, value)| (name.to_string(), value))
            .collect::<Vec<_>>();
        match block_version {
            Some(version) => {
                let block = props
                    .into_iter()
                    .fold(Unit::new("UBeam2Dimensions", version), |u, (n, v)| u.with_property(n, v));
                Unit::new("GirderLibraryEntry", parent).with_unit(block)
            }
            None => props
                .into_iter()
                .fold(Unit::new("GirderLibraryEntry", parent), |u, (n, v)| u.with_property(n, v)),
        }
    }

    #[test]
    fn test_old_writers_tolerated() {
        let dims = load(unit_without(2.0, None, &["C1", "EndBlockLength"])).unwrap();
        assert_eq!(dims.get("C1"), Some(0.0));
        assert_eq!(dims.get("EndBlockLength"), Some(0.0));

        let dims = load(unit_without(15.0, Some(1.0), &["EndBlockLength"])).unwrap();
        assert_relative_eq!(dims.get("C1").unwrap(), inches(0.75), epsilon = 1e-12);
    }

    #[test]
    fn test_missing_c1_fatal_after_version_3() {
        assert!(load(unit_without(15.0, Some(1.0), &["C1"])).is_err());
        assert!(load(unit_without(15.0, Some(2.0), &["EndBlockLength"])).is_err());
    }
}
