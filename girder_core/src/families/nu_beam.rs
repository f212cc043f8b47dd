//! # NU Beam
//!
//! Nebraska University I-girder. Wide top and bottom flanges joined to a
//! single vertical web through tapers, with large fillets R1 (top) and R2
//! (bottom) where the web meets the tapers and small radii R3 and R4 at
//! the flange edges. C1 chamfers the bottom corners.
//!
//! ```text
//!  |<------------- W1 ------------->|
//!  +--------------------------------+   -+- D1
//!   \_____________      ___________/    -+- D2
//!                 |    |                 |
//!                 |<T >|                 D3
//!        _________|    |_________        |
//!       /                        \      -+- D4
//!      |                          |      D5
//!      +--------------------------+     -+-
//!      |<---------- W2 ---------->|
//! ```

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{
    polygon_from_sides, rounded_profile, web_rectangle, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING,
    SPREAD_ONLY,
};
use crate::geometry::Point2;
use crate::persistence::{MissingFieldDefault, PersistenceRules, VersionContext};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint};

const FAMILY: &str = "NUBeam";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("D1", 3.0),
            ("D2", 1.75),
            ("D3", 54.875),
            ("D4", 6.0),
            ("D5", 6.375),
            ("R1", 10.0),
            ("R2", 10.0),
            ("R3", 2.5),
            ("R4", 2.5),
            ("T", 7.0),
            ("W1", 48.0),
            ("W2", 43.0),
            ("C1", 1.0),
        ],
    )
});

typed_dimensions! {
    pub struct NuBeamDims for "NUBeam" {
        d1 => "D1",
        d2 => "D2",
        d3 => "D3",
        d4 => "D4",
        d5 => "D5",
        r1 => "R1",
        r2 => "R2",
        r3 => "R3",
        r4 => "R4",
        t => "T",
        w1 => "W1",
        w2 => "W2",
        c1 => "C1",
    }
}

impl NuBeamDims {
    pub fn height(&self) -> f64 {
        self.d1 + self.d2 + self.d3 + self.d4 + self.d5
    }
}

type Rule = Constraint<NuBeamDims>;

fn greater_than_zero(name: &str, units: UnitSystem) -> String {
    format!("{} must be greater than 0.0 {}", name, units.component_length().tag())
}

static RULES: &[Rule] = &[
    Rule::formatted(|d| d.d1 > 0.0, |_, u| greater_than_zero("D1", u)),
    Rule::fixed(|d| d.d2 >= 0.0, "D2 must be a positive value"),
    Rule::fixed(|d| d.d3 >= 0.0, "D3 must be a positive value"),
    Rule::formatted(|d| d.d4 > 0.0, |_, u| greater_than_zero("D4", u)),
    Rule::fixed(|d| d.d5 >= 0.0, "D5 must be a positive value"),
    Rule::formatted(|d| d.r1 > 0.0, |_, u| greater_than_zero("R1", u)),
    Rule::fixed(|d| d.r2 >= 0.0, "R2 must be a positive value"),
    Rule::fixed(|d| d.r3 >= 0.0, "R3 must be a positive value"),
    Rule::formatted(|d| d.r4 > 0.0, |_, u| greater_than_zero("R4", u)),
    Rule::formatted(|d| d.w1 > 0.0, |_, u| greater_than_zero("W1", u)),
    Rule::fixed(|d| d.w2 >= 0.0, "W2 must be a positive value"),
    Rule::formatted(|d| d.t > 0.0, |_, u| greater_than_zero("T", u)),
    Rule::fixed(|d| d.d5 >= d.c1, "C1 must be less than d5"),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "NUBeamDimensions",
    block_version: 2.0,
    legacy: None,
    missing: &[MissingFieldDefault {
        field: "C1",
        default: 0.0,
        applies: |ctx: VersionContext| ctx.block < 2.0,
    }],
    corrections: &[],
};

pub struct NuBeam;

impl NuBeam {
    /// Right-hand profile, bottom to top, with every corner rounded.
    fn side_profile(d: &NuBeamDims) -> Vec<Point2> {
        let h = d.height();
        let bottom = d.w2 / 2.0;
        let top = d.w1 / 2.0;
        let web = d.t / 2.0;

        let corners = [
            Point2::new(bottom - d.c1, 0.0),
            Point2::new(bottom, d.c1),
            Point2::new(bottom, d.d5),
            Point2::new(web, d.d5 + d.d4),
            Point2::new(web, h - d.d1 - d.d2),
            Point2::new(top, h - d.d1),
            Point2::new(top, h),
        ];
        rounded_profile(&corners, &[(2, d.r4), (3, d.r2), (4, d.r1), (5, d.r3)])
    }
}

impl SectionFamily for NuBeam {
    fn family(&self) -> BeamFamily {
        BeamFamily::NuBeam
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &NuBeamDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(NuBeamDims::from_set(dims)?.height())
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        let d = NuBeamDims::from_set(dims)?;
        Ok(d.w1.max(d.w2))
    }

    fn web_count(&self, _dims: &DimensionSet) -> SectionResult<usize> {
        Ok(1)
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        SPREAD_ONLY
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        Ok((self.width(dims)?, MAX_GIRDER_SPACING))
    }

    fn build_shape(&self, dims: &DimensionSet, _options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = NuBeamDims::from_set(dims)?;
        let side = Self::side_profile(&d);
        Ok(SectionShape::solid(polygon_from_sides(&side, &side)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = NuBeamDims::from_set(dims)?;
        Ok(vec![HarpRegion::new(web_rectangle(0.0, d.t, depth), 0.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::FILLET_SEGMENTS;
    use crate::persistence::{load_dimensions, Archive, StructuredLoad, Unit};
    use crate::section::{build_outline, is_prismatic, surface_area};
    use crate::units::inches;
    use crate::validation::validate_dimensions;
    use approx::assert_relative_eq;

    fn with(name: &str, value_in: f64) -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, name, inches(value_in)).unwrap();
        dims
    }

    fn without_radii() -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        for name in ["R1", "R2", "R3", "R4"] {
            dims.set(FAMILY, name, 0.0).unwrap();
        }
        dims
    }

    fn message(dims: &DimensionSet, units: UnitSystem) -> String {
        validate_dimensions(BeamFamily::NuBeam, dims, units).unwrap_err().to_string()
    }

    fn area(dims: &DimensionSet) -> f64 {
        build_outline(BeamFamily::NuBeam, dims, &OutlineOptions::default()).unwrap().area()
    }

    #[test]
    fn test_defaults() {
        let dims = SCHEMA.default_set();
        assert!(validate_dimensions(BeamFamily::NuBeam, &dims, UnitSystem::Us).is_ok());
        assert!(is_prismatic(BeamFamily::NuBeam, &dims).unwrap());
        assert_eq!(NuBeam.web_count(&dims).unwrap(), 1);
    }

    #[test]
    fn test_messages_in_order() {
        assert_eq!(message(&with("D1", 0.0), UnitSystem::Us), "NUBeam: D1 must be greater than 0.0 in");
        assert_eq!(message(&with("D1", 0.0), UnitSystem::Si), "NUBeam: D1 must be greater than 0.0 mm");
        assert_eq!(message(&with("D3", -1.0), UnitSystem::Us), "NUBeam: D3 must be a positive value");
        assert_eq!(message(&with("R1", 0.0), UnitSystem::Us), "NUBeam: R1 must be greater than 0.0 in");
        assert_eq!(message(&with("R4", 0.0), UnitSystem::Us), "NUBeam: R4 must be greater than 0.0 in");
        assert_eq!(message(&with("T", 0.0), UnitSystem::Us), "NUBeam: T must be greater than 0.0 in");
        assert_eq!(message(&with("C1", 7.0), UnitSystem::Us), "NUBeam: C1 must be less than d5");

        // R2 of zero is allowed; R1 of zero is not
        assert!(validate_dimensions(BeamFamily::NuBeam, &with("R2", 0.0), UnitSystem::Us).is_ok());
        let mut both = with("D1", 0.0);
        both.set(FAMILY, "W1", 0.0).unwrap();
        assert_eq!(message(&both, UnitSystem::Us), "NUBeam: D1 must be greater than 0.0 in");
    }

    #[test]
    fn test_sharp_outline_area() {
        let outline = build_outline(BeamFamily::NuBeam, &without_radii(), &OutlineOptions::default()).unwrap();
        // top flange, top taper, web, bottom taper, bottom flange less two chamfers
        let expected = 48.0 * 3.0 + 27.5 * 1.75 + 7.0 * 54.875 + 25.0 * 6.0 + 43.0 * 6.375 - 1.0;
        assert_relative_eq!(outline.area(), inches(inches(expected)), epsilon = 1e-12);
        assert_relative_eq!(outline.height, inches(72.0), epsilon = 1e-12);
        assert_relative_eq!(outline.width, inches(48.0), epsilon = 1e-12);
    }

    #[test]
    fn test_web_fillet_adds_material() {
        // R1 alone: each side gains the kite between corner and tangent
        // points less the chorded sector
        let mut dims = without_radii();
        let r = inches(10.0);
        dims.set(FAMILY, "R1", r).unwrap();

        let rise = inches(1.75);
        let run = inches(20.5);
        let theta = std::f64::consts::FRAC_PI_2 + (rise / run).atan();
        let sweep = std::f64::consts::PI - theta;
        let tangent = r / (theta / 2.0).tan();
        let n = FILLET_SEGMENTS as f64;
        let fillet = r * tangent - 0.5 * n * r * r * (sweep / n).sin();

        assert_relative_eq!(area(&dims) - area(&without_radii()), 2.0 * fillet, epsilon = 1e-12);
    }

    #[test]
    fn test_flange_radius_removes_material() {
        let mut dims = without_radii();
        dims.set(FAMILY, "R4", inches(2.5)).unwrap();
        assert!(area(&dims) < area(&without_radii()));
        assert!(area(&SCHEMA.default_set()) > area(&without_radii()));
    }

    #[test]
    fn test_spread_only() {
        let dims = with("W2", 50.0);
        assert!(NuBeam.spacing_range(&dims, BeamSpacing::UniformAdjacent).is_err());
        let (min, max) = NuBeam.spacing_range(&dims, BeamSpacing::GeneralSpread).unwrap();
        assert_relative_eq!(min, inches(50.0), epsilon = 1e-12);
        assert_eq!(max, MAX_GIRDER_SPACING);
    }

    #[test]
    fn test_single_web_region() {
        let regions = NuBeam.harp_regions(&SCHEMA.default_set(), inches(72.0)).unwrap();
        assert_eq!(regions.len(), 1);
        let bounds = regions[0].shape.bounding_box().unwrap();
        assert_relative_eq!(bounds.min.x, -inches(3.5), epsilon = 1e-12);
        assert_relative_eq!(bounds.max.x, inches(3.5), epsilon = 1e-12);
        assert_relative_eq!(bounds.min.y, -inches(72.0), epsilon = 1e-12);
        assert_eq!(regions[0].arc_slope, 0.0);
    }

    #[test]
    fn test_surface_area_has_no_void_term() {
        let dims = SCHEMA.default_set();
        let outline = build_outline(BeamFamily::NuBeam, &dims, &OutlineOptions::default()).unwrap();
        let length = 40.0;
        assert_relative_eq!(
            surface_area(BeamFamily::NuBeam, &dims, length, true).unwrap(),
            outline.perimeter() * length,
            epsilon = 1e-9
        );
    }

    fn load(unit: Unit) -> SectionResult<DimensionSet> {
        let archive = Archive::from_units([unit]);
        let mut reader = archive.reader();
        assert!(reader.begin_unit("GirderLibraryEntry"));
        load_dimensions(&mut reader, BeamFamily::NuBeam)
    }

    fn block_without(version: f64, skip: &str) -> Unit {
        let block = SCHEMA
            .default_set()
            .iter()
            .filter(|(name, _)| *name != skip)
            .fold(Unit::new("NUBeamDimensions", version), |u, (n, v)| u.with_property(n, v));
        Unit::new("GirderLibraryEntry", 15.0).with_unit(block)
    }

    #[test]
    fn test_c1_defaults_for_first_block_version() {
        let dims = load(block_without(1.0, "C1")).unwrap();
        assert_eq!(dims.get("C1"), Some(0.0));
        assert!(load(block_without(2.0, "C1")).is_err());
        assert!(load(block_without(1.0, "T")).is_err());
    }
}
