//! # AASHTO Box Beam
//!
//! Rectangular box with a rectangular core and a shear-key recess in each
//! side face. The recess starts H4 below the top, is H5 tall and W4 deep;
//! its lower part tapers out at 45° from a W3-deep ledge.
//!
//! `UseOverallWidth` selects how adjacent layouts measure spacing: as
//! center-to-center distance (1) or as the joint width alone (0).

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{filleted_void, polygon_from_sides, web_rectangle, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING};
use crate::geometry::Point2;
use crate::persistence::{swap_fillets, Correction, MissingFieldDefault, PersistenceRules};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint, TOLERANCE};

const FAMILY: &str = "AashtoBoxBeam";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("H1", 5.5),
            ("H2", 16.0),
            ("H3", 5.5),
            ("H4", 6.0),
            ("H5", 6.0),
            ("W1", 5.0),
            ("W2", 26.0),
            ("W3", 0.375),
            ("W4", 0.75),
            ("F1", 3.0),
            ("F2", 3.0),
            ("C1", 0.0),
            ("Jmax", 1.0),
            ("EndBlockLength", 18.0),
        ],
    )
    .with_flag("UseOverallWidth", false)
});

typed_dimensions! {
    pub struct AashtoBoxDims for "AashtoBoxBeam" {
        h1 => "H1",
        h2 => "H2",
        h3 => "H3",
        h4 => "H4",
        h5 => "H5",
        w1 => "W1",
        w2 => "W2",
        w3 => "W3",
        w4 => "W4",
        f1 => "F1",
        f2 => "F2",
        c1 => "C1",
        jmax => "Jmax",
        end_block_length => "EndBlockLength",
        use_overall_width => "UseOverallWidth",
    }
}

impl AashtoBoxDims {
    pub fn height(&self) -> f64 {
        self.h1 + self.h2 + self.h3
    }

    fn half_width(&self) -> f64 {
        self.w2 / 2.0 + self.w1
    }

    pub fn width(&self) -> f64 {
        2.0 * self.half_width()
    }

    fn uses_overall_width(&self) -> bool {
        self.use_overall_width > 0.5
    }
}

type Rule = Constraint<AashtoBoxDims>;

static RULES: &[Rule] = &[
    Rule::fixed(|d| d.h1 > 0.0, "H1 must be a positive value"),
    Rule::fixed(|d| d.h2 > 0.0, "H2 must be a positive value"),
    Rule::fixed(|d| d.h3 > 0.0, "H3 must be a positive value"),
    Rule::fixed(|d| d.h4 >= 0.0, "H4 must be a positive value"),
    Rule::fixed(|d| d.h5 >= 0.0, "H5 must be a positive value"),
    Rule::fixed(|d| d.w1 > 0.0, "W1 must be a positive value"),
    Rule::fixed(|d| d.w2 > 0.0, "W2 must be a positive value"),
    Rule::fixed(|d| d.w3 >= 0.0, "W3 must be a positive value"),
    Rule::fixed(|d| d.w4 >= 0.0, "W4 must be a positive value"),
    Rule::fixed(|d| d.w3 <= d.w4, "W3 must be lesser or equal to W4"),
    Rule::fixed(|d| d.f1 >= 0.0, "F1 must be a positive value"),
    Rule::fixed(|d| d.f2 >= 0.0, "F2 must be a positive value"),
    Rule::fixed(|d| d.c1 >= 0.0, "C1 must be a positive value"),
    Rule::fixed(|d| d.c1 < d.h3, "C1 must be less than H3"),
    Rule::fixed(
        |d| d.height() + TOLERANCE > d.h4 + d.h5,
        "H1+H2+H3 must be greater than or equal to H4+H5",
    ),
    Rule::fixed(|d| d.f1 <= d.w2 / 2.0, "F1 must be less than W2/2"),
    Rule::fixed(|d| d.f1 <= d.h2 / 2.0, "F1 must be less than H2/2"),
    Rule::fixed(|d| d.f2 <= d.w2 / 2.0, "F2 must be less than W2/2"),
    Rule::fixed(|d| d.f2 <= d.h2 / 2.0, "F2 must be less than H2/2"),
    Rule::fixed(|d| d.jmax >= 0.0, "Maximum joint size must be zero or greater"),
    Rule::fixed(
        |d| d.use_overall_width == 0.0 || d.use_overall_width == 1.0,
        "UseOverallWidth must be 0 or 1",
    ),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "AASHTOBoxBeamDimensions",
    block_version: 3.0,
    legacy: None,
    missing: &[MissingFieldDefault {
        field: "UseOverallWidth",
        default: 0.0,
        applies: |ctx| ctx.block < 3.0,
    }],
    corrections: &[Correction {
        description: "swap F1 and F2",
        applies: |ctx| ctx.block < 2.0,
        apply: |dims| swap_fillets(dims, FAMILY),
    }],
};

pub struct AashtoBoxBeam;

impl AashtoBoxBeam {
    fn side_profile(d: &AashtoBoxDims, block_out: bool) -> Vec<Point2> {
        let h = d.height();
        let face = d.half_width();
        let mut side = vec![Point2::new(face - d.c1, 0.0), Point2::new(face, d.c1)];

        if block_out {
            let recess_bottom = h - d.h4 - d.h5;
            let taper = (d.w4 - d.w3).min(d.h5);
            side.extend([
                Point2::new(face, recess_bottom),
                Point2::new(face - d.w3, recess_bottom),
                Point2::new(face - d.w4, recess_bottom + taper),
                Point2::new(face - d.w4, h - d.h4),
                Point2::new(face, h - d.h4),
            ]);
        }

        side.push(Point2::new(face, h));
        side
    }
}

impl SectionFamily for AashtoBoxBeam {
    fn family(&self) -> BeamFamily {
        BeamFamily::AashtoBoxBeam
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &AashtoBoxDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(AashtoBoxDims::from_set(dims)?.height())
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(AashtoBoxDims::from_set(dims)?.width())
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        &BeamSpacing::ALL
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        let d = AashtoBoxDims::from_set(dims)?;
        let width = d.width();
        Ok(match (spacing.is_adjacent(), d.uses_overall_width()) {
            (false, _) => (width, MAX_GIRDER_SPACING),
            (true, true) => (width, width + d.jmax),
            (true, false) => (0.0, d.jmax),
        })
    }

    fn build_shape(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = AashtoBoxDims::from_set(dims)?;
        let right = Self::side_profile(&d, options.block_outs.right);
        let left = Self::side_profile(&d, options.block_outs.left);
        let core = filleted_void(d.w2, d.h2, d.h3, d.f1, d.f2);
        Ok(SectionShape::solid(polygon_from_sides(&right, &left)).with_void(core))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = AashtoBoxDims::from_set(dims)?;
        let width = d.w1 - d.w4;
        let x = (d.w2 + width) / 2.0;
        Ok(vec![
            HarpRegion::new(web_rectangle(-x, width, depth), 0.0),
            HarpRegion::new(web_rectangle(x, width, depth), 0.0),
        ])
    }

    fn void_surface_area(&self, dims: &DimensionSet, length: f64) -> SectionResult<f64> {
        let d = AashtoBoxDims::from_set(dims)?;
        let fillets = d.f1 + d.f2;
        let perimeter = 2.0 * (d.h2 - fillets)
            + 2.0 * (d.w2 - fillets)
            + 2.0 * (2.0 * d.f1 * d.f1).sqrt()
            + 2.0 * (2.0 * d.f2 * d.f2).sqrt();
        Ok(length * perimeter)
    }

    fn end_block_length(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(AashtoBoxDims::from_set(dims)?.end_block_length)
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

    fn with(name: &str, value: f64) -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, name, value).unwrap();
        dims
    }

    fn message(dims: &DimensionSet) -> String {
        validate_dimensions(BeamFamily::AashtoBoxBeam, dims, UnitSystem::Us)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_defaults() {
        let dims = SCHEMA.default_set();
        assert!(validate_dimensions(BeamFamily::AashtoBoxBeam, &dims, UnitSystem::Si).is_ok());
        assert_eq!(dims.get("UseOverallWidth"), Some(0.0));
        assert_relative_eq!(AashtoBoxBeam.width(&dims).unwrap(), inches(36.0), epsilon = 1e-12);
        assert_relative_eq!(AashtoBoxBeam.height(&dims).unwrap(), inches(27.0), epsilon = 1e-12);
        assert!(!is_prismatic(BeamFamily::AashtoBoxBeam, &dims).unwrap());
    }

    #[test]
    fn test_messages() {
        assert_eq!(message(&with("H2", 0.0)), "AashtoBoxBeam: H2 must be a positive value");
        assert_eq!(
            message(&with("W3", inches(1.0))),
            "AashtoBoxBeam: W3 must be lesser or equal to W4"
        );
        assert_eq!(message(&with("C1", inches(5.5))), "AashtoBoxBeam: C1 must be less than H3");
        assert_eq!(
            message(&with("H5", inches(30.0))),
            "AashtoBoxBeam: H1+H2+H3 must be greater than or equal to H4+H5"
        );
        assert_eq!(message(&with("F2", inches(9.0))), "AashtoBoxBeam: F2 must be less than H2/2");
        assert_eq!(message(&with("UseOverallWidth", 0.5)), "AashtoBoxBeam: UseOverallWidth must be 0 or 1");
    }

    #[test]
    fn test_adjacent_spacing_follows_flag() {
        let dims = SCHEMA.default_set();
        let joint = AashtoBoxBeam.spacing_range(&dims, BeamSpacing::UniformAdjacent).unwrap();
        assert_relative_eq!(joint.0, 0.0);
        assert_relative_eq!(joint.1, inches(1.0), epsilon = 1e-12);

        let dims = with("UseOverallWidth", 1.0);
        let (min, max) = AashtoBoxBeam.spacing_range(&dims, BeamSpacing::GeneralAdjacent).unwrap();
        assert_relative_eq!(min, inches(36.0), epsilon = 1e-12);
        assert_relative_eq!(max, inches(37.0), epsilon = 1e-12);

        let (_, max) = AashtoBoxBeam.spacing_range(&dims, BeamSpacing::UniformSpread).unwrap();
        assert_eq!(max, MAX_GIRDER_SPACING);
    }

    #[test]
    fn test_recess_area() {
        let dims = SCHEMA.default_set();
        let plain = build_outline(
            BeamFamily::AashtoBoxBeam,
            &dims,
            &OutlineOptions::default().with_block_outs(false, false),
        )
        .unwrap();
        let keyed = build_outline(BeamFamily::AashtoBoxBeam, &dims, &OutlineOptions::default()).unwrap();

        // W4 deep over H5, less the triangle under the taper, both sides
        let (w3, w4, h5) = (0.375, 0.75, 6.0);
        let taper = w4 - w3;
        let recess = w4 * h5 - taper * taper / 2.0;
        assert_relative_eq!(plain.area() - keyed.area(), inches(inches(2.0 * recess)), epsilon = 1e-12);
    }

    #[test]
    fn test_void_surface_area() {
        let dims = SCHEMA.default_set();
        let per_length = 2.0 * (16.0 - 6.0) + 2.0 * (26.0 - 6.0) + 4.0 * (18.0_f64).sqrt();
        assert_relative_eq!(
            AashtoBoxBeam.void_surface_area(&dims, 1.0).unwrap(),
            inches(per_length),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_block_before_fix_swaps_fillets() {
        let dims = with("F1", inches(2.0));
        let mut block = Unit::new("AASHTOBoxBeamDimensions", 1.0);
        for (name, value) in dims.iter().filter(|(name, _)| *name != "UseOverallWidth") {
            block = block.with_property(name, value);
        }
        let archive = Archive::from_units([Unit::new("GirderLibraryEntry", 15.0).with_unit(block)]);
        let mut reader = archive.reader();
        assert!(reader.begin_unit("GirderLibraryEntry"));

        let loaded = load_dimensions(&mut reader, BeamFamily::AashtoBoxBeam).unwrap();
        assert_relative_eq!(loaded.get("F1").unwrap(), inches(3.0), epsilon = 1e-12);
        assert_relative_eq!(loaded.get("F2").unwrap(), inches(2.0), epsilon = 1e-12);
        assert_eq!(loaded.get("UseOverallWidth"), Some(0.0));
    }
}
