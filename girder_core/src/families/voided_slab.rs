//! # Voided Slab
//!
//! Rectangular slab with a single row of round voids at mid-height. The
//! voids are spaced evenly about the centerline. Strands run in the solid
//! strips beside and between the voids, so every strip is a web.
//!
//! ```text
//!  |<------------------- W ------------------->|
//!  +-------------------------------------------+  -+-
//!  |     ___         ___         ___           |   |
//!  |    /   \       /   \       /   \          |   H
//!  |    \___/       \___/       \___/          |   |
//!  |         |<-S->|                           |   |
//!  +-------------------------------------------+  -+-
//! ```

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{web_rectangle, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING};
use crate::geometry::{Point2, Polygon};
use crate::persistence::{MissingFieldDefault, PersistenceRules, VersionContext};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::{inches, UnitKind, UnitSystem};
use crate::validation::{check_constraints, Constraint, TOLERANCE};

const FAMILY: &str = "VoidedSlab";

/// Chords used to approximate each void
const VOID_SEGMENTS: usize = 32;

const SPACINGS: &[BeamSpacing] = &[
    BeamSpacing::UniformAdjacent,
    BeamSpacing::GeneralAdjacent,
    BeamSpacing::UniformSpread,
    BeamSpacing::GeneralSpread,
];

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[("H", 18.0), ("W", 48.0), ("Void_Diameter", 10.0), ("Void_Spacing", 12.5)],
    )
    .with_spec("Number_of_Voids", 3.0, UnitKind::Count)
    .with_spec("Jmax", inches(1.0), UnitKind::Length)
});

typed_dimensions! {
    pub struct VoidedSlabDims for "VoidedSlab" {
        h => "H",
        w => "W",
        void_diameter => "Void_Diameter",
        void_spacing => "Void_Spacing",
        number_of_voids => "Number_of_Voids",
        jmax => "Jmax",
    }
}

impl VoidedSlabDims {
    /// Stored as a float; fractional parts are dropped.
    pub fn void_count(&self) -> i64 {
        self.number_of_voids.trunc() as i64
    }

    fn voids(&self) -> usize {
        self.void_count().max(0) as usize
    }

    /// Width from the outside of the first void to the outside of the last
    fn void_band_width(&self) -> f64 {
        (self.void_count() - 1) as f64 * self.void_spacing + self.void_diameter
    }
}

type Rule = Constraint<VoidedSlabDims>;

fn is_zero(value: f64) -> bool {
    value.abs() <= TOLERANCE
}

static RULES: &[Rule] = &[
    Rule::fixed(|d| d.h > 0.0, "Height must be a positive value"),
    Rule::fixed(|d| d.w > 0.0, "Width must be a positive value"),
    Rule::fixed(|d| d.void_count() >= 0, "Invalid Number of Voids"),
    Rule::fixed(
        |d| d.void_count() != 0 || is_zero(d.void_diameter),
        "Void Diameter Must Be Zero If No Voids",
    ),
    Rule::fixed(
        |d| d.void_count() != 0 || is_zero(d.void_spacing),
        "Invalid - Void Spacing Must Be Zero If No Voids",
    ),
    Rule::fixed(
        |d| d.void_count() == 0 || d.void_diameter > 0.0,
        "Void Diameter Must Be Greater Than Zero",
    ),
    Rule::fixed(
        |d| d.void_count() == 0 || d.void_diameter < d.h,
        "Void Diameter must be less than slab height",
    ),
    Rule::fixed(
        |d| d.void_count() != 1 || is_zero(d.void_spacing),
        "Invalid - Void Spacing Must Be Zero If Only One Void",
    ),
    Rule::fixed(
        |d| d.void_count() != 1 || d.void_diameter < d.w,
        "Void Diameter must be less than slab width",
    ),
    Rule::fixed(
        |d| d.void_count() <= 1 || d.void_spacing >= d.void_diameter,
        "Void Spacing must be greater than Void Diameter",
    ),
    Rule::fixed(
        |d| d.void_count() <= 1 || d.w > d.void_band_width(),
        "Slab must be wider than width occupied by voids",
    ),
    Rule::fixed(|d| d.jmax >= 0.0, "Maximum joint size must be zero or greater"),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "VoidedSlabDimensions",
    block_version: 2.0,
    legacy: None,
    missing: &[MissingFieldDefault {
        field: "Jmax",
        default: 0.0,
        applies: |ctx: VersionContext| ctx.block < 2.0 && ctx.parent < 8.0,
    }],
    corrections: &[],
};

pub struct VoidedSlab;

impl VoidedSlab {
    fn voids(d: &VoidedSlabDims) -> Vec<Polygon> {
        let n = d.voids();
        let first = -((n as f64 - 1.0) * d.void_spacing) / 2.0;
        (0..n)
            .map(|i| {
                let center = Point2::new(first + i as f64 * d.void_spacing, d.h / 2.0);
                Polygon::circle(center, d.void_diameter / 2.0, VOID_SEGMENTS)
            })
            .collect()
    }
}

impl SectionFamily for VoidedSlab {
    fn family(&self) -> BeamFamily {
        BeamFamily::VoidedSlab
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &VoidedSlabDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(VoidedSlabDims::from_set(dims)?.h)
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(VoidedSlabDims::from_set(dims)?.w)
    }

    /// One web on each side of every void
    fn web_count(&self, dims: &DimensionSet) -> SectionResult<usize> {
        Ok(VoidedSlabDims::from_set(dims)?.voids() + 1)
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        SPACINGS
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        let d = VoidedSlabDims::from_set(dims)?;
        if spacing.is_adjacent() {
            Ok((d.w, d.w + d.jmax))
        } else {
            Ok((d.w, MAX_GIRDER_SPACING))
        }
    }

    fn build_shape(&self, dims: &DimensionSet, _options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = VoidedSlabDims::from_set(dims)?;
        Ok(SectionShape::solid(Polygon::rectangle(d.w, d.h)).with_void(Self::voids(&d)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = VoidedSlabDims::from_set(dims)?;
        let n = d.voids();
        if n == 0 {
            return Ok(vec![HarpRegion::new(web_rectangle(0.0, d.w, depth), 0.0)]);
        }

        let end_width = (d.w - d.void_band_width()) / 2.0;
        let end_x = (d.w - end_width) / 2.0;
        let mut regions = vec![
            HarpRegion::new(web_rectangle(-end_x, end_width, depth), 0.0),
            HarpRegion::new(web_rectangle(end_x, end_width, depth), 0.0),
        ];

        let gap = d.void_spacing - d.void_diameter;
        let first = -((n as f64 - 2.0) * d.void_spacing) / 2.0;
        regions.extend(
            (0..n - 1).map(|i| HarpRegion::new(web_rectangle(first + i as f64 * d.void_spacing, gap, depth), 0.0)),
        );
        Ok(regions)
    }

    fn void_surface_area(&self, dims: &DimensionSet, length: f64) -> SectionResult<f64> {
        let d = VoidedSlabDims::from_set(dims)?;
        Ok(length * d.voids() as f64 * std::f64::consts::PI * d.void_diameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::DeckType;
    use crate::persistence::{load_dimensions, Archive, StructuredLoad, Unit};
    use crate::section::{build_outline, surface_area};
    use crate::validation::validate_dimensions;
    use approx::assert_relative_eq;

    fn with(name: &str, value_in: f64) -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, name, inches(value_in)).unwrap();
        dims
    }

    fn with_voids(count: f64, diameter_in: f64, spacing_in: f64) -> DimensionSet {
        let mut dims = SCHEMA.default_set();
        dims.set(FAMILY, "Number_of_Voids", count).unwrap();
        dims.set(FAMILY, "Void_Diameter", inches(diameter_in)).unwrap();
        dims.set(FAMILY, "Void_Spacing", inches(spacing_in)).unwrap();
        dims
    }

    fn message(dims: &DimensionSet) -> String {
        validate_dimensions(BeamFamily::VoidedSlab, dims, UnitSystem::Us)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_messages_in_order() {
        assert_eq!(message(&with("H", 0.0)), "VoidedSlab: Height must be a positive value");
        assert_eq!(message(&with_voids(-1.0, 10.0, 12.5)), "VoidedSlab: Invalid Number of Voids");
        assert_eq!(
            message(&with_voids(0.0, 10.0, 0.0)),
            "VoidedSlab: Void Diameter Must Be Zero If No Voids"
        );
        assert_eq!(
            message(&with_voids(0.0, 0.0, 12.5)),
            "VoidedSlab: Invalid - Void Spacing Must Be Zero If No Voids"
        );
        assert_eq!(message(&with_voids(2.0, 0.0, 12.5)), "VoidedSlab: Void Diameter Must Be Greater Than Zero");
        assert_eq!(message(&with("Void_Diameter", 18.0)), "VoidedSlab: Void Diameter must be less than slab height");
        assert_eq!(
            message(&with_voids(1.0, 10.0, 12.5)),
            "VoidedSlab: Invalid - Void Spacing Must Be Zero If Only One Void"
        );
        assert_eq!(
            message(&with_voids(3.0, 12.0, 11.0)),
            "VoidedSlab: Void Spacing must be greater than Void Diameter"
        );
        assert_eq!(
            message(&with_voids(5.0, 10.0, 12.5)),
            "VoidedSlab: Slab must be wider than width occupied by voids"
        );
        assert_eq!(message(&with("Jmax", -1.0)), "VoidedSlab: Maximum joint size must be zero or greater");
    }

    #[test]
    fn test_single_void_must_fit_the_width() {
        let mut dims = with_voids(1.0, 10.0, 0.0);
        assert!(validate_dimensions(BeamFamily::VoidedSlab, &dims, UnitSystem::Us).is_ok());
        dims.set(FAMILY, "W", inches(9.0)).unwrap();
        assert_eq!(message(&dims), "VoidedSlab: Void Diameter must be less than slab width");
    }

    #[test]
    fn test_outline_area() {
        let dims = SCHEMA.default_set();
        let outline = build_outline(BeamFamily::VoidedSlab, &dims, &OutlineOptions::default()).unwrap();
        assert_eq!(outline.shape.voids.len(), 3);
        assert_eq!(outline.web_count, 4);

        let n = VOID_SEGMENTS as f64;
        let r = inches(5.0);
        let void = 0.5 * n * r * r * (std::f64::consts::TAU / n).sin();
        assert_relative_eq!(outline.area(), inches(48.0) * inches(18.0) - 3.0 * void, epsilon = 1e-12);
        assert_relative_eq!(outline.centroid_depth(), inches(9.0), epsilon = 1e-12);

        let middle = outline.shape.voids[1].centroid();
        assert_relative_eq!(middle.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(middle.y, -inches(9.0), epsilon = 1e-12);
    }

    #[test]
    fn test_harp_regions_between_voids() {
        let regions = VoidedSlab.harp_regions(&SCHEMA.default_set(), inches(18.0)).unwrap();
        assert_eq!(regions.len(), 4);
        let widths: Vec<f64> = regions
            .iter()
            .map(|r| r.shape.bounding_box().unwrap().width() / inches(1.0))
            .collect();
        assert_relative_eq!(widths[0], 6.5, epsilon = 1e-9);
        assert_relative_eq!(widths[1], 6.5, epsilon = 1e-9);
        assert_relative_eq!(widths[2], 2.5, epsilon = 1e-9);
        assert_relative_eq!(widths[3], 2.5, epsilon = 1e-9);
        assert_relative_eq!(regions[0].shape.centroid().x, -inches(20.75), epsilon = 1e-12);
        assert_relative_eq!(regions[2].shape.centroid().x, -inches(6.25), epsilon = 1e-12);
        assert_relative_eq!(regions[3].shape.centroid().x, inches(6.25), epsilon = 1e-12);
    }

    #[test]
    fn test_solid_slab() {
        let dims = with_voids(0.0, 0.0, 0.0);
        assert!(validate_dimensions(BeamFamily::VoidedSlab, &dims, UnitSystem::Us).is_ok());
        let regions = VoidedSlab.harp_regions(&dims, inches(18.0)).unwrap();
        assert_eq!(regions.len(), 1);
        assert_relative_eq!(regions[0].shape.area(), inches(48.0) * inches(18.0), epsilon = 1e-12);
        assert_eq!(VoidedSlab.web_count(&dims).unwrap(), 1);
        assert_eq!(VoidedSlab.void_surface_area(&dims, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_surface_area_counts_void_circumference() {
        let dims = SCHEMA.default_set();
        let length = 12.0;
        let voids = length * 3.0 * std::f64::consts::PI * inches(10.0);
        let outside = length * 2.0 * (inches(48.0) + inches(18.0));
        assert_relative_eq!(VoidedSlab.void_surface_area(&dims, length).unwrap(), voids, epsilon = 1e-12);
        assert_relative_eq!(
            surface_area(BeamFamily::VoidedSlab, &dims, length, false).unwrap(),
            outside + voids,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            surface_area(BeamFamily::VoidedSlab, &dims, length, true).unwrap(),
            outside + 0.5 * voids,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_spacing_ranges_and_decks() {
        let dims = SCHEMA.default_set();
        assert_eq!(VoidedSlab.supported_spacings()[0], BeamSpacing::UniformAdjacent);
        let (min, max) = VoidedSlab.spacing_range(&dims, BeamSpacing::GeneralAdjacent).unwrap();
        assert_relative_eq!(min, inches(48.0), epsilon = 1e-12);
        assert_relative_eq!(max, inches(49.0), epsilon = 1e-12);
        let (_, max) = VoidedSlab.spacing_range(&dims, BeamSpacing::UniformSpread).unwrap();
        assert_eq!(max, MAX_GIRDER_SPACING);
        assert_eq!(
            VoidedSlab.supported_deck_types(BeamSpacing::GeneralSpread).unwrap(),
            &[DeckType::CompositeCip, DeckType::CompositeSip]
        );
    }

    fn load(unit: Unit) -> SectionResult<DimensionSet> {
        let archive = Archive::from_units([unit]);
        let mut reader = archive.reader();
        assert!(reader.begin_unit("GirderLibraryEntry"));
        load_dimensions(&mut reader, BeamFamily::VoidedSlab)
    }

    fn flat_without_jmax(parent: f64) -> Unit {
        SCHEMA
            .default_set()
            .iter()
            .filter(|(name, _)| *name != "Jmax")
            .fold(Unit::new("GirderLibraryEntry", parent), |u, (n, v)| u.with_property(n, v))
    }

    #[test]
    fn test_jmax_tolerated_before_version_8() {
        assert_eq!(load(flat_without_jmax(7.0)).unwrap().get("Jmax"), Some(0.0));
        assert!(load(flat_without_jmax(8.0)).is_err());
    }
}
