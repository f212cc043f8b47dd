//! # Decked Slab Beam
//!
//! Wide top deck on two webs, closed underneath by a bottom slab, leaving
//! one rectangular void between the webs. Used side by side, so the deck
//! edges carry shear-key notches.
//!
//! ```text
//!  |<-------------- A -------------->|
//!  +---------------------------------+  -+- Tt
//!  |     +---------------------+     |   |
//!  +--+  |        void         |  +--+   C
//!  |B |  +---------------------+  |      |
//!     |W |                     |  |  -+- Tb
//!     +--+---------------------+--+  -+-
//! ```

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{polygon_from_sides, web_rectangle, BeamFamily, BeamSpacing, SectionFamily, ADJACENT_ONLY};
use crate::geometry::{Point2, Polygon};
use crate::persistence::PersistenceRules;
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint};

const FAMILY: &str = "DeckedSlabBeam";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("A", 77.75),
            ("B", 9.0),
            ("C", 12.0),
            ("F", 1.75),
            ("W", 6.0),
            ("Tt", 8.0),
            ("Tb", 7.0),
            ("Jmax", 1.0),
            ("EndBlockLength", 36.0),
        ],
    )
});

typed_dimensions! {
    pub struct DeckedSlabDims for "DeckedSlabBeam" {
        a => "A",
        b => "B",
        c => "C",
        f => "F",
        w => "W",
        tt => "Tt",
        tb => "Tb",
        jmax => "Jmax",
        end_block_length => "EndBlockLength",
    }
}

impl DeckedSlabDims {
    pub fn height(&self) -> f64 {
        self.c + self.tt
    }

    fn void_width(&self) -> f64 {
        self.a - 2.0 * (self.b + self.w)
    }
}

type Rule = Constraint<DeckedSlabDims>;

static RULES: &[Rule] = &[
    Rule::fixed(|d| d.b > 0.0, "B must be a positive value"),
    Rule::fixed(|d| d.w > 0.0, "W must be a positive value"),
    Rule::fixed(|d| d.a >= 2.0 * (d.b + d.w), "A must be greater or equal to 2*(B+W)"),
    Rule::fixed(|d| d.c > 0.0, "C must be a positive value"),
    Rule::fixed(|d| d.tt > 0.0, "Tt must be a positive value"),
    Rule::fixed(|d| d.c >= d.tb, "C must be a greater or equal to Tb"),
    Rule::fixed(|d| d.f >= 0.0, "F must be zero or greater"),
    Rule::fixed(|d| d.jmax >= 0.0, "Maximum joint size must be zero or greater"),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "DeckedSlabBeamDimensions",
    block_version: 2.0,
    legacy: None,
    missing: &[],
    corrections: &[],
};

pub struct DeckedSlabBeam;

impl DeckedSlabBeam {
    fn side_profile(d: &DeckedSlabDims, block_out: bool) -> Vec<Point2> {
        let h = d.height();
        let edge = d.a / 2.0;
        let web = edge - d.b;

        let mut side = vec![
            Point2::new(web, 0.0),
            Point2::new(web, d.c),
            Point2::new(edge, d.c),
        ];
        if block_out {
            side.push(Point2::new(edge, h - d.f));
            side.push(Point2::new(edge - d.f, h));
        } else {
            side.push(Point2::new(edge, h));
        }
        side
    }

    fn void(d: &DeckedSlabDims) -> Option<Polygon> {
        let width = d.void_width();
        let height = d.c - d.tb;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let mut void = Polygon::rectangle(width, height);
        void.move_hook_to(Point2::new(0.0, d.tb));
        Some(void)
    }
}

impl SectionFamily for DeckedSlabBeam {
    fn family(&self) -> BeamFamily {
        BeamFamily::DeckedSlabBeam
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &DeckedSlabDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(DeckedSlabDims::from_set(dims)?.height())
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(DeckedSlabDims::from_set(dims)?.a)
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        ADJACENT_ONLY
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        let d = DeckedSlabDims::from_set(dims)?;
        Ok((d.a, d.a + d.jmax))
    }

    fn build_shape(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = DeckedSlabDims::from_set(dims)?;
        let right = Self::side_profile(&d, options.block_outs.right);
        let left = Self::side_profile(&d, options.block_outs.left);
        Ok(SectionShape::solid(polygon_from_sides(&right, &left)).with_void(Self::void(&d)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = DeckedSlabDims::from_set(dims)?;
        let x = (d.a - 2.0 * d.b) / 2.0 - d.w / 2.0;
        Ok(vec![
            HarpRegion::new(web_rectangle(-x, d.w, depth), 0.0),
            HarpRegion::new(web_rectangle(x, d.w, depth), 0.0),
        ])
    }

    fn void_surface_area(&self, dims: &DimensionSet, length: f64) -> SectionResult<f64> {
        let d = DeckedSlabDims::from_set(dims)?;
        Ok(d.void_width() * (d.c - d.tb) * (length - 2.0 * d.end_block_length))
    }

    fn end_block_length(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(DeckedSlabDims::from_set(dims)?.end_block_length)
    }
}
