//! # Box Beam (WSDOT)
//!
//! Hollow box with a top flange overhang, a bottom flange overhang and a
//! rectangular core. Heights H1..H3 stack the top slab, core and bottom
//! slab. H4..H7 describe the exterior face from the top down: top flange,
//! taper to the web, taper out to the bottom flange, bottom flange.
//!
//! ```text
//!   |<W1>|<W2>|<---- W3 ---->|
//!   +----+                              --- H4
//!         \                             --- H5
//!          |   +-----------+            H1 (top slab)
//!          |   |   core    |  H2
//!          |   +-----------+            H3 (bottom slab)
//!         /                             --- H6
//!  +-----+                              --- H7
//!  |<W4>|
//! ```
//!
//! In adjacent layouts the space between neighbouring beams is grouted
//! down to `ShearKeyDepth`.

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{filleted_void, polygon_from_sides, web_rectangle, BeamFamily, BeamSpacing, SectionFamily, MAX_GIRDER_SPACING};
use crate::geometry::Point2;
use crate::persistence::{
    swap_fillets, Correction, LegacyLayout, MissingFieldDefault, PersistenceRules, Remap, VersionContext,
};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape, ShearKeyAreas};
use crate::units::UnitSystem;
use crate::validation::{check_constraints, Constraint, TOLERANCE};

const FAMILY: &str = "BoxBeam";

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("H1", 5.0),
            ("H2", 29.5),
            ("H3", 5.0),
            ("H4", 4.0),
            ("H5", 3.0),
            ("H6", 5.0),
            ("H7", 17.0),
            ("W1", 3.0),
            ("W2", 5.0),
            ("W3", 27.75),
            ("W4", 5.0),
            ("F1", 5.0),
            ("F2", 5.0),
            ("C1", 0.75),
            ("Jmax", 1.0),
            ("ShearKeyDepth", 0.0),
        ],
    )
});

typed_dimensions! {
    pub struct BoxBeamDims for "BoxBeam" {
        h1 => "H1",
        h2 => "H2",
        h3 => "H3",
        h4 => "H4",
        h5 => "H5",
        h6 => "H6",
        h7 => "H7",
        w1 => "W1",
        w2 => "W2",
        w3 => "W3",
        w4 => "W4",
        f1 => "F1",
        f2 => "F2",
        c1 => "C1",
        jmax => "Jmax",
        shear_key_depth => "ShearKeyDepth",
    }
}

impl BoxBeamDims {
    pub fn height(&self) -> f64 {
        self.h1 + self.h2 + self.h3
    }

    /// Half width at the web face
    fn web_half_width(&self) -> f64 {
        self.w3 / 2.0 + self.w2
    }

    fn top_half_width(&self) -> f64 {
        self.web_half_width() + self.w1
    }

    fn bottom_half_width(&self) -> f64 {
        self.web_half_width() + self.w4
    }

    pub fn width(&self) -> f64 {
        2.0 * self.top_half_width().max(self.bottom_half_width())
    }
}

// ============================================================================
// Validation
// ============================================================================

type Rule = Constraint<BoxBeamDims>;

static RULES: &[Rule] = &[
    Rule::fixed(|d| d.h1 > 0.0, "H1 must be a positive value"),
    Rule::fixed(|d| d.h2 >= 0.0, "H2 must be a positive value"),
    Rule::fixed(|d| d.h3 >= 0.0, "H3 must be a positive value"),
    Rule::fixed(|d| d.h4 >= 0.0, "H4 must be a positive value"),
    Rule::fixed(|d| d.h5 >= 0.0, "H5 must be a positive value"),
    Rule::fixed(|d| d.h6 > 0.0, "H6 must be a positive value"),
    Rule::fixed(|d| d.h7 > 0.0, "H7 must be a positive value"),
    Rule::fixed(|d| d.w1 > 0.0, "W1 must be a positive value"),
    Rule::fixed(|d| d.w2 > 0.0, "W2 must be a positive value"),
    Rule::fixed(|d| d.w3 >= 0.0, "W3 must be a positive value"),
    Rule::fixed(|d| d.w4 >= 0.0, "W4 must be a positive value"),
    Rule::fixed(|d| d.f1 >= 0.0, "F1 must be a positive value"),
    Rule::fixed(|d| d.f2 >= 0.0, "F2 must be a positive value"),
    Rule::fixed(|d| d.c1 >= 0.0, "C1 must be a positive value"),
    Rule::fixed(|d| d.c1 < d.h7, "C1 must be less than H7"),
    Rule::fixed(
        |d| d.height() + TOLERANCE > d.h4 + d.h5 + d.h6 + d.h7,
        "H1+H2+H3 must be greater than or equal to H4+H5+H6+H7",
    ),
    Rule::fixed(|d| d.f1 <= d.w3 / 2.0, "F1 must be less than W3/2"),
    Rule::fixed(|d| d.f1 <= d.h2 / 2.0, "F1 must be less than H2/2"),
    Rule::fixed(|d| d.f2 <= d.w3 / 2.0, "F2 must be less than W3/2"),
    Rule::fixed(|d| d.f2 <= d.h2 / 2.0, "F2 must be less than H2/2"),
    Rule::fixed(|d| d.jmax >= 0.0, "Maximum joint size must be zero or greater"),
    Rule::fixed(|d| d.shear_key_depth >= 0.0, "Shear key depth must be zero or greater"),
    Rule::fixed(
        |d| d.shear_key_depth <= d.height(),
        "Shear key depth must not exceed the height of the beam",
    ),
];

// ============================================================================
// Persistence
// ============================================================================

/// Layout used before the family was redimensioned: heights counted from
/// the bottom, overall width in W1.
static LEGACY: LegacyLayout = LegacyLayout {
    before_parent_version: 10.0,
    fields: &[
        "H1", "H2", "H3", "H4", "H5", "H6", "H7", "H8", "W1", "W2", "W3", "W4", "W5", "F1", "F2", "C1", "Jmax",
    ],
    missing: &[
        MissingFieldDefault {
            field: "Jmax",
            default: 0.0,
            applies: |ctx| ctx.parent < 9.0,
        },
        MissingFieldDefault {
            field: "C1",
            default: 0.0,
            applies: |ctx| ctx.parent < 3.0,
        },
    ],
    remap: &[
        Remap::copy("H1", 7),
        Remap::copy("H2", 6),
        Remap::copy("H3", 5),
        Remap::copy("H4", 4),
        Remap::copy("H5", 3),
        Remap::copy("H6", 2),
        Remap::copy("H7", 1),
        Remap::copy("W1", 11),
        // web width from the old overall width, side ledge and core width
        Remap::derive("W2", |old| (old[8] - 2.0 * old[11] - old[12]) / 2.0),
        Remap::copy("W3", 12),
        Remap::copy("W4", 10),
        Remap::copy("F1", 13),
        Remap::copy("F2", 14),
        Remap::copy("C1", 15),
        Remap::copy("Jmax", 16),
    ],
};

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "BoxBeamDimensions",
    // v2 fixed the F1/F2 swap, v3 added ShearKeyDepth
    block_version: 3.0,
    legacy: Some(&LEGACY),
    missing: &[
        MissingFieldDefault {
            field: "Jmax",
            default: 0.0,
            applies: |ctx: VersionContext| ctx.block < 2.0 && ctx.parent < 9.0,
        },
        MissingFieldDefault {
            field: "C1",
            default: 0.0,
            applies: |ctx: VersionContext| ctx.block < 2.0 && ctx.parent < 3.0,
        },
        MissingFieldDefault {
            field: "ShearKeyDepth",
            default: 0.0,
            applies: |ctx: VersionContext| ctx.block < 3.0,
        },
    ],
    corrections: &[Correction {
        description: "swap F1 and F2",
        applies: |ctx| ctx.block < 2.0,
        apply: |dims| swap_fillets(dims, FAMILY),
    }],
};

// ============================================================================
// Shear Keys
// ============================================================================

/// Area of a band of constant width `width`, band `height` tall, counted
/// down to `depth` from the band top.
fn rectangle_area(width: f64, height: f64, depth: f64) -> f64 {
    width * depth.clamp(0.0, height)
}

/// Triangle whose width grows from 0 at the band top to `width` at the band
/// bottom, truncated at `depth` below the band top.
fn triangle_area(width: f64, height: f64, depth: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    let h = depth.clamp(0.0, height);
    width * h / height * h / 2.0
}

/// Triangle whose width shrinks from `width` at the band top to 0 at the
/// band bottom, truncated at `depth` below the band top.
fn chopped_triangle_area(width: f64, height: f64, depth: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    let h = depth.clamp(0.0, height);
    let width_at_depth = width * (1.0 - h / height);
    width_at_depth * h + (width - width_at_depth) * h / 2.0
}

/// Grout area on one side of the beam, between its exterior face and the
/// vertical through its widest point, from the top down to `depth`.
fn shear_key_area_one_side(d: &BoxBeamDims, depth: f64) -> f64 {
    let top_flange = 0.0;
    let top_taper = d.h4;
    let web = d.h4 + d.h5;
    let bottom_taper = d.height() - d.h6 - d.h7;
    let bottom_flange = d.height() - d.h7;
    let web_height = bottom_taper - web;

    let top = d.top_half_width();
    let bottom = d.bottom_half_width();

    let mut area = if (bottom - top).abs() <= TOLERANCE {
        // equal flanges: the gap opens under the top flange and closes
        // over the bottom flange
        triangle_area(d.w1, d.h5, depth - top_taper)
            + rectangle_area(d.w1, web_height, depth - web)
            + chopped_triangle_area(d.w4, d.h6, depth - bottom_taper)
    } else if bottom > top {
        let ledge = bottom - top;
        rectangle_area(ledge, d.h4, depth - top_flange)
            + rectangle_area(ledge, d.h5, depth - top_taper)
            + triangle_area(d.w1, d.h5, depth - top_taper)
            + rectangle_area(d.w4, web_height, depth - web)
            + chopped_triangle_area(d.w4, d.h6, depth - bottom_taper)
    } else {
        let ledge = top - bottom;
        triangle_area(d.w1, d.h5, depth - top_taper)
            + rectangle_area(d.w1, web_height, depth - web)
            + rectangle_area(ledge, d.h6, depth - bottom_taper)
            + chopped_triangle_area(d.w4, d.h6, depth - bottom_taper)
            + rectangle_area(ledge, d.h7, depth - bottom_flange)
    };

    // the bottom chamfer opens a small triangle at the very bottom
    area += triangle_area(d.c1, d.c1, depth - (d.height() - d.c1));
    area
}

// ============================================================================
// Family
// ============================================================================

pub struct BoxBeam;

impl BoxBeam {
    fn side_profile(d: &BoxBeamDims, block_out: bool) -> Vec<Point2> {
        let h = d.height();
        let top = d.top_half_width();
        let bottom = d.bottom_half_width();

        if !block_out {
            let face = top.max(bottom);
            return vec![
                Point2::new(face - d.c1, 0.0),
                Point2::new(face, d.c1),
                Point2::new(face, h),
            ];
        }

        let web = d.web_half_width();
        vec![
            Point2::new(bottom - d.c1, 0.0),
            Point2::new(bottom, d.c1),
            Point2::new(bottom, d.h7),
            Point2::new(web, d.h7 + d.h6),
            Point2::new(web, h - d.h4 - d.h5),
            Point2::new(top, h - d.h4),
            Point2::new(top, h),
        ]
    }
}

impl SectionFamily for BoxBeam {
    fn family(&self) -> BeamFamily {
        BeamFamily::BoxBeam
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &BoxBeamDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(BoxBeamDims::from_set(dims)?.height())
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(BoxBeamDims::from_set(dims)?.width())
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        &BeamSpacing::ALL
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        let d = BoxBeamDims::from_set(dims)?;
        let width = d.width();
        if spacing.is_adjacent() {
            Ok((width, width + d.jmax))
        } else {
            Ok((width, MAX_GIRDER_SPACING))
        }
    }

    fn build_shape(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = BoxBeamDims::from_set(dims)?;
        let right = Self::side_profile(&d, options.block_outs.right);
        let left = Self::side_profile(&d, options.block_outs.left);
        let core = filleted_void(d.w3, d.h2, d.h3, d.f1, d.f2);
        Ok(SectionShape::solid(polygon_from_sides(&right, &left)).with_void(core))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = BoxBeamDims::from_set(dims)?;
        let x = (d.w3 + d.w2) / 2.0;
        Ok(vec![
            HarpRegion::new(web_rectangle(-x, d.w2, depth), 0.0),
            HarpRegion::new(web_rectangle(x, d.w2, depth), 0.0),
        ])
    }

    fn shear_key_areas(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<ShearKeyAreas> {
        let d = BoxBeamDims::from_set(dims)?;
        if !spacing.is_adjacent() || d.shear_key_depth <= 0.0 {
            return Ok(ShearKeyAreas::default());
        }
        Ok(ShearKeyAreas {
            uniform_area_per_beam: 2.0 * shear_key_area_one_side(&d, d.shear_key_depth),
            area_per_joint: d.shear_key_depth,
        })
    }

    fn void_surface_area(&self, dims: &DimensionSet, length: f64) -> SectionResult<f64> {
        let d = BoxBeamDims::from_set(dims)?;
        let chamfer = (2.0 * d.f1 * d.f1).sqrt();
        Ok(length * (2.0 * (d.h2 - 2.0 * d.f1) + 2.0 * (d.w3 - 2.0 * d.f1) + 4.0 * chamfer))
    }
}
