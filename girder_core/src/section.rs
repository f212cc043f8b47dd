//! # Section Geometry Builder
//!
//! Turns a validated dimension set into a section outline with its derived
//! properties, and configures the strand envelope for that section.
//!
//! Families build their raw shapes with the reference point at the
//! bottom-center of the section. The builder shifts everything so the top
//! of the section sits at y = 0, the convention the strand envelope uses.
//!
//! Callers validate first (see [`crate::validation`]). Building from an
//! infeasible dimension set gives meaningless geometry.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::families::BeamFamily;
//! use girder_core::section::{build_outline, OutlineOptions};
//!
//! let family = BeamFamily::DeckedSlabBeam;
//! let dims = family.schema().default_set();
//! let outline = build_outline(family, &dims, &OutlineOptions::default()).unwrap();
//! assert_eq!(outline.web_count, 2);
//! assert!(outline.area() > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::dimensions::DimensionSet;
use crate::envelope::{BoundPair, ElevationBounds, StrandEnvelope, StrandEnvelopeBuilder};
use crate::errors::SectionResult;
use crate::families::{BeamFamily, BeamSpacing, DeckType};
use crate::geometry::Polygon;
use crate::units::inches;

// ============================================================================
// Options and Inputs
// ============================================================================

/// Which side block-outs (shear-key recesses) the section carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOuts {
    pub left: bool,
    pub right: bool,
}

impl Default for BlockOuts {
    fn default() -> Self {
        BlockOuts { left: true, right: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlineOptions {
    pub block_outs: BlockOuts,
    /// Spacing layout; the family's first supported layout when None
    pub spacing: Option<BeamSpacing>,
    /// Center-to-center girder spacing, for flanges that span it
    pub girder_spacing: Option<f64>,
}

impl OutlineOptions {
    pub fn with_spacing(mut self, spacing: BeamSpacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_girder_spacing(mut self, spacing: f64) -> Self {
        self.girder_spacing = Some(spacing);
        self
    }

    pub fn with_block_outs(mut self, left: bool, right: bool) -> Self {
        self.block_outs = BlockOuts { left, right };
        self
    }
}

/// Face a strand limit is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamFace {
    Top,
    Bottom,
}

/// A strand elevation limit measured from a face of the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLimit {
    pub face: BeamFace,
    pub limit: f64,
}

impl FaceLimit {
    pub const fn new(face: BeamFace, limit: f64) -> Self {
        FaceLimit { face, limit }
    }

    /// Elevation in top-of-section coordinates for a section `depth` deep
    pub fn to_top_origin(&self, depth: f64) -> f64 {
        match self.face {
            BeamFace::Top => -self.limit,
            BeamFace::Bottom => self.limit - depth,
        }
    }
}

/// Caller-supplied strand limits used to bound the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandLimits {
    pub end_top: FaceLimit,
    pub end_bottom: FaceLimit,
    pub harp_top: FaceLimit,
    pub harp_bottom: FaceLimit,
    /// Negative means continuously adjustable
    pub end_increment: f64,
    /// Negative means continuously adjustable
    pub harp_increment: f64,
}

impl Default for StrandLimits {
    fn default() -> Self {
        let top = FaceLimit::new(BeamFace::Top, inches(2.0));
        let bottom = FaceLimit::new(BeamFace::Bottom, inches(2.0));
        StrandLimits {
            end_top: top,
            end_bottom: bottom,
            harp_top: top,
            harp_bottom: bottom,
            end_increment: -1.0,
            harp_increment: -1.0,
        }
    }
}

impl StrandLimits {
    fn elevation_bounds(&self, depth: f64) -> ElevationBounds {
        let end = BoundPair::new(self.end_top.to_top_origin(depth), self.end_bottom.to_top_origin(depth));
        let harp = BoundPair::new(self.harp_top.to_top_origin(depth), self.harp_bottom.to_top_origin(depth));
        ElevationBounds::ends_and_harp_points(end, harp)
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// Shear-key grout areas for adjacent layouts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShearKeyAreas {
    /// Grout area per beam that does not depend on the joint width
    pub uniform_area_per_beam: f64,
    /// Grout area per unit of joint width
    pub area_per_joint: f64,
}

/// Solid material and voids of a section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionShape {
    pub solids: Vec<Polygon>,
    pub voids: Vec<Polygon>,
}

impl SectionShape {
    pub fn solid(polygon: Polygon) -> Self {
        SectionShape {
            solids: vec![polygon],
            voids: Vec::new(),
        }
    }

    /// Adds voids; accepts an `Option` for families whose void may vanish.
    pub fn with_void(mut self, voids: impl IntoIterator<Item = Polygon>) -> Self {
        self.voids.extend(voids);
        self
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in self.solids.iter_mut().chain(self.voids.iter_mut()) {
            p.translate(dx, dy);
        }
    }

    fn signed_parts(&self) -> impl Iterator<Item = (f64, &Polygon)> {
        self.solids
            .iter()
            .map(|p| (1.0, p))
            .chain(self.voids.iter().map(|p| (-1.0, p)))
    }
}

/// Outline of a section with its derived scalar properties. Always
/// derivable from the dimension set it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutline {
    pub family: BeamFamily,
    /// Top-of-section coordinates
    pub shape: SectionShape,
    pub height: f64,
    pub width: f64,
    pub web_count: usize,
    pub spacing: BeamSpacing,
    pub spacing_range: (f64, f64),
    pub shear_key_areas: ShearKeyAreas,
}

impl SectionOutline {
    /// Net area (solids less voids)
    pub fn area(&self) -> f64 {
        self.shape.signed_parts().map(|(sign, p)| sign * p.area()).sum()
    }

    /// Depth of the centroid below the top of the section
    pub fn centroid_depth(&self) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        let moment: f64 = self
            .shape
            .signed_parts()
            .map(|(sign, p)| sign * p.area() * p.centroid().y)
            .sum();
        -moment / area
    }

    /// Moment of inertia about the horizontal centroidal axis
    pub fn moment_of_inertia(&self) -> f64 {
        let about_top: f64 = self
            .shape
            .signed_parts()
            .map(|(sign, p)| sign * p.second_moment_about_origin())
            .sum();
        let yc = self.centroid_depth();
        about_top - self.area() * yc * yc
    }

    /// Outside perimeter of the solids
    pub fn perimeter(&self) -> f64 {
        self.shape.solids.iter().map(Polygon::perimeter).sum()
    }

    /// Perimeter of all voids
    pub fn void_perimeter(&self) -> f64 {
        self.shape.voids.iter().map(Polygon::perimeter).sum()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Outline and properties of the section described by `dims`.
pub fn build_outline(family: BeamFamily, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionOutline> {
    let section = family.section();
    let dims = family.schema().normalize(dims)?;

    let spacing = match options.spacing {
        Some(spacing) => spacing,
        None => section.supported_spacings()[0],
    };
    let spacing_range = section.spacing_range(&dims, spacing)?;

    let height = section.height(&dims)?;
    let mut shape = section.build_shape(&dims, options)?;
    shape.translate(0.0, -height);

    Ok(SectionOutline {
        family,
        shape,
        height,
        width: section.outline_width(&dims, options)?,
        web_count: section.web_count(&dims)?,
        spacing,
        spacing_range,
        shear_key_areas: section.shear_key_areas(&dims, spacing)?,
    })
}

/// Strand envelope for the section. `overall_height` overrides the section
/// height when the girder is built deeper or shallower than its shape.
pub fn build_strand_envelope(
    family: BeamFamily,
    dims: &DimensionSet,
    overall_height: Option<f64>,
    limits: &StrandLimits,
) -> SectionResult<StrandEnvelope> {
    let section = family.section();
    let dims = family.schema().normalize(dims)?;
    let depth = match overall_height {
        Some(height) => height,
        None => section.height(&dims)?,
    };

    let mut builder = StrandEnvelopeBuilder::new();
    for region in section.harp_regions(&dims, depth)? {
        builder.add_region(region.shape, region.arc_slope);
    }

    builder.set_elevation_bounds(
        0.0,
        depth,
        limits.elevation_bounds(depth),
        limits.end_increment,
        limits.harp_increment,
    )
}

/// Shear-key areas for a layout; zero for families without shear keys.
pub fn shear_key_areas(family: BeamFamily, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<ShearKeyAreas> {
    let dims = family.schema().normalize(dims)?;
    family.section().shear_key_areas(&dims, spacing)
}

pub fn allowable_spacing_range(family: BeamFamily, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
    let dims = family.schema().normalize(dims)?;
    family.section().spacing_range(&dims, spacing)
}

pub fn supported_spacings(family: BeamFamily) -> &'static [BeamSpacing] {
    family.section().supported_spacings()
}

pub fn supported_deck_types(family: BeamFamily, spacing: BeamSpacing) -> SectionResult<&'static [DeckType]> {
    family.section().supported_deck_types(spacing)
}

/// True when the cross-section is the same along the whole girder.
pub fn is_prismatic(family: BeamFamily, dims: &DimensionSet) -> SectionResult<bool> {
    family.section().is_prismatic(dims)
}

/// Interior form surface of the voids for a girder `length` long.
pub fn void_surface_area(family: BeamFamily, dims: &DimensionSet, length: f64) -> SectionResult<f64> {
    family.section().void_surface_area(dims, length)
}

/// Surface area of a girder `length` long exposed to drying: the outside
/// perimeter over the length plus the void surface. Voids that are poorly
/// ventilated count for half.
pub fn surface_area(
    family: BeamFamily,
    dims: &DimensionSet,
    length: f64,
    reduce_for_poorly_ventilated_voids: bool,
) -> SectionResult<f64> {
    let outline = build_outline(family, dims, &OutlineOptions::default())?;
    let void_factor = if reduce_for_poorly_ventilated_voids { 0.5 } else { 1.0 };
    let voids = family.section().void_surface_area(dims, length)?;
    Ok(outline.perimeter() * length + void_factor * voids)
}
