//! # Beam Families
//!
//! The closed set of precast beam families the engine understands. Each
//! family implements [`SectionFamily`], which bundles its constant tables
//! (schema, constraints, persistence history) with the geometry formulas
//! that turn a dimension set into an outline and strand regions.
//!
//! The generic drivers in [`crate::validation`], [`crate::persistence`] and
//! [`crate::section`] work through this trait only.
//!
//! ## Available Families
//!
//! - [`box_beam`] - WSDOT box beam with flanged sides and an optional shear key
//! - [`aashto_box`] - AASHTO box beam with a side keyway
//! - [`u_beam`] - WSDOT U-beam
//! - [`u_beam2`] - TxDOT U-beam
//! - [`decked_slab`] - Decked slab beam
//! - [`nu_beam`] - Nebraska University I-girder with rounded fillets
//! - [`bulb_tee`] - Bulb tee whose top flange spans the girder spacing
//! - [`voided_slab`] - Solid slab with a row of round voids

pub mod aashto_box;
pub mod box_beam;
pub mod bulb_tee;
pub mod decked_slab;
pub mod nu_beam;
pub mod u_beam;
pub mod u_beam2;
pub mod voided_slab;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dimensions::DimensionSet;
use crate::envelope::HarpRegion;
use crate::errors::{SectionError, SectionResult};
use crate::geometry::{round_corner, Point2, Polygon};
use crate::persistence::PersistenceRules;
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape, ShearKeyAreas};
use crate::units::UnitSystem;

/// Upper end of an unbounded spacing range. Kept well below `f64::MAX` so
/// sums of spacings stay finite.
pub const MAX_GIRDER_SPACING: f64 = f64::MAX / 3.0;

/// Chords used to approximate a rounded corner
pub(crate) const FILLET_SEGMENTS: usize = 8;

// ============================================================================
// Family Identifier
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamFamily {
    BoxBeam,
    AashtoBoxBeam,
    UBeam,
    UBeam2,
    DeckedSlabBeam,
    NuBeam,
    BulbTee,
    VoidedSlab,
}

impl BeamFamily {
    pub const ALL: [BeamFamily; 8] = [
        BeamFamily::BoxBeam,
        BeamFamily::AashtoBoxBeam,
        BeamFamily::UBeam,
        BeamFamily::UBeam2,
        BeamFamily::DeckedSlabBeam,
        BeamFamily::NuBeam,
        BeamFamily::BulbTee,
        BeamFamily::VoidedSlab,
    ];

    /// Stable identifier used in files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            BeamFamily::BoxBeam => "BoxBeam",
            BeamFamily::AashtoBoxBeam => "AashtoBoxBeam",
            BeamFamily::UBeam => "UBeam",
            BeamFamily::UBeam2 => "UBeam2",
            BeamFamily::DeckedSlabBeam => "DeckedSlabBeam",
            BeamFamily::NuBeam => "NUBeam",
            BeamFamily::BulbTee => "BulbTee",
            BeamFamily::VoidedSlab => "VoidedSlab",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BeamFamily::BoxBeam => "Box Beam (WSDOT)",
            BeamFamily::AashtoBoxBeam => "Box Beam (AASHTO)",
            BeamFamily::UBeam => "U-Beam (WSDOT)",
            BeamFamily::UBeam2 => "U-Beam (TxDOT)",
            BeamFamily::DeckedSlabBeam => "Decked Slab Beam",
            BeamFamily::NuBeam => "NU Beam",
            BeamFamily::BulbTee => "Bulb Tee",
            BeamFamily::VoidedSlab => "Voided Slab",
        }
    }

    pub fn from_name(name: &str) -> SectionResult<BeamFamily> {
        BeamFamily::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SectionError::unknown_family(name))
    }

    /// The family's constant tables and geometry formulas
    pub fn section(&self) -> &'static dyn SectionFamily {
        match self {
            BeamFamily::BoxBeam => &box_beam::BoxBeam,
            BeamFamily::AashtoBoxBeam => &aashto_box::AashtoBoxBeam,
            BeamFamily::UBeam => &u_beam::UBeam,
            BeamFamily::UBeam2 => &u_beam2::UBeam2,
            BeamFamily::DeckedSlabBeam => &decked_slab::DeckedSlabBeam,
            BeamFamily::NuBeam => &nu_beam::NuBeam,
            BeamFamily::BulbTee => &bulb_tee::BulbTee,
            BeamFamily::VoidedSlab => &voided_slab::VoidedSlab,
        }
    }

    pub fn schema(&self) -> &'static DimensionSchema {
        self.section().schema()
    }
}

impl fmt::Display for BeamFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Spacing
// ============================================================================

/// How girders are laid out across the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamSpacing {
    /// Same spacing everywhere, beams apart
    UniformSpread,
    /// Spacing varies, beams apart
    GeneralSpread,
    /// Same joint width everywhere, beams side by side
    UniformAdjacent,
    /// Joint width varies, beams side by side
    GeneralAdjacent,
}

impl BeamSpacing {
    pub const ALL: [BeamSpacing; 4] = [
        BeamSpacing::UniformSpread,
        BeamSpacing::GeneralSpread,
        BeamSpacing::UniformAdjacent,
        BeamSpacing::GeneralAdjacent,
    ];

    pub fn is_adjacent(&self) -> bool {
        matches!(self, BeamSpacing::UniformAdjacent | BeamSpacing::GeneralAdjacent)
    }
}

pub(crate) const SPREAD_ONLY: &[BeamSpacing] = &[BeamSpacing::UniformSpread, BeamSpacing::GeneralSpread];

pub(crate) const ADJACENT_ONLY: &[BeamSpacing] = &[BeamSpacing::UniformAdjacent, BeamSpacing::GeneralAdjacent];

// ============================================================================
// Deck Types
// ============================================================================

/// Deck systems a girder can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckType {
    /// Cast-in-place composite slab
    CompositeCip,
    /// Composite slab cast on stay-in-place panels
    CompositeSip,
    /// Composite overlay on top of adjacent beams
    CompositeOverlay,
    /// Beams used without a deck
    NoDeck,
}

impl DeckType {
    pub const ALL: [DeckType; 4] = [
        DeckType::CompositeCip,
        DeckType::CompositeSip,
        DeckType::CompositeOverlay,
        DeckType::NoDeck,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DeckType::CompositeCip => "Composite Cast-In-Place Deck",
            DeckType::CompositeSip => "Composite Stay-In-Place Deck Panels",
            DeckType::CompositeOverlay => "Composite Overlay",
            DeckType::NoDeck => "No Deck",
        }
    }
}

pub(crate) const SPREAD_DECKS: &[DeckType] = &[DeckType::CompositeCip, DeckType::CompositeSip];

pub(crate) const ADJACENT_DECKS: &[DeckType] = &[DeckType::CompositeOverlay, DeckType::NoDeck];

// ============================================================================
// Family Capability Set
// ============================================================================

/// Per-family constants and formulas.
///
/// Geometry methods assume a dimension set that has already passed
/// [`SectionFamily::validate`]; they do not re-check feasibility.
pub trait SectionFamily: Sync {
    fn family(&self) -> BeamFamily;

    fn schema(&self) -> &'static DimensionSchema;

    fn persistence(&self) -> &'static PersistenceRules;

    /// First violated feasibility rule, if any.
    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()>;

    /// Overall height of the section
    fn height(&self, dims: &DimensionSet) -> SectionResult<f64>;

    /// Overall width of the section
    fn width(&self, dims: &DimensionSet) -> SectionResult<f64>;

    fn web_count(&self, _dims: &DimensionSet) -> SectionResult<usize> {
        Ok(2)
    }

    /// Spacing layouts the family can be used in. The first is the default.
    fn supported_spacings(&self) -> &'static [BeamSpacing];

    /// `(min, max)` center-to-center spacing, or joint width for families
    /// that measure adjacent layouts that way.
    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)>;

    /// Deck systems usable with a spacing layout. Spread layouts take a
    /// cast slab; adjacent layouts take an overlay or no deck.
    fn supported_deck_types(&self, spacing: BeamSpacing) -> SectionResult<&'static [DeckType]> {
        self.ensure_spacing_supported(spacing)?;
        Ok(if spacing.is_adjacent() { ADJACENT_DECKS } else { SPREAD_DECKS })
    }

    /// Solids and voids with the reference point at the bottom-center of
    /// the section.
    fn build_shape(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionShape>;

    /// Width of the outline built with `options`. Only families whose
    /// flange follows the girder spacing differ from [`SectionFamily::width`].
    fn outline_width(&self, dims: &DimensionSet, _options: &OutlineOptions) -> SectionResult<f64> {
        self.width(dims)
    }

    /// Harp regions in top-of-section coordinates for a section `depth` deep.
    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>>;

    fn shear_key_areas(&self, _dims: &DimensionSet, _spacing: BeamSpacing) -> SectionResult<ShearKeyAreas> {
        Ok(ShearKeyAreas::default())
    }

    /// Interior form surface of the voids over a girder `length` long
    fn void_surface_area(&self, _dims: &DimensionSet, _length: f64) -> SectionResult<f64> {
        Ok(0.0)
    }

    fn end_block_length(&self, _dims: &DimensionSet) -> SectionResult<f64> {
        Ok(0.0)
    }

    /// True when the cross-section is the same along the whole girder.
    fn is_prismatic(&self, dims: &DimensionSet) -> SectionResult<bool> {
        Ok(self.end_block_length(dims)? <= 0.0)
    }

    fn ensure_spacing_supported(&self, spacing: BeamSpacing) -> SectionResult<()> {
        if self.supported_spacings().contains(&spacing) {
            Ok(())
        } else {
            Err(SectionError::invalid_argument(
                "spacing",
                format!("{:?} is not supported by {}", spacing, self.family()),
            ))
        }
    }
}

// ============================================================================
// Shared Shape Helpers
// ============================================================================

/// Closed polygon from the right-hand side profile and the left-hand side
/// profile, both given bottom to top in right-hand (positive x) coordinates.
pub(crate) fn polygon_from_sides(right: &[Point2], left: &[Point2]) -> Polygon {
    let mirrored_left = left.iter().rev().map(|p| Point2::new(-p.x, p.y));
    Polygon::from_points(right.iter().copied().chain(mirrored_left))
}

/// Rectangular core `width` × `height` sitting at `bottom`, with 45°
/// fillets at the top and bottom corners. None when the core has no area.
pub(crate) fn filleted_void(width: f64, height: f64, bottom: f64, top_fillet: f64, bottom_fillet: f64) -> Option<Polygon> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let half = width / 2.0;
    let top = bottom + height;
    Some(Polygon::from_points([
        Point2::new(-half + bottom_fillet, bottom),
        Point2::new(half - bottom_fillet, bottom),
        Point2::new(half, bottom + bottom_fillet),
        Point2::new(half, top - top_fillet),
        Point2::new(half - top_fillet, top),
        Point2::new(-half + top_fillet, top),
        Point2::new(-half, top - top_fillet),
        Point2::new(-half, bottom + bottom_fillet),
    ]))
}

/// Replaces the vertices at `corners` (index, radius) with tangent arcs.
/// Indices refer to `points`; the first and last points are never rounded.
pub(crate) fn rounded_profile(points: &[Point2], corners: &[(usize, f64)]) -> Vec<Point2> {
    let mut profile = Vec::with_capacity(points.len() + corners.len() * FILLET_SEGMENTS);
    for (i, &p) in points.iter().enumerate() {
        let radius = corners.iter().find(|(index, _)| *index == i).map(|&(_, r)| r);
        match radius {
            Some(r) if i > 0 && i + 1 < points.len() => {
                profile.extend(round_corner(points[i - 1], p, points[i + 1], r, FILLET_SEGMENTS))
            }
            _ => profile.push(p),
        }
    }
    profile
}

/// Rectangle `width` wide spanning `depth` below the top of the section,
/// centered at `x`.
pub(crate) fn web_rectangle(x: f64, width: f64, depth: f64) -> Polygon {
    let mut shape = Polygon::rectangle(width, depth);
    shape.move_hook_to(Point2::new(x, -depth));
    shape
}

/// Sloped-web region for U-beams, right web, top-of-section coordinates.
/// The left web is its mirror with the arc slope negated.
pub(crate) fn sloped_web_regions(bottom_half_width: f64, depth: f64, slope: f64, thickness: f64) -> Vec<HarpRegion> {
    let arc_slope = 1.0 / slope;
    let t_x = thickness * (slope * slope + 1.0).sqrt() / slope;

    let x1 = bottom_half_width;
    let y1 = -depth;
    let x2 = x1 + depth * arc_slope;
    let y2 = 0.0;
    let x3 = x2 - t_x;
    let x4 = x1 - t_x;

    let right = Polygon::from_points([
        Point2::new(x1, y1),
        Point2::new(x2, y2),
        Point2::new(x3, y2),
        Point2::new(x4, y1),
    ]);
    let left = right.mirrored_y();

    vec![HarpRegion::new(left, -arc_slope), HarpRegion::new(right, arc_slope)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_family_names_round_trip() {
        for family in BeamFamily::ALL {
            assert_eq!(BeamFamily::from_name(family.name()).unwrap(), family);
            assert_eq!(family.section().family(), family);
            assert_eq!(family.schema().family(), family.name());
        }
        assert_eq!(BeamFamily::from_name("ubeam2").unwrap(), BeamFamily::UBeam2);
        assert!(BeamFamily::from_name("IBeam").is_err());
        assert_eq!(BeamFamily::from_name("nubeam").unwrap(), BeamFamily::NuBeam);
    }

    #[test]
    fn test_unmodeled_families_are_unknown() {
        for name in [
            "DoubleTee",
            "MultiWeb",
            "MultiWeb2",
            "TxDotDoubleT",
            "PCIDeckedBulbTee",
            "TaperedIBeam",
            "SplicedUBeam",
        ] {
            let err = BeamFamily::from_name(name).unwrap_err();
            assert_eq!(err.error_code(), "UNKNOWN_FAMILY", "{}", name);
        }
    }

    #[test]
    fn test_deck_types_follow_spacing() {
        let box_beam = BeamFamily::BoxBeam.section();
        assert_eq!(
            box_beam.supported_deck_types(BeamSpacing::UniformSpread).unwrap(),
            &[DeckType::CompositeCip, DeckType::CompositeSip]
        );
        assert_eq!(
            box_beam.supported_deck_types(BeamSpacing::GeneralAdjacent).unwrap(),
            &[DeckType::CompositeOverlay, DeckType::NoDeck]
        );
        let err = BeamFamily::BulbTee
            .section()
            .supported_deck_types(BeamSpacing::UniformSpread)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_rounded_profile_keeps_end_points() {
        let points = [Point2::new(1.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)];
        let profile = rounded_profile(&points, &[(0, 0.5), (1, 0.25)]);
        assert_eq!(profile.len(), FILLET_SEGMENTS + 3);
        assert_eq!(profile[0], points[0]);
        assert_eq!(profile[profile.len() - 1], points[2]);
        assert_eq!(rounded_profile(&points, &[]), points.to_vec());
    }

    #[test]
    fn test_unsupported_spacing_rejected() {
        let family = BeamFamily::UBeam.section();
        let dims = BeamFamily::UBeam.schema().default_set();
        let err = family.spacing_range(&dims, BeamSpacing::UniformAdjacent).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_filleted_void_area() {
        let void = filleted_void(2.0, 1.0, 0.5, 0.1, 0.2).unwrap();
        let expected = 2.0 - 2.0 * 0.5 * 0.01 - 2.0 * 0.5 * 0.04;
        assert_relative_eq!(void.area(), expected, epsilon = 1e-12);
        assert!(filleted_void(0.0, 1.0, 0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_sloped_web_regions_mirror() {
        let regions = sloped_web_regions(0.5, 1.0, 4.0, 0.1);
        assert_eq!(regions.len(), 2);
        assert_relative_eq!(regions[0].arc_slope, -0.25);
        assert_relative_eq!(regions[1].arc_slope, 0.25);
        // a point on the web centerline near mid-depth
        let t_x = 0.1 * 17.0_f64.sqrt() / 4.0;
        let x_mid = 0.5 + 0.5 * 0.25 - t_x / 2.0;
        assert!(regions[1].shape.contains(Point2::new(x_mid, -0.5)));
        assert!(regions[0].shape.contains(Point2::new(-x_mid, -0.5)));
        assert!(!regions[1].shape.contains(Point2::new(-x_mid, -0.5)));
    }
}
