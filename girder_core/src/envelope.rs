//! # Strand Envelope
//!
//! Describes where prestressing strands may be shifted vertically within a
//! cross-section, and performs the shift.
//!
//! Coordinates put the top of the section at y = 0 with y up, so section
//! material sits at y ≤ 0.
//!
//! The envelope is configured in two phases. A [`StrandEnvelopeBuilder`]
//! collects harp regions in insertion order. Setting the elevation bounds
//! consumes the builder and yields a read-only [`StrandEnvelope`].
//!
//! ## Example
//!
//! ```rust
//! use girder_core::envelope::{ElevationBounds, EndType, PointKind, StrandEnvelopeBuilder};
//! use girder_core::geometry::{Point2, Polygon};
//!
//! let mut web = Polygon::rectangle(0.2, 1.0);
//! web.move_hook_to(Point2::new(0.0, -1.0));
//!
//! let mut builder = StrandEnvelopeBuilder::new();
//! builder.add_region(web, 0.0);
//! let envelope = builder
//!     .set_elevation_bounds(0.0, 1.0, ElevationBounds::uniform(-0.05, -0.95), -1.0, -1.0)
//!     .unwrap();
//!
//! let moved = envelope
//!     .translate_strand(PointKind::HarpPoint, EndType::Start, 0.0, -0.5, 0.1)
//!     .unwrap();
//! assert!((moved.y + 0.4).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};
use crate::geometry::{Point2, Polygon};

/// Tolerance applied when checking a translated strand against its bounds (m)
pub const ELEVATION_TOLERANCE: f64 = 1.0e-6;

// ============================================================================
// Keys
// ============================================================================

/// Which end of a segment a bound applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndType {
    Start,
    End,
}

impl EndType {
    pub const ALL: [EndType; 2] = [EndType::Start, EndType::End];
}

/// Where along the segment a strand position is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    HarpPoint,
    EndPoint,
}

impl PointKind {
    pub const ALL: [PointKind; 2] = [PointKind::HarpPoint, PointKind::EndPoint];
}

/// Allowed elevation range of a strand, top-origin coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundPair {
    pub top: f64,
    pub bottom: f64,
}

impl BoundPair {
    pub const fn new(top: f64, bottom: f64) -> Self {
        BoundPair { top, bottom }
    }
}

/// Bounds for every (end type, point kind) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationBounds {
    pub start_end_point: BoundPair,
    pub start_harp_point: BoundPair,
    pub end_harp_point: BoundPair,
    pub end_end_point: BoundPair,
}

impl ElevationBounds {
    /// Same bounds everywhere
    pub fn uniform(top: f64, bottom: f64) -> Self {
        let pair = BoundPair::new(top, bottom);
        ElevationBounds {
            start_end_point: pair,
            start_harp_point: pair,
            end_harp_point: pair,
            end_end_point: pair,
        }
    }

    /// One pair for the girder ends, another for the harp points
    pub fn ends_and_harp_points(end: BoundPair, harp: BoundPair) -> Self {
        ElevationBounds {
            start_end_point: end,
            start_harp_point: harp,
            end_harp_point: harp,
            end_end_point: end,
        }
    }

    pub fn get(&self, end: EndType, kind: PointKind) -> BoundPair {
        match (end, kind) {
            (EndType::Start, PointKind::EndPoint) => self.start_end_point,
            (EndType::Start, PointKind::HarpPoint) => self.start_harp_point,
            (EndType::End, PointKind::HarpPoint) => self.end_harp_point,
            (EndType::End, PointKind::EndPoint) => self.end_end_point,
        }
    }

    fn all(&self) -> [(&'static str, BoundPair); 4] {
        [
            ("start end point", self.start_end_point),
            ("start harp point", self.start_harp_point),
            ("end harp point", self.end_harp_point),
            ("end end point", self.end_end_point),
        ]
    }
}

// ============================================================================
// Harp Regions
// ============================================================================

/// A region a harped strand may travel through, with the ratio that turns a
/// vertical offset into a horizontal shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarpRegion {
    pub shape: Polygon,
    pub arc_slope: f64,
}

impl HarpRegion {
    pub fn new(shape: Polygon, arc_slope: f64) -> Self {
        HarpRegion { shape, arc_slope }
    }
}

/// Configuration phase of a strand envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeState {
    Unconfigured,
    RegionsPopulated,
    Bounded,
}

// ============================================================================
// Builder
// ============================================================================

/// Collects harp regions before the bounds are set.
#[derive(Debug, Clone, Default)]
pub struct StrandEnvelopeBuilder {
    regions: Vec<HarpRegion>,
}

impl StrandEnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region. Lookup order is insertion order.
    pub fn add_region(&mut self, shape: Polygon, arc_slope: f64) -> &mut Self {
        self.regions.push(HarpRegion::new(shape, arc_slope));
        self
    }

    pub fn clear_all(&mut self) {
        self.regions.clear();
    }

    pub fn state(&self) -> EnvelopeState {
        if self.regions.is_empty() {
            EnvelopeState::Unconfigured
        } else {
            EnvelopeState::RegionsPopulated
        }
    }

    pub fn regions(&self) -> &[HarpRegion] {
        &self.regions
    }

    /// Fix the bounds and finish configuration.
    ///
    /// A negative increment means the strands are continuously adjustable
    /// for that point kind. Every bound must lie at or below both zero and
    /// `top_elevation`.
    pub fn set_elevation_bounds(
        self,
        top_elevation: f64,
        section_height: f64,
        bounds: ElevationBounds,
        end_increment: f64,
        harp_increment: f64,
    ) -> SectionResult<StrandEnvelope> {
        for (label, pair) in bounds.all() {
            for (which, value) in [("top", pair.top), ("bottom", pair.bottom)] {
                if value > 0.0 {
                    return Err(SectionError::invalid_argument(
                        format!("{} {} bound", label, which),
                        format!("elevation {} is above the top of the section (0)", value),
                    ));
                }
                if value > top_elevation {
                    return Err(SectionError::invalid_argument(
                        format!("{} {} bound", label, which),
                        format!("elevation {} is above the top elevation {}", value, top_elevation),
                    ));
                }
            }
        }

        Ok(StrandEnvelope {
            regions: self.regions,
            top_elevation,
            section_height,
            bounds,
            end_increment,
            harp_increment,
        })
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// A fully configured, read-only strand envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandEnvelope {
    regions: Vec<HarpRegion>,
    top_elevation: f64,
    section_height: f64,
    bounds: ElevationBounds,
    end_increment: f64,
    harp_increment: f64,
}

impl StrandEnvelope {
    pub fn state(&self) -> EnvelopeState {
        EnvelopeState::Bounded
    }

    pub fn regions(&self) -> &[HarpRegion] {
        &self.regions
    }

    pub fn top_elevation(&self) -> f64 {
        self.top_elevation
    }

    pub fn section_height(&self) -> f64 {
        self.section_height
    }

    pub fn increment(&self, kind: PointKind) -> f64 {
        match kind {
            PointKind::HarpPoint => self.harp_increment,
            PointKind::EndPoint => self.end_increment,
        }
    }

    /// `(bottom_min, top_max)` for a strand at (end, kind).
    pub fn elevation_boundaries(&self, end: EndType, kind: PointKind) -> (f64, f64) {
        self.boundaries_for_height(end, kind, self.section_height)
    }

    fn boundaries_for_height(&self, end: EndType, kind: PointKind, section_height: f64) -> (f64, f64) {
        if self.increment(kind) < 0.0 {
            (-section_height, self.top_elevation)
        } else {
            let pair = self.bounds.get(end, kind);
            (pair.bottom, pair.top)
        }
    }

    /// First region, in insertion order, that contains `point`.
    pub fn region_at(&self, point: Point2) -> Option<&HarpRegion> {
        self.regions.iter().find(|r| r.shape.contains(point))
    }

    /// Shift a strand vertically by `offset`, moving it sideways along the
    /// web by `offset × arc_slope` of the region it starts in.
    pub fn translate_strand(
        &self,
        kind: PointKind,
        end: EndType,
        x: f64,
        y: f64,
        offset: f64,
    ) -> SectionResult<Point2> {
        let region = self
            .region_at(Point2::new(x, y))
            .ok_or(SectionError::PointOutsideRegion { x, y })?;
        log::trace!(
            "translating strand at ({}, {}) [{:?} {:?}] by {} with arc slope {}",
            x,
            y,
            end,
            kind,
            offset,
            region.arc_slope
        );
        Ok(Point2::new(x + offset * region.arc_slope, y + offset))
    }

    /// True when the translated strand stays inside its elevation bounds.
    /// Points outside every region are simply not legal here.
    pub fn test_strand_location(
        &self,
        kind: PointKind,
        end: EndType,
        section_height: f64,
        x: f64,
        y: f64,
        offset: f64,
    ) -> bool {
        let moved = match self.translate_strand(kind, end, x, y, offset) {
            Ok(p) => p,
            Err(_) => return false,
        };
        let (bottom, top) = self.boundaries_for_height(end, kind, section_height);
        bottom - ELEVATION_TOLERANCE <= moved.y && moved.y <= top + ELEVATION_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn web(x: f64, width: f64, depth: f64) -> Polygon {
        let mut shape = Polygon::rectangle(width, depth);
        shape.move_hook_to(Point2::new(x, -depth));
        shape
    }

    fn single_region_envelope(end_increment: f64, harp_increment: f64) -> StrandEnvelope {
        let mut builder = StrandEnvelopeBuilder::new();
        builder.add_region(web(0.0, 0.2, 1.0), 0.25);
        builder
            .set_elevation_bounds(
                0.0,
                1.0,
                ElevationBounds::ends_and_harp_points(BoundPair::new(-0.1, -0.9), BoundPair::new(-0.2, -0.8)),
                end_increment,
                harp_increment,
            )
            .unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let mut builder = StrandEnvelopeBuilder::new();
        assert_eq!(builder.state(), EnvelopeState::Unconfigured);
        builder.add_region(web(0.0, 0.2, 1.0), 0.0);
        assert_eq!(builder.state(), EnvelopeState::RegionsPopulated);
        builder.clear_all();
        assert_eq!(builder.state(), EnvelopeState::Unconfigured);
        builder.add_region(web(0.0, 0.2, 1.0), 0.0);
        let envelope = builder
            .set_elevation_bounds(0.0, 1.0, ElevationBounds::uniform(0.0, -1.0), 0.0, 0.0)
            .unwrap();
        assert_eq!(envelope.state(), EnvelopeState::Bounded);
    }

    #[test]
    fn test_bounds_above_section_rejected() {
        let builder = StrandEnvelopeBuilder::new();
        let err = builder
            .set_elevation_bounds(0.0, 1.0, ElevationBounds::uniform(0.05, -0.9), 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");

        let builder = StrandEnvelopeBuilder::new();
        let err = builder
            .set_elevation_bounds(-0.5, 1.0, ElevationBounds::uniform(-0.2, -0.9), 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_negative_increment_uses_full_height() {
        let envelope = single_region_envelope(-1.0, 0.0);
        assert_eq!(envelope.elevation_boundaries(EndType::Start, PointKind::EndPoint), (-1.0, 0.0));
        assert_eq!(envelope.elevation_boundaries(EndType::End, PointKind::HarpPoint), (-0.8, -0.2));
    }

    #[test]
    fn test_translate_is_affine_in_offset() {
        let envelope = single_region_envelope(0.0, 0.0);
        let (x, y) = (0.05, -0.5);
        for k in [-2.0, -0.5, 0.0, 1.0, 3.0] {
            let offset = 0.1;
            let moved = envelope
                .translate_strand(PointKind::HarpPoint, EndType::Start, x, y, k * offset)
                .unwrap();
            assert_relative_eq!(moved.y, y + k * offset, epsilon = 1e-12);
            assert_relative_eq!(moved.x, x + k * offset * 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_point_outside_every_region() {
        let envelope = single_region_envelope(0.0, 0.0);
        let err = envelope
            .translate_strand(PointKind::EndPoint, EndType::End, 1.0, -0.5, 0.0)
            .unwrap_err();
        assert_eq!(err, SectionError::PointOutsideRegion { x: 1.0, y: -0.5 });
        assert!(!envelope.test_strand_location(PointKind::EndPoint, EndType::End, 1.0, 1.0, -0.5, 0.0));
    }

    #[test]
    fn test_first_region_wins() {
        let mut builder = StrandEnvelopeBuilder::new();
        builder.add_region(web(0.0, 0.4, 1.0), 0.5);
        builder.add_region(web(0.1, 0.4, 1.0), -0.3);
        let envelope = builder
            .set_elevation_bounds(0.0, 1.0, ElevationBounds::uniform(0.0, -1.0), -1.0, -1.0)
            .unwrap();
        let moved = envelope
            .translate_strand(PointKind::HarpPoint, EndType::Start, 0.1, -0.5, 0.2)
            .unwrap();
        assert_relative_eq!(moved.x, 0.1 + 0.2 * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_offset_inside_bounds_is_legal() {
        let envelope = single_region_envelope(0.0, 0.0);
        assert!(envelope.test_strand_location(PointKind::HarpPoint, EndType::Start, 1.0, 0.0, -0.5, 0.0));
        assert!(envelope.test_strand_location(PointKind::EndPoint, EndType::End, 1.0, 0.0, -0.1, 0.0));
    }

    #[test]
    fn test_location_checked_against_bounds() {
        let envelope = single_region_envelope(0.0, 0.0);
        // harp point bounds are [-0.8, -0.2]
        assert!(envelope.test_strand_location(PointKind::HarpPoint, EndType::End, 1.0, 0.0, -0.5, 0.3));
        assert!(!envelope.test_strand_location(PointKind::HarpPoint, EndType::End, 1.0, 0.0, -0.5, 0.31));
        assert!(!envelope.test_strand_location(PointKind::HarpPoint, EndType::End, 1.0, 0.0, -0.5, -0.35));
    }

    #[test]
    fn test_continuous_adjustment_uses_passed_height() {
        let envelope = single_region_envelope(-1.0, -1.0);
        // bounds widen to [-height, top] for the height passed in
        assert!(envelope.test_strand_location(PointKind::EndPoint, EndType::Start, 1.0, 0.0, -0.5, -0.5));
        assert!(!envelope.test_strand_location(PointKind::EndPoint, EndType::Start, 0.6, 0.0, -0.5, -0.2));
    }
}
