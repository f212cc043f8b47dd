//! # Geometry Primitives
//!
//! Closed 2D polygons with a movable reference ("hook") point. Section
//! outlines, voids and harp regions are all built from these.
//!
//! Coordinates are canonical meters, x to the right and y up.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::geometry::{Point2, Polygon};
//!
//! // A 1 x 2 rectangle hooked at its bottom-center, moved so the hook sits
//! // at the top-of-section origin.
//! let mut web = Polygon::rectangle(1.0, 2.0);
//! web.move_hook_to(Point2::new(0.0, -2.0));
//! assert!(web.contains(Point2::new(0.5, -1.0))); // boundary counts
//! assert!(!web.contains(Point2::new(0.0, 0.5)));
//! ```

use serde::{Deserialize, Serialize};

/// Distance below which two coordinates are considered coincident (m)
pub const GEOMETRY_TOLERANCE: f64 = 1.0e-9;

/// A point in the section plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    fn near(self, other: Point2) -> bool {
        (self.x - other.x).abs() <= GEOMETRY_TOLERANCE && (self.y - other.y).abs() <= GEOMETRY_TOLERANCE
    }
}

/// Axis-aligned bounds of a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn bottom_center(&self) -> Point2 {
        Point2::new((self.min.x + self.max.x) / 2.0, self.min.y)
    }
}

/// Closed polygon. The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point2>,
    hook: Point2,
}

impl Polygon {
    /// Build a polygon from its vertices. Consecutive duplicate vertices are
    /// dropped so degenerate features (zero-size chamfers and the like) do
    /// not leave zero-length edges. The hook starts at the bottom-center of
    /// the bounding box.
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut cleaned: Vec<Point2> = Vec::new();
        for p in points {
            if cleaned.last().map_or(true, |last| !last.near(p)) {
                cleaned.push(p);
            }
        }
        while cleaned.len() > 1 && cleaned[0].near(cleaned[cleaned.len() - 1]) {
            cleaned.pop();
        }

        let mut polygon = Polygon {
            points: cleaned,
            hook: Point2::default(),
        };
        if let Some(bounds) = polygon.bounding_box() {
            polygon.hook = bounds.bottom_center();
        }
        polygon
    }

    /// Rectangle with its hook at the bottom-center, which sits at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Polygon::from_points([
            Point2::new(-half, 0.0),
            Point2::new(half, 0.0),
            Point2::new(half, height),
            Point2::new(-half, height),
        ])
    }

    /// Symmetric trapezoid, hooked at the bottom-center at the origin.
    pub fn trapezoid(bottom_width: f64, top_width: f64, height: f64) -> Self {
        let mut shape = Polygon::from_points([
            Point2::new(-bottom_width / 2.0, 0.0),
            Point2::new(bottom_width / 2.0, 0.0),
            Point2::new(top_width / 2.0, height),
            Point2::new(-top_width / 2.0, height),
        ]);
        shape.hook = Point2::new(0.0, 0.0);
        shape
    }

    /// Regular polygon inscribed in a circle, hooked at the center.
    pub fn circle(center: Point2, radius: f64, segments: usize) -> Self {
        let n = segments.max(3);
        let step = std::f64::consts::TAU / n as f64;
        let mut shape = Polygon::from_points(
            (0..n).map(|i| Point2::new(center.x + radius * (step * i as f64).cos(), center.y + radius * (step * i as f64).sin())),
        );
        shape.hook = center;
        shape
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn hook_point(&self) -> Point2 {
        self.hook
    }

    /// Moves the whole shape so its hook lands on `target`.
    pub fn move_hook_to(&mut self, target: Point2) {
        let dx = target.x - self.hook.x;
        let dy = target.y - self.hook.y;
        self.translate(dx, dy);
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
        self.hook.x += dx;
        self.hook.y += dy;
    }

    /// Mirror about the y axis. Vertex order is reversed so the winding
    /// direction is preserved.
    pub fn mirrored_y(&self) -> Polygon {
        let mut points: Vec<Point2> = self.points.iter().map(|p| Point2::new(-p.x, p.y)).collect();
        points.reverse();
        Polygon {
            points,
            hook: Point2::new(-self.hook.x, self.hook.y),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.points.first()?;
        let mut bounds = BoundingBox { min: first, max: first };
        for p in &self.points[1..] {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Point-in-shape test. Points on the boundary are inside.
    pub fn contains(&self, p: Point2) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        if self.edges().any(|(a, b)| point_on_segment(p, a, b)) {
            return true;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) == (b.y > p.y) {
                continue;
            }
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        inside
    }

    /// Shoelace area, positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        0.5 * self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid. Falls back to the vertex average for degenerate shapes.
    pub fn centroid(&self) -> Point2 {
        let area = self.signed_area();
        if area.abs() <= GEOMETRY_TOLERANCE * GEOMETRY_TOLERANCE || self.points.is_empty() {
            let n = self.points.len().max(1) as f64;
            let sx: f64 = self.points.iter().map(|p| p.x).sum();
            let sy: f64 = self.points.iter().map(|p| p.y).sum();
            return Point2::new(sx / n, sy / n);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let cross = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        Point2::new(cx / (6.0 * area), cy / (6.0 * area))
    }

    /// Second moment of area about the global x axis (y = 0).
    pub fn second_moment_about_origin(&self) -> f64 {
        let sum: f64 = self
            .edges()
            .map(|(a, b)| {
                let cross = a.x * b.y - b.x * a.y;
                cross * (a.y * a.y + a.y * b.y + b.y * b.y)
            })
            .sum();
        (sum / 12.0) * self.signed_area().signum()
    }

    /// Second moment of area about the horizontal axis through the centroid.
    pub fn second_moment_x(&self) -> f64 {
        let cy = self.centroid().y;
        self.second_moment_about_origin() - self.area() * cy * cy
    }

    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.edges().map(|(a, b)| (b.x - a.x).hypot(b.y - a.y)).sum()
    }
}

/// Replaces the vertex `corner` (between `prev` and `next`) by an arc of
/// `radius` tangent to both edges, approximated by `segments` chords.
///
/// The tangent distance is clamped to the shorter adjacent edge; the radius
/// shrinks to match. Straight or degenerate corners come back unchanged.
pub fn round_corner(prev: Point2, corner: Point2, next: Point2, radius: f64, segments: usize) -> Vec<Point2> {
    let (ux, uy) = (prev.x - corner.x, prev.y - corner.y);
    let (vx, vy) = (next.x - corner.x, next.y - corner.y);
    let len_in = ux.hypot(uy);
    let len_out = vx.hypot(vy);
    if radius <= GEOMETRY_TOLERANCE || len_in <= GEOMETRY_TOLERANCE || len_out <= GEOMETRY_TOLERANCE {
        return vec![corner];
    }
    let (ux, uy) = (ux / len_in, uy / len_in);
    let (vx, vy) = (vx / len_out, vy / len_out);

    let theta = (ux * vx + uy * vy).clamp(-1.0, 1.0).acos();
    if theta <= GEOMETRY_TOLERANCE || std::f64::consts::PI - theta <= GEOMETRY_TOLERANCE {
        return vec![corner];
    }
    let half = theta / 2.0;

    let tangent = (radius / half.tan()).min(len_in.min(len_out));
    let radius = tangent * half.tan();
    let start = Point2::new(corner.x + ux * tangent, corner.y + uy * tangent);
    let end = Point2::new(corner.x + vx * tangent, corner.y + vy * tangent);

    let (bx, by) = (ux + vx, uy + vy);
    let b_len = bx.hypot(by);
    let offset = radius / half.sin();
    let center = Point2::new(corner.x + bx / b_len * offset, corner.y + by / b_len * offset);

    let a0 = (start.y - center.y).atan2(start.x - center.x);
    let a1 = (end.y - center.y).atan2(end.x - center.x);
    let mut sweep = a1 - a0;
    if sweep > std::f64::consts::PI {
        sweep -= std::f64::consts::TAU;
    } else if sweep < -std::f64::consts::PI {
        sweep += std::f64::consts::TAU;
    }

    let n = segments.max(1);
    (0..=n)
        .map(|i| {
            let a = a0 + sweep * i as f64 / n as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

fn point_on_segment(p: Point2, a: Point2, b: Point2) -> bool {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;
    let ap_x = p.x - a.x;
    let ap_y = p.y - a.y;

    let length = ab_x.hypot(ab_y);
    if length <= GEOMETRY_TOLERANCE {
        return p.near(a);
    }

    // perpendicular distance from the line
    let cross = ab_x * ap_y - ab_y * ap_x;
    if (cross / length).abs() > GEOMETRY_TOLERANCE {
        return false;
    }

    let dot = ap_x * ab_x + ap_y * ab_y;
    dot >= -GEOMETRY_TOLERANCE * length && dot <= length * length + GEOMETRY_TOLERANCE * length
}
