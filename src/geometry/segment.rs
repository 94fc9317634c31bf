//! Segment intersection and orientation primitives.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Direction vector `end - start`.
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        self.start.vector_to(&self.end)
    }
}

/// Orientation of the ordered triple (p, q, r).
///
/// Computes `(q - p) x (r - q)` with y pointing down and returns its sign:
/// `1`, `-1`, or `0` for collinear points. Coordinates are widened to f64
/// before multiplying so integral pixel inputs give an exact sign.
pub fn orientation(p: &Point, q: &Point, r: &Point) -> i8 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (qx, qy) = (q.x as f64, q.y as f64);
    let (rx, ry) = (r.x as f64, r.y as f64);

    let val = (qy - py) * (rx - qx) - (qx - px) * (ry - qy);
    if val > 0.0 {
        1
    } else if val < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether `q` lies inside the bounding box spanned by `p` and `r`.
fn within_span(p: &Point, q: &Point, r: &Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Test whether segments `a` and `b` intersect.
///
/// Returns `(true, side)` on intersection, where `side` is the orientation
/// of `a.start` relative to `b` (zero when `a.start` lies on `b`'s line).
/// Returns `(false, 0)` otherwise. Touching and collinear-overlapping
/// configurations count as intersecting.
pub fn segments_intersect(a: &Segment, b: &Segment) -> (bool, i8) {
    let (p1, q1) = (&a.start, &a.end);
    let (p2, q2) = (&b.start, &b.end);

    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return (true, o3);
    }

    let touching = (o1 == 0 && within_span(p1, p2, q1))
        || (o2 == 0 && within_span(p1, q2, q1))
        || (o3 == 0 && within_span(p2, p1, q2))
        || (o4 == 0 && within_span(p2, q1, q2));

    if touching { (true, o3) } else { (false, 0) }
}
