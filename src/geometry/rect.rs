use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Segment};

/// Axis-aligned bounding box with format conversion utilities.
///
/// Stored as TLWH (top-left x, top-left y, width, height). Conversions:
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYAH: Center X, Center Y, Aspect Ratio (w/h), Height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl BoundingBox {
    /// Create a box from top-left coordinates and dimensions (TLWH format).
    ///
    /// Negative dimensions are clamped to zero.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Create a box from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Create a box from XYAH format (center x, center y, aspect ratio, height).
    #[inline]
    pub fn from_xyah(cx: f32, cy: f32, aspect_ratio: f32, height: f32) -> Self {
        let width = aspect_ratio * height;
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Convert to XYAH format: (center_x, center_y, aspect_ratio, height).
    #[inline]
    pub fn to_xyah(&self) -> [f32; 4] {
        let c = self.centroid();
        let aspect_ratio = if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        };
        [c.x, c.y, aspect_ratio, self.height]
    }

    /// Geometric center of the box.
    #[inline]
    pub fn centroid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.x + self.width, self.y)
    }

    #[inline]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.y + self.height)
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn top_edge(&self) -> Segment {
        Segment::new(self.top_left(), self.top_right())
    }

    pub fn right_edge(&self) -> Segment {
        Segment::new(self.top_right(), self.bottom_right())
    }

    pub fn left_edge(&self) -> Segment {
        Segment::new(self.top_left(), self.bottom_left())
    }

    pub fn bottom_edge(&self) -> Segment {
        Segment::new(self.bottom_left(), self.bottom_right())
    }

    /// All four edges in top, right, left, bottom order.
    pub fn edges(&self) -> [Segment; 4] {
        [
            self.top_edge(),
            self.right_edge(),
            self.left_edge(),
            self.bottom_edge(),
        ]
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn overlap_matrix(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> Array2<f32> {
    let mut overlaps = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            overlaps[[i, j]] = a.iou(b);
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_conversions() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);

        assert_eq!(bbox.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(bbox.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);

        let xyah = bbox.to_xyah();
        assert_eq!(xyah[0], 25.0);
        assert_eq!(xyah[1], 40.0);
        assert!((xyah[2] - 0.75).abs() < 1e-6);
        assert_eq!(xyah[3], 40.0);
    }

    #[test]
    fn test_from_xyah() {
        let bbox = BoundingBox::from_xyah(25.0, 40.0, 0.75, 40.0);
        assert!((bbox.x - 10.0).abs() < 1e-6);
        assert!((bbox.y - 20.0).abs() < 1e-6);
        assert!((bbox.width - 30.0).abs() < 1e-6);
        assert!((bbox.height - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_dimensions_clamped() {
        let bbox = BoundingBox::from_tlbr(10.0, 10.0, 5.0, 20.0);
        assert_eq!(bbox.width, 0.0);
        assert_eq!(bbox.height, 10.0);
    }

    #[test]
    fn test_centroid_and_corners() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(bbox.centroid(), Point::new(5.0, 10.0));
        assert_eq!(bbox.top_right(), Point::new(10.0, 0.0));
        assert_eq!(bbox.bottom_left(), Point::new(0.0, 20.0));
        assert_eq!(bbox.bottom_edge(), Segment::new((0.0, 20.0).into(), (10.0, 20.0).into()));
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);

        // Intersection: 5x5 = 25, union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_degenerate() {
        let a = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn test_overlap_matrix_shape() {
        let a = [BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
        let b = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(50.0, 50.0, 10.0, 10.0),
        ];
        let m = overlap_matrix(&a, &b);
        assert_eq!(m.dim(), (1, 2));
        assert!((m[[0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(m[[0, 1]], 0.0);
    }
}
