//! A tracked object persisted across frames.

use crate::geometry::{BoundingBox, Point};

/// A tracked object.
///
/// The centroid is always derived from the current box. The set of lines
/// the blob has been credited for only grows.
#[derive(Debug, Clone)]
pub struct Blob<T> {
    /// Unique identifier, never reused within a registry
    pub id: u64,
    /// Current bounding box
    pub bounding_box: BoundingBox,
    /// Box seen by the counting engine on the previous frame
    pub previous_box: Option<BoundingBox>,
    /// Object type label
    pub kind: Option<String>,
    /// Confidence of the type label
    pub kind_confidence: Option<f32>,
    /// Consecutive detection frames without a matching detection
    pub detection_failures: u32,
    /// Consecutive failed tracker steps
    pub tracking_failures: u32,
    /// Per-object tracker advancing the box between detections
    pub tracker: T,
    first_position: Point,
    lines_crossed: Vec<String>,
}

impl<T> Blob<T> {
    pub fn new(
        id: u64,
        bounding_box: BoundingBox,
        kind: Option<String>,
        kind_confidence: Option<f32>,
        tracker: T,
    ) -> Self {
        Self {
            id,
            bounding_box,
            previous_box: None,
            kind,
            kind_confidence,
            detection_failures: 0,
            tracking_failures: 0,
            tracker,
            first_position: bounding_box.centroid(),
            lines_crossed: Vec::new(),
        }
    }

    #[inline]
    pub fn centroid(&self) -> Point {
        self.bounding_box.centroid()
    }

    /// Centroid at the time the blob was created.
    #[inline]
    pub fn first_position(&self) -> Point {
        self.first_position
    }

    /// Labels of the lines this blob has been counted on, in order.
    pub fn lines_crossed(&self) -> &[String] {
        &self.lines_crossed
    }

    pub fn has_crossed_line(&self, label: &str) -> bool {
        self.lines_crossed.iter().any(|l| l == label)
    }

    pub(crate) fn mark_crossed(&mut self, label: &str) {
        if !self.has_crossed_line(label) {
            self.lines_crossed.push(label.to_string());
        }
    }

    /// Apply a matched detection. Absent labels keep the previous values.
    pub fn update(
        &mut self,
        bounding_box: BoundingBox,
        kind: Option<String>,
        kind_confidence: Option<f32>,
    ) {
        self.bounding_box = bounding_box;
        if kind.is_some() {
            self.kind = kind;
        }
        if kind_confidence.is_some() {
            self.kind_confidence = kind_confidence;
        }
    }

    /// Apply a tracker position update; type information is untouched.
    pub fn move_to(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
    }
}
