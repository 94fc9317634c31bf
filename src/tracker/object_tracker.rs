//! Per-object tracker capability.
//!
//! A blob owns one tracker that advances its box on frames where the
//! detector does not run. Correlation-filter trackers, motion models or
//! re-detection schemes all fit behind [`ObjectTracker`].

use crate::geometry::BoundingBox;

/// A decoded video frame handed to detectors and trackers.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Raw pixel bytes, layout defined by the producer
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// Result of advancing a tracker by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackStep {
    /// The object was located at the given box.
    Moved(BoundingBox),
    /// The tracker lost the object this frame.
    Lost,
}

pub trait ObjectTracker {
    /// Re-anchor the tracker on a fresh detection of its object.
    fn correct(&mut self, bbox: &BoundingBox, frame: &Frame<'_>);

    /// Advance one frame without a detection.
    fn step(&mut self, frame: &Frame<'_>) -> TrackStep;
}

impl<T: ObjectTracker + ?Sized> ObjectTracker for Box<T> {
    fn correct(&mut self, bbox: &BoundingBox, frame: &Frame<'_>) {
        (**self).correct(bbox, frame)
    }

    fn step(&mut self, frame: &Frame<'_>) -> TrackStep {
        (**self).step(frame)
    }
}

/// Creates a tracker for a newly detected object.
pub trait TrackerFactory {
    type Tracker: ObjectTracker;

    fn create(&self, bbox: &BoundingBox, frame: &Frame<'_>) -> Self::Tracker;
}

impl<F, T> TrackerFactory for F
where
    F: Fn(&BoundingBox, &Frame<'_>) -> T,
    T: ObjectTracker,
{
    type Tracker = T;

    fn create(&self, bbox: &BoundingBox, frame: &Frame<'_>) -> T {
        self(bbox, frame)
    }
}
