//! Frame-agnostic tracker that extrapolates boxes with a Kalman motion model.

use tracing::trace;

use crate::geometry::BoundingBox;
use crate::tracker::kalman_filter::{KalmanFilter, KalmanState};
use crate::tracker::object_tracker::{Frame, ObjectTracker, TrackStep, TrackerFactory};

/// Tracks a single object by predicting its box from past detections.
///
/// Pixel data is ignored, so this tracker fits pipelines where the visual
/// tracker is unavailable or too slow. Each call to `correct` or `step`
/// advances the filter by one frame.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    kalman_filter: KalmanFilter,
    state: KalmanState,
    /// Consecutive frames predicted without a correction
    coasted: u32,
    max_coast: Option<u32>,
}

impl MotionTracker {
    pub fn new(kalman_filter: KalmanFilter, bbox: &BoundingBox) -> Self {
        let state = kalman_filter.initiate(bbox);
        Self {
            kalman_filter,
            state,
            coasted: 0,
            max_coast: None,
        }
    }

    /// Report the object as lost once it coasts for more than `frames` steps.
    pub fn with_max_coast(mut self, frames: u32) -> Self {
        self.max_coast = Some(frames);
        self
    }

    /// Current estimate of the object's box.
    pub fn bounding_box(&self) -> BoundingBox {
        self.state.bounding_box()
    }

    fn predict(&mut self) {
        self.state = self.kalman_filter.predict(&self.state);
    }
}

impl ObjectTracker for MotionTracker {
    fn correct(&mut self, bbox: &BoundingBox, _frame: &Frame<'_>) {
        self.predict();
        self.state = match self.kalman_filter.update(&self.state, bbox) {
            Some(state) => state,
            None => self.kalman_filter.initiate(bbox),
        };
        self.coasted = 0;
    }

    fn step(&mut self, _frame: &Frame<'_>) -> TrackStep {
        self.predict();
        self.coasted += 1;

        if self.max_coast.is_some_and(|max| self.coasted > max) {
            return TrackStep::Lost;
        }

        let bbox = self.bounding_box();
        let finite = bbox.to_tlwh().iter().all(|v| v.is_finite());
        if !finite || bbox.height <= 0.0 || bbox.width <= 0.0 {
            trace!(coasted = self.coasted, "motion estimate degenerate");
            return TrackStep::Lost;
        }
        TrackStep::Moved(bbox)
    }
}

/// Creates [`MotionTracker`]s sharing one filter configuration.
#[derive(Debug, Clone, Default)]
pub struct MotionTrackerFactory {
    kalman_filter: KalmanFilter,
    max_coast: Option<u32>,
}

impl MotionTrackerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_coast(mut self, frames: u32) -> Self {
        self.max_coast = Some(frames);
        self
    }
}

impl TrackerFactory for MotionTrackerFactory {
    type Tracker = MotionTracker;

    fn create(&self, bbox: &BoundingBox, _frame: &Frame<'_>) -> MotionTracker {
        let tracker = MotionTracker::new(self.kalman_filter.clone(), bbox);
        match self.max_coast {
            Some(frames) => tracker.with_max_coast(frames),
            None => tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Frame<'static> = Frame {
        data: &[],
        width: 640,
        height: 480,
    };

    #[test]
    fn test_stationary_object_stays_put() {
        let bbox = BoundingBox::new(100.0, 100.0, 40.0, 20.0);
        let mut tracker = MotionTrackerFactory::new().create(&bbox, &FRAME);
        match tracker.step(&FRAME) {
            TrackStep::Moved(next) => {
                assert!((next.x - 100.0).abs() < 1e-3);
                assert!((next.width - 40.0).abs() < 1e-3);
            }
            TrackStep::Lost => panic!("stationary track lost"),
        }
    }

    #[test]
    fn test_extrapolates_motion() {
        let mut bbox = BoundingBox::new(0.0, 100.0, 40.0, 40.0);
        let mut tracker = MotionTrackerFactory::new().create(&bbox, &FRAME);
        for _ in 0..10 {
            bbox.x += 10.0;
            tracker.correct(&bbox, &FRAME);
        }
        let before = tracker.bounding_box();
        assert!(before.x > 50.0);
        let TrackStep::Moved(next) = tracker.step(&FRAME) else {
            panic!("moving track lost");
        };
        assert!(next.x > before.x, "expected {} > {}", next.x, before.x);
    }

    #[test]
    fn test_max_coast() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let mut tracker = MotionTrackerFactory::new()
            .with_max_coast(2)
            .create(&bbox, &FRAME);
        assert!(matches!(tracker.step(&FRAME), TrackStep::Moved(_)));
        assert!(matches!(tracker.step(&FRAME), TrackStep::Moved(_)));
        assert_eq!(tracker.step(&FRAME), TrackStep::Lost);

        tracker.correct(&bbox, &FRAME);
        assert!(matches!(tracker.step(&FRAME), TrackStep::Moved(_)));
    }
}
