//! CountingPipeline for combining detection with tracking and counting.

use crate::config::SessionConfig;
use crate::counting::CountsTable;
use crate::error::Result;
use crate::session::{CountingSession, FrameReport};
use crate::tracker::{Frame, TrackerFactory};

use super::DetectionSource;

/// Bundles a detector, a tracker factory and a counting session.
///
/// The detector only runs on detection frames; on the frames in between
/// every blob is advanced by the tracker the factory created for it.
pub struct CountingPipeline<D: DetectionSource, K: TrackerFactory> {
    detector: D,
    factory: K,
    session: CountingSession<K::Tracker>,
}

impl<D: DetectionSource, K: TrackerFactory> CountingPipeline<D, K> {
    /// Create a pipeline from a validated configuration.
    pub fn new(detector: D, factory: K, config: &SessionConfig) -> Result<Self> {
        Ok(Self {
            detector,
            factory,
            session: CountingSession::new(config)?,
        })
    }

    /// Process a single frame.
    ///
    /// Returns what the session did with the frame, or the detector's error.
    /// A detector error leaves the session untouched.
    pub fn process_frame(&mut self, frame: &Frame<'_>) -> std::result::Result<FrameReport, D::Error> {
        let detections = if self.session.is_detection_frame() {
            Some(self.detector.detect(frame)?)
        } else {
            None
        };
        Ok(self
            .session
            .process_frame(frame, detections.as_deref(), &self.factory))
    }

    pub fn counts(&self) -> &CountsTable {
        self.session.counts()
    }

    /// Get a reference to the underlying session.
    pub fn session(&self) -> &CountingSession<K::Tracker> {
        &self.session
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Finish the run and return the final counts.
    pub fn finish(self) -> CountsTable {
        self.session.into_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountingLineConfig;
    use crate::geometry::BoundingBox;
    use crate::tracker::{Detection, MotionTrackerFactory};

    /// Replays one scripted detection list per call.
    struct MockDetector {
        frames: Vec<Vec<Detection>>,
        calls: usize,
    }

    impl DetectionSource for MockDetector {
        type Error = String;

        fn detect(&mut self, _frame: &Frame<'_>) -> std::result::Result<Vec<Detection>, Self::Error> {
            let dets = self
                .frames
                .get(self.calls)
                .cloned()
                .ok_or_else(|| "detector exhausted".to_string())?;
            self.calls += 1;
            Ok(dets)
        }
    }

    #[test]
    fn test_counting_pipeline() {
        let detector = MockDetector {
            frames: vec![
                vec![Detection::labeled(BoundingBox::new(4.0, 0.0, 10.0, 10.0), "car", 0.9)],
                vec![Detection::labeled(BoundingBox::new(6.0, 0.0, 10.0, 10.0), "car", 0.9)],
            ],
            calls: 0,
        };
        let config = SessionConfig {
            detection_interval: 2,
            counting_lines: vec![CountingLineConfig::new("gate", [15.0, -5.0], [15.0, 25.0])],
            ..SessionConfig::default()
        };
        let mut pipeline =
            CountingPipeline::new(detector, MotionTrackerFactory::new(), &config).unwrap();
        let frame = Frame::new(&[], 640, 480);

        for _ in 0..3 {
            pipeline.process_frame(&frame).unwrap();
        }
        assert_eq!(pipeline.detector().calls, 2);
        assert_eq!(pipeline.counts().get("gate", "car"), 1);

        // Frame 3 is tracker-only, frame 4 would need a third detection.
        pipeline.process_frame(&frame).unwrap();
        assert!(pipeline.process_frame(&frame).is_err());
        assert_eq!(pipeline.finish().line_total("gate"), 1);
    }
}
