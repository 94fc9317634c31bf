//! Counting session: the owned per-run context driving the frame pipeline.

mod progress;

pub use progress::FrameProgress;

use tracing::info;

use crate::config::SessionConfig;
use crate::counting::{CountingLine, CountsTable, CrossingEvent, attempt_count};
use crate::error::Result;
use crate::tracker::{
    BlobRegistry, Detection, Frame, ObjectTracker, ReconcileSummary, RegistryConfig, StepSummary,
    TrackerFactory,
};

/// What happened while processing one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Index of the processed frame
    pub frame: u64,
    /// Set on frames where detections were reconciled
    pub reconcile: Option<ReconcileSummary>,
    /// Set on frames advanced by the per-blob trackers
    pub tracker_step: Option<StepSummary>,
    /// Crossings counted on this frame
    pub events: Vec<CrossingEvent>,
}

impl FrameReport {
    pub fn detection_ran(&self) -> bool {
        self.reconcile.is_some()
    }
}

/// Registry, counting lines and counts of one counting run.
///
/// Frames are processed strictly in sequence; each call to
/// [`process_frame`](Self::process_frame) runs matching, registration and
/// counting to completion.
#[derive(Debug)]
pub struct CountingSession<T> {
    registry: BlobRegistry<T>,
    lines: Vec<CountingLine>,
    counts: CountsTable,
    progress: FrameProgress,
    detection_interval: u32,
}

impl<T: ObjectTracker> CountingSession<T> {
    /// Validate `config` and start an empty session.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let lines = config.validate()?;
        Ok(Self::from_parts(
            config.registry_config(),
            lines,
            config.detection_interval,
        ))
    }

    /// Start a session from already validated parts.
    pub fn from_parts(
        registry_config: RegistryConfig,
        lines: Vec<CountingLine>,
        detection_interval: u32,
    ) -> Self {
        info!(
            lines = lines.len(),
            detection_interval,
            max_detection_failures = registry_config.max_detection_failures,
            max_tracking_failures = ?registry_config.max_tracking_failures,
            "counting session started"
        );
        Self {
            registry: BlobRegistry::new(registry_config),
            counts: CountsTable::for_lines(&lines),
            lines,
            progress: FrameProgress::new(),
            detection_interval: detection_interval.max(1),
        }
    }

    pub fn with_progress(mut self, progress: FrameProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Whether the detector should run on the next frame.
    ///
    /// Detection runs on the first frame and then every
    /// `detection_interval` frames.
    pub fn is_detection_frame(&self) -> bool {
        self.progress.processed() % self.detection_interval as u64 == 0
    }

    /// Run the pipeline for one frame.
    ///
    /// With `detections`, blobs are matched, created, retired and
    /// deduplicated; without, each blob advances with its own tracker.
    /// Every blob is then tested against every counting line.
    pub fn process_frame<F>(
        &mut self,
        frame: &Frame<'_>,
        detections: Option<&[Detection]>,
        factory: &F,
    ) -> FrameReport
    where
        F: TrackerFactory<Tracker = T>,
    {
        let frame_index = self.progress.frame();
        let mut report = FrameReport {
            frame: frame_index,
            ..FrameReport::default()
        };

        match detections {
            Some(detections) => {
                let mut summary = self.registry.reconcile(detections, frame, factory);
                summary.duplicates = self.registry.deduplicate();
                report.reconcile = Some(summary);
            }
            None => {
                report.tracker_step = Some(self.registry.step_trackers(frame));
            }
        }

        for blob in self.registry.blobs_mut() {
            let events = attempt_count(blob, &self.lines, &mut self.counts, frame_index);
            report.events.extend(events);
        }

        self.progress.advance();
        report
    }

    pub fn counts(&self) -> &CountsTable {
        &self.counts
    }

    pub fn into_counts(self) -> CountsTable {
        self.counts
    }

    pub fn registry(&self) -> &BlobRegistry<T> {
        &self.registry
    }

    pub fn lines(&self) -> &[CountingLine] {
        &self.lines
    }

    pub fn progress(&self) -> &FrameProgress {
        &self.progress
    }
}
