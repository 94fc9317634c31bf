//! Blob lifecycle: creation, update, retirement and duplicate suppression.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::tracker::blob::Blob;
use crate::tracker::matching::{Detection, MatchStrategy, match_detections};
use crate::tracker::object_tracker::{Frame, ObjectTracker, TrackStep, TrackerFactory};

/// Configuration for the [`BlobRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Consecutive unmatched detection frames a blob survives
    pub max_detection_failures: u32,
    /// Consecutive failed tracker steps a blob survives, unlimited if unset
    pub max_tracking_failures: Option<u32>,
    /// Minimum overlap for a detection to match a blob
    pub match_threshold: f32,
    /// Overlap at which two blobs are considered the same object
    pub duplicate_threshold: f32,
    pub match_strategy: MatchStrategy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_detection_failures: 3,
            max_tracking_failures: None,
            match_threshold: 0.4,
            duplicate_threshold: 0.6,
            match_strategy: MatchStrategy::Greedy,
        }
    }
}

/// Blob ids touched while applying one frame of detections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub updated: Vec<u64>,
    pub created: Vec<u64>,
    pub retired: Vec<u64>,
    /// Left empty by [`BlobRegistry::reconcile`]; filled with the result of
    /// [`BlobRegistry::deduplicate`] by the counting session.
    pub duplicates: Vec<u64>,
}

/// Outcome of one tracker step over all blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub moved: usize,
    pub lost: usize,
    pub retired: Vec<u64>,
}

/// Owns every tracked blob of a counting session.
#[derive(Debug, Clone)]
pub struct BlobRegistry<T> {
    blobs: BTreeMap<u64, Blob<T>>,
    next_id: u64,
    config: RegistryConfig,
}

impl<T> BlobRegistry<T> {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            blobs: BTreeMap::new(),
            next_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Blob<T>> {
        self.blobs.get(&id)
    }

    /// Blobs in ascending id order.
    pub fn blobs(&self) -> impl Iterator<Item = &Blob<T>> {
        self.blobs.values()
    }

    pub fn blobs_mut(&mut self) -> impl Iterator<Item = &mut Blob<T>> {
        self.blobs.values_mut()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.blobs.keys().copied().collect()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a blob for an unmatched detection and return its id.
    pub fn create(&mut self, detection: &Detection, tracker: T) -> u64 {
        let id = self.next_id();
        let blob = Blob::new(
            id,
            detection.bbox,
            detection.kind.clone(),
            detection.confidence,
            tracker,
        );
        debug!(
            object_id = id,
            bbox = ?blob.bounding_box,
            kind = ?blob.kind,
            kind_confidence = ?blob.kind_confidence,
            "blob created"
        );
        self.blobs.insert(id, blob);
        id
    }

    /// Remove blobs that overlap an older surviving blob.
    ///
    /// Blobs are visited in ascending id order and a blob is dropped when
    /// its overlap with any earlier survivor reaches the duplicate
    /// threshold, so the oldest blob of a cluster wins. Returns the ids
    /// removed.
    pub fn deduplicate(&mut self) -> Vec<u64> {
        let threshold = self.config.duplicate_threshold;
        let mut survivors: Vec<&Blob<T>> = Vec::with_capacity(self.blobs.len());
        let mut duplicates = Vec::new();

        for blob in self.blobs.values() {
            let duplicate_of = survivors
                .iter()
                .find(|kept| kept.bounding_box.iou(&blob.bounding_box) >= threshold)
                .map(|kept| kept.id);
            match duplicate_of {
                Some(kept) => {
                    debug!(object_id = blob.id, duplicate_of = kept, "duplicate blob removed");
                    duplicates.push(blob.id);
                }
                None => survivors.push(blob),
            }
        }

        for id in &duplicates {
            self.blobs.remove(id);
        }
        duplicates
    }

    /// Remove blobs whose tracker has failed too many frames in a row.
    pub fn retire_lost_tracks(&mut self) -> Vec<u64> {
        let Some(limit) = self.config.max_tracking_failures else {
            return Vec::new();
        };
        self.retire_where(|blob| blob.tracking_failures > limit, "tracking lost")
    }

    fn retire_where(&mut self, mut predicate: impl FnMut(&Blob<T>) -> bool, reason: &str) -> Vec<u64> {
        let retired: Vec<u64> = self
            .blobs
            .values()
            .filter(|blob| predicate(blob))
            .map(|blob| blob.id)
            .collect();
        for id in &retired {
            self.blobs.remove(id);
            debug!(object_id = id, reason, "blob retired");
        }
        retired
    }
}

impl<T: ObjectTracker> BlobRegistry<T> {
    /// Apply one frame of detections.
    ///
    /// Matched blobs take the detection's box and labels and re-anchor their
    /// tracker; unmatched detections become new blobs; blobs without a
    /// match accumulate a detection failure and are retired once the count
    /// exceeds `max_detection_failures`.
    pub fn reconcile<F>(
        &mut self,
        detections: &[Detection],
        frame: &Frame<'_>,
        factory: &F,
    ) -> ReconcileSummary
    where
        F: TrackerFactory<Tracker = T>,
    {
        let assignment = {
            let blobs: Vec<&Blob<T>> = self.blobs.values().collect();
            match_detections(
                detections,
                &blobs,
                self.config.match_threshold,
                self.config.match_strategy,
            )
        };

        let mut summary = ReconcileSummary::default();
        let mut matched: HashSet<u64> = HashSet::with_capacity(assignment.matches.len());

        for &(det_idx, id) in &assignment.matches {
            let Some(blob) = self.blobs.get_mut(&id) else {
                continue;
            };
            let detection = &detections[det_idx];
            blob.detection_failures = 0;
            blob.update(detection.bbox, detection.kind.clone(), detection.confidence);
            blob.tracker.correct(&detection.bbox, frame);
            debug!(
                object_id = id,
                bbox = ?blob.bounding_box,
                kind = ?blob.kind,
                kind_confidence = ?blob.kind_confidence,
                "blob updated"
            );
            matched.insert(id);
            summary.updated.push(id);
        }

        for &det_idx in &assignment.unmatched_detections {
            let detection = &detections[det_idx];
            let tracker = factory.create(&detection.bbox, frame);
            let id = self.create(detection, tracker);
            matched.insert(id);
            summary.created.push(id);
        }

        for blob in self.blobs.values_mut() {
            if !matched.contains(&blob.id) {
                blob.detection_failures += 1;
            }
        }
        let limit = self.config.max_detection_failures;
        summary.retired = self.retire_where(|blob| blob.detection_failures > limit, "not detected");

        summary
    }

    /// Advance every blob with its own tracker on a frame without detections.
    ///
    /// A successful step moves the blob and clears its tracking failures; a
    /// failed one leaves the box in place and increments the counter.
    /// Blobs past `max_tracking_failures` are retired afterwards.
    pub fn step_trackers(&mut self, frame: &Frame<'_>) -> StepSummary {
        let mut summary = StepSummary::default();
        for blob in self.blobs.values_mut() {
            match blob.tracker.step(frame) {
                TrackStep::Moved(bbox) => {
                    blob.tracking_failures = 0;
                    blob.move_to(bbox);
                    summary.moved += 1;
                    debug!(
                        object_id = blob.id,
                        bbox = ?blob.bounding_box,
                        centroid = ?blob.centroid(),
                        "object tracker updated"
                    );
                }
                TrackStep::Lost => {
                    blob.tracking_failures += 1;
                    summary.lost += 1;
                }
            }
        }
        summary.retired = self.retire_lost_tracks();
        summary
    }
}
