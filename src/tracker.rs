mod blob;
mod kalman_filter;
mod matching;
mod motion_tracker;
mod object_tracker;
mod registry;

pub use blob::Blob;
pub use kalman_filter::{KalmanFilter, KalmanState};
pub use matching::{Assignment, Detection, MatchStrategy, match_detections, score_matrix};
pub use motion_tracker::{MotionTracker, MotionTrackerFactory};
pub use object_tracker::{Frame, ObjectTracker, TrackStep, TrackerFactory};
pub use registry::{BlobRegistry, ReconcileSummary, RegistryConfig, StepSummary};
