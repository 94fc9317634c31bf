//! Object tracking and directional line-crossing counting.
//!
//! Detections from an external detector are associated with tracked blobs
//! frame by frame, and every blob is tested against a set of configured
//! counting lines. Each blob is credited at most once per line.

pub mod config;
pub mod counting;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod session;
pub mod tracker;

pub use config::{CountingLineConfig, SessionConfig};
pub use counting::{
    Basis, CountingLine, CountsTable, CrossingEvent, Direction, Mode, Selector, attempt_count,
};
pub use error::{ConfigError, Result};
pub use geometry::{BoundingBox, Point, Segment, segments_intersect};
pub use integration::{CountingPipeline, DetectionBuilder, DetectionSource};
pub use session::{CountingSession, FrameProgress, FrameReport};
pub use tracker::{
    Blob, BlobRegistry, Detection, Frame, MatchStrategy, MotionTracker, MotionTrackerFactory,
    ObjectTracker, TrackStep, TrackerFactory,
};
