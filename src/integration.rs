//! Integration module for connecting detection backends with the counter.
//!
//! This module provides the detector trait and a pipeline that runs the
//! detector on detection frames and lets per-blob trackers carry objects
//! in between.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::CountingPipeline;
