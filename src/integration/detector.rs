//! Trait for object detection inference backends.

use crate::tracker::{Detection, Frame};

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the counter.
///
/// # Example
///
/// ```ignore
/// use linecount_rs::{DetectionSource, Detection, Frame};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame<'_>) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return labelled boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on a frame and return detections with type labels
    /// and confidences where the model provides them.
    fn detect(&mut self, frame: &Frame<'_>) -> Result<Vec<Detection>, Self::Error>;
}
