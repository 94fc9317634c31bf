mod point;
mod rect;
mod segment;

pub use point::Point;
pub use rect::{BoundingBox, overlap_matrix};
pub use segment::{Segment, orientation, segments_intersect};
