use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A position in image coordinates (x grows right, y grows down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`, widened to f64.
    #[inline]
    pub fn vector_to(&self, other: &Point) -> Vector2<f64> {
        Vector2::new(
            other.x as f64 - self.x as f64,
            other.y as f64 - self.y as f64,
        )
    }

    /// Squared euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        self.vector_to(other).norm_squared()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
