use crate::geometry::{Point, Segment};

/// Which crossing direction a line credits.
///
/// Left and right are seen from an observer standing on the line's first
/// point and facing the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Any crossing counts.
    #[default]
    None,
    Left,
    Right,
}

impl Direction {
    pub const NAMES: &'static [&'static str] = &["none", "left", "right"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// `+1` for left, `-1` for right, `0` when unfiltered.
    pub fn sign(&self) -> i8 {
        match self {
            Self::None => 0,
            Self::Left => 1,
            Self::Right => -1,
        }
    }

    pub fn is_filtered(&self) -> bool {
        *self != Self::None
    }
}

/// How a blob is turned into candidate segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector {
    /// Left edge of the current box.
    Left,
    /// Right edge of the current box.
    Right,
    /// Top edge of the current box.
    Top,
    /// Bottom edge of the current box.
    Bottom,
    /// All four edges of the current box.
    #[default]
    Box,
    /// Motion of the top-left corner.
    TopLeft,
    /// Motion of the top-right corner.
    TopRight,
    /// Motion of the bottom-left corner.
    BottomLeft,
    /// Motion of the bottom-right corner.
    BottomRight,
    /// Motion of the centroid.
    Centroid,
    /// Motion of all four corners.
    Corners,
}

impl Selector {
    pub const NAMES: &'static [&'static str] = &[
        "left", "right", "top", "bottom", "box", "tl", "tr", "bl", "br", "cc", "corners",
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let selector = match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "box" => Self::Box,
            "tl" => Self::TopLeft,
            "tr" => Self::TopRight,
            "bl" => Self::BottomLeft,
            "br" => Self::BottomRight,
            "cc" => Self::Centroid,
            "corners" => Self::Corners,
            _ => return None,
        };
        Some(selector)
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Left | Self::Right | Self::Top | Self::Bottom | Self::Box => Mode::Touch,
            Self::TopLeft
            | Self::TopRight
            | Self::BottomLeft
            | Self::BottomRight
            | Self::Centroid
            | Self::Corners => Mode::Cross,
        }
    }
}

/// Crossing test family, derived from the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Edges of the current box against the line.
    Touch,
    /// Motion segments between the previous and current box against the line.
    Cross,
}

/// Reference used to measure the direction of motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Basis {
    /// From the first detected position to the current centroid.
    #[default]
    First,
    /// From the previous frame to the current one.
    Previous,
}

impl Basis {
    pub const NAMES: &'static [&'static str] = &["first", "previous"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "first" => Some(Self::First),
            "previous" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// A validated counting line.
#[derive(Debug, Clone, PartialEq)]
pub struct CountingLine {
    pub label: String,
    pub segment: Segment,
    pub direction: Direction,
    pub selector: Selector,
    pub basis: Basis,
    /// Minimum distance between the first detected position and the
    /// current centroid before the line is evaluated.
    pub min_displacement: Option<f32>,
}

impl CountingLine {
    pub fn new(label: impl Into<String>, start: Point, end: Point) -> Self {
        Self {
            label: label.into(),
            segment: Segment::new(start, end),
            direction: Direction::default(),
            selector: Selector::default(),
            basis: Basis::default(),
            min_displacement: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_min_displacement(mut self, min_displacement: f32) -> Self {
        self.min_displacement = Some(min_displacement);
        self
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.selector.mode()
    }

    /// Squared displacement threshold, if one is configured.
    pub fn min_displacement_squared(&self) -> Option<f64> {
        self.min_displacement.map(|d| (d as f64) * (d as f64))
    }
}
