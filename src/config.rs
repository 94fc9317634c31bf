//! Session configuration, loaded from JSON and validated before the first frame.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::counting::{Basis, CountingLine, Direction, Selector};
use crate::error::{ConfigError, Result};
use crate::geometry::Point;
use crate::tracker::{MatchStrategy, RegistryConfig};

/// A counting line as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingLineConfig {
    pub label: String,
    /// Endpoints `[[x1, y1], [x2, y2]]`
    pub line: [[f32; 2]; 2],
    /// `none`, `left` or `right`
    #[serde(default)]
    pub direction: Option<String>,
    /// Edge name (touch mode) or corner/centroid name (cross mode)
    #[serde(default, alias = "lookfor")]
    pub selector: Option<String>,
    /// `first` or `previous`
    #[serde(default)]
    pub basis: Option<String>,
    /// Minimum displacement from the first detected position
    #[serde(default)]
    pub mindist: Option<f32>,
}

fn expected(names: &[&str]) -> String {
    format!("one of {}", names.join(", "))
}

impl CountingLineConfig {
    pub fn new(label: impl Into<String>, start: [f32; 2], end: [f32; 2]) -> Self {
        Self {
            label: label.into(),
            line: [start, end],
            direction: None,
            selector: None,
            basis: None,
            mindist: None,
        }
    }

    /// Check every field and build the counting line.
    pub fn validate(&self) -> Result<CountingLine> {
        let label = self.label.as_str();

        let direction = match self.direction.as_deref() {
            None => Direction::default(),
            Some(name) => Direction::from_name(name).ok_or_else(|| {
                ConfigError::invalid_field(label, "direction", name, expected(Direction::NAMES))
            })?,
        };

        let selector = match self.selector.as_deref() {
            None => Selector::default(),
            Some(name) => Selector::from_name(name).ok_or_else(|| {
                ConfigError::invalid_field(label, "selector", name, expected(Selector::NAMES))
            })?,
        };

        let basis = match self.basis.as_deref() {
            None => Basis::default(),
            Some(name) => Basis::from_name(name).ok_or_else(|| {
                ConfigError::invalid_field(label, "basis", name, expected(Basis::NAMES))
            })?,
        };

        let [start, end] = self.line;
        if start.iter().chain(end.iter()).any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid_field(
                label,
                "line",
                format!("{:?}", self.line),
                "finite coordinates",
            ));
        }
        if start == end {
            return Err(ConfigError::invalid_field(
                label,
                "line",
                format!("{:?}", self.line),
                "two distinct endpoints",
            ));
        }

        let mut line = CountingLine::new(label, Point::from(start), Point::from(end))
            .with_direction(direction)
            .with_selector(selector)
            .with_basis(basis);

        if let Some(mindist) = self.mindist {
            if !mindist.is_finite() || mindist < 0.0 {
                return Err(ConfigError::invalid_field(
                    label,
                    "mindist",
                    mindist,
                    "a finite, non-negative distance",
                ));
            }
            line = line.with_min_displacement(mindist);
        }

        Ok(line)
    }
}

/// Settings for one counting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run the detector every `detection_interval` frames
    pub detection_interval: u32,
    /// Consecutive unmatched detection frames a blob survives
    pub max_detection_failures: u32,
    /// Consecutive failed tracker steps a blob survives
    pub max_tracking_failures: Option<u32>,
    pub match_threshold: f32,
    pub duplicate_threshold: f32,
    pub match_strategy: MatchStrategy,
    pub counting_lines: Vec<CountingLineConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let registry = RegistryConfig::default();
        Self {
            detection_interval: 1,
            max_detection_failures: registry.max_detection_failures,
            max_tracking_failures: registry.max_tracking_failures,
            match_threshold: registry.match_threshold,
            duplicate_threshold: registry.duplicate_threshold,
            match_strategy: registry.match_strategy,
            counting_lines: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate all settings and return the counting lines in configured order.
    pub fn validate(&self) -> Result<Vec<CountingLine>> {
        if self.detection_interval == 0 {
            return Err(ConfigError::invalid_parameter(
                "detection_interval",
                self.detection_interval,
            ));
        }
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("duplicate_threshold", self.duplicate_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::invalid_parameter(name, value));
            }
        }

        let mut labels = HashSet::with_capacity(self.counting_lines.len());
        let mut lines = Vec::with_capacity(self.counting_lines.len());
        for (idx, line_config) in self.counting_lines.iter().enumerate() {
            if line_config.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel(idx));
            }
            if !labels.insert(line_config.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(line_config.label.clone()));
            }
            lines.push(line_config.validate()?);
        }
        Ok(lines)
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            max_detection_failures: self.max_detection_failures,
            max_tracking_failures: self.max_tracking_failures,
            match_threshold: self.match_threshold,
            duplicate_threshold: self.duplicate_threshold,
            match_strategy: self.match_strategy,
        }
    }
}
