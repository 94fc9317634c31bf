//! Error types for session configuration.

use thiserror::Error;

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that reject a configuration before the first frame
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("counting line `{line}`: invalid {field} `{value}` (expected {expected})")]
    InvalidField {
        line: String,
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("duplicate counting line label `{0}`")]
    DuplicateLabel(String),

    #[error("counting line #{0} has an empty label")]
    EmptyLabel(usize),

    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid_field(
        line: impl Into<String>,
        field: &'static str,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            line: line.into(),
            field,
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub fn invalid_parameter(name: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}
