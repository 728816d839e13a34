//! Configuration error types
//!
//! The simulation itself never fails once configured; everything that can go
//! wrong is caught when a [`crate::SimConfig`] is loaded or validated.

use std::fmt;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive (and finite) was not
    NonPositive { name: &'static str, value: f64 },
    /// A `[min, max]` pair is inverted or otherwise unusable
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    /// A value fell outside its allowed interval
    OutOfRange {
        name: &'static str,
        value: f64,
        allowed: &'static str,
    },
    /// JSON could not be decoded
    Parse(String),
    /// Config file could not be read
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { name, value } => {
                write!(f, "'{name}' must be positive and finite, got {value}")
            }
            Self::InvalidRange { name, min, max } => {
                write!(f, "'{name}' range is invalid: min={min}, max={max}")
            }
            Self::OutOfRange {
                name,
                value,
                allowed,
            } => write!(f, "'{name}' = {value} is outside allowed range {allowed}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(msg) => write!(f, "config read error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
