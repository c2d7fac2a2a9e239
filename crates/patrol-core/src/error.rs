//! Error types for map view configuration.

use thiserror::Error;

/// Errors raised while building or validating a [`crate::MapViewConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A period or delay that drives a timer was zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// A float field was NaN, infinite or negative.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },

    /// A coordinate fell outside lat [-90, 90] / lng [-180, 180].
    #[error("{field} is not a valid coordinate: {lat}, {lng}")]
    InvalidCoordinate {
        field: &'static str,
        lat: f64,
        lng: f64,
    },

    /// An environment override was set but could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    /// Creates an error for an unparseable override.
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
