//! Unified error handling for trajectory operations.
//!
//! Empty and singleton trajectories are valid inputs everywhere and never
//! produce an error; errors are reserved for structural problems the
//! algorithms cannot work around (unparseable timestamps, out-of-range
//! coordinates, nonsensical configuration).

use thiserror::Error;

/// Result type alias for trajectory operations.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors that can occur constructing positions or configuring a pass.
#[derive(Debug, Error)]
pub enum TrackError {
    /// A position timestamp could not be parsed.
    #[error("unparseable position timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A coordinate pair is non-finite or outside valid ranges.
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    Coordinate { latitude: f64, longitude: f64 },

    /// A configuration parameter is non-finite or has an impossible sign.
    #[error("invalid configuration: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: f64 },
}

/// Require a strictly positive, finite parameter value.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TrackError::InvalidParameter { parameter, value })
    }
}

/// Require a non-negative, finite parameter value.
pub(crate) fn ensure_non_negative(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TrackError::InvalidParameter { parameter, value })
    }
}
