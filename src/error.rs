use thiserror::Error;

use crate::coordinates::CoordinatesError;
use crate::parameters::{ParameterError, RangeError, SerializationError};

/// A string that is not one of the values an enumerated setting accepts.
///
/// Returned by the `FromStr` implementations of every configuration enum
/// (orientations, origin, memory order, likelihood type, profile kind).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} '{value}' is not supported; expected one of {allowed:?}")]
pub struct InvalidChoice {
    /// What was being parsed, e.g. "RA orientation"
    pub kind: &'static str,

    /// The rejected input
    pub value: String,

    /// The accepted spellings
    pub allowed: &'static [&'static str],
}

impl InvalidChoice {
    pub(crate) fn new(kind: &'static str, value: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            allowed,
        }
    }
}

/// Error types for the lensmodel-api library.
#[derive(Error, Debug)]
pub enum LensModelError {
    /// An enumerated string outside its allowed set.
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoice),

    /// Invalid definition range.
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Parameter validation or state error.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Coordinate convention or instrument error.
    #[error("Coordinates error: {0}")]
    Coordinates(#[from] CoordinatesError),

    /// Saving or loading a parameter list failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for lensmodel-api operations.
pub type Result<T> = std::result::Result<T, LensModelError>;
