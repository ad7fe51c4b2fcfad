//! Definition range implementation
//!
//! This module provides the inclusive numeric bounds a parameter value has to
//! satisfy. Either side may be left open, in which case no constraint applies
//! on that side.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with definition ranges
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid definition range: min ({min}) must not exceed max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Definition range bound must be a number, got NaN")]
    NanBound,
}

/// Which side of a [`DefinitionRange`] a value violates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeViolation {
    /// The value is smaller than `min_value`
    BelowMin,

    /// The value is larger than `max_value`
    AboveMax,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeViolation::BelowMin => write!(f, "smaller than"),
            RangeViolation::AboveMax => write!(f, "larger than"),
        }
    }
}

/// Inclusive bounds on a parameter value
///
/// A missing bound is serialized as `null`, matching how lens model
/// descriptions are usually written by hand. Deserialization goes through
/// [`DefinitionRange::new`], so a stored range with `min > max` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub struct DefinitionRange {
    /// Lower bound, if any
    pub min_value: Option<f64>,

    /// Upper bound, if any
    pub max_value: Option<f64>,
}

#[derive(Deserialize)]
struct RangeRepr {
    #[serde(default)]
    min_value: Option<f64>,

    #[serde(default)]
    max_value: Option<f64>,
}

impl TryFrom<RangeRepr> for DefinitionRange {
    type Error = RangeError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        DefinitionRange::new(repr.min_value, repr.max_value)
    }
}

impl DefinitionRange {
    /// Create a new definition range
    ///
    /// # Arguments
    ///
    /// * `min_value` - Lower bound, or `None` for no lower bound
    /// * `max_value` - Upper bound, or `None` for no upper bound
    ///
    /// # Returns
    ///
    /// A new `DefinitionRange` if both bounds are numbers and `min <= max`,
    /// or an error otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::range::DefinitionRange;
    ///
    /// let range = DefinitionRange::new(Some(0.0), Some(10.0)).unwrap();
    /// assert!(range.contains(10.0));
    /// assert!(!range.contains(10.5));
    ///
    /// assert!(DefinitionRange::new(Some(1.0), Some(0.0)).is_err());
    /// ```
    pub fn new(min_value: Option<f64>, max_value: Option<f64>) -> Result<Self, RangeError> {
        if min_value.map_or(false, f64::is_nan) || max_value.map_or(false, f64::is_nan) {
            return Err(RangeError::NanBound);
        }

        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(RangeError::InvalidRange { min, max });
            }
        }

        Ok(Self {
            min_value,
            max_value,
        })
    }

    /// A range without any bound
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A range with only a lower bound
    pub fn min_only(min: f64) -> Result<Self, RangeError> {
        Self::new(Some(min), None)
    }

    /// A range with only an upper bound
    pub fn max_only(max: f64) -> Result<Self, RangeError> {
        Self::new(None, Some(max))
    }

    /// Check a value against the range
    ///
    /// # Returns
    ///
    /// `None` if the value is admissible, otherwise the side it falls out on.
    /// The lower bound is checked first.
    pub fn check(&self, value: f64) -> Option<RangeViolation> {
        if let Some(min) = self.min_value {
            if value < min {
                return Some(RangeViolation::BelowMin);
            }
        }
        if let Some(max) = self.max_value {
            if value > max {
                return Some(RangeViolation::AboveMax);
            }
        }
        None
    }

    /// Check if a value is within the range (bounds are inclusive)
    pub fn contains(&self, value: f64) -> bool {
        self.check(value).is_none()
    }

    /// `true` if a lower bound is set
    pub fn has_lower_bound(&self) -> bool {
        self.min_value.is_some()
    }

    /// `true` if an upper bound is set
    pub fn has_upper_bound(&self) -> bool {
        self.max_value.is_some()
    }

    /// `true` if both bounds are set
    pub fn is_bounded(&self) -> bool {
        self.has_lower_bound() && self.has_upper_bound()
    }
}
