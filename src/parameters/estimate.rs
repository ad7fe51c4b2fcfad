//! Point estimates
//!
//! A [`PointEstimate`] is a thin named holder so that "no value yet" is
//! distinguishable from a zero value. The held value is either a single
//! scalar or a sequence of scalars (one per cell of a pixelated quantity).

use serde::{Deserialize, Serialize};

/// The value held by a point estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimateValue {
    /// A single number
    Scalar(f64),

    /// An ordered sequence of numbers
    Vector(Vec<f64>),
}

impl EstimateValue {
    /// The scalar, if this is a scalar value
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            EstimateValue::Scalar(v) => Some(*v),
            EstimateValue::Vector(_) => None,
        }
    }

    /// The sequence, if this is a vector value
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            EstimateValue::Scalar(_) => None,
            EstimateValue::Vector(values) => Some(values),
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, EstimateValue::Vector(_))
    }

    /// Number of scalars held (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            EstimateValue::Scalar(_) => 1,
            EstimateValue::Vector(values) => values.len(),
        }
    }

    /// `true` only for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest and largest element, `None` for an empty sequence
    ///
    /// NaN elements propagate into the result so that range checks reject them.
    pub fn extremes(&self) -> Option<(f64, f64)> {
        match self {
            EstimateValue::Scalar(v) => Some((*v, *v)),
            EstimateValue::Vector(values) => {
                let mut iter = values.iter().copied();
                let first = iter.next()?;
                Some(iter.fold((first, first), |(lo, hi), v| {
                    if v.is_nan() || lo.is_nan() || hi.is_nan() {
                        (f64::NAN, f64::NAN)
                    } else {
                        (lo.min(v), hi.max(v))
                    }
                }))
            }
        }
    }
}

impl From<f64> for EstimateValue {
    fn from(value: f64) -> Self {
        EstimateValue::Scalar(value)
    }
}

impl From<Vec<f64>> for EstimateValue {
    fn from(values: Vec<f64>) -> Self {
        EstimateValue::Vector(values)
    }
}

impl From<&[f64]> for EstimateValue {
    fn from(values: &[f64]) -> Self {
        EstimateValue::Vector(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for EstimateValue {
    fn from(values: [f64; N]) -> Self {
        EstimateValue::Vector(values.to_vec())
    }
}

/// A single concrete value assigned to a parameter, or none yet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointEstimate {
    pub value: Option<EstimateValue>,
}

impl PointEstimate {
    /// Create a point estimate holding `value`
    pub fn new(value: impl Into<EstimateValue>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// A point estimate without a value
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&EstimateValue> {
        self.value.as_ref()
    }
}

impl From<EstimateValue> for PointEstimate {
    fn from(value: EstimateValue) -> Self {
        Self { value: Some(value) }
    }
}

impl From<Option<EstimateValue>> for PointEstimate {
    fn from(value: Option<EstimateValue>) -> Self {
        Self { value }
    }
}
