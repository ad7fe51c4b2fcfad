//! Parameter definition and implementation
//!
//! This module provides the [`Parameter`] struct, the building block of a lens
//! model description. A parameter has an identity (name, description, units,
//! LaTeX name), a [`DefinitionRange`], an initial estimate, a current point
//! estimate, a fixed/free flag and optional prior and posterior descriptors.
//!
//! Parameters come in a closed set of variants described by two tags:
//!
//! - [`ParameterRole`] tells a fitting engine which estimation stage treats the
//!   parameter specially (non-linear, linear, hyper-parameter).
//! - [`ParameterShape`] tells whether the value is a scalar, a plain vector
//!   (a parameter set) or a vector with one sky coordinate per element
//!   (a pixel parameter set).
//!
//! Both tags are fixed at construction.

use crate::error::InvalidChoice;
use crate::parameters::estimate::{EstimateValue, PointEstimate};
use crate::parameters::probability::{
    EmptyPosterior, PosteriorDistrib, PosteriorSpec, Prior, PriorSpec, UninformativePrior,
};
use crate::parameters::range::{DefinitionRange, RangeViolation};
use log::{debug, warn};
use ndarray::{Array2, ShapeBuilder};
use serde::ser::Error as SerError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("A value has already been set for parameter '{name}'")]
    AlreadySet { name: String },

    #[error("Value {value} of parameter '{name}' cannot be {violation} {bound}")]
    OutOfRange {
        name: String,
        value: f64,
        violation: RangeViolation,
        bound: f64,
    },

    #[error("Value of parameter '{name}' must be a number, got NaN")]
    NotANumber { name: String },

    #[error("Cannot fix parameter '{name}' as no value has been set")]
    NoValue { name: String },

    #[error("Invalid prior for parameter '{name}': {reason}")]
    InvalidPrior { name: String, reason: String },

    #[error("Parameter set '{name}' needs a sequence of values")]
    NotASequence { name: String },

    #[error("Parameter '{name}' needs a scalar value")]
    NotAScalar { name: String },

    #[error("Parameter set '{name}' holds {expected} values, got {found}")]
    ValueLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "Coordinates of pixel parameter set '{name}' must match its {num_values} values \
         (got {x_len} x and {y_len} y coordinates)"
    )]
    CoordinateLengthMismatch {
        name: String,
        num_values: usize,
        x_len: usize,
        y_len: usize,
    },

    #[error("Parameter '{name}' is not a pixel parameter set")]
    NotAPixelSet { name: String },

    #[error("Parameter '{name}' already has id {id}")]
    IdAlreadyAssigned { name: String, id: ParameterId },

    #[error("Parameter '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },
}

/// Stable identifier handed out by a [`ParameterList`](crate::parameters::ParameterList)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(pub usize);

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a fitting engine is expected to treat a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    /// Explored by a sampler or non-linear optimizer
    #[default]
    NonLinear,

    /// Solvable analytically, e.g. light amplitudes or pixelated sources
    Linear,

    /// Nuisance quantity such as a regularization strength
    Hyper,
}

/// Flattening order used to turn a 2-D pixel grid into a vector
///
/// Same convention as `numpy.ndarray.flatten`: `C` walks rows first,
/// `F` walks columns first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemoryOrder {
    #[default]
    C,
    F,
}

impl MemoryOrder {
    const CHOICES: &'static [&'static str] = &["C", "F"];
}

impl FromStr for MemoryOrder {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(MemoryOrder::C),
            "F" => Ok(MemoryOrder::F),
            other => Err(InvalidChoice::new("memory order", other, Self::CHOICES)),
        }
    }
}

impl fmt::Display for MemoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOrder::C => write!(f, "C"),
            MemoryOrder::F => write!(f, "F"),
        }
    }
}

/// Shape of the value a parameter holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterShape {
    Scalar,

    /// A sequence of `num_values` independent values
    Vector { num_values: usize },

    /// A sequence with one `(x, y)` coordinate per value
    PixelVector {
        num_values: usize,
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        order_in_memory: MemoryOrder,
    },
}

impl ParameterShape {
    /// Number of values: 1 for a scalar
    pub fn num_values(&self) -> usize {
        match self {
            ParameterShape::Scalar => 1,
            ParameterShape::Vector { num_values } | ParameterShape::PixelVector { num_values, .. } => {
                *num_values
            }
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, ParameterShape::Scalar)
    }
}

fn default_prior() -> Option<Box<dyn Prior>> {
    Some(Box::new(UninformativePrior))
}

fn default_posterior() -> Option<Box<dyn PosteriorDistrib>> {
    Some(Box::new(EmptyPosterior))
}

fn serialize_prior<S: Serializer>(prior: &Option<Box<dyn Prior>>, serializer: S) -> Result<S::Ok, S::Error> {
    let spec = match prior {
        Some(prior) => Some(
            prior
                .to_spec()
                .ok_or_else(|| <S::Error as SerError>::custom(format!("prior '{}' has no stored form", prior.name())))?,
        ),
        None => None,
    };
    spec.serialize(serializer)
}

fn serialize_posterior<S: Serializer>(
    posterior: &Option<Box<dyn PosteriorDistrib>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let spec = match posterior {
        Some(posterior) => Some(
            posterior
                .to_spec()
                .ok_or_else(|| <S::Error as SerError>::custom("posterior has no stored form"))?,
        ),
        None => None,
    };
    spec.serialize(serializer)
}

/// A parameter of a lens model description
///
/// Create one through [`Parameter::builder`] (or the role shortcuts
/// [`Parameter::non_linear`], [`Parameter::linear`], [`Parameter::hyper`]).
///
/// Priors and posteriors are stored through [`PriorSpec`] and
/// [`PosteriorSpec`]; serializing a parameter that carries a custom one fails.
/// Deserializing re-checks every invariant the builder enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ParameterRepr")]
pub struct Parameter {
    name: String,

    description: String,

    units: Option<String>,

    definition_range: DefinitionRange,

    fixed: bool,

    initial_estimate: PointEstimate,

    /// Current value; starts as a copy of `initial_estimate`
    point_estimate: PointEstimate,

    #[serde(serialize_with = "serialize_prior")]
    prior: Option<Box<dyn Prior>>,

    #[serde(serialize_with = "serialize_posterior")]
    posterior: Option<Box<dyn PosteriorDistrib>>,

    latex_name: String,

    /// Set once by the owning parameter list
    id: Option<ParameterId>,

    role: ParameterRole,

    shape: ParameterShape,
}

#[derive(Deserialize)]
struct ParameterRepr {
    name: String,
    description: String,
    #[serde(default)]
    units: Option<String>,
    definition_range: DefinitionRange,
    #[serde(default)]
    fixed: bool,
    #[serde(default)]
    initial_estimate: PointEstimate,
    #[serde(default)]
    point_estimate: PointEstimate,
    /// Absent means the builder default, `null` means removed
    #[serde(default = "default_prior_spec")]
    prior: Option<PriorSpec>,
    #[serde(default = "default_posterior_spec")]
    posterior: Option<PosteriorSpec>,
    #[serde(default)]
    latex_name: Option<String>,
    #[serde(default)]
    id: Option<ParameterId>,
    #[serde(default)]
    role: ParameterRole,
    shape: ParameterShape,
}

fn default_prior_spec() -> Option<PriorSpec> {
    Some(PriorSpec::Uninformative)
}

fn default_posterior_spec() -> Option<PosteriorSpec> {
    Some(PosteriorSpec::Empty)
}

impl TryFrom<ParameterRepr> for Parameter {
    type Error = ParameterError;

    fn try_from(repr: ParameterRepr) -> Result<Self, Self::Error> {
        let prior = repr.prior.map(PriorSpec::into_prior);
        if let Some(prior) = &prior {
            prior.validate().map_err(|reason| ParameterError::InvalidPrior {
                name: repr.name.clone(),
                reason,
            })?;
        }

        let param = Parameter {
            latex_name: repr.latex_name.unwrap_or_else(|| repr.name.clone()),
            name: repr.name,
            description: repr.description,
            units: repr.units,
            definition_range: repr.definition_range,
            fixed: repr.fixed,
            initial_estimate: repr.initial_estimate,
            point_estimate: repr.point_estimate,
            prior,
            posterior: repr.posterior.map(PosteriorSpec::into_posterior),
            id: repr.id,
            role: repr.role,
            shape: repr.shape,
        };
        param.validate_shape()?;
        Ok(param)
    }
}

/// Builder for [`Parameter`]
///
/// # Examples
///
/// ```
/// use lensmodel_api::parameters::{DefinitionRange, Parameter, ParameterRole};
///
/// let range = DefinitionRange::new(Some(0.0), Some(10.0)).unwrap();
/// let theta_e = Parameter::builder("theta_E", "Einstein radius", range)
///     .units("arcsec")
///     .latex_name(r"$\theta_{\rm E}$")
///     .initial_estimate(1.2)
///     .build()
///     .unwrap();
///
/// assert_eq!(theta_e.scalar_value(), Some(1.2));
/// assert_eq!(theta_e.role(), ParameterRole::NonLinear);
/// assert!(!theta_e.is_fixed());
/// ```
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    name: String,
    description: String,
    definition_range: DefinitionRange,
    units: Option<String>,
    fixed: bool,
    initial_estimate: PointEstimate,
    prior: Option<Box<dyn Prior>>,
    posterior: Option<Box<dyn PosteriorDistrib>>,
    latex_name: Option<String>,
    role: ParameterRole,
}

impl ParameterBuilder {
    pub fn new(name: &str, description: &str, definition_range: DefinitionRange) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            definition_range,
            units: None,
            fixed: false,
            initial_estimate: PointEstimate::empty(),
            prior: None,
            posterior: None,
            latex_name: None,
            role: ParameterRole::default(),
        }
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Request the parameter to start fixed; building fails without an initial estimate
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn initial_estimate(mut self, value: impl Into<EstimateValue>) -> Self {
        self.initial_estimate = PointEstimate::new(value);
        self
    }

    pub fn initial_point_estimate(mut self, estimate: PointEstimate) -> Self {
        self.initial_estimate = estimate;
        self
    }

    pub fn prior(mut self, prior: impl Prior + 'static) -> Self {
        self.prior = Some(Box::new(prior));
        self
    }

    pub fn posterior(mut self, posterior: impl PosteriorDistrib + 'static) -> Self {
        self.posterior = Some(Box::new(posterior));
        self
    }

    pub fn latex_name(mut self, latex_name: &str) -> Self {
        self.latex_name = Some(latex_name.to_string());
        self
    }

    pub fn role(mut self, role: ParameterRole) -> Self {
        self.role = role;
        self
    }

    /// Build a scalar parameter
    ///
    /// Fails with [`ParameterError::NotAScalar`] if the initial estimate is a sequence.
    pub fn build(self) -> Result<Parameter, ParameterError> {
        if self.initial_estimate.value().map_or(false, EstimateValue::is_vector) {
            return Err(ParameterError::NotAScalar { name: self.name });
        }
        self.finish(ParameterShape::Scalar)
    }

    /// Build a parameter set (one value per independent cell)
    ///
    /// A missing initial estimate becomes the empty sequence; a scalar one fails
    /// with [`ParameterError::NotASequence`]. `num_values` is fixed from the
    /// initial estimate's length.
    pub fn build_set(mut self) -> Result<Parameter, ParameterError> {
        let num_values = self.sequence_len()?;
        self.finish(ParameterShape::Vector { num_values })
    }

    /// Build a pixel parameter set, with one `(x, y)` coordinate per value
    ///
    /// Fails with [`ParameterError::CoordinateLengthMismatch`] unless both
    /// coordinate lists have exactly `num_values` entries.
    pub fn build_pixel_set(
        mut self,
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        order_in_memory: MemoryOrder,
    ) -> Result<Parameter, ParameterError> {
        let num_values = self.sequence_len()?;
        if x_coords.len() != num_values || y_coords.len() != num_values {
            return Err(ParameterError::CoordinateLengthMismatch {
                name: self.name,
                num_values,
                x_len: x_coords.len(),
                y_len: y_coords.len(),
            });
        }
        self.finish(ParameterShape::PixelVector {
            num_values,
            x_coords,
            y_coords,
            order_in_memory,
        })
    }

    fn sequence_len(&mut self) -> Result<usize, ParameterError> {
        match &self.initial_estimate.value {
            None => {
                self.initial_estimate = PointEstimate::new(Vec::new());
                Ok(0)
            }
            Some(EstimateValue::Vector(values)) => Ok(values.len()),
            Some(EstimateValue::Scalar(_)) => Err(ParameterError::NotASequence {
                name: self.name.clone(),
            }),
        }
    }

    fn finish(self, shape: ParameterShape) -> Result<Parameter, ParameterError> {
        if self.fixed && !self.initial_estimate.is_set() {
            return Err(ParameterError::NoValue { name: self.name });
        }

        if let Some(prior) = &self.prior {
            prior.validate().map_err(|reason| ParameterError::InvalidPrior {
                name: self.name.clone(),
                reason,
            })?;
        }

        // The initial estimate is not range checked, only reported
        if let Some((lo, hi)) = self.initial_estimate.value().and_then(EstimateValue::extremes) {
            if !self.definition_range.contains(lo) || !self.definition_range.contains(hi) {
                warn!(
                    "initial estimate of parameter '{}' lies outside its definition range {:?}",
                    self.name, self.definition_range
                );
            }
        }

        let latex_name = self.latex_name.unwrap_or_else(|| self.name.clone());

        Ok(Parameter {
            point_estimate: self.initial_estimate.clone(),
            initial_estimate: self.initial_estimate,
            name: self.name,
            description: self.description,
            units: self.units,
            definition_range: self.definition_range,
            fixed: self.fixed,
            prior: self.prior.or_else(default_prior),
            posterior: self.posterior.or_else(default_posterior),
            latex_name,
            id: None,
            role: self.role,
            shape,
        })
    }
}

impl Parameter {
    /// Start building a parameter with the default (non-linear) role
    pub fn builder(name: &str, description: &str, definition_range: DefinitionRange) -> ParameterBuilder {
        ParameterBuilder::new(name, description, definition_range)
    }

    pub fn non_linear(name: &str, description: &str, definition_range: DefinitionRange) -> ParameterBuilder {
        Self::builder(name, description, definition_range).role(ParameterRole::NonLinear)
    }

    pub fn linear(name: &str, description: &str, definition_range: DefinitionRange) -> ParameterBuilder {
        Self::builder(name, description, definition_range).role(ParameterRole::Linear)
    }

    pub fn hyper(name: &str, description: &str, definition_range: DefinitionRange) -> ParameterBuilder {
        Self::builder(name, description, definition_range).role(ParameterRole::Hyper)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn latex_name(&self) -> &str {
        &self.latex_name
    }

    pub fn definition_range(&self) -> &DefinitionRange {
        &self.definition_range
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_free(&self) -> bool {
        !self.fixed
    }

    pub fn initial_estimate(&self) -> &PointEstimate {
        &self.initial_estimate
    }

    pub fn point_estimate(&self) -> &PointEstimate {
        &self.point_estimate
    }

    /// Current value, if any
    pub fn value(&self) -> Option<&EstimateValue> {
        self.point_estimate.value()
    }

    /// Current value of a scalar parameter
    pub fn scalar_value(&self) -> Option<f64> {
        self.value().and_then(EstimateValue::as_scalar)
    }

    /// Current values of a parameter set
    pub fn values(&self) -> Option<&[f64]> {
        self.value().and_then(EstimateValue::as_slice)
    }

    pub fn prior(&self) -> Option<&dyn Prior> {
        self.prior.as_deref()
    }

    pub fn posterior(&self) -> Option<&dyn PosteriorDistrib> {
        self.posterior.as_deref()
    }

    pub fn id(&self) -> Option<ParameterId> {
        self.id
    }

    pub fn role(&self) -> ParameterRole {
        self.role
    }

    pub fn shape(&self) -> &ParameterShape {
        &self.shape
    }

    /// Number of values held: 1 for a scalar, the set length otherwise
    pub fn num_values(&self) -> usize {
        self.shape.num_values()
    }

    pub fn x_coords(&self) -> Option<&[f64]> {
        match &self.shape {
            ParameterShape::PixelVector { x_coords, .. } => Some(x_coords),
            _ => None,
        }
    }

    pub fn y_coords(&self) -> Option<&[f64]> {
        match &self.shape {
            ParameterShape::PixelVector { y_coords, .. } => Some(y_coords),
            _ => None,
        }
    }

    pub fn order_in_memory(&self) -> Option<MemoryOrder> {
        match &self.shape {
            ParameterShape::PixelVector { order_in_memory, .. } => Some(*order_in_memory),
            _ => None,
        }
    }

    /// Set the current value of the parameter
    ///
    /// # Arguments
    ///
    /// * `value` - The new value, a scalar or a sequence matching the parameter shape
    /// * `overwrite` - Whether an already present value may be replaced
    ///
    /// # Returns
    ///
    /// `Ok(())` if the value was stored. Fails with
    /// [`ParameterError::AlreadySet`] if a value is present and `overwrite` is
    /// false, and with [`ParameterError::OutOfRange`] if the value falls outside
    /// the definition range. A sequence is checked as one unit: it is rejected
    /// when its smallest element is below the minimum or its largest element
    /// above the maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::{DefinitionRange, Parameter, ParameterError};
    ///
    /// let range = DefinitionRange::new(Some(0.0), Some(1.0)).unwrap();
    /// let mut q = Parameter::builder("q", "axis ratio", range).build().unwrap();
    ///
    /// q.set_value(0.8, false).unwrap();
    /// assert!(matches!(q.set_value(0.7, false), Err(ParameterError::AlreadySet { .. })));
    /// q.set_value(0.7, true).unwrap();
    /// assert!(matches!(q.set_value(1.5, true), Err(ParameterError::OutOfRange { .. })));
    /// assert_eq!(q.scalar_value(), Some(0.7));
    /// ```
    pub fn set_value(&mut self, value: impl Into<EstimateValue>, overwrite: bool) -> Result<(), ParameterError> {
        let value = value.into();

        if self.point_estimate.is_set() && !overwrite {
            return Err(ParameterError::AlreadySet {
                name: self.name.clone(),
            });
        }

        self.check_shape(&value)?;
        self.check_range(&value)?;

        debug!("parameter '{}' set to {:?}", self.name, value);
        self.point_estimate.value = Some(value);
        Ok(())
    }

    fn check_shape(&self, value: &EstimateValue) -> Result<(), ParameterError> {
        match (&self.shape, value) {
            (ParameterShape::Scalar, EstimateValue::Scalar(_)) => Ok(()),
            (ParameterShape::Scalar, EstimateValue::Vector(_)) => Err(ParameterError::NotAScalar {
                name: self.name.clone(),
            }),
            (_, EstimateValue::Scalar(_)) => Err(ParameterError::NotASequence {
                name: self.name.clone(),
            }),
            (shape, EstimateValue::Vector(values)) => {
                if values.len() != shape.num_values() {
                    return Err(ParameterError::ValueLengthMismatch {
                        name: self.name.clone(),
                        expected: shape.num_values(),
                        found: values.len(),
                    });
                }
                Ok(())
            }
        }
    }

    fn check_range(&self, value: &EstimateValue) -> Result<(), ParameterError> {
        let Some((lo, hi)) = value.extremes() else {
            return Ok(());
        };
        if lo.is_nan() || hi.is_nan() {
            return Err(ParameterError::NotANumber {
                name: self.name.clone(),
            });
        }

        let range = &self.definition_range;
        let violation = match range.check(lo) {
            Some(RangeViolation::BelowMin) => Some((lo, RangeViolation::BelowMin, range.min_value)),
            _ => match range.check(hi) {
                Some(RangeViolation::AboveMax) => Some((hi, RangeViolation::AboveMax, range.max_value)),
                _ => None,
            },
        };

        match violation {
            Some((value, violation, Some(bound))) => Err(ParameterError::OutOfRange {
                name: self.name.clone(),
                value,
                violation,
                bound,
            }),
            _ => Ok(()),
        }
    }

    /// Replace the prior
    ///
    /// Fails with [`ParameterError::InvalidPrior`] if the prior does not pass
    /// its own [`Prior::validate`] check; the previous prior is kept then.
    pub fn set_prior(&mut self, prior: impl Prior + 'static) -> Result<(), ParameterError> {
        prior.validate().map_err(|reason| ParameterError::InvalidPrior {
            name: self.name.clone(),
            reason,
        })?;
        debug!("parameter '{}' prior set to {}", self.name, prior.name());
        self.prior = Some(Box::new(prior));
        Ok(())
    }

    /// Drop the prior entirely
    pub fn remove_prior(&mut self) {
        debug!("parameter '{}' prior removed", self.name);
        self.prior = None;
    }

    pub fn set_posterior(&mut self, posterior: impl PosteriorDistrib + 'static) {
        self.posterior = Some(Box::new(posterior));
    }

    /// Exclude the parameter from further estimation
    ///
    /// Fails with [`ParameterError::NoValue`] if no value has been set.
    pub fn fix(&mut self) -> Result<(), ParameterError> {
        if !self.point_estimate.is_set() {
            return Err(ParameterError::NoValue {
                name: self.name.clone(),
            });
        }
        debug!("parameter '{}' fixed", self.name);
        self.fixed = true;
        Ok(())
    }

    pub fn unfix(&mut self) {
        debug!("parameter '{}' unfixed", self.name);
        self.fixed = false;
    }

    /// Reset the current value to the initial estimate
    pub fn reset(&mut self) {
        self.point_estimate = self.initial_estimate.clone();
    }

    /// Log prior density of the current value
    ///
    /// For a set, the densities of the elements are summed (elements are
    /// treated as independent). `None` when there is no prior or no value.
    pub fn log_prior(&self) -> Option<f64> {
        let prior = self.prior.as_deref()?;
        match self.value()? {
            EstimateValue::Scalar(x) => Some(prior.log_density(*x)),
            EstimateValue::Vector(values) => Some(values.iter().map(|x| prior.log_density(*x)).sum()),
        }
    }

    /// Rebuild the 2-D image of a pixel parameter set
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows of the original grid
    /// * `cols` - Number of columns of the original grid
    ///
    /// # Returns
    ///
    /// A `rows x cols` array filled according to the set's memory order, or an
    /// error if the parameter is not a pixel set, has no value, or the grid size
    /// does not match `num_values`
    pub fn to_image(&self, rows: usize, cols: usize) -> Result<Array2<f64>, ParameterError> {
        let order = self.order_in_memory().ok_or_else(|| ParameterError::NotAPixelSet {
            name: self.name.clone(),
        })?;
        let values = self.values().ok_or_else(|| ParameterError::NoValue {
            name: self.name.clone(),
        })?;
        let mismatch = || ParameterError::ValueLengthMismatch {
            name: self.name.clone(),
            expected: rows.saturating_mul(cols),
            found: values.len(),
        };
        if rows.checked_mul(cols) != Some(values.len()) {
            return Err(mismatch());
        }

        let image = match order {
            MemoryOrder::C => Array2::from_shape_vec((rows, cols), values.to_vec()),
            MemoryOrder::F => Array2::from_shape_vec((rows, cols).f(), values.to_vec()),
        };
        image.map_err(|_| mismatch())
    }

    /// Record the id handed out by a parameter list
    ///
    /// Ids are never reassigned: a second call fails with
    /// [`ParameterError::IdAlreadyAssigned`].
    pub(crate) fn assign_id(&mut self, id: ParameterId) -> Result<(), ParameterError> {
        if let Some(existing) = self.id {
            return Err(ParameterError::IdAlreadyAssigned {
                name: self.name.clone(),
                id: existing,
            });
        }
        debug!("parameter '{}' registered with id {}", self.name, id);
        self.id = Some(id);
        Ok(())
    }

    /// Check the invariants of a parameter that did not come through the builder
    ///
    /// Covers pixel coordinate lengths, value shapes and the rule that a
    /// fixed parameter holds a value.
    pub(crate) fn validate_shape(&self) -> Result<(), ParameterError> {
        if let ParameterShape::PixelVector {
            num_values,
            x_coords,
            y_coords,
            ..
        } = &self.shape
        {
            if x_coords.len() != *num_values || y_coords.len() != *num_values {
                return Err(ParameterError::CoordinateLengthMismatch {
                    name: self.name.clone(),
                    num_values: *num_values,
                    x_len: x_coords.len(),
                    y_len: y_coords.len(),
                });
            }
        }
        for estimate in [&self.initial_estimate, &self.point_estimate] {
            if let Some(value) = estimate.value() {
                self.check_shape(value)?;
            }
        }
        if self.fixed && !self.point_estimate.is_set() {
            return Err(ParameterError::NoValue {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}
