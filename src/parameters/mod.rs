//! # Parameter System
//!
//! This module provides the parameter model of a lens model description: the
//! free and derived quantities a fitting engine will estimate, each with its
//! definition range, estimates, fixed/free state and probability descriptors.
//!
//! ## Key Features
//!
//! - **Definition ranges**: inclusive bounds with optional sides, checked on every value update
//! - **Fixed/free state**: a parameter can only be fixed once it holds a value
//! - **Roles**: non-linear, linear and hyper-parameters share one contract
//! - **Parameter sets**: vector-valued parameters for pixelated profiles, optionally
//!   carrying one sky coordinate per pixel and the flattening order of the grid
//! - **Priors and posteriors**: pluggable through the [`Prior`] and [`PosteriorDistrib`] traits
//! - **Serialization Support**: save and load parameter lists with serde
//!
//! ## Core Components
//!
//! - [`Parameter`] and [`ParameterBuilder`]: individual parameters
//! - [`ParameterList`]: the ordered registry that hands out [`ParameterId`]s
//! - [`DefinitionRange`]: value bounds
//! - [`PointEstimate`] and [`EstimateValue`]: value holders
//!
//! ## Example Usage
//!
//! ```rust
//! use lensmodel_api::parameters::{
//!     DefinitionRange, GaussianPrior, MemoryOrder, Parameter, ParameterList,
//! };
//!
//! let mut params = ParameterList::new();
//!
//! let theta_e = Parameter::non_linear(
//!     "theta_E",
//!     "Einstein radius",
//!     DefinitionRange::min_only(0.0).unwrap(),
//! )
//! .units("arcsec")
//! .build()
//! .unwrap();
//! params.add(theta_e).unwrap();
//!
//! let source = Parameter::linear("pixels", "source pixels", DefinitionRange::unbounded())
//!     .initial_estimate(vec![0.0; 4])
//!     .build_pixel_set(vec![0.0, 1.0, 0.0, 1.0], vec![0.0, 0.0, 1.0, 1.0], MemoryOrder::C)
//!     .unwrap();
//! params.add(source).unwrap();
//!
//! let theta_e = params.get_mut("theta_E").unwrap();
//! theta_e.set_value(1.4, false).unwrap();
//! theta_e.set_prior(GaussianPrior::new(1.5, 0.2)).unwrap();
//! theta_e.fix().unwrap();
//!
//! assert_eq!(params.num_free_values(), 4);
//! ```

pub mod estimate;
pub mod parameter;
pub mod parameter_list;
pub mod probability;
pub mod range;


// Re-export key types
pub use estimate::{EstimateValue, PointEstimate};
pub use parameter::{
    MemoryOrder, Parameter, ParameterBuilder, ParameterError, ParameterId, ParameterRole,
    ParameterShape,
};
pub use parameter_list::{ParameterList, SerializationError};
pub use probability::{
    EmptyPosterior, GaussianPrior, PosteriorDistrib, PosteriorSpec, Prior, PriorSpec,
    SampledPosterior, UniformPrior, UninformativePrior,
};
pub use range::{DefinitionRange, RangeError, RangeViolation};
