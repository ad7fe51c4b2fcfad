//! # lensmodel-api
//!
//! `lensmodel-api` is a descriptive data model for gravitational lens model
//! descriptions. It declares, validates and stores the quantities a fitting
//! engine consumes; it does not fit, sample or compute lensing physics.
//!
//! The library provides:
//! - A parameter system with definition ranges, fixed/free state, priors and posteriors
//! - Parameter sets for pixelated profiles, with per-pixel coordinates and memory order
//! - A parameter list that assigns stable ids to registered parameters
//! - Pixel to sky-angle coordinate conventions bound to an instrument description
//! - Light/mass profiles and regularization terms, each owning a parameter list
//!
//! ## Basic Usage
//!
//! ```
//! use lensmodel_api::coordinates::{Coordinates, Instrument};
//! use lensmodel_api::parameters::{DefinitionRange, Parameter};
//!
//! let mut q = Parameter::builder("q", "axis ratio", DefinitionRange::new(Some(0.0), Some(1.0))?)
//!     .build()?;
//! q.set_value(0.7, false)?;
//! q.fix()?;
//!
//! let mut coords = Coordinates::default();
//! coords.update_with_instrument(&Instrument::from_pixel_grid("HST/WFC3", 100, 0.08))?;
//! let (ra, dec) = coords.pixel_to_radec(0.0, 0.0).unwrap();
//! assert!((ra + 3.96).abs() < 1e-12 && (dec + 3.96).abs() < 1e-12);
//! # Ok::<(), lensmodel_api::LensModelError>(())
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod coordinates;
pub mod likelihood;
pub mod profile;
pub mod regularization;

// Re-exports for convenience
pub use coordinates::{Coordinates, Instrument, InstrumentGeometry, PixelGrid};
pub use error::{InvalidChoice, LensModelError, Result};
pub use parameters::{Parameter, ParameterList};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
