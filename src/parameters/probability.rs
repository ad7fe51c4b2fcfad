//! Prior and posterior descriptors
//!
//! A parameter carries at most one [`Prior`] and one [`PosteriorDistrib`].
//! Both are capability traits: anything implementing them can be attached, and
//! conformance is checked by the compiler rather than by inspecting types at
//! runtime. The parameter model never looks inside them beyond the methods
//! below; sampling and inference live with the fitting engine.
//!
//! The stock implementations have a serializable form, [`PriorSpec`] and
//! [`PosteriorSpec`], which is what a saved parameter stores. A custom
//! implementation has none and refuses to be written out.

use rand::RngCore;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A prior probability distribution on a scalar parameter value
pub trait Prior: fmt::Debug + Send + Sync {
    /// Short identifier of the distribution family
    fn name(&self) -> &'static str;

    /// Natural log of the (possibly unnormalized) density at `x`
    fn log_density(&self, x: f64) -> f64;

    /// Draw one value, or `None` when the prior is improper
    fn sample(&self, rng: &mut dyn RngCore) -> Option<f64>;

    /// Check that the distribution is well formed
    ///
    /// The returned message ends up in [`ParameterError::InvalidPrior`].
    ///
    /// [`ParameterError::InvalidPrior`]: crate::parameters::ParameterError::InvalidPrior
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Serializable form, `None` for distributions outside [`PriorSpec`]
    fn to_spec(&self) -> Option<PriorSpec> {
        None
    }

    fn clone_box(&self) -> Box<dyn Prior>;
}

impl Clone for Box<dyn Prior> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Summary statistics of a posterior distribution
pub trait PosteriorDistrib: fmt::Debug + Send + Sync {
    fn mean(&self) -> Option<f64>;

    fn std_dev(&self) -> Option<f64>;

    /// Value below which a fraction `q` of the mass lies, `q` in `[0, 1]`
    fn quantile(&self, q: f64) -> Option<f64>;

    fn median(&self) -> Option<f64> {
        self.quantile(0.5)
    }

    /// Serializable form, `None` for summaries outside [`PosteriorSpec`]
    fn to_spec(&self) -> Option<PosteriorSpec> {
        None
    }

    fn clone_box(&self) -> Box<dyn PosteriorDistrib>;
}

impl Clone for Box<dyn PosteriorDistrib> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Flat improper prior, the default attached to every new parameter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UninformativePrior;

impl Prior for UninformativePrior {
    fn name(&self) -> &'static str {
        "uninformative"
    }

    fn log_density(&self, _x: f64) -> f64 {
        0.0
    }

    fn sample(&self, _rng: &mut dyn RngCore) -> Option<f64> {
        None
    }

    fn to_spec(&self) -> Option<PriorSpec> {
        Some(PriorSpec::Uninformative)
    }

    fn clone_box(&self) -> Box<dyn Prior> {
        Box::new(*self)
    }
}

/// Uniform prior on `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPrior {
    min: f64,
    max: f64,
}

impl UniformPrior {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Prior for UniformPrior {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn log_density(&self, x: f64) -> f64 {
        if x >= self.min && x <= self.max {
            -(self.max - self.min).ln()
        } else {
            f64::NEG_INFINITY
        }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Option<f64> {
        self.validate().ok()?;
        Some(Uniform::new_inclusive(self.min, self.max).sample(rng))
    }

    fn validate(&self) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(format!(
                "uniform prior needs finite bounds, got [{}, {}]",
                self.min, self.max
            ));
        }
        if self.min >= self.max {
            return Err(format!(
                "uniform prior needs min < max, got [{}, {}]",
                self.min, self.max
            ));
        }
        Ok(())
    }

    fn to_spec(&self) -> Option<PriorSpec> {
        Some(PriorSpec::Uniform {
            min: self.min,
            max: self.max,
        })
    }

    fn clone_box(&self) -> Box<dyn Prior> {
        Box::new(*self)
    }
}

/// Gaussian prior with the given mean and standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPrior {
    mean: f64,
    sigma: f64,
}

impl GaussianPrior {
    pub fn new(mean: f64, sigma: f64) -> Self {
        Self { mean, sigma }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Prior for GaussianPrior {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn log_density(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sigma;
        -0.5 * z * z - self.sigma.ln() - 0.5 * (2.0 * PI).ln()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Option<f64> {
        self.validate().ok()?;
        let normal = Normal::new(self.mean, self.sigma).ok()?;
        Some(normal.sample(rng))
    }

    fn validate(&self) -> Result<(), String> {
        if !self.mean.is_finite() {
            return Err(format!("gaussian prior mean must be finite, got {}", self.mean));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(format!(
                "gaussian prior sigma must be positive and finite, got {}",
                self.sigma
            ));
        }
        Ok(())
    }

    fn to_spec(&self) -> Option<PriorSpec> {
        Some(PriorSpec::Gaussian {
            mean: self.mean,
            sigma: self.sigma,
        })
    }

    fn clone_box(&self) -> Box<dyn Prior> {
        Box::new(*self)
    }
}

/// Posterior with no information, the default attached to every new parameter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmptyPosterior;

impl PosteriorDistrib for EmptyPosterior {
    fn mean(&self) -> Option<f64> {
        None
    }

    fn std_dev(&self) -> Option<f64> {
        None
    }

    fn quantile(&self, _q: f64) -> Option<f64> {
        None
    }

    fn to_spec(&self) -> Option<PosteriorSpec> {
        Some(PosteriorSpec::Empty)
    }

    fn clone_box(&self) -> Box<dyn PosteriorDistrib> {
        Box::new(*self)
    }
}

/// Posterior summarized from a set of samples (e.g. an MCMC chain)
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPosterior {
    sorted: Vec<f64>,
}

impl SampledPosterior {
    /// Build from raw samples; NaN samples are dropped
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = samples.into_iter().filter(|s| !s.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn num_samples(&self) -> usize {
        self.sorted.len()
    }
}

impl PosteriorDistrib for SampledPosterior {
    fn mean(&self) -> Option<f64> {
        if self.sorted.is_empty() {
            return None;
        }
        Some(self.sorted.iter().sum::<f64>() / self.sorted.len() as f64)
    }

    fn std_dev(&self) -> Option<f64> {
        let n = self.sorted.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let var = self.sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Some(var.sqrt())
    }

    fn quantile(&self, q: f64) -> Option<f64> {
        if self.sorted.is_empty() || !(0.0..=1.0).contains(&q) {
            return None;
        }
        // Linear interpolation between closest ranks
        let pos = q * (self.sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        Some(self.sorted[lo] + frac * (self.sorted[hi] - self.sorted[lo]))
    }

    fn to_spec(&self) -> Option<PosteriorSpec> {
        Some(PosteriorSpec::Sampled {
            samples: self.sorted.clone(),
        })
    }

    fn clone_box(&self) -> Box<dyn PosteriorDistrib> {
        Box::new(self.clone())
    }
}

/// Stored form of the stock priors
///
/// Tagged by `type` in JSON, e.g. `{"type": "gaussian", "mean": 1.0, "sigma": 0.2}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriorSpec {
    Uninformative,
    Uniform { min: f64, max: f64 },
    Gaussian { mean: f64, sigma: f64 },
}

impl PriorSpec {
    pub fn into_prior(self) -> Box<dyn Prior> {
        match self {
            PriorSpec::Uninformative => Box::new(UninformativePrior),
            PriorSpec::Uniform { min, max } => Box::new(UniformPrior::new(min, max)),
            PriorSpec::Gaussian { mean, sigma } => Box::new(GaussianPrior::new(mean, sigma)),
        }
    }
}

/// Stored form of the stock posteriors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PosteriorSpec {
    Empty,
    Sampled { samples: Vec<f64> },
}

impl PosteriorSpec {
    pub fn into_posterior(self) -> Box<dyn PosteriorDistrib> {
        match self {
            PosteriorSpec::Empty => Box::new(EmptyPosterior),
            PosteriorSpec::Sampled { samples } => Box::new(SampledPosterior::new(samples)),
        }
    }
}
