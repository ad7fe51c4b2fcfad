//! Regularization terms
//!
//! A regularization penalizes rough solutions of a pixelated profile. Like a
//! [`Profile`], it owns a [`ParameterList`]; its parameters are usually
//! hyper-parameters such as the regularization strength. It may name the
//! profile it acts on.

use crate::parameters::{Parameter, ParameterError, ParameterId, ParameterList, ParameterRole};
use crate::profile::Profile;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A regularization term with its parameters
///
/// # Examples
///
/// ```
/// use lensmodel_api::parameters::{DefinitionRange, Parameter};
/// use lensmodel_api::profile::{Profile, ProfileKind};
/// use lensmodel_api::regularization::Regularization;
///
/// let source = Profile::new("PixelatedLight", "source pixels", ProfileKind::Light);
///
/// let mut reg = Regularization::new("Starlet", "Sparsity in starlet space");
/// reg.add_parameter(
///     Parameter::hyper("strength", "regularization strength", DefinitionRange::min_only(0.0).unwrap())
///         .initial_estimate(3.0)
///         .build()
///         .unwrap(),
/// )
/// .unwrap();
/// reg.apply_to(&source);
///
/// assert_eq!(reg.applied_to_profile(), Some("PixelatedLight"));
/// assert_eq!(reg.hyper_parameters().count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regularization {
    /// Regularization scheme, e.g. "Starlet" or "Curvature"
    #[serde(rename = "type")]
    pub kind: String,

    pub documentation: String,

    parameters: ParameterList,

    /// Name of the profile the term acts on
    #[serde(default)]
    applied_to_profile: Option<String>,
}

impl Regularization {
    pub fn new(kind: &str, documentation: &str) -> Self {
        Self {
            kind: kind.to_string(),
            documentation: documentation.to_string(),
            parameters: ParameterList::new(),
            applied_to_profile: None,
        }
    }

    /// Build a regularization from its parameters, registering each of them
    pub fn with_parameters(
        kind: &str,
        documentation: &str,
        parameters: Vec<Parameter>,
    ) -> Result<Self, ParameterError> {
        let mut reg = Self::new(kind, documentation);
        for param in parameters {
            reg.add_parameter(param)?;
        }
        Ok(reg)
    }

    pub fn add_parameter(&mut self, param: Parameter) -> Result<ParameterId, ParameterError> {
        if param.role() != ParameterRole::Hyper {
            warn!(
                "regularization '{}' registers '{}' with role {:?}, expected a hyper-parameter",
                self.kind,
                param.name(),
                param.role()
            );
        }
        self.parameters.add(param)
    }

    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterList {
        &mut self.parameters
    }

    pub fn hyper_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.role() == ParameterRole::Hyper)
    }

    /// Attach the term to a profile
    ///
    /// A profile without pixel parameters is accepted but reported.
    pub fn apply_to(&mut self, profile: &Profile) {
        if !profile.is_pixelated() {
            debug!(
                "regularization '{}' applied to profile '{}', which has no pixel parameters",
                self.kind, profile.name
            );
        }
        self.applied_to_profile = Some(profile.name.clone());
    }

    pub fn detach(&mut self) {
        self.applied_to_profile = None;
    }

    pub fn applied_to_profile(&self) -> Option<&str> {
        self.applied_to_profile.as_deref()
    }
}
