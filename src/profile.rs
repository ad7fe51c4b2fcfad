//! Light and mass profiles
//!
//! A profile is a named model component owning the parameters that describe
//! it. The profile equations themselves belong to the modelling code that
//! consumes the description.

use crate::error::InvalidChoice;
use crate::parameters::{Parameter, ParameterError, ParameterId, ParameterList};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a profile describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Light,
    Mass,
}

impl ProfileKind {
    const CHOICES: &'static [&'static str] = &["light", "mass"];
}

impl FromStr for ProfileKind {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ProfileKind::Light),
            "mass" => Ok(ProfileKind::Mass),
            other => Err(InvalidChoice::new("profile kind", other, Self::CHOICES)),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Light => write!(f, "light"),
            ProfileKind::Mass => write!(f, "mass"),
        }
    }
}

/// A light or mass profile with its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,

    pub description: String,

    pub kind: ProfileKind,

    parameters: ParameterList,
}

impl Profile {
    pub fn new(name: &str, description: &str, kind: ProfileKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            parameters: ParameterList::new(),
        }
    }

    /// Build a profile from its parameters, registering each of them
    pub fn with_parameters(
        name: &str,
        description: &str,
        kind: ProfileKind,
        parameters: Vec<Parameter>,
    ) -> Result<Self, ParameterError> {
        let mut profile = Self::new(name, description, kind);
        for param in parameters {
            profile.add_parameter(param)?;
        }
        Ok(profile)
    }

    pub fn add_parameter(&mut self, param: Parameter) -> Result<ParameterId, ParameterError> {
        self.parameters.add(param)
    }

    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterList {
        &mut self.parameters
    }

    /// `true` when at least one parameter is a pixel set
    pub fn is_pixelated(&self) -> bool {
        self.parameters.iter().any(|p| p.order_in_memory().is_some())
    }
}
