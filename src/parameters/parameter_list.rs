//! Parameter list implementation
//!
//! This module provides the [`ParameterList`] struct, the ordered collection of
//! parameters belonging to one model component. Adding a parameter to a list
//! is what gives it its stable [`ParameterId`]; ids are handed out in insertion
//! order and never reused.

use crate::parameters::estimate::EstimateValue;
use crate::parameters::parameter::{Parameter, ParameterError, ParameterId, ParameterRole};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// An ordered collection of uniquely named parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "ParameterListRepr")]
pub struct ParameterList {
    parameters: Vec<Parameter>,

    /// Map of parameter names to positions in `parameters`
    #[serde(skip)]
    index: HashMap<String, usize>,

    #[serde(skip)]
    next_id: usize,
}

#[derive(Deserialize)]
struct ParameterListRepr {
    parameters: Vec<Parameter>,
}

impl TryFrom<ParameterListRepr> for ParameterList {
    type Error = ParameterError;

    fn try_from(repr: ParameterListRepr) -> Result<Self, Self::Error> {
        ParameterList::from_parameters(repr.parameters)
    }
}

impl ParameterList {
    /// Create a new empty parameter list
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::ParameterList;
    ///
    /// let params = ParameterList::new();
    /// assert!(params.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from parameters, keeping ids they already carry
    ///
    /// Parameters without an id get fresh ones after the largest existing id.
    /// Fails on duplicate names, duplicate ids, or parameters whose shape
    /// invariants do not hold.
    pub fn from_parameters(parameters: Vec<Parameter>) -> Result<Self, ParameterError> {
        let mut list = Self {
            next_id: parameters
                .iter()
                .filter_map(|p| p.id())
                .map(|id| id.0 + 1)
                .max()
                .unwrap_or(0),
            ..Self::default()
        };

        let mut seen_ids = HashMap::new();
        for param in parameters {
            param.validate_shape()?;
            if let Some(id) = param.id() {
                if seen_ids.insert(id, param.name().to_string()).is_some() {
                    return Err(ParameterError::IdAlreadyAssigned {
                        name: param.name().to_string(),
                        id,
                    });
                }
                list.insert(param)?;
            } else {
                list.add(param)?;
            }
        }

        Ok(list)
    }

    /// Add a parameter to the list and assign its id
    ///
    /// # Arguments
    ///
    /// * `param` - The parameter to add; it must not carry an id yet
    ///
    /// # Returns
    ///
    /// The id given to the parameter, or an error if a parameter with the same
    /// name exists or the parameter is already registered elsewhere
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::{DefinitionRange, Parameter, ParameterId, ParameterList};
    ///
    /// let mut params = ParameterList::new();
    /// let gamma = Parameter::builder("gamma", "slope", DefinitionRange::unbounded())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.add(gamma).unwrap(), ParameterId(0));
    /// assert_eq!(params.get("gamma").unwrap().id(), Some(ParameterId(0)));
    /// ```
    pub fn add(&mut self, mut param: Parameter) -> Result<ParameterId, ParameterError> {
        if self.index.contains_key(param.name()) {
            return Err(ParameterError::DuplicateName {
                name: param.name().to_string(),
            });
        }

        let id = ParameterId(self.next_id);
        param.assign_id(id)?;
        self.next_id += 1;
        self.insert(param)?;
        Ok(id)
    }

    fn insert(&mut self, param: Parameter) -> Result<(), ParameterError> {
        let name = param.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ParameterError::DuplicateName { name });
        }
        self.index.insert(name, self.parameters.len());
        self.parameters.push(param);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.parameters[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        match self.index.get(name) {
            Some(&i) => self.parameters.get_mut(i),
            None => None,
        }
    }

    /// Look a parameter up by name, failing with [`ParameterError::ParameterNotFound`]
    pub fn require(&self, name: &str) -> Result<&Parameter, ParameterError> {
        self.get(name).ok_or_else(|| ParameterError::ParameterNotFound {
            name: name.to_string(),
        })
    }

    /// Mutable counterpart of [`ParameterList::require`]
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Parameter, ParameterError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.parameters[i]),
            None => Err(ParameterError::ParameterNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn get_by_id(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == Some(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.parameters.iter().map(Parameter::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.parameters.iter_mut()
    }

    /// Parameters that are not fixed
    pub fn free(&self) -> Vec<&Parameter> {
        self.parameters.iter().filter(|p| p.is_free()).collect()
    }

    /// Parameters that are fixed
    pub fn fixed(&self) -> Vec<&Parameter> {
        self.parameters.iter().filter(|p| p.is_fixed()).collect()
    }

    /// Parameters carrying the given role
    pub fn with_role(&self, role: ParameterRole) -> Vec<&Parameter> {
        self.parameters.iter().filter(|p| p.role() == role).collect()
    }

    /// Total number of free scalars: a set contributes `num_values`
    pub fn num_free_values(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.is_free())
            .map(Parameter::num_values)
            .sum()
    }

    /// Current values of all free parameters, flattened in insertion order
    ///
    /// Fails with [`ParameterError::NoValue`] on the first free parameter
    /// without a value.
    pub fn free_values(&self) -> Result<Vec<f64>, ParameterError> {
        let mut values = Vec::with_capacity(self.num_free_values());
        for param in self.parameters.iter().filter(|p| p.is_free()) {
            match param.value() {
                Some(EstimateValue::Scalar(v)) => values.push(*v),
                Some(EstimateValue::Vector(vs)) => values.extend_from_slice(vs),
                None => {
                    return Err(ParameterError::NoValue {
                        name: param.name().to_string(),
                    })
                }
            }
        }
        Ok(values)
    }

    /// Reset every parameter to its initial estimate
    pub fn reset(&mut self) {
        for param in &mut self.parameters {
            param.reset();
        }
    }
}

/// Failure while writing or reading a stored parameter list
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, a violated parameter invariant, or a prior with no stored form
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParameterList {
    /// Write the list as pretty-printed JSON
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file, created or truncated
    ///
    /// # Returns
    ///
    /// `Ok(())` once the file is flushed. Fails with [`SerializationError::Io`]
    /// when the file cannot be written, and with [`SerializationError::Json`]
    /// when a parameter carries a prior or posterior without a stored form.
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::{DefinitionRange, Parameter, ParameterList};
    ///
    /// let mut params = ParameterList::new();
    /// params
    ///     .add(Parameter::builder("gamma", "slope", DefinitionRange::unbounded()).build().unwrap())
    ///     .unwrap();
    ///
    /// let path = std::env::temp_dir().join("lensmodel_api_doc_save.json");
    /// params.save_json(&path).unwrap();
    /// assert_eq!(ParameterList::load_json(&path).unwrap().names(), vec!["gamma"]);
    /// std::fs::remove_file(&path).unwrap();
    /// ```
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| SerializationError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(io_error)?;
        debug!("saved {} parameters to {}", self.len(), path.display());
        Ok(())
    }

    /// Render the list as pretty-printed JSON
    ///
    /// # Returns
    ///
    /// The JSON text, or [`SerializationError::Json`] when a parameter carries
    /// a prior or posterior without a stored form
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a list written by [`ParameterList::save_json`]
    ///
    /// # Arguments
    ///
    /// * `path` - File to read
    ///
    /// # Returns
    ///
    /// The list with its stored ids, or an error when the file cannot be read
    /// or its content does not describe a valid list (see [`ParameterList::from_json`])
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SerializationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse a list from JSON text
    ///
    /// Every parameter goes through the same checks as the builder (fixed
    /// parameters hold a value, pixel coordinates match the value count,
    /// priors are well formed), then names and ids are checked for
    /// uniqueness. Any violation surfaces as [`SerializationError::Json`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::parameters::ParameterList;
    ///
    /// let json = r#"{
    ///   "parameters": [
    ///     {
    ///       "name": "theta_E",
    ///       "description": "Einstein radius",
    ///       "definition_range": { "min_value": 0.0, "max_value": null },
    ///       "point_estimate": { "value": 1.2 },
    ///       "prior": { "type": "gaussian", "mean": 1.2, "sigma": 0.1 },
    ///       "shape": { "kind": "scalar" }
    ///     }
    ///   ]
    /// }"#;
    ///
    /// let params = ParameterList::from_json(json).unwrap();
    /// let theta_e = params.get("theta_E").unwrap();
    /// assert_eq!(theta_e.scalar_value(), Some(1.2));
    /// assert_eq!(theta_e.prior().unwrap().name(), "gaussian");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }
}
