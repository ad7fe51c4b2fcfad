//! Likelihood types a lens model can be constrained by

use crate::error::InvalidChoice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported likelihood term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodType {
    ImagingData,
    TimeDelays,
    MagnificationRatios,
    ImagePlanePosition,
    SourcePlanePosition,
}

impl LikelihoodType {
    const CHOICES: &'static [&'static str] = &[
        "imaging_data",
        "time_delays",
        "magnification_ratios",
        "image_plane_position",
        "source_plane_position",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LikelihoodType::ImagingData => "imaging_data",
            LikelihoodType::TimeDelays => "time_delays",
            LikelihoodType::MagnificationRatios => "magnification_ratios",
            LikelihoodType::ImagePlanePosition => "image_plane_position",
            LikelihoodType::SourcePlanePosition => "source_plane_position",
        }
    }
}

impl FromStr for LikelihoodType {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imaging_data" => Ok(LikelihoodType::ImagingData),
            "time_delays" => Ok(LikelihoodType::TimeDelays),
            "magnification_ratios" => Ok(LikelihoodType::MagnificationRatios),
            "image_plane_position" => Ok(LikelihoodType::ImagePlanePosition),
            "source_plane_position" => Ok(LikelihoodType::SourcePlanePosition),
            other => Err(InvalidChoice::new("likelihood type", other, Self::CHOICES)),
        }
    }
}

impl fmt::Display for LikelihoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered list of likelihood terms
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikelihoodList(Vec<LikelihoodType>);

impl LikelihoodList {
    pub fn new(types: Vec<LikelihoodType>) -> Self {
        Self(types)
    }

    /// Parse every name, failing on the first unsupported one
    ///
    /// # Examples
    ///
    /// ```
    /// use lensmodel_api::likelihood::{LikelihoodList, LikelihoodType};
    ///
    /// let list = LikelihoodList::from_names(&["imaging_data", "time_delays"]).unwrap();
    /// assert_eq!(list.as_slice(), &[LikelihoodType::ImagingData, LikelihoodType::TimeDelays]);
    /// assert!(LikelihoodList::from_names(&["flux_ratios"]).is_err());
    /// ```
    pub fn from_names(names: &[&str]) -> Result<Self, InvalidChoice> {
        names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[LikelihoodType] {
        &self.0
    }

    pub fn contains(&self, likelihood: LikelihoodType) -> bool {
        self.0.contains(&likelihood)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
