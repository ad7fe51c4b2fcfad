//! Pixel to sky-angle coordinate conventions
//!
//! [`Coordinates`] records how the pixel grid of an imaging instrument is laid
//! on the sky: which way right ascension and declination grow, and which pixel
//! sits at angular position `(0, 0)`. Binding it to an instrument derives a
//! diagonal pixel-to-angle matrix and the angular position of pixel `(0, 0)`.
//!
//! The conventions reproduce the reference lens-model description format
//! literally, including two quirks that downstream tools rely on:
//!
//! - an axis whose orientation is not the positive one (`right` for RA,
//!   `bottom` for Dec) gets a scale of **zero**, not a negative scale;
//! - with a centered origin, the declination offset is computed from the RA
//!   field of view.

use crate::error::InvalidChoice;
use log::{debug, warn};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when working with coordinate conventions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatesError {
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoice),

    #[error("Instrument does not provide `{attribute}`")]
    AttributeMissing { attribute: &'static str },
}

/// Direction in which right ascension increases along the pixel x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaOrientation {
    #[default]
    Left,
    Right,
}

/// Direction in which declination increases along the pixel y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecOrientation {
    #[default]
    Top,
    Bottom,
}

/// Pixel that corresponds to angular coordinate `(0, 0)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OriginPosition {
    #[default]
    #[serde(rename = "center")]
    Center,

    #[serde(rename = "bottom left")]
    BottomLeft,
}

impl RaOrientation {
    const CHOICES: &'static [&'static str] = &["left", "right"];
}

impl DecOrientation {
    const CHOICES: &'static [&'static str] = &["top", "bottom"];
}

impl OriginPosition {
    const CHOICES: &'static [&'static str] = &["center", "bottom left"];
}

impl FromStr for RaOrientation {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(RaOrientation::Left),
            "right" => Ok(RaOrientation::Right),
            other => Err(InvalidChoice::new("RA orientation", other, Self::CHOICES)),
        }
    }
}

impl FromStr for DecOrientation {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(DecOrientation::Top),
            "bottom" => Ok(DecOrientation::Bottom),
            other => Err(InvalidChoice::new("Dec orientation", other, Self::CHOICES)),
        }
    }
}

impl FromStr for OriginPosition {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(OriginPosition::Center),
            "bottom left" => Ok(OriginPosition::BottomLeft),
            other => Err(InvalidChoice::new("origin position", other, Self::CHOICES)),
        }
    }
}

impl fmt::Display for RaOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaOrientation::Left => write!(f, "left"),
            RaOrientation::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for DecOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecOrientation::Top => write!(f, "top"),
            DecOrientation::Bottom => write!(f, "bottom"),
        }
    }
}

impl fmt::Display for OriginPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginPosition::Center => write!(f, "center"),
            OriginPosition::BottomLeft => write!(f, "bottom left"),
        }
    }
}

/// What [`Coordinates`] needs to know about an instrument
///
/// Either field may be unknown; binding fails with
/// [`CoordinatesError::AttributeMissing`] when a needed one is.
pub trait InstrumentGeometry {
    /// Angular size of one pixel, e.g. in arcsec
    fn pixel_size(&self) -> Option<f64>;

    /// Angular extent of the field along RA, same unit as the pixel size
    fn field_of_view_ra(&self) -> Option<f64>;
}

/// Plain instrument description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,

    #[serde(default)]
    pub pixel_size: Option<f64>,

    #[serde(default)]
    pub field_of_view_ra: Option<f64>,
}

impl Instrument {
    pub fn new(name: &str, pixel_size: f64, field_of_view_ra: f64) -> Self {
        Self {
            name: name.to_string(),
            pixel_size: Some(pixel_size),
            field_of_view_ra: Some(field_of_view_ra),
        }
    }

    /// Describe an instrument from its pixel grid
    ///
    /// The RA field of view is `num_pix_ra * pixel_size`.
    pub fn from_pixel_grid(name: &str, num_pix_ra: usize, pixel_size: f64) -> Self {
        Self::new(name, pixel_size, num_pix_ra as f64 * pixel_size)
    }
}

impl InstrumentGeometry for Instrument {
    fn pixel_size(&self) -> Option<f64> {
        self.pixel_size
    }

    fn field_of_view_ra(&self) -> Option<f64> {
        self.field_of_view_ra
    }
}

/// Shape and pixel size of a 2-D pixel grid, such as a FITS image
///
/// `num_pix_x` runs along RA, so the RA field of view is
/// `num_pix_x * pixel_size`. Usable directly as an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelGrid {
    pub num_pix_x: usize,

    pub num_pix_y: usize,

    #[serde(default)]
    pub pixel_size: Option<f64>,
}

impl PixelGrid {
    pub fn new(num_pix_x: usize, num_pix_y: usize, pixel_size: f64) -> Self {
        Self {
            num_pix_x,
            num_pix_y,
            pixel_size: Some(pixel_size),
        }
    }

    /// `(num_pix_x, num_pix_y)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_pix_x, self.num_pix_y)
    }

    /// Total pixel count, `None` on overflow
    pub fn num_pixels(&self) -> Option<usize> {
        self.num_pix_x.checked_mul(self.num_pix_y)
    }

    pub fn field_of_view_dec(&self) -> Option<f64> {
        self.pixel_size.map(|size| self.num_pix_y as f64 * size)
    }
}

impl InstrumentGeometry for PixelGrid {
    fn pixel_size(&self) -> Option<f64> {
        self.pixel_size
    }

    fn field_of_view_ra(&self) -> Option<f64> {
        self.pixel_size.map(|size| self.num_pix_x as f64 * size)
    }
}

/// Linear pixel to angle mapping derived from an instrument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelToAngle {
    /// Diagonal 2x2 matrix scaling pixel displacements to angles
    pub matrix: Matrix2<f64>,

    /// RA of pixel `(0, 0)`
    pub ra_at_xy_0: f64,

    /// Dec of pixel `(0, 0)`
    pub dec_at_xy_0: f64,
}

impl PixelToAngle {
    /// Angular coordinates `(ra, dec)` of pixel `(x, y)`
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let angle = self.matrix * Vector2::new(x, y) + Vector2::new(self.ra_at_xy_0, self.dec_at_xy_0);
        (angle.x, angle.y)
    }
}

/// Orientation and origin conventions of the pixel grid
///
/// # Examples
///
/// ```
/// use lensmodel_api::coordinates::{Coordinates, Instrument};
///
/// let mut coords = Coordinates::parse("left", "top", "center").unwrap();
/// coords.update_with_instrument(&Instrument::new("HST", 0.1, 10.0)).unwrap();
///
/// let m = coords.pix2angle_matrix().unwrap();
/// assert_eq!((m[(0, 0)], m[(1, 1)]), (0.1, 0.1));
/// assert!((coords.ra_at_xy_0().unwrap() + 4.95).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    orientation_ra: RaOrientation,

    orientation_dec: DecOrientation,

    origin_position: OriginPosition,

    #[serde(skip)]
    binding: Option<PixelToAngle>,
}

impl Coordinates {
    pub fn new(
        orientation_ra: RaOrientation,
        orientation_dec: DecOrientation,
        origin_position: OriginPosition,
    ) -> Self {
        Self {
            orientation_ra,
            orientation_dec,
            origin_position,
            binding: None,
        }
    }

    /// Build from the textual conventions
    ///
    /// Fails with [`CoordinatesError::InvalidChoice`] if any string is outside
    /// its allowed set.
    pub fn parse(orientation_ra: &str, orientation_dec: &str, origin_position: &str) -> Result<Self, CoordinatesError> {
        Ok(Self::new(
            orientation_ra.parse()?,
            orientation_dec.parse()?,
            origin_position.parse()?,
        ))
    }

    pub fn orientation_ra(&self) -> RaOrientation {
        self.orientation_ra
    }

    pub fn orientation_dec(&self) -> DecOrientation {
        self.orientation_dec
    }

    pub fn origin_position(&self) -> OriginPosition {
        self.origin_position
    }

    /// Derive the pixel to angle mapping for an instrument
    ///
    /// The instrument is only read. On failure the previous binding, if any,
    /// is kept.
    pub fn update_with_instrument(&mut self, instrument: &impl InstrumentGeometry) -> Result<(), CoordinatesError> {
        let pixel_size = instrument
            .pixel_size()
            .ok_or(CoordinatesError::AttributeMissing { attribute: "pixel_size" })?;

        let sign_ra = f64::from(u8::from(self.orientation_ra == RaOrientation::Left));
        let sign_dec = f64::from(u8::from(self.orientation_dec == DecOrientation::Top));
        if sign_ra == 0.0 || sign_dec == 0.0 {
            warn!(
                "orientation ({}, {}) collapses an axis of the pix2angle matrix to zero",
                self.orientation_ra, self.orientation_dec
            );
        }

        let matrix = Matrix2::new(sign_ra * pixel_size, 0.0, 0.0, sign_dec * pixel_size);

        let (ra_at_xy_0, dec_at_xy_0) = match self.origin_position {
            OriginPosition::Center => {
                let fov_ra = instrument.field_of_view_ra().ok_or(CoordinatesError::AttributeMissing {
                    attribute: "field_of_view_ra",
                })?;
                let half_fov_ra = fov_ra / 2.0;
                let half_fov_dec = fov_ra / 2.0;
                (-half_fov_ra + pixel_size / 2.0, -half_fov_dec + pixel_size / 2.0)
            }
            OriginPosition::BottomLeft => (0.0, 0.0),
        };

        debug!(
            "coordinates bound: pixel size {}, pixel (0, 0) at ({}, {})",
            pixel_size, ra_at_xy_0, dec_at_xy_0
        );
        self.binding = Some(PixelToAngle {
            matrix,
            ra_at_xy_0,
            dec_at_xy_0,
        });
        Ok(())
    }

    /// The derived mapping, `None` until bound to an instrument
    pub fn pixel_to_angle(&self) -> Option<&PixelToAngle> {
        self.binding.as_ref()
    }

    pub fn pix2angle_matrix(&self) -> Option<Matrix2<f64>> {
        self.binding.map(|b| b.matrix)
    }

    pub fn ra_at_xy_0(&self) -> Option<f64> {
        self.binding.map(|b| b.ra_at_xy_0)
    }

    pub fn dec_at_xy_0(&self) -> Option<f64> {
        self.binding.map(|b| b.dec_at_xy_0)
    }

    /// Angular coordinates of pixel `(x, y)`, `None` until bound
    pub fn pixel_to_radec(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.binding.map(|b| b.apply(x, y))
    }
}
