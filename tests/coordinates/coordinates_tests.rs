//! Integration tests for Coordinates
//!
//! These tests pin the pixel to sky-angle conventions, including the
//! degenerate behaviour of non-positive orientations.

use approx::assert_relative_eq;
use lensmodel_api::coordinates::{
    Coordinates, CoordinatesError, DecOrientation, Instrument, InstrumentGeometry, OriginPosition,
    RaOrientation,
};
use lensmodel_api::LensModelError;

/// Instrument whose geometry is only partly known
struct PartialInstrument {
    pixel_size: Option<f64>,
    field_of_view_ra: Option<f64>,
}

impl InstrumentGeometry for PartialInstrument {
    fn pixel_size(&self) -> Option<f64> {
        self.pixel_size
    }

    fn field_of_view_ra(&self) -> Option<f64> {
        self.field_of_view_ra
    }
}

#[test]
fn test_left_top_center() {
    let mut coords = Coordinates::parse("left", "top", "center").unwrap();
    let instrument = Instrument::new("test", 0.1, 10.0);
    coords.update_with_instrument(&instrument).unwrap();

    let m = coords.pix2angle_matrix().unwrap();
    assert_relative_eq!(m[(0, 0)], 0.1);
    assert_relative_eq!(m[(1, 1)], 0.1);
    assert_eq!(m[(0, 1)], 0.0);
    assert_eq!(m[(1, 0)], 0.0);
    assert_relative_eq!(coords.ra_at_xy_0().unwrap(), -4.95, epsilon = 1e-12);
    assert_relative_eq!(coords.dec_at_xy_0().unwrap(), -4.95, epsilon = 1e-12);

    // The instrument is left untouched
    assert_eq!(instrument, Instrument::new("test", 0.1, 10.0));
}

#[test]
fn test_bottom_left_offsets_are_zero() {
    for (pixel_size, fov) in [(0.1, 10.0), (0.04, 2.0), (0.5, 64.0)] {
        let mut coords = Coordinates::parse("left", "top", "bottom left").unwrap();
        coords
            .update_with_instrument(&Instrument::new("test", pixel_size, fov))
            .unwrap();
        assert_eq!(coords.ra_at_xy_0(), Some(0.0));
        assert_eq!(coords.dec_at_xy_0(), Some(0.0));

        let (ra, dec) = coords.pixel_to_radec(2.0, 3.0).unwrap();
        assert_relative_eq!(ra, 2.0 * pixel_size);
        assert_relative_eq!(dec, 3.0 * pixel_size);
    }
}

#[test]
fn test_right_orientation_zeroes_ra_scale() {
    for pixel_size in [0.01, 0.1, 1.0] {
        let mut coords = Coordinates::new(RaOrientation::Right, DecOrientation::Top, OriginPosition::Center);
        coords
            .update_with_instrument(&Instrument::new("test", pixel_size, 5.0))
            .unwrap();
        let m = coords.pix2angle_matrix().unwrap();
        assert_eq!(m[(0, 0)], 0.0);
        assert_relative_eq!(m[(1, 1)], pixel_size);
    }
}

#[test]
fn test_dec_offset_uses_ra_field_of_view() {
    let mut coords = Coordinates::default();
    coords
        .update_with_instrument(&Instrument::from_pixel_grid("test", 50, 0.2))
        .unwrap();
    assert_relative_eq!(coords.ra_at_xy_0().unwrap(), -4.9, epsilon = 1e-12);
    assert_eq!(coords.ra_at_xy_0(), coords.dec_at_xy_0());
}

#[test]
fn test_invalid_choices() {
    for (ra, dec, origin) in [
        ("center", "top", "center"),
        ("left", "up", "center"),
        ("left", "top", "top right"),
        ("Left", "top", "center"),
    ] {
        assert!(matches!(
            Coordinates::parse(ra, dec, origin),
            Err(CoordinatesError::InvalidChoice(_))
        ));
    }
}

#[test]
fn test_missing_instrument_attributes() {
    let mut coords = Coordinates::default();

    let err = coords
        .update_with_instrument(&PartialInstrument {
            pixel_size: None,
            field_of_view_ra: Some(1.0),
        })
        .unwrap_err();
    assert_eq!(err, CoordinatesError::AttributeMissing { attribute: "pixel_size" });

    let err: LensModelError = coords
        .update_with_instrument(&PartialInstrument {
            pixel_size: Some(0.1),
            field_of_view_ra: None,
        })
        .unwrap_err()
        .into();
    assert!(err.to_string().contains("field_of_view_ra"));
    assert!(coords.pix2angle_matrix().is_none());
}

#[test]
fn test_configuration_from_json() {
    let coords: Coordinates =
        serde_json::from_str(r#"{"orientation_ra":"left","orientation_dec":"bottom","origin_position":"bottom left"}"#)
            .unwrap();
    assert_eq!(coords.orientation_dec(), DecOrientation::Bottom);
    assert_eq!(coords.origin_position(), OriginPosition::BottomLeft);
    assert!(coords.pix2angle_matrix().is_none());

    let instrument: Instrument = serde_json::from_str(r#"{"name":"JWST","pixel_size":0.03}"#).unwrap();
    assert!(instrument.field_of_view_ra.is_none());
}
