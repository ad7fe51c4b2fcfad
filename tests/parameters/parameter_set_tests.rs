//! Integration tests for parameter sets and pixel parameter sets

use lensmodel_api::parameters::{
    DefinitionRange, MemoryOrder, Parameter, ParameterError, ParameterShape,
};

fn pixel_set(values: Vec<f64>, x: Vec<f64>, y: Vec<f64>) -> Result<Parameter, ParameterError> {
    Parameter::linear("pixels", "pixelated source", DefinitionRange::min_only(0.0).unwrap())
        .initial_estimate(values)
        .build_pixel_set(x, y, MemoryOrder::C)
}

#[test]
fn test_pixel_set_construction() {
    let set = pixel_set(vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]).unwrap();
    assert_eq!(set.num_values(), 3);
    assert_eq!(set.values(), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(set.order_in_memory(), Some(MemoryOrder::C));

    let err = pixel_set(vec![1.0, 2.0, 3.0], vec![0.0, 1.0], vec![0.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(
        err,
        ParameterError::CoordinateLengthMismatch {
            num_values: 3,
            x_len: 2,
            y_len: 3,
            ..
        }
    ));
}

#[test]
fn test_default_coordinates_are_not_shared() {
    let mut a = Parameter::linear("a", "", DefinitionRange::unbounded())
        .build_pixel_set(Vec::new(), Vec::new(), MemoryOrder::default())
        .unwrap();
    let b = Parameter::linear("b", "", DefinitionRange::unbounded())
        .build_pixel_set(Vec::new(), Vec::new(), MemoryOrder::default())
        .unwrap();

    // An empty set still counts as holding a value
    assert!(a.set_value(Vec::new(), false).is_err());
    a.set_value(Vec::new(), true).unwrap();
    assert_eq!(a.x_coords(), Some(&[] as &[f64]));
    assert_eq!(b.x_coords(), Some(&[] as &[f64]));
    assert_eq!(a.order_in_memory(), Some(MemoryOrder::C));
}

#[test]
fn test_set_is_range_checked_as_a_unit() {
    let mut set = pixel_set(vec![1.0, 2.0], vec![0.0, 1.0], vec![0.0, 0.0]).unwrap();

    set.set_value(vec![0.0, 10.0], true).unwrap();
    let err = set.set_value(vec![5.0, -0.1], true).unwrap_err();
    assert!(matches!(err, ParameterError::OutOfRange { value, .. } if value == -0.1));
    assert_eq!(set.values(), Some(&[0.0, 10.0][..]));
}

#[test]
fn test_plain_set_shape() {
    let set = Parameter::linear("amps", "amplitudes", DefinitionRange::unbounded())
        .initial_estimate([1.0, 2.0, 3.0, 4.0])
        .build_set()
        .unwrap();
    assert_eq!(set.shape(), &ParameterShape::Vector { num_values: 4 });
    assert!(set.x_coords().is_none());
    assert!(set.order_in_memory().is_none());
    assert!(matches!(set.to_image(2, 2), Err(ParameterError::NotAPixelSet { .. })));
}

#[test]
fn test_image_reconstruction() {
    let values: Vec<f64> = (0..12).map(f64::from).collect();
    let coords = vec![0.0; 12];
    let c_set = Parameter::linear("c", "", DefinitionRange::unbounded())
        .initial_estimate(values.clone())
        .build_pixel_set(coords.clone(), coords.clone(), MemoryOrder::C)
        .unwrap();
    let f_set = Parameter::linear("f", "", DefinitionRange::unbounded())
        .initial_estimate(values)
        .build_pixel_set(coords.clone(), coords, MemoryOrder::F)
        .unwrap();

    let c_image = c_set.to_image(3, 4).unwrap();
    let f_image = f_set.to_image(3, 4).unwrap();
    assert_eq!(c_image.shape(), &[3, 4]);
    assert_eq!(f_image.shape(), &[3, 4]);

    for row in 0..3 {
        for col in 0..4 {
            assert_eq!(c_image[[row, col]], (row * 4 + col) as f64);
            assert_eq!(f_image[[row, col]], (col * 3 + row) as f64);
        }
    }
}
