//! Integration tests for the ParameterList registry

use lensmodel_api::parameters::{
    DefinitionRange, GaussianPrior, MemoryOrder, Parameter, ParameterError, ParameterId, ParameterList,
    PriorSpec, SerializationError, UniformPrior,
};
use lensmodel_api::profile::{Profile, ProfileKind};
use std::env;

fn sie_parameters() -> Vec<Parameter> {
    vec![
        Parameter::non_linear("theta_E", "Einstein radius", DefinitionRange::min_only(0.0).unwrap())
            .initial_estimate(1.0)
            .build()
            .unwrap(),
        Parameter::non_linear("e1", "ellipticity 1", DefinitionRange::new(Some(-0.5), Some(0.5)).unwrap())
            .build()
            .unwrap(),
        Parameter::non_linear("e2", "ellipticity 2", DefinitionRange::new(Some(-0.5), Some(0.5)).unwrap())
            .build()
            .unwrap(),
    ]
}

#[test]
fn test_registry_assigns_ids() {
    let mut params = ParameterList::new();
    let ids: Vec<ParameterId> = sie_parameters()
        .into_iter()
        .map(|p| params.add(p).unwrap())
        .collect();
    assert_eq!(ids, vec![ParameterId(0), ParameterId(1), ParameterId(2)]);

    // Ids survive mutation
    let e1 = params.get_mut("e1").unwrap();
    e1.set_value(0.1, false).unwrap();
    e1.fix().unwrap();
    assert_eq!(params.get("e1").unwrap().id(), Some(ParameterId(1)));
    assert_eq!(params.get_by_id(ParameterId(2)).unwrap().name(), "e2");
}

#[test]
fn test_registry_rejects_duplicates() {
    let mut params = ParameterList::from_parameters(sie_parameters()).unwrap();
    let err = params
        .add(
            Parameter::builder("e1", "again", DefinitionRange::unbounded())
                .build()
                .unwrap(),
        )
        .unwrap_err();
    assert_eq!(err, ParameterError::DuplicateName { name: "e1".to_string() });
    assert_eq!(params.len(), 3);
}

#[test]
fn test_profile_parameters() {
    let mut profile =
        Profile::with_parameters("SIE", "isothermal ellipsoid", ProfileKind::Mass, sie_parameters()).unwrap();
    let params = profile.parameters_mut();
    params.require_mut("e2").unwrap().set_value(-0.2, false).unwrap();

    // e1 has no value yet
    assert!(matches!(
        params.free_values(),
        Err(ParameterError::NoValue { ref name }) if name == "e1"
    ));

    params.require_mut("e1").unwrap().set_value(0.1, false).unwrap();
    assert_eq!(params.free_values().unwrap(), vec![1.0, 0.1, -0.2]);

    params.require_mut("theta_E").unwrap().fix().unwrap();
    assert_eq!(params.free_values().unwrap(), vec![0.1, -0.2]);
    assert_eq!(profile.parameters().num_free_values(), 2);
}

#[test]
fn test_save_and_load_json() {
    let mut params = ParameterList::from_parameters(sie_parameters()).unwrap();
    params
        .add(
            Parameter::linear("pixels", "source pixels", DefinitionRange::unbounded())
                .initial_estimate(vec![0.5, 0.25])
                .build_pixel_set(vec![0.0, 1.0], vec![0.0, 0.0], MemoryOrder::F)
                .unwrap(),
        )
        .unwrap();

    let path = env::temp_dir().join(format!("lensmodel_api_params_{}.json", std::process::id()));
    params.save_json(&path).unwrap();
    let loaded = ParameterList::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.names(), vec!["theta_E", "e1", "e2", "pixels"]);
    assert_eq!(loaded.get("pixels").unwrap().id(), Some(ParameterId(3)));
    assert_eq!(loaded.get("pixels").unwrap().order_in_memory(), Some(MemoryOrder::F));
    assert_eq!(loaded.num_free_values(), 5);
}

#[test]
fn test_priors_round_trip_through_json() {
    let mut params = ParameterList::from_parameters(sie_parameters()).unwrap();
    params
        .require_mut("theta_E")
        .unwrap()
        .set_prior(GaussianPrior::new(1.2, 0.1))
        .unwrap();
    params
        .require_mut("e1")
        .unwrap()
        .set_prior(UniformPrior::new(-0.5, 0.5))
        .unwrap();
    params.require_mut("e2").unwrap().remove_prior();

    let loaded = ParameterList::from_json(&params.to_json().unwrap()).unwrap();
    let spec = |name: &str| loaded.get(name).unwrap().prior().and_then(|p| p.to_spec());
    assert_eq!(spec("theta_E"), Some(PriorSpec::Gaussian { mean: 1.2, sigma: 0.1 }));
    assert_eq!(spec("e1"), Some(PriorSpec::Uniform { min: -0.5, max: 0.5 }));
    assert!(loaded.get("e2").unwrap().prior().is_none());
}

#[test]
fn test_load_rejects_fixed_parameter_without_value() {
    let json = r#"{
      "parameters": [
        {
          "name": "gamma",
          "description": "power-law slope",
          "definition_range": { "min_value": 1.0, "max_value": 3.0 },
          "fixed": true,
          "point_estimate": { "value": null },
          "shape": { "kind": "scalar" }
        }
      ]
    }"#;

    assert!(matches!(ParameterList::from_json(json), Err(SerializationError::Json(_))));
    let with_value = json.replace(r#""value": null"#, r#""value": 2.0"#);
    let list = ParameterList::from_json(&with_value).unwrap();
    assert!(list.get("gamma").unwrap().is_fixed());
}

#[test]
fn test_load_missing_file() {
    let path = env::temp_dir().join("lensmodel_api_missing_dir").join("params.json");
    match ParameterList::load_json(&path) {
        Err(SerializationError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected Io error, got {:?}", other.map(|l| l.len())),
    }
}

#[test]
fn test_load_rejects_broken_pixel_set() {
    let json = r#"{
      "parameters": [
        {
          "name": "pixels",
          "description": "source pixels",
          "units": null,
          "definition_range": { "min_value": null, "max_value": null },
          "fixed": false,
          "initial_estimate": { "value": [1.0, 2.0] },
          "point_estimate": { "value": [1.0, 2.0] },
          "latex_name": "pixels",
          "id": 0,
          "role": "linear",
          "shape": {
            "kind": "pixel_vector",
            "num_values": 2,
            "x_coords": [0.0],
            "y_coords": [0.0, 1.0],
            "order_in_memory": "C"
          }
        }
      ]
    }"#;

    assert!(ParameterList::from_json(json).is_err());
    let fixed = json.replace(r#""x_coords": [0.0]"#, r#""x_coords": [0.0, 1.0]"#);
    let list = ParameterList::from_json(&fixed).unwrap();
    assert_eq!(list.get("pixels").unwrap().num_values(), 2);
}
