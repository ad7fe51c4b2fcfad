//! Integration tests for the Parameter struct
//!
//! These tests verify that the Parameter struct behaves correctly in various scenarios.

use crate::test_helpers::bounded_parameter;
use lensmodel_api::parameters::{
    DefinitionRange, EstimateValue, GaussianPrior, Parameter, ParameterError, ParameterRole,
    PointEstimate, RangeViolation, SampledPosterior, UniformPrior,
};
use lensmodel_api::LensModelError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_parameter_lifecycle() {
    // Create a parameter
    let range = DefinitionRange::new(Some(0.0), Some(5.0)).unwrap();
    let mut param = Parameter::non_linear("theta_E", "Einstein radius", range)
        .units("arcsec")
        .latex_name(r"$\theta_{\rm E}$")
        .build()
        .unwrap();

    // Check initial state
    assert_eq!(param.name(), "theta_E");
    assert_eq!(param.units(), Some("arcsec"));
    assert_eq!(param.latex_name(), r"$\theta_{\rm E}$");
    assert!(param.value().is_none());
    assert!(param.is_free());
    assert!(param.id().is_none());

    // Cannot fix without a value
    assert!(param.fix().is_err());

    // Value outside the range (should fail)
    assert!(param.set_value(-1.0, false).is_err());
    assert!(param.set_value(6.0, false).is_err());
    assert!(param.value().is_none());

    // Value inside the range (should succeed)
    param.set_value(1.5, false).unwrap();
    assert_eq!(param.scalar_value(), Some(1.5));

    // Second value needs overwrite
    assert!(param.set_value(2.0, false).is_err());
    param.set_value(2.0, true).unwrap();
    assert_eq!(param.scalar_value(), Some(2.0));

    // Fix and free again
    param.fix().unwrap();
    assert!(param.is_fixed());
    param.unfix();
    assert!(param.is_free());

    // Priors
    param.set_prior(GaussianPrior::new(1.8, 0.3)).unwrap();
    assert_eq!(param.prior().unwrap().name(), "gaussian");
    param.remove_prior();
    assert!(param.prior().is_none());
}

#[test]
fn test_point_estimate_wrapping() {
    let range = DefinitionRange::unbounded();

    let wrapped = Parameter::builder("a", "raw value", range)
        .initial_estimate(3.0)
        .build()
        .unwrap();
    let explicit = Parameter::builder("a", "explicit estimate", range)
        .initial_point_estimate(PointEstimate::new(3.0))
        .build()
        .unwrap();

    assert_eq!(wrapped.initial_estimate(), explicit.initial_estimate());
    assert_eq!(wrapped.point_estimate(), wrapped.initial_estimate());
    assert_eq!(wrapped.value(), Some(&EstimateValue::Scalar(3.0)));
}

#[test]
fn test_out_of_range_reports_the_bound() {
    let mut param = bounded_parameter("e1", Some(-0.5), Some(0.5));
    match param.set_value(0.75, false) {
        Err(ParameterError::OutOfRange {
            name,
            value,
            violation,
            bound,
        }) => {
            assert_eq!(name, "e1");
            assert_eq!(value, 0.75);
            assert_eq!(violation, RangeViolation::AboveMax);
            assert_eq!(bound, 0.5);
        }
        other => panic!("Expected OutOfRange, got {:?}", other),
    }

    let err = param.set_value(-0.75, false).unwrap_err();
    assert!(err.to_string().contains("cannot be smaller than -0.5"));
}

#[test]
fn test_invalid_prior_keeps_previous_one() {
    let mut param = bounded_parameter("gamma", Some(1.0), Some(3.0));
    param.set_prior(UniformPrior::new(1.5, 2.5)).unwrap();

    let err = param.set_prior(UniformPrior::new(2.5, 1.5)).unwrap_err();
    assert!(matches!(err, ParameterError::InvalidPrior { ref name, .. } if name == "gamma"));

    let prior = param.prior().unwrap();
    assert_eq!(prior.name(), "uniform");

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let draw = prior.sample(&mut rng).unwrap();
    assert!((1.5..=2.5).contains(&draw));
}

#[test]
fn test_posterior_summary() {
    let mut param = bounded_parameter("gamma", Some(1.0), Some(3.0));
    assert!(param.posterior().unwrap().mean().is_none());

    param.set_posterior(SampledPosterior::new(vec![1.9, 2.0, 2.1]));
    let posterior = param.posterior().unwrap();
    assert!(crate::test_helpers::approx_eq(posterior.mean().unwrap(), 2.0, 1e-12));
    assert!(crate::test_helpers::approx_eq(posterior.median().unwrap(), 2.0, 1e-12));
}

#[test]
fn test_errors_convert_into_crate_error() {
    fn fix_unset() -> lensmodel_api::Result<()> {
        let mut param = bounded_parameter("x", None, None);
        param.fix()?;
        Ok(())
    }

    match fix_unset() {
        Err(LensModelError::Parameter(ParameterError::NoValue { name })) => assert_eq!(name, "x"),
        other => panic!("Expected NoValue, got {:?}", other),
    }
}

#[test]
fn test_roles() {
    let range = DefinitionRange::unbounded();
    let roles = [
        Parameter::non_linear("a", "", range).build().unwrap().role(),
        Parameter::linear("b", "", range).build().unwrap().role(),
        Parameter::hyper("c", "", range).build().unwrap().role(),
    ];
    assert_eq!(
        roles,
        [ParameterRole::NonLinear, ParameterRole::Linear, ParameterRole::Hyper]
    );
}
