//! Kernel adapter driving a concrete kernel

mod common;

use approx::assert_relative_eq;
use common::{gram, points, LineMatern};
use geolab_core::Error;
use geolab_frontend::{AdapterConfig, GeometricKernelAdapter};

#[test]
fn test_config_from_json() {
    let config: AdapterConfig =
        serde_json::from_str(r#"{ "lengthscale": 0.5, "nu": 1.5, "trainable_nu": true }"#).unwrap();
    assert_eq!(config.lengthscale, Some(0.5));
    assert!(config.trainable_nu);

    let partial: AdapterConfig = serde_json::from_str(r#"{ "nu": 2.5 }"#).unwrap();
    assert_eq!(partial, AdapterConfig { nu: Some(2.5), ..AdapterConfig::default() });
}

#[test]
fn test_infinite_trainable_nu_fails_before_evaluation() {
    let kernel = LineMatern::default();
    let config = AdapterConfig {
        trainable_nu: true,
        ..AdapterConfig::default()
    };
    let err = GeometricKernelAdapter::new(kernel, config).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_forward_gram_and_diagonal() {
    let config = AdapterConfig {
        lengthscale: Some(2.0),
        nu: Some(0.5),
        trainable_nu: false,
    };
    let adapter = GeometricKernelAdapter::new(LineMatern::default(), config).unwrap();
    let x = points(&[0.0, 1.0]);

    let k = adapter.forward(&x, &x, false).unwrap();
    let k = gram(&k);
    assert_relative_eq!(k[0][0], 1.0);
    assert_relative_eq!(k[0][1], (-0.5f64).exp(), max_relative = 1e-12);
    assert_relative_eq!(k[0][1], k[1][0]);

    let diag = adapter.forward(&x, &x, true).unwrap();
    assert_eq!(diag.get::<Vec<f64>>().unwrap(), &vec![1.0, 1.0]);
}

#[test]
fn test_hyperparameter_updates_reach_kernel() {
    let config = AdapterConfig {
        nu: Some(1.5),
        trainable_nu: true,
        ..AdapterConfig::default()
    };
    let mut adapter = GeometricKernelAdapter::new(LineMatern::default(), config).unwrap();
    adapter.set_lengthscale(3.0).unwrap();
    adapter.set_nu(2.5).unwrap();

    let x = points(&[0.0]);
    adapter.forward(&x, &x, false).unwrap();

    let seen = adapter.base().seen.lock().unwrap();
    assert_relative_eq!(seen[0].lengthscale, 3.0, max_relative = 1e-12);
    assert_relative_eq!(seen[0].nu, 2.5, max_relative = 1e-12);
    assert_eq!(adapter.raw_parameters().len(), 2);
}

#[test]
fn test_kernel_errors_propagate() {
    let config = AdapterConfig {
        nu: Some(0.7),
        ..AdapterConfig::default()
    };
    let adapter = GeometricKernelAdapter::new(LineMatern::default(), config).unwrap();
    let x = points(&[0.0, 1.0]);
    assert!(matches!(
        adapter.forward(&x, &x, false),
        Err(Error::InvalidArgument(_))
    ));
}
