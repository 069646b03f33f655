//! Shared utilities for integration tests

#![allow(dead_code)]

use geolab_core::{DispatchRegistry, Value};
use ndarray::{ArrayD, IxDyn};

/// Registry with only the ndarray backend installed
pub fn registry() -> DispatchRegistry {
    let registry = DispatchRegistry::new();
    geolab_ndarray::register(&registry).unwrap();
    registry
}

pub fn dense(shape: &[usize], data: &[f64]) -> Value {
    Value::new(ArrayD::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap())
}

pub fn array_of(value: &Value) -> &ArrayD<f64> {
    value.get::<ArrayD<f64>>().unwrap()
}

pub fn scalar_of(value: &Value) -> f64 {
    *value.get::<f64>().unwrap()
}

pub fn assert_all_close(actual: &ArrayD<f64>, expected: &ArrayD<f64>, tol: f64) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() <= tol, "{actual} != {expected}");
    }
}
