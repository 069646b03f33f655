//! Shared utilities for integration tests

#![allow(dead_code)]

use geolab::nalgebra::DMatrix;
use geolab::ndarray::{ArrayD, IxDyn};
use geolab::{DispatchRegistry, Value};

/// Registry with both backends installed
pub fn registry() -> DispatchRegistry {
    geolab::default_registry().unwrap()
}

pub fn dense(shape: &[usize], data: &[f64]) -> Value {
    Value::new(ArrayD::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap())
}

pub fn matrix(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::new(DMatrix::from_row_slice(rows, cols, data))
}

/// The same row-major 2-d data in each backend's native type
pub fn both(rows: usize, cols: usize, data: &[f64]) -> [Value; 2] {
    [dense(&[rows, cols], data), matrix(rows, cols, data)]
}

/// Elements in row-major order, whichever backend produced `value`
pub fn row_major(value: &Value) -> Vec<f64> {
    if let Some(a) = value.downcast_ref::<ArrayD<f64>>() {
        return a.iter().copied().collect();
    }
    if let Some(m) = value.downcast_ref::<DMatrix<f64>>() {
        return m.transpose().iter().copied().collect();
    }
    panic!("not a 2-d f64 value: {}", value.type_name());
}

pub fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() <= tol, "{actual:?} != {expected:?}");
    }
}

pub fn shape_of(value: &Value) -> (usize, usize) {
    if let Some(a) = value.downcast_ref::<ArrayD<f64>>() {
        return (a.shape()[0], a.shape()[1]);
    }
    if let Some(m) = value.downcast_ref::<DMatrix<f64>>() {
        return m.shape();
    }
    panic!("not a 2-d f64 value: {}", value.type_name());
}

/// Row-major product of two backend matrices
pub fn matmul(a: &Value, b: &Value) -> Vec<f64> {
    let ((n, k), (k2, m)) = (shape_of(a), shape_of(b));
    assert_eq!(k, k2);
    let (a, b) = (row_major(a), row_major(b));
    let mut out = vec![0.0; n * m];
    for i in 0..n {
        for j in 0..m {
            out[i * m + j] = (0..k).map(|p| a[i * k + p] * b[p * m + j]).sum();
        }
    }
    out
}
