//! Shared utilities for integration tests

#![allow(dead_code)]

use geolab_core::{DispatchRegistry, Value};
use nalgebra::{DMatrix, DVector, Matrix1};

/// Registry with only the nalgebra backend installed
pub fn registry() -> DispatchRegistry {
    let registry = DispatchRegistry::new();
    geolab_nalgebra::register(&registry).unwrap();
    registry
}

pub fn matrix(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::new(DMatrix::from_row_slice(rows, cols, data))
}

pub fn vector(data: &[f64]) -> Value {
    Value::new(DVector::from_row_slice(data))
}

pub fn matrix_of(value: &Value) -> &DMatrix<f64> {
    value.get::<DMatrix<f64>>().unwrap()
}

pub fn vector_of(value: &Value) -> &DVector<f64> {
    value.get::<DVector<f64>>().unwrap()
}

pub fn scalar_of(value: &Value) -> f64 {
    value.get::<Matrix1<f64>>().unwrap()[(0, 0)]
}
