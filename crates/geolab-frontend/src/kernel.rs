//! The kernel contract consumed by the adapter

use geolab_core::{Result, Value};
use serde::{Deserialize, Serialize};

/// Hyperparameters passed to every kernel evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    pub lengthscale: f64,
    /// Smoothness; `f64::INFINITY` selects the limiting kernel
    pub nu: f64,
}

impl KernelParams {
    pub fn new(lengthscale: f64, nu: f64) -> Self {
        Self { lengthscale, nu }
    }
}

/// A kernel that does not store its own hyperparameters
///
/// Inputs and outputs are backend values, so one kernel works with every
/// backend its implementation dispatches to.
pub trait GeometricKernel: Send + Sync {
    /// Default hyperparameters
    fn init_params(&self) -> KernelParams;

    /// Cross-covariance between `x1` and `x2`
    fn k(&self, params: &KernelParams, x1: &Value, x2: &Value) -> Result<Value>;

    /// Diagonal of `k(params, x, x)`
    fn k_diag(&self, params: &KernelParams, x: &Value) -> Result<Value>;
}

impl<K: GeometricKernel + ?Sized> GeometricKernel for Box<K> {
    fn init_params(&self) -> KernelParams {
        (**self).init_params()
    }

    fn k(&self, params: &KernelParams, x1: &Value, x2: &Value) -> Result<Value> {
        (**self).k(params, x1, x2)
    }

    fn k_diag(&self, params: &KernelParams, x: &Value) -> Result<Value> {
        (**self).k_diag(params, x)
    }
}
