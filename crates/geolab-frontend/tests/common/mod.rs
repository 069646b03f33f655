//! Shared utilities for integration tests

#![allow(dead_code)]

use geolab_core::{Error, Result, Value};
use geolab_frontend::{GeometricKernel, KernelParams};
use std::sync::Mutex;

/// Matérn kernel on points of the real line, for `nu` in {1/2, 3/2, 5/2, inf}
#[derive(Debug, Default)]
pub struct LineMatern {
    pub seen: Mutex<Vec<KernelParams>>,
}

impl LineMatern {
    fn points(value: &Value) -> Result<&Vec<f64>> {
        value.get::<Vec<f64>>()
    }

    fn covariance(params: &KernelParams, r: f64) -> Result<f64> {
        let d = r.abs() / params.lengthscale;
        let nu = params.nu;
        if nu.is_infinite() {
            return Ok((-0.5 * d * d).exp());
        }
        let s = if nu == 0.5 {
            1.0
        } else if nu == 1.5 {
            1.0 + 3f64.sqrt() * d
        } else if nu == 2.5 {
            1.0 + 5f64.sqrt() * d + 5.0 * d * d / 3.0
        } else {
            return Err(Error::InvalidArgument(format!("unsupported nu {nu}")));
        };
        Ok(s * (-(2.0 * nu).sqrt() * d).exp())
    }
}

impl GeometricKernel for LineMatern {
    fn init_params(&self) -> KernelParams {
        KernelParams::new(1.0, f64::INFINITY)
    }

    fn k(&self, params: &KernelParams, x1: &Value, x2: &Value) -> Result<Value> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(*params);
        }
        let (x1, x2) = (Self::points(x1)?, Self::points(x2)?);
        let rows = x1
            .iter()
            .map(|a| {
                x2.iter()
                    .map(|b| Self::covariance(params, a - b))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::new(rows))
    }

    fn k_diag(&self, params: &KernelParams, x: &Value) -> Result<Value> {
        let n = Self::points(x)?.len();
        Ok(Value::new(vec![Self::covariance(params, 0.0)?; n]))
    }
}

pub fn points(xs: &[f64]) -> Value {
    Value::new(xs.to_vec())
}

pub fn gram(value: &Value) -> &Vec<Vec<f64>> {
    value.get::<Vec<Vec<f64>>>().unwrap()
}
