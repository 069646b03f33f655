//! Hyperparameter-holding wrapper around a [`GeometricKernel`]

use crate::kernel::{GeometricKernel, KernelParams};
use crate::parameter::{PositiveParameter, Smoothness};
use geolab_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Construction options; `None` fields fall back to the kernel's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub lengthscale: Option<f64>,
    pub nu: Option<f64>,
    pub trainable_nu: bool,
}

/// Adapter that owns a kernel's lengthscale and smoothness
///
/// Whether `nu` is trainable is fixed at construction.
#[derive(Debug)]
pub struct GeometricKernelAdapter<K> {
    base: K,
    lengthscale: PositiveParameter,
    nu: Smoothness,
}

impl<K: GeometricKernel> GeometricKernelAdapter<K> {
    /// Wrap `base`, failing with [`Error::Configuration`] when a trainable
    /// `nu` would start at infinity
    pub fn new(base: K, config: AdapterConfig) -> Result<Self> {
        let defaults = base.init_params();
        let lengthscale = config.lengthscale.unwrap_or(defaults.lengthscale);
        let nu = config.nu.unwrap_or(defaults.nu);

        let nu = if config.trainable_nu {
            if nu.is_infinite() {
                return Err(Error::Configuration(
                    "cannot have trainable `nu` parameter with infinite value".into(),
                ));
            }
            Smoothness::Trainable(PositiveParameter::new(nu)?)
        } else {
            Smoothness::Fixed(nu)
        };

        log::debug!(
            "kernel adapter: lengthscale = {lengthscale}, nu = {} ({})",
            nu.value(),
            if nu.is_trainable() { "trainable" } else { "fixed" }
        );

        Ok(Self {
            base,
            lengthscale: PositiveParameter::new(lengthscale)?,
            nu,
        })
    }

    pub fn base(&self) -> &K {
        &self.base
    }

    pub fn lengthscale(&self) -> f64 {
        self.lengthscale.value()
    }

    pub fn set_lengthscale(&mut self, value: f64) -> Result<()> {
        self.lengthscale.set(value)
    }

    pub fn nu(&self) -> f64 {
        self.nu.value()
    }

    pub fn trainable_nu(&self) -> bool {
        self.nu.is_trainable()
    }

    /// Replace `nu`; infinity is rejected while `nu` is trainable
    pub fn set_nu(&mut self, value: f64) -> Result<()> {
        match &mut self.nu {
            Smoothness::Trainable(_) if value.is_infinite() => Err(Error::Configuration(
                "cannot have infinite `nu` value when trainable_nu = true".into(),
            )),
            Smoothness::Trainable(p) => p.set(value),
            Smoothness::Fixed(nu) => {
                *nu = value;
                Ok(())
            }
        }
    }

    /// Current hyperparameters as handed to the kernel
    pub fn params(&self) -> KernelParams {
        KernelParams::new(self.lengthscale(), self.nu())
    }

    /// Trainable raw values by name, lengthscale first
    pub fn raw_parameters(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![("raw_lengthscale", self.lengthscale.raw())];
        if let Smoothness::Trainable(p) = &self.nu {
            out.push(("raw_nu", p.raw()));
        }
        out
    }

    /// Overwrite a raw value returned by [`Self::raw_parameters`]
    pub fn set_raw_parameter(&mut self, name: &str, raw: f64) -> Result<()> {
        match (name, &mut self.nu) {
            ("raw_lengthscale", _) => self.lengthscale.set_raw(raw),
            ("raw_nu", Smoothness::Trainable(p)) => p.set_raw(raw),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "no trainable parameter named `{name}`"
                )))
            }
        }
        Ok(())
    }

    /// Evaluate the kernel, or only its diagonal on `x1` when `diag` is set
    pub fn forward(&self, x1: &Value, x2: &Value, diag: bool) -> Result<Value> {
        let params = self.params();
        if diag {
            self.base.k_diag(&params, x1)
        } else {
            self.base.k(&params, x1, x2)
        }
    }
}
