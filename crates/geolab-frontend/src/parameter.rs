//! Positive-constrained hyperparameters

use geolab_core::{Error, Result};

/// `ln(1 + e^x)`, evaluated without overflow
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Inverse of [`softplus`] for `y > 0`
pub fn softplus_inverse(y: f64) -> f64 {
    // y + ln(1 - e^-y)
    y + (-(-y).exp_m1()).ln()
}

/// A strictly positive value stored as an unconstrained raw number
///
/// The constrained value is `softplus(raw)`, so any update to the raw value
/// keeps it positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositiveParameter {
    raw: f64,
}

impl PositiveParameter {
    pub fn new(value: f64) -> Result<Self> {
        if !(value.is_finite() && value > 0.0) {
            return Err(Error::Configuration(format!(
                "positive parameter needs a finite value > 0, got {value}"
            )));
        }
        Ok(Self {
            raw: softplus_inverse(value),
        })
    }

    pub fn from_raw(raw: f64) -> Self {
        Self { raw }
    }

    pub fn value(&self) -> f64 {
        softplus(self.raw)
    }

    pub fn raw(&self) -> f64 {
        self.raw
    }

    pub fn set(&mut self, value: f64) -> Result<()> {
        *self = Self::new(value)?;
        Ok(())
    }

    pub fn set_raw(&mut self, raw: f64) {
        self.raw = raw;
    }
}

/// Smoothness hyperparameter `nu`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothness {
    /// Held constant; may be infinite
    Fixed(f64),
    /// Optimised through a positive constraint; always finite
    Trainable(PositiveParameter),
}

impl Smoothness {
    pub fn value(&self) -> f64 {
        match self {
            Self::Fixed(nu) => *nu,
            Self::Trainable(p) => p.value(),
        }
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self, Self::Trainable(_))
    }
}
