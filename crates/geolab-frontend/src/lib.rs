//! Kernel adapter for geolab
//!
//! Geometric kernels are stateless: they receive their hyperparameters on
//! every call. [`GeometricKernelAdapter`] owns those hyperparameters so a
//! training loop can treat the kernel like any other parameterised module.
//!
//! The adapter keeps a positive lengthscale and a smoothness `nu` that is
//! either fixed (any positive value, infinity included) or trainable through
//! a softplus transform. A trainable `nu` can never be infinite.
//!
//! ```rust
//! use geolab_core::{Result, Value};
//! use geolab_frontend::{AdapterConfig, GeometricKernel, GeometricKernelAdapter, KernelParams};
//!
//! struct Constant;
//!
//! impl GeometricKernel for Constant {
//!     fn init_params(&self) -> KernelParams {
//!         KernelParams::new(1.0, f64::INFINITY)
//!     }
//!
//!     fn k(&self, params: &KernelParams, _x1: &Value, _x2: &Value) -> Result<Value> {
//!         Ok(Value::new(params.lengthscale))
//!     }
//!
//!     fn k_diag(&self, params: &KernelParams, _x: &Value) -> Result<Value> {
//!         Ok(Value::new(params.lengthscale))
//!     }
//! }
//!
//! let config = AdapterConfig { trainable_nu: true, ..AdapterConfig::default() };
//! assert!(GeometricKernelAdapter::new(Constant, config).is_err());
//! ```

pub mod adapter;
pub mod kernel;
pub mod parameter;

pub use adapter::{AdapterConfig, GeometricKernelAdapter};
pub use kernel::{GeometricKernel, KernelParams};
pub use parameter::{softplus, softplus_inverse, PositiveParameter, Smoothness};
