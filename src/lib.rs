//! Backend-agnostic numerical primitives with runtime type-based dispatch
//!
//! `geolab` offers one catalogue of linear-algebra and array primitives that
//! behaves the same whichever numerical engine stores the data. Callers hand
//! [`Value`]s to the registry; the runtime types pick the implementation.
//!
//! # Crates
//!
//! - [`dispatch`] - values, type patterns, the dispatch registry and the typed
//!   [`ops`] facade
//! - [`dense`] - the ndarray backend (feature `ndarray-backend`)
//! - [`matrix`] - the nalgebra backend (feature `nalgebra-backend`)
//! - [`frontend`] - the kernel adapter
//!
//! # Example
//!
//! ```rust
//! use geolab::prelude::*;
//! use geolab::ndarray::array;
//!
//! let registry = geolab::default_registry()?;
//! let a = Value::new(array![[0.0, 1.0], [1.0, 0.0]].into_dyn());
//! let d = ops::degree(&registry, &a)?;
//! assert!(d.is::<geolab::ndarray::ArrayD<f64>>());
//! # Ok::<(), geolab::Error>(())
//! ```

pub use geolab_core as dispatch;
pub use geolab_frontend as frontend;

#[cfg(feature = "ndarray-backend")]
pub use geolab_ndarray as dense;
#[cfg(feature = "ndarray-backend")]
pub use geolab_ndarray::ndarray;

#[cfg(feature = "nalgebra-backend")]
pub use geolab_nalgebra as matrix;
#[cfg(feature = "nalgebra-backend")]
pub use geolab_nalgebra::nalgebra;

pub use geolab_core::{
    ops, Backend, CallArgs, DType, DispatchRegistry, Error, Literal, NormOrder, Operation,
    QrMode, Result, Returned, Signature, Triangle, TypePattern, Value,
};
pub use geolab_frontend::{AdapterConfig, GeometricKernel, GeometricKernelAdapter, KernelParams};

use lazy_static::lazy_static;

/// Backends enabled by Cargo features, in installation order
pub fn enabled_backends() -> Vec<&'static dyn Backend> {
    #[allow(unused_mut)]
    let mut backends: Vec<&'static dyn Backend> = Vec::new();
    #[cfg(feature = "ndarray-backend")]
    backends.push(&geolab_ndarray::NdarrayBackend);
    #[cfg(feature = "nalgebra-backend")]
    backends.push(&geolab_nalgebra::NalgebraBackend);
    backends
}

/// A fresh registry with every enabled backend installed
pub fn default_registry() -> Result<DispatchRegistry> {
    let registry = DispatchRegistry::with_backends(&enabled_backends())?;
    log::debug!(
        "default registry: {} implementations across {} operations",
        registry.len(),
        registry.operations().len()
    );
    Ok(registry)
}

lazy_static! {
    static ref GLOBAL_REGISTRY: std::result::Result<DispatchRegistry, String> =
        default_registry().map_err(|e| e.to_string());
}

/// Process-wide registry built from [`default_registry`] on first use
///
/// Collaborators may register further operations on it; every entry lives for
/// the rest of the process.
pub fn global_registry() -> Result<&'static DispatchRegistry> {
    GLOBAL_REGISTRY
        .as_ref()
        .map_err(|e| Error::Configuration(format!("global registry failed to build: {e}")))
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use geolab_core::prelude::*;
    pub use geolab_frontend::{AdapterConfig, GeometricKernel, GeometricKernelAdapter, KernelParams};
}
