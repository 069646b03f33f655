//! Dense-array backend for geolab
//!
//! Registers the full operation catalogue against `ndarray` types, following
//! NumPy conventions. Linear algebra is delegated to `nalgebra`.
//!
//! # Native types
//!
//! - `ArrayD<f64>` and plain `f64` scalars, grouped as [`numeric()`]
//! - `ArrayD<f32>`, `ArrayD<i64>` and complex arrays for dtype queries,
//!   `create_complex` and `complex_conj`
//! - [`CsrMatrix<f64>`] for `reciprocal_no_nan`
//! - `ChaCha8Rng` as the random generator, with [`DenseRandomState`] snapshots
//!
//! # Example
//!
//! ```rust
//! use geolab_core::{ops, DispatchRegistry, Value};
//! use ndarray::array;
//!
//! let registry = DispatchRegistry::new();
//! geolab_ndarray::register(&registry).unwrap();
//!
//! let a = Value::new(array![1.0, 2.0, 3.0].into_dyn());
//! let out = ops::cumsum(&registry, &a, None).unwrap();
//! assert_eq!(
//!     out.get::<ndarray::ArrayD<f64>>().unwrap(),
//!     &array![1.0, 3.0, 6.0].into_dyn()
//! );
//! ```

pub mod array;
pub mod convert;
pub mod linalg;
pub mod random;
pub mod sparse;

mod register;

pub use random::DenseRandomState;
pub use sparse::CsrMatrix;

pub use ndarray;
pub use rand_chacha::ChaCha8Rng;

use geolab_core::{Backend, DispatchRegistry, Result, TypeKey, TypePattern};
use ndarray::ArrayD;

/// Values the dense backend treats as numeric: `f64` and `ArrayD<f64>`
pub fn numeric() -> TypePattern {
    TypePattern::named_union(
        "Numeric",
        [TypeKey::of::<f64>(), TypeKey::of::<ArrayD<f64>>()],
    )
}

/// The ndarray backend
#[derive(Clone, Copy, Debug, Default)]
pub struct NdarrayBackend;

impl Backend for NdarrayBackend {
    fn backend_name(&self) -> &'static str {
        "ndarray"
    }

    fn register(&self, registry: &DispatchRegistry) -> Result<()> {
        register::register_all(registry)
    }
}

/// Install the ndarray backend into `registry`
pub fn register(registry: &DispatchRegistry) -> Result<()> {
    registry.install(&NdarrayBackend)
}
