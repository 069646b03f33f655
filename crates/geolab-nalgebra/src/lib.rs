//! Matrix backend for geolab
//!
//! Registers the operation catalogue against `nalgebra` types, following
//! TensorFlow conventions where the two backends differ:
//!
//! - `take_along_axis` gathers whole rows or columns at a flattened index
//! - `cumsum` without an axis runs down axis 0
//! - `norm` without an axis treats the input as one flat vector
//! - `eigvalsh` reads the lower triangle by default
//! - `dtype_integer` is `int32`
//!
//! # Native types
//!
//! `DMatrix<T>` and `DVector<T>` for `f64`, `f32`, `i32` and complex
//! elements, `Matrix1<f64>` for rank-0 results, and `ChaCha20Rng` as the
//! random generator.
//!
//! The gather, integration, norm and log-spacing entries accept the wider
//! [`numeric()`] union, which also covers plain `f64` and `ArrayD<f64>`.
//! When the dense backend is installed as well, its narrower entries win
//! for those foreign types.

pub mod array;
pub mod linalg;
pub mod random;
pub mod tensor;

mod register;

pub use random::{GeneratorState, RandomState, RngAlgorithm};
pub use tensor::Tensor;

pub use nalgebra;
pub use rand_chacha::ChaCha20Rng;

use geolab_core::{Backend, DispatchRegistry, Result, TypeKey, TypePattern};
use nalgebra::{DMatrix, DVector, Matrix1};
use ndarray::ArrayD;

/// Values the matrix backend treats as numeric
///
/// A strict superset of the dense backend's numeric union.
pub fn numeric() -> TypePattern {
    TypePattern::named_union(
        "MatrixNumeric",
        [
            TypeKey::of::<f64>(),
            TypeKey::of::<Matrix1<f64>>(),
            TypeKey::of::<DMatrix<f64>>(),
            TypeKey::of::<DVector<f64>>(),
            TypeKey::of::<ArrayD<f64>>(),
        ],
    )
}

/// The nalgebra backend
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraBackend;

impl Backend for NalgebraBackend {
    fn backend_name(&self) -> &'static str {
        "nalgebra"
    }

    fn register(&self, registry: &DispatchRegistry) -> Result<()> {
        register::register_all(registry)
    }
}

/// Install the nalgebra backend into `registry`
pub fn register(registry: &DispatchRegistry) -> Result<()> {
    registry.install(&NalgebraBackend)
}
