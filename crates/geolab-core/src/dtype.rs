//! Backend-independent dtype descriptors

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a backend array
///
/// Complex widths follow the NumPy naming: `Complex64` holds two `f32`,
/// `Complex128` holds two `f64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    I32,
    I64,
    F32,
    F64,
    Complex64,
    Complex128,
}

impl DType {
    pub fn is_floating(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// `self` when already floating, `F64` otherwise
    pub fn float_like(self) -> DType {
        if self.is_floating() {
            self
        } else {
            DType::F64
        }
    }

    /// Complex dtype for a real reference dtype: `Complex64` only for
    /// `F32`, `Complex128` for everything else, complex inputs included
    pub fn complex_of(self) -> DType {
        match self {
            Self::F32 => Self::Complex64,
            _ => Self::Complex128,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        };
        f.write_str(name)
    }
}

/// Scalar types with a known dtype
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: DType;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}

impl Element for Complex<f32> {
    const DTYPE: DType = DType::Complex64;
}

impl Element for Complex<f64> {
    const DTYPE: DType = DType::Complex128;
}
