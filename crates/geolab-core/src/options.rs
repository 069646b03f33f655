//! Keyword option types shared by every backend

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Shape of the QR factors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrMode {
    /// `Q` is m×min(m, n), `R` is min(m, n)×n
    #[default]
    Reduced,
    /// `Q` is m×m, `R` is m×n
    Complete,
}

/// Order of a vector or matrix norm
///
/// `Default` is the backend's default: Euclidean for vectors and
/// Frobenius for matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum NormOrder {
    #[default]
    Default,
    Frobenius,
    Nuclear,
    Inf,
    NegInf,
    /// A finite order p (1, 2, -1, 0.5, ...)
    P(f64),
}

/// Triangle of a symmetric matrix read by an eigen-solver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Triangle {
    Upper,
    Lower,
}

/// Normalise a possibly negative axis against `ndim`
pub fn normalize_axis(axis: isize, ndim: usize) -> Result<usize> {
    let n = ndim as isize;
    let resolved = if axis < 0 { axis + n } else { axis };
    if resolved < 0 || resolved >= n {
        return Err(Error::InvalidArgument(format!(
            "axis {axis} is out of bounds for an array of dimension {ndim}"
        )));
    }
    Ok(resolved as usize)
}
