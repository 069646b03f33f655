//! Dense linear algebra
//!
//! Arrays are converted to `DMatrix` and handed to the nalgebra host
//! routines in [`geolab_nalgebra::linalg`].

use crate::convert::{from_dmatrix, square, to_dmatrix};
use geolab_core::{Error, NormOrder, QrMode, Result, Triangle};
use geolab_nalgebra::linalg as host;
use ndarray::{Array1, Array2, ArrayView2, ArrayViewD, Axis};

/// QR factorisation of a matrix
pub fn qr(a: &ArrayView2<f64>, mode: QrMode) -> (Array2<f64>, Array2<f64>) {
    let (q, r) = host::qr(&to_dmatrix(a), mode);
    (from_dmatrix(&q), from_dmatrix(&r))
}

/// `(sign, logdet)`; a singular matrix gives `(0, -inf)`
pub fn slogdet(a: &ArrayViewD<f64>) -> Result<(f64, f64)> {
    host::slogdet(&to_dmatrix(&square(a, "slogdet")?))
}

/// Ascending eigenvalues of a symmetric matrix, reading only `uplo`
pub fn eigvalsh(a: &ArrayViewD<f64>, uplo: Triangle) -> Result<Array1<f64>> {
    let values = host::eigvalsh(&to_dmatrix(&square(a, "eigvalsh")?), uplo)?;
    Ok(values.iter().copied().collect())
}

/// The `k` smallest eigenvalues of a symmetric matrix and their eigenvectors
pub fn eigenpairs(l: &ArrayViewD<f64>, k: usize) -> Result<(Array1<f64>, Array2<f64>)> {
    let (values, vectors) = host::eigenpairs(&to_dmatrix(&square(l, "eigenpairs")?), k)?;
    Ok((values.iter().copied().collect(), from_dmatrix(&vectors)))
}

fn singular_values(a: &ArrayView2<f64>) -> Vec<f64> {
    host::singular_values(&to_dmatrix(a))
}

/// Matrix norm of order `ord`
pub fn matrix_norm(a: &ArrayView2<f64>, ord: NormOrder) -> Result<f64> {
    let abs = a.mapv(f64::abs);
    let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let row_sums = || abs.sum_axis(Axis(1)).to_vec();
    let col_sums = || abs.sum_axis(Axis(0)).to_vec();

    let value = match ord {
        NormOrder::Default | NormOrder::Frobenius => abs.mapv(|v| v * v).sum().sqrt(),
        NormOrder::Nuclear => singular_values(a).iter().sum::<f64>(),
        NormOrder::Inf => max(&row_sums()),
        NormOrder::NegInf => min(&row_sums()),
        NormOrder::P(p) if p == 1.0 => max(&col_sums()),
        NormOrder::P(p) if p == -1.0 => min(&col_sums()),
        NormOrder::P(p) if p == 2.0 => max(&singular_values(a)),
        NormOrder::P(p) if p == -2.0 => min(&singular_values(a)),
        NormOrder::P(p) => {
            return Err(Error::InvalidArgument(format!(
                "invalid norm order {p} for matrices"
            )))
        }
    };
    Ok(value)
}
