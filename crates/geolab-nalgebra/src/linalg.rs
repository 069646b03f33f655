//! Decompositions over `DMatrix<f64>`
//!
//! These are the host routines for both backends: the dense backend converts
//! its arrays and calls into this module.

use geolab_core::{Error, QrMode, Result, Triangle};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

fn ensure_square(m: &DMatrix<f64>, context: &str) -> Result<()> {
    if m.is_square() {
        Ok(())
    } else {
        Err(Error::shape(
            context,
            format!("expected a square matrix, got {}x{}", m.nrows(), m.ncols()),
        ))
    }
}

/// QR factorisation
///
/// The complete factors come from the QR of `[A | I]`: its `Q` is square and
/// the first `n` columns of its `R` are the complete `R` of `A`.
pub fn qr(a: &DMatrix<f64>, mode: QrMode) -> (DMatrix<f64>, DMatrix<f64>) {
    let (m, n) = a.shape();
    match mode {
        QrMode::Reduced => {
            let qr = a.clone().qr();
            (qr.q(), qr.r())
        }
        QrMode::Complete => {
            let mut augmented = DMatrix::<f64>::zeros(m, n + m);
            augmented.columns_mut(0, n).copy_from(a);
            augmented.columns_mut(n, m).fill_with_identity();
            let qr = augmented.qr();
            let r = qr.r().columns(0, n).into_owned();
            (qr.q(), r)
        }
    }
}

/// Sign and natural log of `|det(a)|` from an LU factorisation
///
/// A singular matrix gives `(0, -inf)`.
pub fn slogdet(a: &DMatrix<f64>) -> Result<(f64, f64)> {
    ensure_square(a, "slogdet")?;
    let lu = a.clone().lu();
    let mut sign: f64 = lu.p().determinant();
    let mut logdet = 0.0;
    for &d in lu.u().diagonal().iter() {
        if d == 0.0 {
            return Ok((0.0, f64::NEG_INFINITY));
        }
        sign *= d.signum();
        logdet += d.abs().ln();
    }
    Ok((sign, logdet))
}

/// Ascending eigenvalues of a symmetric matrix, reading only `uplo`
pub fn eigvalsh(a: &DMatrix<f64>, uplo: Triangle) -> Result<DVector<f64>> {
    ensure_square(a, "eigvalsh")?;
    let mut m = a.clone();
    match uplo {
        Triangle::Upper => m.fill_lower_triangle_with_upper_triangle(),
        Triangle::Lower => m.fill_upper_triangle_with_lower_triangle(),
    }
    let mut values: Vec<f64> = m.symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(f64::total_cmp);
    Ok(DVector::from_vec(values))
}

/// The `k` smallest eigenvalues of a symmetric matrix and their eigenvectors
///
/// Reads the lower triangle. Eigenvectors are columns, in eigenvalue order.
pub fn eigenpairs(l: &DMatrix<f64>, k: usize) -> Result<(DVector<f64>, DMatrix<f64>)> {
    ensure_square(l, "eigenpairs")?;
    let n = l.nrows();
    if k > n {
        return Err(Error::InvalidArgument(format!(
            "requested {k} eigenpairs of a {n}x{n} matrix"
        )));
    }

    let eigen = SymmetricEigen::new(l.clone());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));
    order.truncate(k);

    let values = DVector::from_iterator(k, order.iter().map(|&i| eigen.eigenvalues[i]));
    let vectors = eigen.eigenvectors.select_columns(order.iter());
    Ok((values, vectors))
}

/// Singular values in no particular order
pub fn singular_values(a: &DMatrix<f64>) -> Vec<f64> {
    a.singular_values().iter().copied().collect()
}
