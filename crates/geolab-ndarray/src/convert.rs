//! Argument coercion and conversions to and from nalgebra

use geolab_core::{CallArgs, Error, Literal, Result, Value};
use nalgebra::{DMatrix, DVector, Matrix1};
use ndarray::{Array1, Array2, ArrayD, ArrayView2, ArrayViewD, CowArray, Ix2, IxDyn};

/// Positional `Numeric` argument as an array, lifting a plain `f64` to 0-d
pub fn numeric_arg(args: &CallArgs, index: usize) -> Result<CowArray<'_, f64, IxDyn>> {
    numeric(args.value(index)?)
}

/// A `Numeric` value as an array, lifting a plain `f64` to 0-d
pub fn numeric(value: &Value) -> Result<CowArray<'_, f64, IxDyn>> {
    if let Some(array) = value.downcast_ref::<ArrayD<f64>>() {
        return Ok(CowArray::from(array.view()));
    }
    if let Some(&scalar) = value.downcast_ref::<f64>() {
        return Ok(CowArray::from(ArrayD::from_elem(IxDyn(&[]), scalar)));
    }
    Err(Error::type_mismatch(
        "numeric argument",
        "f64 or ArrayD<f64>",
        value.type_name(),
    ))
}

/// View `a` as a matrix
pub fn matrix<'a>(a: &'a ArrayViewD<'_, f64>, context: &str) -> Result<ArrayView2<'a, f64>> {
    a.view().into_dimensionality::<Ix2>().map_err(|_| {
        Error::shape(context, format!("expected a 2-d array, got shape {:?}", a.shape()))
    })
}

/// View `a` as a square matrix
pub fn square<'a>(a: &'a ArrayViewD<'_, f64>, context: &str) -> Result<ArrayView2<'a, f64>> {
    let m = matrix(a, context)?;
    if m.nrows() != m.ncols() {
        return Err(Error::shape(
            context,
            format!("expected a square matrix, got {}x{}", m.nrows(), m.ncols()),
        ));
    }
    Ok(m)
}

pub fn to_dmatrix(a: &ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Build a dense array from a literal or a foreign value
///
/// Accepts [`Literal`], `f64`, `ArrayD<f64>` and the nalgebra types
/// `DMatrix<f64>`, `DVector<f64>` and `Matrix1<f64>` (a 0-d scalar).
pub fn to_array(source: &Value) -> Result<ArrayD<f64>> {
    if let Some(literal) = source.downcast_ref::<Literal>() {
        return ArrayD::from_shape_vec(IxDyn(literal.shape()), literal.data().to_vec())
            .map_err(|e| anyhow::Error::from(e).into());
    }
    if let Some(&scalar) = source.downcast_ref::<f64>() {
        return Ok(ArrayD::from_elem(IxDyn(&[]), scalar));
    }
    if let Some(array) = source.downcast_ref::<ArrayD<f64>>() {
        return Ok(array.clone());
    }
    if let Some(m) = source.downcast_ref::<DMatrix<f64>>() {
        return Ok(from_dmatrix(m).into_dyn());
    }
    if let Some(v) = source.downcast_ref::<DVector<f64>>() {
        return Ok(v.iter().copied().collect::<Array1<f64>>().into_dyn());
    }
    if let Some(m) = source.downcast_ref::<Matrix1<f64>>() {
        return Ok(ArrayD::from_elem(IxDyn(&[]), m[(0, 0)]));
    }
    Err(Error::type_mismatch(
        "from_literal source",
        "Literal, f64, ArrayD<f64> or an nalgebra f64 matrix",
        source.type_name(),
    ))
}

/// Shape two arrays broadcast to under NumPy rules
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let dim = |shape: &[usize], d: usize| {
        let offset = ndim - shape.len();
        if d < offset {
            1
        } else {
            shape[d - offset]
        }
    };
    (0..ndim)
        .map(|d| match (dim(a, d), dim(b, d)) {
            (n, m) if n == m || m == 1 => Ok(n),
            (1, m) => Ok(m),
            _ => Err(Error::shape(
                "broadcast",
                format!("shapes {a:?} and {b:?} are not compatible"),
            )),
        })
        .collect()
}

/// View `a` broadcast to `shape`
pub fn broadcast_to<'a, T>(a: &'a ArrayViewD<'_, T>, shape: &[usize]) -> Result<ArrayViewD<'a, T>> {
    a.broadcast(IxDyn(shape)).ok_or_else(|| {
        Error::shape(
            "broadcast",
            format!("cannot broadcast shape {:?} to {shape:?}", a.shape()),
        )
    })
}
