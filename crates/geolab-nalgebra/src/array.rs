//! Array primitives with TensorFlow semantics

use crate::tensor::{lanes, Tensor};
use geolab_core::{normalize_axis, Error, NormOrder, Result};
use nalgebra::{DMatrix, DVector, Dim, Matrix, RawStorage, Scalar};
use num_complex::Complex;

/// Gather along `axis` at the flattened `index` (`tf.gather`)
///
/// Axis 0 of a matrix selects rows, axis 1 selects columns.
pub fn take_along_axis(a: &Tensor, index: &[i32], axis: isize) -> Result<Tensor> {
    let axis = normalize_axis(axis, a.ndim())?;
    let len = match a {
        Tensor::Scalar(_) => 0,
        Tensor::Vector(v) => v.len(),
        Tensor::Matrix(m) if axis == 0 => m.nrows(),
        Tensor::Matrix(m) => m.ncols(),
    };
    let index = index
        .iter()
        .map(|&i| {
            usize::try_from(i)
                .ok()
                .filter(|&i| i < len)
                .ok_or_else(|| {
                    Error::shape(
                        "take_along_axis",
                        format!("index {i} is out of bounds for axis {axis} with size {len}"),
                    )
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    Ok(match a {
        Tensor::Vector(v) => Tensor::Vector(v.select_rows(index.iter())),
        Tensor::Matrix(m) if axis == 0 => Tensor::Matrix(m.select_rows(index.iter())),
        Tensor::Matrix(m) => Tensor::Matrix(m.select_columns(index.iter())),
        Tensor::Scalar(_) => unreachable!("rank 0 has no axis to gather along"),
    })
}

fn trapz_lane(y: &[f64], x: Option<&[f64]>, dx: f64) -> f64 {
    (1..y.len())
        .map(|i| {
            let step = x.map_or(dx, |x| x[i] - x[i - 1]);
            step * (y[i - 1] + y[i]) / 2.0
        })
        .sum()
}

/// Composite trapezoidal rule along `axis` (`tfp.math.trapz`)
///
/// `x` holds one coordinate per sample along `axis`, or has the shape of `y`.
pub fn trapz(y: &Tensor, x: Option<&Tensor>, dx: f64, axis: isize) -> Result<Tensor> {
    let axis = normalize_axis(axis, y.ndim())?;
    let y_lanes = match y {
        Tensor::Vector(v) => vec![v.iter().copied().collect()],
        Tensor::Matrix(m) => lanes(m, axis),
        Tensor::Scalar(_) => unreachable!("normalize_axis rejects rank 0"),
    };
    let samples = y_lanes.first().map_or(0, Vec::len);

    let x_lanes: Option<Vec<Vec<f64>>> = match x {
        None => None,
        Some(Tensor::Vector(xs)) if xs.len() == samples => {
            Some(vec![xs.iter().copied().collect::<Vec<f64>>(); y_lanes.len()])
        }
        Some(Tensor::Matrix(xs)) if y.shape() == [xs.nrows(), xs.ncols()] => {
            Some(lanes(xs, axis))
        }
        Some(other) => {
            return Err(Error::shape(
                "trapz",
                format!(
                    "x of shape {:?} does not fit y of shape {:?} along axis {axis}",
                    other.shape(),
                    y.shape()
                ),
            ))
        }
    };

    let areas: Vec<f64> = y_lanes
        .iter()
        .enumerate()
        .map(|(i, lane)| {
            let xs = x_lanes.as_ref().map(|xl| xl[i].as_slice());
            trapz_lane(lane, xs, dx)
        })
        .collect();

    Ok(match y {
        Tensor::Matrix(_) => Tensor::Vector(DVector::from_vec(areas)),
        _ => Tensor::Scalar(areas.first().copied().unwrap_or_default()),
    })
}

fn vector_norm(values: &[f64], ord: NormOrder) -> Result<f64> {
    let abs = values.iter().map(|v| v.abs());
    match ord {
        NormOrder::Default | NormOrder::Frobenius => Ok(abs.map(|a| a * a).sum::<f64>().sqrt()),
        NormOrder::Inf => Ok(abs.fold(0.0, f64::max)),
        NormOrder::P(p) if p == 1.0 => Ok(abs.sum()),
        NormOrder::P(p) if p > 0.0 => Ok(abs.map(|a| a.powf(p)).sum::<f64>().powf(1.0 / p)),
        _ => Err(Error::InvalidArgument(format!(
            "unsupported vector norm order {ord:?}"
        ))),
    }
}

/// Vector norm (`tf.norm`)
///
/// Without `axis` the whole input is treated as one flat vector; with it,
/// every lane along `axis` gets its own norm.
pub fn norm(x: &Tensor, ord: NormOrder, axis: Option<isize>) -> Result<Tensor> {
    let Some(axis) = axis else {
        return Ok(Tensor::Scalar(vector_norm(&x.flat(), ord)?));
    };
    let axis = normalize_axis(axis, x.ndim())?;
    match x {
        Tensor::Matrix(m) => {
            let norms = lanes(m, axis)
                .iter()
                .map(|lane| vector_norm(lane, ord))
                .collect::<Result<Vec<f64>>>()?;
            Ok(Tensor::Vector(DVector::from_vec(norms)))
        }
        _ => Ok(Tensor::Scalar(vector_norm(&x.flat(), ord)?)),
    }
}

fn endpoints(t: &Tensor, context: &str) -> Result<Vec<f64>> {
    match t {
        Tensor::Scalar(s) => Ok(vec![*s]),
        Tensor::Vector(v) => Ok(v.iter().copied().collect()),
        Tensor::Matrix(m) => Err(Error::shape(
            context,
            format!("endpoints must be scalars or vectors, got a {}x{} matrix", m.nrows(), m.ncols()),
        )),
    }
}

/// `base` raised to `num` points of `linspace(start, stop)`
///
/// Scalar endpoints give a vector. Vector endpoints give a `num`-row matrix
/// with one column per endpoint pair; a scalar endpoint is repeated.
pub fn logspace(start: &Tensor, stop: &Tensor, num: usize, base: f64) -> Result<Tensor> {
    let intervals = if num > 1 { (num - 1) as f64 } else { 1.0 };
    let point = |s: f64, e: f64, i: usize| base.powf(s + (e - s) * i as f64 / intervals);

    if let (Tensor::Scalar(s), Tensor::Scalar(e)) = (start, stop) {
        return Ok(Tensor::Vector(DVector::from_fn(num, |i, _| point(*s, *e, i))));
    }

    let (s, e) = (endpoints(start, "logspace")?, endpoints(stop, "logspace")?);
    let width = match (s.len(), e.len()) {
        (a, b) if a == b || b == 1 => a,
        (1, b) => b,
        (a, b) => {
            return Err(Error::shape(
                "logspace",
                format!("endpoints of length {a} and {b} do not broadcast"),
            ))
        }
    };
    let pick = |v: &[f64], j: usize| if v.len() == 1 { v[0] } else { v[j] };
    Ok(Tensor::Matrix(DMatrix::from_fn(num, width, |i, j| {
        point(pick(&s, j), pick(&e, j), i)
    })))
}

/// Running sum down columns (axis 0) or along rows (axis 1)
pub fn cumsum_matrix(m: &DMatrix<f64>, axis: usize) -> DMatrix<f64> {
    let mut out = m.clone();
    if axis == 0 {
        for i in 1..out.nrows() {
            for j in 0..out.ncols() {
                out[(i, j)] += out[(i - 1, j)];
            }
        }
    } else {
        for j in 1..out.ncols() {
            for i in 0..out.nrows() {
                out[(i, j)] += out[(i, j - 1)];
            }
        }
    }
    out
}

pub fn cumsum_vector(v: &DVector<f64>) -> DVector<f64> {
    let mut total = 0.0;
    v.map(|x| {
        total += x;
        total
    })
}

/// Diagonal matrix of the column sums of an adjacency matrix
pub fn degree(a: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_diagonal(&a.row_sum().transpose())
}

/// Copy of `a` with entry `index` replaced
pub fn set_value(a: &DVector<f64>, index: usize, value: f64) -> Result<DVector<f64>> {
    if index >= a.len() {
        return Err(Error::InvalidArgument(format!(
            "index {index} is out of bounds for a vector of {} elements",
            a.len()
        )));
    }
    let mut out = a.clone();
    out[index] = value;
    Ok(out)
}

pub fn reciprocal_or_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v.recip()
    }
}

/// `real + i * imag` for equally shaped parts
pub fn create_complex<T, R, C, S1, S2>(
    real: &Matrix<T, R, C, S1>,
    imag: &Matrix<T, R, C, S2>,
) -> Result<nalgebra::OMatrix<Complex<T>, R, C>>
where
    T: Scalar + Copy,
    R: Dim,
    C: Dim,
    S1: RawStorage<T, R, C>,
    S2: RawStorage<T, R, C>,
    nalgebra::DefaultAllocator: nalgebra::allocator::Allocator<R, C>,
{
    if real.shape() != imag.shape() {
        return Err(Error::shape(
            "create_complex",
            format!("real part is {:?}, imaginary part is {:?}", real.shape(), imag.shape()),
        ));
    }
    Ok(real.zip_map(imag, |re, im| Complex::new(re, im)))
}
