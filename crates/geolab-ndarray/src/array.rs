//! Array primitives with NumPy semantics

use crate::convert::{broadcast_shape, broadcast_to, matrix};
use crate::linalg;
use geolab_core::{normalize_axis, Error, NormOrder, Result};
use ndarray::{Array1, Array2, ArrayD, ArrayView1, ArrayViewD, Axis, Dimension, Ix1, IxDyn, Zip};
use num_complex::Complex;
use num_traits::{Float, Num};
use std::ops::Neg;

/// Gather `a` along `axis` at `index` (`numpy.take_along_axis`)
///
/// `index` must have the rank of `a`; dimensions other than `axis` broadcast.
/// Negative indices count from the end.
pub fn take_along_axis(
    a: &ArrayViewD<f64>,
    index: &ArrayViewD<i64>,
    axis: isize,
) -> Result<ArrayD<f64>> {
    if a.ndim() != index.ndim() {
        return Err(Error::shape(
            "take_along_axis",
            format!(
                "index has {} dimensions but the array has {}",
                index.ndim(),
                a.ndim()
            ),
        ));
    }
    let axis = normalize_axis(axis, a.ndim())?;
    let len = a.len_of(Axis(axis)) as i64;

    let mut shape = Vec::with_capacity(a.ndim());
    for (d, (&n, &m)) in a.shape().iter().zip(index.shape()).enumerate() {
        let size = match (n, m) {
            _ if d == axis => m,
            (n, m) if n == m || m == 1 => n,
            (1, m) => m,
            _ => {
                return Err(Error::shape(
                    "take_along_axis",
                    format!(
                        "shapes {:?} and {:?} do not broadcast outside axis {axis}",
                        a.shape(),
                        index.shape()
                    ),
                ))
            }
        };
        shape.push(size);
    }

    if let Some(&bad) = index.iter().find(|&&i| i < -len || i >= len) {
        return Err(Error::shape(
            "take_along_axis",
            format!("index {bad} is out of bounds for axis {axis} with size {len}"),
        ));
    }

    Ok(ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let mut src = ix.clone();
        let mut at = ix.clone();
        for d in 0..ix.ndim() {
            if index.shape()[d] == 1 {
                at[d] = 0;
            }
            if d != axis && a.shape()[d] == 1 {
                src[d] = 0;
            }
        }
        let i = index[at.slice()];
        src[axis] = if i < 0 { (i + len) as usize } else { i as usize };
        a[src.slice()]
    }))
}

fn trapz_lane(y: ArrayView1<f64>, step: impl Fn(usize) -> f64) -> f64 {
    (1..y.len())
        .map(|i| step(i - 1) * (y[i - 1] + y[i]) / 2.0)
        .sum()
}

/// Composite trapezoidal rule along `axis` (`numpy.trapz`)
///
/// `x` is either 1-d with one coordinate per sample along `axis`, or has the
/// shape of `y`. Without `x` the samples are `dx` apart.
pub fn trapz(
    y: &ArrayViewD<f64>,
    x: Option<&ArrayViewD<f64>>,
    dx: f64,
    axis: isize,
) -> Result<ArrayD<f64>> {
    let axis = normalize_axis(axis, y.ndim())?;
    let samples = y.len_of(Axis(axis));
    let mut out_shape = y.shape().to_vec();
    out_shape.remove(axis);

    let lanes = y.lanes(Axis(axis)).into_iter();
    let areas: Vec<f64> = match x {
        None => lanes.map(|lane| trapz_lane(lane, |_| dx)).collect(),
        Some(x) if x.ndim() == 1 => {
            let x = x
                .view()
                .into_dimensionality::<Ix1>()
                .map_err(anyhow::Error::from)?;
            if x.len() != samples {
                return Err(Error::shape(
                    "trapz",
                    format!("x has {} samples, y has {samples} along axis {axis}", x.len()),
                ));
            }
            lanes
                .map(|lane| trapz_lane(lane, |i| x[i + 1] - x[i]))
                .collect()
        }
        Some(x) if x.shape() == y.shape() => lanes
            .zip(x.lanes(Axis(axis)))
            .map(|(lane, xs)| trapz_lane(lane, |i| xs[i + 1] - xs[i]))
            .collect(),
        Some(x) => {
            return Err(Error::shape(
                "trapz",
                format!("x of shape {:?} does not fit y of shape {:?}", x.shape(), y.shape()),
            ))
        }
    };
    Ok(ArrayD::from_shape_vec(IxDyn(&out_shape), areas).map_err(anyhow::Error::from)?)
}

/// Running sum, over the flattened array when `axis` is `None`
pub fn cumsum(a: &ArrayViewD<f64>, axis: Option<isize>) -> Result<ArrayD<f64>> {
    match axis {
        None => {
            let running: Array1<f64> = a
                .iter()
                .scan(0.0, |total, &v| {
                    *total += v;
                    Some(*total)
                })
                .collect();
            Ok(running.into_dyn())
        }
        Some(axis) => {
            let axis = normalize_axis(axis, a.ndim())?;
            let mut out = a.to_owned();
            out.accumulate_axis_inplace(Axis(axis), |&prev, curr| *curr += prev);
            Ok(out)
        }
    }
}

/// Diagonal matrix of the column sums of an adjacency matrix
pub fn degree(a: &ArrayViewD<f64>) -> Result<ArrayD<f64>> {
    let a = matrix(a, "degree")?;
    Ok(Array2::from_diag(&a.sum_axis(Axis(0))).into_dyn())
}

/// Copy of `a` with the element at row-major position `index` replaced
pub fn set_value<T: Clone>(a: &ArrayViewD<T>, index: usize, value: T) -> Result<ArrayD<T>> {
    let mut out = a.to_owned();
    let len = out.len();
    let slot = out.iter_mut().nth(index).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "index {index} is out of bounds for an array of {len} elements"
        ))
    })?;
    *slot = value;
    Ok(out)
}

fn scalar(a: &ArrayViewD<f64>) -> Option<f64> {
    if a.ndim() == 0 {
        a.iter().next().copied()
    } else {
        None
    }
}

/// `num` samples from `base^start` to `base^stop`, evenly spaced in the exponent
///
/// Array endpoints broadcast against each other and the sample axis is
/// prepended to their shape.
pub fn logspace(
    start: &ArrayViewD<f64>,
    stop: &ArrayViewD<f64>,
    num: usize,
    base: f64,
) -> Result<ArrayD<f64>> {
    let intervals = if num > 1 { (num - 1) as f64 } else { 1.0 };
    let sample = |s: f64, e: f64, i: usize| base.powf(s + (e - s) * i as f64 / intervals);

    if let (Some(s), Some(e)) = (scalar(start), scalar(stop)) {
        return Ok(Array1::from_shape_fn(num, |i| sample(s, e, i)).into_dyn());
    }

    let shape = broadcast_shape(start.shape(), stop.shape())?;
    let start = broadcast_to(start, &shape)?;
    let stop = broadcast_to(stop, &shape)?;

    let mut out_shape = Vec::with_capacity(shape.len() + 1);
    out_shape.push(num);
    out_shape.extend_from_slice(&shape);
    Ok(ArrayD::from_shape_fn(IxDyn(&out_shape), |ix| {
        let at = &ix.slice()[1..];
        sample(start[at], stop[at], ix[0])
    }))
}

fn vector_norm(v: ArrayView1<f64>, ord: NormOrder) -> Result<f64> {
    let abs = v.mapv(f64::abs);
    let value = match ord {
        NormOrder::Default => v.dot(&v).sqrt(),
        NormOrder::Inf => abs.fold(0.0, |m: f64, &a| m.max(a)),
        NormOrder::NegInf => abs.fold(f64::INFINITY, |m: f64, &a| m.min(a)),
        NormOrder::P(p) if p == 0.0 => v.iter().filter(|&&a| a != 0.0).count() as f64,
        NormOrder::P(p) if p == 1.0 => abs.sum(),
        NormOrder::P(p) if p == 2.0 => v.dot(&v).sqrt(),
        NormOrder::P(p) => abs.mapv(|a| a.powf(p)).sum().powf(1.0 / p),
        NormOrder::Frobenius | NormOrder::Nuclear => {
            return Err(Error::InvalidArgument(format!(
                "invalid norm order {ord:?} for vectors"
            )))
        }
    };
    Ok(value)
}

/// Vector or matrix norm (`numpy.linalg.norm`)
///
/// With `axis`, a vector norm of every lane along it. Without, the default
/// order is the 2-norm of the flattened input; any other order needs a 1-d
/// (vector norm) or 2-d (matrix norm) input.
pub fn norm(x: &ArrayViewD<f64>, ord: NormOrder, axis: Option<isize>) -> Result<ArrayD<f64>> {
    if let Some(axis) = axis {
        let axis = normalize_axis(axis, x.ndim())?;
        let mut out_shape = x.shape().to_vec();
        out_shape.remove(axis);
        let norms = x
            .lanes(Axis(axis))
            .into_iter()
            .map(|lane| vector_norm(lane, ord))
            .collect::<Result<Vec<f64>>>()?;
        return Ok(ArrayD::from_shape_vec(IxDyn(&out_shape), norms).map_err(anyhow::Error::from)?);
    }

    let value = match (ord, x.ndim()) {
        (NormOrder::Default, _) => x.iter().map(|v| v * v).sum::<f64>().sqrt(),
        (_, 1) => {
            let flat: Array1<f64> = x.iter().copied().collect();
            vector_norm(flat.view(), ord)?
        }
        (_, 2) => linalg::matrix_norm(&matrix(x, "norm")?, ord)?,
        (_, ndim) => {
            return Err(Error::shape(
                "norm",
                format!("order {ord:?} needs a 1-d or 2-d input, got {ndim} dimensions"),
            ))
        }
    };
    Ok(ArrayD::from_elem(IxDyn(&[]), value))
}

/// `real + i * imag`, broadcasting the two parts
pub fn create_complex<T: Copy>(
    real: &ArrayViewD<T>,
    imag: &ArrayViewD<T>,
) -> Result<ArrayD<Complex<T>>> {
    let shape = broadcast_shape(real.shape(), imag.shape())?;
    let re = broadcast_to(real, &shape)?;
    let im = broadcast_to(imag, &shape)?;
    Ok(Zip::from(re).and(im).map_collect(|&r, &i| Complex::new(r, i)))
}

pub fn complex_conj<T>(a: &ArrayViewD<Complex<T>>) -> ArrayD<Complex<T>>
where
    T: Clone + Num + Neg<Output = T>,
{
    a.mapv(|z| z.conj())
}

pub(crate) fn reciprocal_or_zero<T: Float>(v: T) -> T {
    if v.is_zero() {
        T::zero()
    } else {
        v.recip()
    }
}

/// Elementwise `1/x` with zeros mapped to zero
pub fn reciprocal_no_nan<T: Float>(a: &ArrayViewD<T>) -> ArrayD<T> {
    a.mapv(reciprocal_or_zero)
}
