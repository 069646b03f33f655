//! Rank-tagged view of the matrix backend's numeric values

use geolab_core::{Error, Literal, Result, Value};
use nalgebra::{DMatrix, DVector, Matrix1};
use ndarray::ArrayD;

/// A numeric value of rank 0, 1 or 2
///
/// Foreign inputs (`f64`, `ArrayD<f64>`, [`Literal`]) are converted on entry;
/// results always leave as nalgebra types, with rank 0 as `Matrix1<f64>`.
#[derive(Clone, Debug, PartialEq)]
pub enum Tensor {
    Scalar(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

impl Tensor {
    pub fn from_value(value: &Value) -> Result<Self> {
        if let Some(m) = value.downcast_ref::<DMatrix<f64>>() {
            return Ok(Self::Matrix(m.clone()));
        }
        if let Some(v) = value.downcast_ref::<DVector<f64>>() {
            return Ok(Self::Vector(v.clone()));
        }
        if let Some(s) = value.downcast_ref::<Matrix1<f64>>() {
            return Ok(Self::Scalar(s[(0, 0)]));
        }
        if let Some(&s) = value.downcast_ref::<f64>() {
            return Ok(Self::Scalar(s));
        }
        if let Some(a) = value.downcast_ref::<ArrayD<f64>>() {
            return Self::from_row_major(a.shape(), a.iter().copied());
        }
        if let Some(literal) = value.downcast_ref::<Literal>() {
            return Self::from_row_major(literal.shape(), literal.data().iter().copied());
        }
        Err(Error::type_mismatch(
            "numeric argument",
            "f64, an f64 nalgebra matrix, ArrayD<f64> or Literal",
            value.type_name(),
        ))
    }

    fn from_row_major(shape: &[usize], data: impl Iterator<Item = f64>) -> Result<Self> {
        match *shape {
            [] => {
                let mut data = data;
                Ok(Self::Scalar(data.next().unwrap_or_default()))
            }
            [n] => Ok(Self::Vector(DVector::from_iterator(n, data))),
            [r, c] => Ok(Self::Matrix(DMatrix::from_row_iterator(r, c, data))),
            _ => Err(Error::shape(
                "matrix backend",
                format!("rank {} input is not supported, got shape {shape:?}", shape.len()),
            )),
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::Vector(_) => 1,
            Self::Matrix(_) => 2,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Scalar(_) => vec![],
            Self::Vector(v) => vec![v.len()],
            Self::Matrix(m) => vec![m.nrows(), m.ncols()],
        }
    }

    /// Elements in row-major order
    pub fn flat(&self) -> Vec<f64> {
        match self {
            Self::Scalar(s) => vec![*s],
            Self::Vector(v) => v.iter().copied().collect(),
            Self::Matrix(m) => m.transpose().iter().copied().collect(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Scalar(s) => Value::new(Matrix1::new(s)),
            Self::Vector(v) => Value::new(v),
            Self::Matrix(m) => Value::new(m),
        }
    }
}

/// 1-d lanes of `m` along `axis`: columns for axis 0, rows for axis 1
pub(crate) fn lanes(m: &DMatrix<f64>, axis: usize) -> Vec<Vec<f64>> {
    if axis == 0 {
        m.column_iter().map(|c| c.iter().copied().collect()).collect()
    } else {
        m.row_iter().map(|r| r.iter().copied().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_foreign_array_keeps_row_major_layout() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let t = Tensor::from_value(&Value::new(a)).unwrap();
        assert_eq!(t, Tensor::Matrix(DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])));
        assert_eq!(t.flat(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_rank_three_rejected() {
        let a = ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 2, 2]));
        assert!(Tensor::from_value(&Value::new(a)).is_err());
    }

    #[test]
    fn test_scalar_leaves_as_matrix1() {
        let v = Tensor::Scalar(2.0).into_value();
        assert!(v.is::<Matrix1<f64>>());
        assert_eq!(Tensor::from_value(&v).unwrap().ndim(), 0);
    }

    #[test]
    fn test_lanes() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(lanes(&m, 0), vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert_eq!(lanes(&m, 1), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}
