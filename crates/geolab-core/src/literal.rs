//! Backend-neutral nested literals
//!
//! A [`Literal`] is the plain "nested sequence of numbers" accepted by
//! `from_literal`. It stores values in row-major order with an explicit shape,
//! so each backend can build its native array without guessing.

use crate::error::{Error, Result};

/// Row-major values with a logical shape
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Literal {
    /// Build from a shape and row-major data
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::InvalidArgument(format!(
                "literal of shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// A 0-d literal
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// Build from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
            return Err(Error::InvalidArgument(format!(
                "ragged literal: row {bad} has {} values, expected {ncols}",
                rows[bad].len()
            )));
        }
        let nrows = rows.len();
        Ok(Self {
            shape: vec![nrows, ncols],
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl From<Vec<f64>> for Literal {
    fn from(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }
}

impl From<&[f64]> for Literal {
    fn from(data: &[f64]) -> Self {
        Self::from(data.to_vec())
    }
}

impl TryFrom<Vec<Vec<f64>>> for Literal {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let lit = Literal::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(lit.shape(), &[3, 2]);
        assert_eq!(lit.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Literal::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_scalar_and_vector() {
        assert_eq!(Literal::from(2.5).ndim(), 0);
        assert_eq!(Literal::from(vec![1.0, 2.0, 3.0]).shape(), &[3]);
        assert!(Literal::new(vec![2, 2], vec![1.0; 3]).is_err());
    }
}
