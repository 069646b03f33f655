//! Compressed sparse row matrices
//!
//! The dense backend's sparse type. Only stored entries are visited by
//! elementwise primitives; everything else is an implicit zero.

use geolab_core::{Error, Result};
use ndarray::{Array2, ArrayView2};
use num_traits::Zero;
use std::ops::AddAssign;

/// Sparse matrix in CSR layout
///
/// # Examples
///
/// ```
/// use geolab_ndarray::CsrMatrix;
///
/// // duplicate coordinates are summed
/// let m = CsrMatrix::from_triplets(2, 3, vec![(0, 1, 2.0), (1, 2, 1.0), (0, 1, 3.0)]).unwrap();
/// assert_eq!(m.nnz(), 2);
/// assert_eq!(m.get(0, 1), 5.0);
/// assert_eq!(m.get(1, 0), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix<T = f64> {
    nrows: usize,
    ncols: usize,
    /// Row `i` occupies `indptr[i]..indptr[i + 1]` of `indices` and `data`
    indptr: Vec<usize>,
    /// Column of each stored entry, sorted within a row
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: Copy + Zero + AddAssign> CsrMatrix<T> {
    /// Build from `(row, col, value)` triplets
    ///
    /// Duplicate coordinates are summed; explicitly stored zeros are kept.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut triplets: Vec<(usize, usize, T)> = triplets.into_iter().collect();
        if let Some(&(r, c, _)) = triplets.iter().find(|(r, c, _)| *r >= nrows || *c >= ncols) {
            return Err(Error::InvalidArgument(format!(
                "entry ({r}, {c}) is out of bounds for a {nrows}x{ncols} matrix"
            )));
        }
        triplets.sort_unstable_by_key(|&(r, c, _)| (r, c));

        let mut indptr = vec![0; nrows + 1];
        let mut indices: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut data: Vec<T> = Vec::with_capacity(triplets.len());
        let mut last = None;
        for (r, c, v) in triplets {
            if last == Some((r, c)) {
                if let Some(prev) = data.last_mut() {
                    *prev += v;
                }
                continue;
            }
            last = Some((r, c));
            indptr[r + 1] += 1;
            indices.push(c);
            data.push(v);
        }
        for i in 0..nrows {
            indptr[i + 1] += indptr[i];
        }

        Ok(Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        })
    }

    /// Store the non-zero entries of a dense matrix
    pub fn from_dense(dense: &ArrayView2<T>) -> Self
    where
        T: PartialEq,
    {
        let (nrows, ncols) = dense.dim();
        let mut indptr = Vec::with_capacity(nrows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in dense.rows() {
            for (c, &v) in row.iter().enumerate() {
                if !v.is_zero() {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    /// Value at `(row, col)`, zero when not stored
    pub fn get(&self, row: usize, col: usize) -> T {
        if row >= self.nrows {
            return T::zero();
        }
        let span = self.indptr[row]..self.indptr[row + 1];
        match self.indices[span.clone()].binary_search(&col) {
            Ok(pos) => self.data[span.start + pos],
            Err(_) => T::zero(),
        }
    }

    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.nrows, self.ncols), T::zero());
        for row in 0..self.nrows {
            for k in self.indptr[row]..self.indptr[row + 1] {
                dense[[row, self.indices[k]]] = self.data[k];
            }
        }
        dense
    }
}

impl<T> CsrMatrix<T> {
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every stored value, keeping the sparsity pattern
    pub fn map_stored<U>(&self, f: impl FnMut(&T) -> U) -> CsrMatrix<U> {
        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}
