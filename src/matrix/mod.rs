//! Matrix module: sparse and dense storage plus the format/capability model.
//!
//! A [`Matrix`] carries a density class ([`Storage`]), a format capability
//! ([`SparseFormat`]) and a symmetry flag. The dispatcher only looks at these
//! through [`MatrixAccess`]; it never reaches into the storage directly.

use std::fmt;

use faer::Mat;

use crate::core::traits::{BinaryOp, MatrixAccess, RawMatrix, Scalar};
use crate::error::GrbError;
use crate::vector::Storage;

pub mod dense;
pub mod sparse;

pub use dense::DenseMatrix;
pub use sparse::{Compressed, CsrMatrix, Layout};

/// Orientations a matrix can serve without transposing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseFormat {
    /// Row-keyed access only.
    CsrOnly,
    /// Row- and column-keyed access.
    CsrAndCsc,
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SparseFormat::CsrOnly => "csr-only",
            SparseFormat::CsrAndCsc => "csr+csc",
        })
    }
}

#[derive(Clone)]
enum Repr<T> {
    Unbuilt,
    Sparse(CsrMatrix<T>),
    Dense { mat: Mat<T>, symmetric: bool },
}

#[derive(Clone)]
pub struct Matrix<T> {
    nrows: usize,
    ncols: usize,
    repr: Repr<T>,
}

impl<T: Scalar> Matrix<T> {
    /// An unbuilt `nrows × ncols` matrix. Multiplying with it fails with `Uninitialized`.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols, repr: Repr::Unbuilt }
    }

    /// Build sparse storage from `(row, col, value)` triplets.
    pub fn build(
        &mut self,
        rows: &[usize],
        cols: &[usize],
        values: &[T],
        nvals: usize,
        dup: Option<&dyn BinaryOp<T>>,
    ) -> Result<(), GrbError> {
        let csr = CsrMatrix::from_triplets(self.nrows, self.ncols, rows, cols, values, nvals, dup)?;
        self.repr = Repr::Sparse(csr);
        Ok(())
    }

    /// Build dense storage from `nrows * ncols` row-major values.
    pub fn build_dense(&mut self, values: &[T]) -> Result<(), GrbError> {
        if values.len() != self.nrows * self.ncols {
            return Err(GrbError::InvalidValue(format!(
                "expected {} dense values, got {}",
                self.nrows * self.ncols,
                values.len()
            )));
        }
        let mat = <Mat<T> as DenseMatrix<T>>::from_row_major(self.nrows, self.ncols, values);
        self.repr = Repr::Dense { mat, symmetric: false };
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Stored entries; every slot of a dense matrix counts.
    pub fn nvals(&self) -> usize {
        match &self.repr {
            Repr::Unbuilt => 0,
            Repr::Sparse(csr) => csr.nnz(),
            Repr::Dense { .. } => self.nrows * self.ncols,
        }
    }

    /// Drop all storage; the matrix must be rebuilt before use.
    pub fn clear(&mut self) {
        self.repr = Repr::Unbuilt;
    }

    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        match &self.repr {
            Repr::Unbuilt => None,
            Repr::Sparse(csr) => csr.get(i, j),
            Repr::Dense { mat, .. } => (i < self.nrows && j < self.ncols).then(|| mat.value_at(i, j)),
        }
    }

    /// Flag the matrix as symmetric, which lets its rows serve as columns.
    /// Flagging a matrix that is not equal to its transpose is an `InvalidValue`.
    pub fn set_symmetric(&mut self, symmetric: bool) -> Result<(), GrbError> {
        match &mut self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(csr) => {
                if symmetric && !csr.is_symmetric()? {
                    return Err(GrbError::InvalidValue("matrix is not symmetric".into()));
                }
                csr.set_symmetric_flag(symmetric);
                Ok(())
            }
            Repr::Dense { mat, symmetric: flag } => {
                if symmetric && !mat.equals_transpose() {
                    return Err(GrbError::InvalidValue("matrix is not symmetric".into()));
                }
                *flag = symmetric;
                Ok(())
            }
        }
    }

    /// Build the column orientation of a sparse matrix, upgrading its format
    /// to `CsrAndCsc`. Dense matrices already serve both orientations.
    pub fn materialize_csc(&mut self) -> Result<(), GrbError> {
        match &mut self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(csr) => csr.materialize_csc(),
            Repr::Dense { .. } => Ok(()),
        }
    }

    pub fn as_sparse(&self) -> Option<&CsrMatrix<T>> {
        match &self.repr {
            Repr::Sparse(csr) => Some(csr),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&Mat<T>> {
        match &self.repr {
            Repr::Dense { mat, .. } => Some(mat),
            _ => None,
        }
    }
}

impl<T: Scalar> MatrixAccess<T> for Matrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn storage(&self) -> Result<Storage, GrbError> {
        match &self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(_) => Ok(Storage::Sparse),
            Repr::Dense { .. } => Ok(Storage::Dense),
        }
    }

    fn format(&self) -> Result<SparseFormat, GrbError> {
        match &self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(csr) if csr.layout().contains(Layout::CSC) => Ok(SparseFormat::CsrAndCsc),
            Repr::Sparse(_) => Ok(SparseFormat::CsrOnly),
            Repr::Dense { .. } => Ok(SparseFormat::CsrAndCsc),
        }
    }

    fn symmetric(&self) -> Result<bool, GrbError> {
        match &self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(csr) => Ok(csr.layout().contains(Layout::SYMMETRIC)),
            Repr::Dense { symmetric, .. } => Ok(*symmetric),
        }
    }

    fn raw_handle(&self) -> Result<RawMatrix<'_, T>, GrbError> {
        match &self.repr {
            Repr::Unbuilt => Err(GrbError::Uninitialized("matrix has not been built")),
            Repr::Sparse(csr) => Ok(RawMatrix::Sparse(csr)),
            Repr::Dense { mat, .. } => Ok(RawMatrix::Dense(mat)),
        }
    }
}

impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Unbuilt => write!(f, "Matrix({}x{}, unbuilt)", self.nrows, self.ncols),
            Repr::Sparse(csr) => {
                writeln!(f, "Matrix({}x{}, sparse, nnz={}):", self.nrows, self.ncols, csr.nnz())?;
                let rows = csr.rows();
                for i in 0..rows.lanes() {
                    let (idx, val) = rows.lane(i);
                    for (j, v) in idx.iter().zip(val) {
                        writeln!(f, "  ({i}, {j}) {v:?}")?;
                    }
                }
                Ok(())
            }
            Repr::Dense { mat, .. } => {
                writeln!(f, "Matrix({}x{}, dense):", self.nrows, self.ncols)?;
                for i in 0..self.nrows {
                    let row: Vec<String> = (0..self.ncols).map(|j| format!("{:?}", mat.value_at(i, j))).collect();
                    writeln!(f, "  [{}]", row.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
