//! Pure decision functions of the dispatcher.
//!
//! Both functions depend only on their arguments, so the direction policy
//! and the strategy table can be tested without running a multiply.

use std::fmt;

use crate::config::Direction;
use crate::matrix::SparseFormat;
use crate::vector::{Storage, select_storage};

/// Kernel family chosen for a multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Sparse matrix × sparse vector (push).
    SpMSpV,
    /// Sparse matrix × dense vector (pull).
    SpMV,
    /// Dense matrix × dense vector.
    GeMV,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::SpMSpV => "spmspv",
            Strategy::SpMV => "spmv",
            Strategy::GeMV => "gemv",
        })
    }
}

/// What the conversion step looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperandState {
    pub format: SparseFormat,
    pub symmetric: bool,
    /// The effective operator is the matrix transpose (the `vxm` case).
    pub transposed: bool,
    /// Vector entries that differ from the identity.
    pub nnz: usize,
    /// Vector length.
    pub n: usize,
}

impl OperandState {
    /// Only row-keyed lanes exist and they cannot stand in for columns.
    pub fn row_only(&self) -> bool {
        self.format == SparseFormat::CsrOnly && !self.symmetric
    }
}

/// Vector representation to use for the multiply, by priority:
///
/// 1. Row-only asymmetric matrix: the one direction its rows serve. For the
///    transposed operator that is push (sparse vector), otherwise pull
///    (dense vector). This overrides the configured direction.
/// 2. `PushPull`: the density policy with `switchpoint`.
/// 3. `PushOnly`: sparse.
/// 4. `PullOnly`: dense.
pub fn plan_conversion(state: &OperandState, direction: Direction, switchpoint: f64) -> Storage {
    if state.row_only() {
        return if state.transposed { Storage::Sparse } else { Storage::Dense };
    }
    match direction {
        Direction::PushPull => select_storage(state.nnz, state.n, switchpoint),
        Direction::PushOnly => Storage::Sparse,
        Direction::PullOnly => Storage::Dense,
    }
}

/// Strategy for a (matrix density, vector storage) pair after conversion.
///
/// A dense matrix always runs GeMV; a sparse vector against it is densified
/// first.
pub fn select_strategy(matrix: Storage, vector: Storage) -> Strategy {
    match (matrix, vector) {
        (Storage::Sparse, Storage::Sparse) => Strategy::SpMSpV,
        (Storage::Sparse, Storage::Dense) => Strategy::SpMV,
        (Storage::Dense, _) => Strategy::GeMV,
    }
}
