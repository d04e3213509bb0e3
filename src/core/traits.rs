//! Core algebraic and access traits for graphmv.

use std::fmt::Debug;

use crate::error::GrbError;
use crate::matrix::{CsrMatrix, SparseFormat};
use crate::vector::Storage;

/// Element types the engine can store and move across worker threads.
pub trait Scalar: Copy + PartialEq + Default + Debug + Send + Sync + 'static {}

impl<T> Scalar for T where T: Copy + PartialEq + Default + Debug + Send + Sync + 'static {}

/// A binary operator `z = f(x, y)`, used as accumulator and duplicate-merge operator.
pub trait BinaryOp<T> {
    fn apply(&self, x: T, y: T) -> T;
}

impl<T, F> BinaryOp<T> for F
where
    F: Fn(T, T) -> T,
{
    fn apply(&self, x: T, y: T) -> T {
        self(x, y)
    }
}

/// A semiring `(⊕, ⊗, 0)` driving the generalized multiply.
///
/// `add` must be associative and `add(x, identity()) == x`. The engine also
/// treats `identity()` as an absent entry, so it should annihilate `multiply`.
pub trait Semiring<T>: Sync {
    /// ⊕
    fn add(&self, x: T, y: T) -> T;
    /// ⊗
    fn multiply(&self, x: T, y: T) -> T;
    /// Identity of ⊕.
    fn identity(&self) -> T;
}

/// Borrowed view of a matrix's storage, handed to kernels.
pub enum RawMatrix<'a, T> {
    Sparse(&'a CsrMatrix<T>),
    Dense(&'a faer::Mat<T>),
}

/// Narrow read-only interface the dispatcher uses to inspect a matrix.
pub trait MatrixAccess<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    /// Density class.
    fn storage(&self) -> Result<Storage, GrbError>;
    /// Available orientations.
    fn format(&self) -> Result<SparseFormat, GrbError>;
    fn symmetric(&self) -> Result<bool, GrbError>;
    fn raw_handle(&self) -> Result<RawMatrix<'_, T>, GrbError>;
}
