//! Dense-matrix storage on top of Faer.
//!
//! Dense matrices are held as `faer::Mat<T>`; this module provides the
//! constructors and element access the engine needs for arbitrary semiring
//! element types.

use faer::Mat;

use crate::core::traits::Scalar;

/// Construction and element access for dense storage.
pub trait DenseMatrix<T> {
    /// Construct from raw row-major storage.
    fn from_row_major(nrows: usize, ncols: usize, data: &[T]) -> Self;
    fn value_at(&self, i: usize, j: usize) -> T;
    fn equals_transpose(&self) -> bool;
}

impl<T: Scalar> DenseMatrix<T> for Mat<T> {
    fn from_row_major(nrows: usize, ncols: usize, data: &[T]) -> Self {
        Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j])
    }

    fn value_at(&self, i: usize, j: usize) -> T {
        self[(i, j)]
    }

    fn equals_transpose(&self) -> bool {
        let n = self.nrows();
        if n != self.ncols() {
            return false;
        }
        (0..n).all(|i| (i + 1..n).all(|j| self[(i, j)] == self[(j, i)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let m: Mat<i32> = DenseMatrix::from_row_major(2, 3, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(m.value_at(0, 2), 3);
        assert_eq!(m.value_at(1, 0), 4);
        assert!(!m.equals_transpose());
        let s: Mat<bool> = DenseMatrix::from_row_major(2, 2, &[true, false, false, true]);
        assert!(s.equals_transpose());
    }
}
