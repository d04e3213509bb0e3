//! Multiply kernels.
//!
//! Every kernel computes `t = B ⊕.⊗ u` for the effective operator `B` chosen
//! by the dispatcher (the matrix or its transpose). Push kernels
//! ([`merge_path`], [`simple`], [`twc`]) walk the lanes of `B` keyed by the
//! active indices of a sparse `u`; pull kernels ([`spmv`], [`gemv`]) compute
//! each output slot from a dense `u`. Kernels never write a masked-out index
//! and drop products involving absent (identity) entries.

use crate::core::traits::Semiring;

pub mod gemv;
pub mod mask;
pub mod merge_path;
pub mod simple;
pub mod spmv;
pub mod twc;

pub use mask::MaskView;
pub use merge_path::{merge_path_search, spmspv_merge};

/// Parameters shared by all kernels of one multiply.
pub struct KernelArgs<'a, S: ?Sized> {
    pub semiring: &'a S,
    pub mask: Option<&'a MaskView>,
    /// The vector entry is the left factor of each product (`u·A` order).
    pub vector_first: bool,
}

impl<S: ?Sized> Clone for KernelArgs<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for KernelArgs<'_, S> {}

impl<'a, S: ?Sized> KernelArgs<'a, S> {
    pub fn new(semiring: &'a S, mask: Option<&'a MaskView>, vector_first: bool) -> Self {
        Self { semiring, mask, vector_first }
    }

    /// `a ⊗ x` or `x ⊗ a`, depending on operand order.
    #[inline]
    pub fn product<T>(&self, a: T, x: T) -> T
    where
        S: Semiring<T>,
    {
        if self.vector_first { self.semiring.multiply(x, a) } else { self.semiring.multiply(a, x) }
    }

    #[inline]
    pub fn admits(&self, i: usize) -> bool {
        mask::admits(self.mask, i)
    }
}

/// Fold `(index, value)` contributions, already grouped by index in a stable
/// order, into sorted sparse output, dropping sums equal to `identity`.
pub(crate) fn reduce_sorted<T, S>(
    semiring: &S,
    pairs: &[(usize, T)],
    identity: T,
) -> (Vec<usize>, Vec<T>)
where
    T: Copy + PartialEq,
    S: Semiring<T> + ?Sized,
{
    let mut indices = Vec::new();
    let mut values = Vec::new();
    let mut iter = pairs.iter().copied().peekable();
    while let Some((i, mut acc)) = iter.next() {
        while let Some(&(j, v)) = iter.peek() {
            if j != i {
                break;
            }
            acc = semiring.add(acc, v);
            iter.next();
        }
        if acc != identity {
            indices.push(i);
            values.push(acc);
        }
    }
    (indices, values)
}
