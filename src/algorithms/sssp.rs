//! Single-source shortest paths by repeated min-plus relaxation.

use num_traits::Float;

use crate::config::Descriptor;
use crate::core::ops::{Min, MinPlus};
use crate::core::traits::{MatrixAccess, Scalar};
use crate::dispatch::{NO_MASK, vxm};
use crate::error::GrbError;
use crate::utils::TraversalStats;
use crate::vector::Vector;

/// Shortest distances from `source` over edge weights `a[(i, j)]`.
///
/// Each iteration computes `d = min(d, d ⊕.⊗ A)` over `(min, +, ∞)` and the
/// loop stops at the first iteration that changes nothing. Unreachable
/// vertices keep `∞`. A distance still shrinking after `n` iterations means a
/// negative cycle is reachable, reported as `InvalidValue`.
pub fn sssp<T, A>(a: &A, source: usize, desc: &mut Descriptor) -> Result<(Vec<T>, TraversalStats), GrbError>
where
    T: Float + Scalar,
    A: MatrixAccess<T> + ?Sized,
{
    let n = a.nrows();
    if a.ncols() != n {
        return Err(GrbError::InvalidValue(format!("sssp needs a square matrix, got {n}x{}", a.ncols())));
    }
    if source >= n {
        return Err(GrbError::InvalidValue(format!("source {source} out of range for {n} vertices")));
    }
    let inf = T::infinity();
    let semiring = MinPlus::<T>::new();
    let mut dist = Vector::new(n);
    dist.set_element(T::zero(), source)?;

    let mut stats = TraversalStats::default();
    for _ in 0..n {
        let mut next = dist.clone();
        let mut frontier = dist.clone();
        vxm(&mut next, NO_MASK, Some(&Min), &semiring, &mut frontier, a, desc)?;
        let changed = next.extract_tuples(inf) != dist.extract_tuples(inf);
        stats.record(next.nvals(inf), desc.last_direction());
        dist = next;
        if !changed {
            stats.converged = true;
            let out = (0..n).map(|i| dist.get(i).unwrap_or(inf)).collect();
            return Ok((out, stats));
        }
    }
    Err(GrbError::InvalidValue("negative cycle reachable from source".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use approx::assert_relative_eq;

    #[test]
    fn weighted_shortcut() {
        // 0 -> 1 (4), 0 -> 2 (1), 2 -> 1 (2), 1 -> 3 (1)
        let mut a = Matrix::new(5, 5);
        a.build(&[0, 0, 2, 1], &[1, 2, 1, 3], &[4.0, 1.0, 2.0, 1.0], 4, None).unwrap();
        let mut desc = Descriptor::new();
        let (d, stats) = sssp(&a, 0, &mut desc).unwrap();
        assert_relative_eq!(d[0], 0.0);
        assert_relative_eq!(d[1], 3.0);
        assert_relative_eq!(d[2], 1.0);
        assert_relative_eq!(d[3], 4.0);
        assert!(d[4].is_infinite());
        assert!(stats.converged);
    }

    #[test]
    fn negative_cycle_is_reported() {
        let mut a = Matrix::new(2, 2);
        a.build(&[0, 1], &[1, 0], &[1.0, -3.0], 2, None).unwrap();
        assert!(matches!(sssp::<f64, _>(&a, 0, &mut Descriptor::new()), Err(GrbError::InvalidValue(_))));
    }
}
