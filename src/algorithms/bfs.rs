//! Level-synchronous breadth-first search.
//!
//! Each level is one `vxm` of the frontier against the adjacency matrix over
//! the boolean `(or, and)` semiring, masked by the complement of the visited
//! set. The engine picks push or pull per level from the frontier density.

use crate::config::{Descriptor, MaskMode};
use crate::core::ops::LogicalOrAnd;
use crate::core::traits::MatrixAccess;
use crate::dispatch::vxm;
use crate::error::GrbError;
use crate::utils::TraversalStats;
use crate::vector::Vector;

/// BFS levels from `source`: `levels[v]` is the hop distance of `v`, or
/// `None` if unreachable. Edge `i → j` is entry `(i, j)` of `a`.
///
/// The descriptor's mask mode is switched to complement for the run and
/// restored afterwards.
pub fn bfs<A>(a: &A, source: usize, desc: &mut Descriptor) -> Result<(Vec<Option<usize>>, TraversalStats), GrbError>
where
    A: MatrixAccess<bool> + ?Sized,
{
    let n = a.nrows();
    if a.ncols() != n {
        return Err(GrbError::InvalidValue(format!("bfs needs a square matrix, got {n}x{}", a.ncols())));
    }
    if source >= n {
        return Err(GrbError::InvalidValue(format!("source {source} out of range for {n} vertices")));
    }
    let saved = desc.mask_mode();
    desc.set_mask_mode(MaskMode::Complement);
    let result = levels(a, source, n, desc);
    desc.set_mask_mode(saved);
    result
}

fn levels<A>(
    a: &A,
    source: usize,
    n: usize,
    desc: &mut Descriptor,
) -> Result<(Vec<Option<usize>>, TraversalStats), GrbError>
where
    A: MatrixAccess<bool> + ?Sized,
{
    let mut levels = vec![None; n];
    levels[source] = Some(0);
    let mut visited = Vector::new(n);
    visited.fill(false)?;
    visited.set_element(true, source)?;
    let mut frontier = Vector::new(n);
    frontier.set_element(true, source)?;

    let mut stats = TraversalStats::default();
    for depth in 1.. {
        let mut next = Vector::new(n);
        vxm(&mut next, Some(&visited), None, &LogicalOrAnd, &mut frontier, a, desc)?;
        let (found, _) = next.extract_tuples(false);
        stats.record(found.len(), desc.last_direction());
        if desc.debug() {
            log::debug!("bfs level {depth}: {} new vertices, {:?}", found.len(), desc.last_direction());
        }
        if found.is_empty() {
            stats.converged = true;
            break;
        }
        for &v in &found {
            levels[v] = Some(depth);
            visited.set_element(true, v)?;
        }
        frontier = next;
    }
    Ok((levels, stats))
}
