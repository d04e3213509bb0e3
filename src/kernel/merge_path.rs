//! Merge-path SpMSpV.
//!
//! The work of `B · u` for sparse `u` is two sorted sequences merged along a
//! path: the end offsets of the lanes selected by `u`'s active indices
//! (`x` axis) and the nonzeros of those lanes laid end to end (`y` axis).
//! Every path step, either a nonzero or a lane end, is one work item, so
//! splitting the `m + nnz` diagonals evenly gives each partition the same
//! amount of work no matter how skewed the lane lengths are. A partition's
//! start is found by binary search along its diagonal.
//!
//! Partitions emit `(output index, product)` pairs. They are joined in
//! partition order and stably sorted by index, so every output is reduced in
//! the same order for any partition count and boundaries that split a lane
//! never lose a partial sum.

use crate::core::traits::{Scalar, Semiring};
use crate::error::{GrbError, try_alloc};
use crate::kernel::{KernelArgs, reduce_sorted};
use crate::matrix::Compressed;
use crate::parallel::Comm;

/// Coordinate `(x, y)` where diagonal `diagonal` crosses the merge path of
/// `row_end_offsets` (length `m`, non-decreasing, last value `nnz`) against
/// the nonzero counter `0..nnz`. `x` lanes are complete and `y` nonzeros
/// consumed, with `x + y == diagonal`.
pub fn merge_path_search(diagonal: usize, row_end_offsets: &[usize], nnz: usize) -> (usize, usize) {
    let m = row_end_offsets.len();
    let mut x_min = diagonal.saturating_sub(nnz);
    let mut x_max = diagonal.min(m);
    while x_min < x_max {
        let pivot = (x_min + x_max) / 2;
        if row_end_offsets[pivot] <= diagonal - pivot - 1 {
            x_min = pivot + 1;
        } else {
            x_max = pivot;
        }
    }
    (x_min.min(m), diagonal - x_min)
}

/// Sparse `t = B · u` with lanes of `B` keyed by `u`'s indices.
///
/// `lanes.lane(j)` must hold the entries of column `j` of `B` (their `idx`
/// are output indices). Work is split into `partitions` balanced chunks run
/// through `comm`. Output is sorted and free of identity values.
pub fn spmspv_merge<T, S, C>(
    lanes: Compressed<'_, T>,
    u_indices: &[usize],
    u_values: &[T],
    args: KernelArgs<'_, S>,
    partitions: usize,
    comm: &C,
) -> Result<(Vec<usize>, Vec<T>), GrbError>
where
    T: Scalar,
    S: Semiring<T> + ?Sized,
    C: Comm,
{
    let identity = args.semiring.identity();

    let mut active: Vec<(usize, T)> = try_alloc(u_indices.len())?;
    active.extend(
        u_indices
            .iter()
            .zip(u_values)
            .filter(|&(_, &x)| x != identity)
            .map(|(&j, &x)| (j, x)),
    );
    let m = active.len();

    let mut offsets: Vec<usize> = try_alloc(m)?;
    let mut nnz = 0;
    for &(j, _) in &active {
        nnz += lanes.lane_len(j);
        offsets.push(nnz);
    }

    let total = m + nnz;
    if nnz == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    let parts = partitions.max(1);
    let per_part = total.div_ceil(parts);

    let chunks = comm.map_chunks(parts, |p| -> Result<Vec<(usize, T)>, GrbError> {
        let d0 = (p * per_part).min(total);
        let d1 = ((p + 1) * per_part).min(total);
        let (x0, y0) = merge_path_search(d0, &offsets, nnz);
        let (x1, y1) = merge_path_search(d1, &offsets, nnz);
        log::trace!("merge-path partition {p}: ({x0}, {y0}) -> ({x1}, {y1})");

        let mut out = try_alloc(y1 - y0)?;
        for x in x0..(x1 + 1).min(m) {
            let lane_start = if x == 0 { 0 } else { offsets[x - 1] };
            let lo = lane_start.max(y0);
            let hi = offsets[x].min(y1);
            if lo >= hi {
                continue;
            }
            let (j, xj) = active[x];
            let (idx, val) = lanes.lane(j);
            for k in (lo - lane_start)..(hi - lane_start) {
                let i = idx[k];
                if val[k] != identity && args.admits(i) {
                    out.push((i, args.product(val[k], xj)));
                }
            }
        }
        Ok(out)
    });
    let chunks = chunks.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut pairs: Vec<(usize, T)> = try_alloc(chunks.iter().map(Vec::len).sum())?;
    for chunk in chunks {
        pairs.extend(chunk);
    }
    pairs.sort_by_key(|&(i, _)| i);
    Ok(reduce_sorted(args.semiring, &pairs, identity))
}
