//! Thread/warp/block binned SpMSpV.
//!
//! Active lanes are binned by length. Short lanes (thread class) are batched
//! together so one work item covers many of them, medium lanes (warp class)
//! get an item each, and long lanes (block class) are cut into fixed-width
//! slices. Items run in parallel and their products are scattered into a
//! dense accumulator in item order, which is lane order.

use crate::core::traits::{Scalar, Semiring};
use crate::error::{GrbError, try_alloc};
use crate::kernel::KernelArgs;
use crate::matrix::Compressed;
use crate::parallel::Comm;

/// Lanes shorter than this are thread class.
pub const WARP_WIDTH: usize = 32;
/// Lanes shorter than this are warp class; longer ones are sliced into blocks of this width.
pub const BLOCK_WIDTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Thread,
    Warp,
    Block,
}

impl Class {
    fn of(len: usize) -> Self {
        if len < WARP_WIDTH {
            Class::Thread
        } else if len < BLOCK_WIDTH {
            Class::Warp
        } else {
            Class::Block
        }
    }
}

/// One unit of work: the `[start, end)` slice of lanes `first..=last` in the
/// active list (`start`/`end` only restrict block slices).
#[derive(Debug, Clone, Copy)]
struct Item {
    first: usize,
    last: usize,
    start: usize,
    end: usize,
}

fn plan_items(lens: &[usize]) -> Result<(Vec<Item>, [usize; 3]), GrbError> {
    let mut items = try_alloc(lens.len())?;
    let mut counts = [0usize; 3];
    let mut batch: Option<(usize, usize)> = None;
    for (a, &len) in lens.iter().enumerate() {
        let class = Class::of(len);
        counts[class as usize] += 1;
        if class == Class::Thread {
            batch = match batch {
                Some((first, work)) if work + len <= BLOCK_WIDTH => Some((first, work + len)),
                Some((first, _)) => {
                    items.push(Item { first, last: a - 1, start: 0, end: usize::MAX });
                    Some((a, len))
                }
                None => Some((a, len)),
            };
            continue;
        }
        if let Some((first, _)) = batch.take() {
            items.push(Item { first, last: a - 1, start: 0, end: usize::MAX });
        }
        match class {
            Class::Warp => items.push(Item { first: a, last: a, start: 0, end: len }),
            _ => {
                let mut s = 0;
                while s < len {
                    let e = (s + BLOCK_WIDTH).min(len);
                    items.push(Item { first: a, last: a, start: s, end: e });
                    s = e;
                }
            }
        }
    }
    if let Some((first, _)) = batch {
        items.push(Item { first, last: lens.len() - 1, start: 0, end: usize::MAX });
    }
    Ok((items, counts))
}

/// Dense `t = B · u` for sparse `u`, binned by lane length and run through `comm`.
pub fn spmspv_twc<T, S, C>(
    lanes: Compressed<'_, T>,
    nout: usize,
    u_indices: &[usize],
    u_values: &[T],
    args: KernelArgs<'_, S>,
    comm: &C,
) -> Result<Vec<T>, GrbError>
where
    T: Scalar,
    S: Semiring<T> + ?Sized,
    C: Comm,
{
    if !comm.is_parallel() {
        return Err(GrbError::NotImplemented("thread-warp-block load balancing needs a parallel backend"));
    }
    let identity = args.semiring.identity();
    let mut active: Vec<(usize, T)> = try_alloc(u_indices.len())?;
    active.extend(
        u_indices
            .iter()
            .zip(u_values)
            .filter(|&(_, &x)| x != identity)
            .map(|(&j, &x)| (j, x)),
    );
    let mut lens: Vec<usize> = try_alloc(active.len())?;
    lens.extend(active.iter().map(|&(j, _)| lanes.lane_len(j)));
    let (items, counts) = plan_items(&lens)?;
    log::trace!(
        "twc: {} items (thread={}, warp={}, block={})",
        items.len(),
        counts[0],
        counts[1],
        counts[2]
    );

    let partial = comm.map_chunks(items.len(), |k| -> Result<Vec<(usize, T)>, GrbError> {
        let item = items[k];
        // every item covers at most one block of products
        let mut out = try_alloc(BLOCK_WIDTH)?;
        for &(j, xj) in &active[item.first..=item.last] {
            let (idx, val) = lanes.lane(j);
            let end = item.end.min(idx.len());
            for (&i, &a) in idx[item.start..end].iter().zip(&val[item.start..end]) {
                if a != identity && args.admits(i) {
                    out.push((i, args.product(a, xj)));
                }
            }
        }
        Ok(out)
    });
    let partial = partial.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut acc = try_alloc(nout)?;
    acc.resize(nout, identity);
    for (i, v) in partial.into_iter().flatten() {
        acc[i] = args.semiring.add(acc[i], v);
    }
    Ok(acc)
}
