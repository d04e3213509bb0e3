// Sequential SpMSpV into a dense accumulator

use crate::core::traits::{Scalar, Semiring};
use crate::error::{GrbError, try_alloc};
use crate::kernel::KernelArgs;
use crate::matrix::Compressed;

/// Dense `t = B · u` for sparse `u`, one lane at a time.
///
/// Slots that receive no product hold the semiring identity; the caller
/// compacts the result.
pub fn spmspv_simple<T, S>(
    lanes: Compressed<'_, T>,
    nout: usize,
    u_indices: &[usize],
    u_values: &[T],
    args: KernelArgs<'_, S>,
) -> Result<Vec<T>, GrbError>
where
    T: Scalar,
    S: Semiring<T> + ?Sized,
{
    let identity = args.semiring.identity();
    let mut acc = try_alloc(nout)?;
    acc.resize(nout, identity);
    for (&j, &xj) in u_indices.iter().zip(u_values) {
        if xj == identity {
            continue;
        }
        let (idx, val) = lanes.lane(j);
        for (&i, &a) in idx.iter().zip(val) {
            if a != identity && args.admits(i) {
                acc[i] = args.semiring.add(acc[i], args.product(a, xj));
            }
        }
    }
    Ok(acc)
}
