// Row-parallel sparse matrix x dense vector

use crate::core::traits::{Scalar, Semiring};
use crate::error::{GrbError, try_alloc};
use crate::kernel::KernelArgs;
use crate::matrix::Compressed;
use crate::parallel::Comm;

/// Dense `t = B · u` for dense `u`, where `rows.lane(i)` is row `i` of `B`.
///
/// Each output slot is reduced independently over its row; masked-out slots
/// and rows without a contributing product hold the identity.
pub fn spmv<T, S, C>(rows: Compressed<'_, T>, u: &[T], args: KernelArgs<'_, S>, comm: &C) -> Result<Vec<T>, GrbError>
where
    T: Scalar,
    S: Semiring<T> + ?Sized,
    C: Comm,
{
    let identity = args.semiring.identity();
    let nout = rows.lanes();
    let mut out = try_alloc(nout)?;
    out.resize(nout, identity);
    comm.fill_indexed(&mut out, |i| {
        if !args.admits(i) {
            return identity;
        }
        let (idx, val) = rows.lane(i);
        let mut acc = identity;
        for (&j, &a) in idx.iter().zip(val) {
            let xj = u[j];
            if a != identity && xj != identity {
                acc = args.semiring.add(acc, args.product(a, xj));
            }
        }
        acc
    });
    Ok(out)
}
