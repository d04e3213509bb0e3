// Dense matrix x dense vector over a semiring

use faer::Mat;

use crate::core::traits::{Scalar, Semiring};
use crate::error::{GrbError, try_alloc};
use crate::kernel::KernelArgs;
use crate::matrix::DenseMatrix;
use crate::parallel::Comm;

/// Dense `t = B · u` where `B` is `a`, or `aᵀ` when `transposed`.
pub fn gemv<T, S, C>(
    a: &Mat<T>,
    transposed: bool,
    u: &[T],
    args: KernelArgs<'_, S>,
    comm: &C,
) -> Result<Vec<T>, GrbError>
where
    T: Scalar,
    S: Semiring<T> + ?Sized,
    C: Comm,
{
    let identity = args.semiring.identity();
    let (nout, ninner) = if transposed { (a.ncols(), a.nrows()) } else { (a.nrows(), a.ncols()) };
    let mut out = try_alloc(nout)?;
    out.resize(nout, identity);
    comm.fill_indexed(&mut out, |i| {
        if !args.admits(i) {
            return identity;
        }
        let mut acc = identity;
        for (j, &xj) in u.iter().enumerate().take(ninner) {
            if xj == identity {
                continue;
            }
            let bij = if transposed { a.value_at(j, i) } else { a.value_at(i, j) };
            if bij != identity {
                acc = args.semiring.add(acc, args.product(bij, xj));
            }
        }
        acc
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ops::{MinPlus, PlusMultiplies};
    use crate::parallel::SerialComm;
    use approx::assert_relative_eq;

    #[test]
    fn plain_and_transposed() {
        let a: Mat<f64> = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = PlusMultiplies::<f64>::new();
        let y = gemv(&a, false, &[1.0, 0.5, 2.0], KernelArgs::new(&s, None, false), &SerialComm).unwrap();
        assert_relative_eq!(y[0], 8.0);
        assert_relative_eq!(y[1], 18.5);
        let y = gemv(&a, true, &[1.0, -1.0], KernelArgs::new(&s, None, true), &SerialComm).unwrap();
        assert_eq!(y, vec![-3.0, -3.0, -3.0]);
    }

    #[test]
    fn tropical_relaxation() {
        let inf = f64::INFINITY;
        let a: Mat<f64> = DenseMatrix::from_row_major(2, 2, &[inf, 1.0, 4.0, inf]);
        let s = MinPlus::<f64>::new();
        // row i: min_j a[i][j] + u[j]
        let y = gemv(&a, false, &[0.0, 2.0], KernelArgs::new(&s, None, false), &SerialComm).unwrap();
        assert_eq!(y, vec![3.0, 4.0]);
    }
}
