//! Direction-optimizing matrix-vector multiply.
//!
//! [`mxv`] computes `w = A ⊕.⊗ u` and [`vxm`] computes `w = u ⊕.⊗ A`. `vxm`
//! runs as `mxv` with the matrix slot's transpose intent toggled for the
//! duration of the call, so both reduce to one multiply with an effective
//! operator `B` (`A`, or `Aᵀ` when transposed).
//!
//! Each call converts the vector operand to the representation the matrix
//! and descriptor call for ([`plan::plan_conversion`]), picks a kernel family
//! from the matrix density and vector storage ([`plan::select_strategy`]),
//! runs it and records the direction it took in the descriptor.

use std::time::Instant;

use crate::config::{Descriptor, Direction, Input, LoadBalance, ToggleGuard, TransposeMode};
use crate::core::traits::{BinaryOp, MatrixAccess, RawMatrix, Scalar, Semiring};
use crate::error::GrbError;
use crate::kernel::{KernelArgs, MaskView, gemv, simple, spmspv_merge, spmv, twc};
use crate::matrix::{Compressed, CsrMatrix};
use crate::parallel::{Comm, UniverseComm};
use crate::vector::{Storage, Vector};

pub mod output;
pub mod plan;

pub use plan::{OperandState, Strategy, plan_conversion, select_strategy};

/// Typed "no mask" for calls that do not mask their output.
pub const NO_MASK: Option<&'static Vector<bool>> = None;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Mxv,
    Vxm,
}

impl Call {
    fn name(self) -> &'static str {
        match self {
            Call::Mxv => "mxv",
            Call::Vxm => "vxm",
        }
    }

    /// Slot that must keep its default transpose intent.
    fn vector_slot(self) -> Input {
        match self {
            Call::Mxv => Input::Inp1,
            Call::Vxm => Input::Inp0,
        }
    }
}

/// `w = A ⊕.⊗ u`, or `Aᵀ ⊕.⊗ u` when `INP0` is transposed.
///
/// `u` may be converted between dense and sparse in place; its logical value
/// does not change. Setting `INP1` to `Transpose` is an `InvalidValue`.
pub fn mxv<T, M, S, A>(
    w: &mut Vector<T>,
    mask: Option<&Vector<M>>,
    accum: Option<&dyn BinaryOp<T>>,
    semiring: &S,
    a: &A,
    u: &mut Vector<T>,
    desc: &mut Descriptor,
) -> Result<(), GrbError>
where
    T: Scalar,
    M: Scalar,
    S: Semiring<T> + ?Sized,
    A: MatrixAccess<T> + ?Sized,
{
    run(Call::Mxv, w, mask, accum, semiring, a, u, desc)
}

/// `w = u ⊕.⊗ A`, or `u ⊕.⊗ Aᵀ` when `INP1` is transposed.
///
/// Products are formed as `u[j] ⊗ A[j][i]`. Setting `INP0` to `Transpose` is
/// an `InvalidValue`. The descriptor's `INP1` is restored before returning,
/// on success and on error.
///
/// ```
/// use graphmv::{Descriptor, Matrix, PlusMultiplies, Vector, NO_MASK, vxm};
///
/// let mut a = Matrix::new(4, 4);
/// a.build(&[0, 1, 2], &[1, 2, 3], &[1.0, 1.0, 1.0], 3, None).unwrap();
/// let mut u = Vector::new(4);
/// u.set_element(1.0, 0).unwrap();
/// let mut w = Vector::new(4);
/// let mut desc = Descriptor::new();
/// vxm(&mut w, NO_MASK, None, &PlusMultiplies::<f64>::new(), &mut u, &a, &mut desc).unwrap();
/// assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]));
/// ```
pub fn vxm<T, M, S, A>(
    w: &mut Vector<T>,
    mask: Option<&Vector<M>>,
    accum: Option<&dyn BinaryOp<T>>,
    semiring: &S,
    u: &mut Vector<T>,
    a: &A,
    desc: &mut Descriptor,
) -> Result<(), GrbError>
where
    T: Scalar,
    M: Scalar,
    S: Semiring<T> + ?Sized,
    A: MatrixAccess<T> + ?Sized,
{
    run(Call::Vxm, w, mask, accum, semiring, a, u, desc)
}

#[allow(clippy::too_many_arguments)]
fn run<T, M, S, A>(
    call: Call,
    w: &mut Vector<T>,
    mask: Option<&Vector<M>>,
    accum: Option<&dyn BinaryOp<T>>,
    semiring: &S,
    a: &A,
    u: &mut Vector<T>,
    desc: &mut Descriptor,
) -> Result<(), GrbError>
where
    T: Scalar,
    M: Scalar,
    S: Semiring<T> + ?Sized,
    A: MatrixAccess<T> + ?Sized,
{
    let a_storage = a.storage()?;
    if u.size() == 0 {
        return Err(GrbError::Uninitialized("vector operand has zero length"));
    }
    if desc.transpose(call.vector_slot()) != TransposeMode::Default {
        return Err(GrbError::InvalidValue(format!(
            "{}: transposing the vector operand slot {:?} is not supported",
            call.name(),
            call.vector_slot()
        )));
    }
    if desc.debug() {
        log::debug!("=== begin {} ===", call.name());
    }
    match call {
        Call::Mxv => {
            let transposed = desc.transpose(Input::Inp0) == TransposeMode::Transpose;
            multiply(call, w, mask, accum, semiring, a, a_storage, u, desc, transposed)
        }
        Call::Vxm => {
            let mut guard = ToggleGuard::new(desc, Input::Inp1);
            let transposed = guard.transpose(Input::Inp1) == TransposeMode::Transpose;
            multiply(call, w, mask, accum, semiring, a, a_storage, u, &mut guard, transposed)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn multiply<T, M, S, A>(
    call: Call,
    w: &mut Vector<T>,
    mask: Option<&Vector<M>>,
    accum: Option<&dyn BinaryOp<T>>,
    semiring: &S,
    a: &A,
    a_storage: Storage,
    u: &mut Vector<T>,
    desc: &mut Descriptor,
    transposed: bool,
) -> Result<(), GrbError>
where
    T: Scalar,
    M: Scalar,
    S: Semiring<T> + ?Sized,
    A: MatrixAccess<T> + ?Sized,
{
    let start = Instant::now();
    let (nrows, ncols) = if transposed { (a.ncols(), a.nrows()) } else { (a.nrows(), a.ncols()) };
    if u.size() != ncols {
        return Err(GrbError::InvalidValue(format!(
            "{}: vector operand has length {}, operator needs {ncols}",
            call.name(),
            u.size()
        )));
    }
    if w.size() != nrows {
        return Err(GrbError::InvalidValue(format!(
            "{}: output has length {}, operator produces {nrows}",
            call.name(),
            w.size()
        )));
    }
    if let Some(m) = mask {
        if m.size() != nrows {
            return Err(GrbError::InvalidValue(format!(
                "{}: mask has length {}, output has {nrows}",
                call.name(),
                m.size()
            )));
        }
    }

    let format = a.format()?;
    let symmetric = a.symmetric()?;
    let direction = desc.direction();
    let load_balance = desc.load_balance();
    let identity = semiring.identity();
    if desc.debug() {
        log::debug!("load balance mode: {load_balance}");
        log::debug!("identity: {identity:?}");
        log::debug!("sparse format: {format}, symmetric: {symmetric}");
        log::debug!("direction mode: {direction}, tolerance: {}", desc.tolerance());
    }

    let before = u.storage();
    let state = OperandState {
        format,
        symmetric,
        transposed,
        nnz: u.nvals(identity),
        n: u.size(),
    };
    let target = plan_conversion(&state, direction, desc.switchpoint());
    u.convert_to(target, identity, desc)?;
    let u_storage = u.storage();
    let strategy = select_strategy(a_storage, u_storage);
    if desc.debug() {
        log::debug!("u storage: {before:?} -> {u_storage:?}, strategy: {strategy}");
    }

    let mask_view = mask.map(|m| MaskView::new(m, desc.mask_mode())).transpose()?;
    let args = KernelArgs::new(semiring, mask_view.as_ref(), call == Call::Vxm);
    let comm = UniverseComm::default();

    match (strategy, a.raw_handle()?) {
        (Strategy::SpMSpV, RawMatrix::Sparse(csr)) => {
            let lanes = push_lanes(csr, transposed)?;
            let (u_idx, u_val) = u
                .as_sparse()
                .ok_or_else(|| GrbError::InvalidState("sparse kernel given a dense vector".into()))?;
            match load_balance {
                LoadBalance::Merge => {
                    let partitions = desc.nthreads().unwrap_or_else(|| comm.size());
                    let (idx, val) = spmspv_merge(lanes, u_idx, u_val, args, partitions, &comm)?;
                    output::prepare(w, Storage::Sparse, accum, identity, desc)?;
                    output::write_sparse(w, idx, val, accum, identity)?;
                }
                LoadBalance::Simple | LoadBalance::ThreadWarpBlock => {
                    let t = if load_balance == LoadBalance::Simple {
                        simple::spmspv_simple(lanes, nrows, u_idx, u_val, args)?
                    } else {
                        twc::spmspv_twc(lanes, nrows, u_idx, u_val, args, &comm)?
                    };
                    output::prepare(w, Storage::Dense, accum, identity, desc)?;
                    output::write_dense(w, t, accum, identity)?;
                    w.dense_to_sparse(identity, desc)?;
                }
            }
            desc.record_direction(Direction::PushOnly);
        }
        (Strategy::SpMV, RawMatrix::Sparse(csr)) => {
            let rows = pull_lanes(csr, transposed)?;
            let x = u
                .as_dense()
                .ok_or_else(|| GrbError::InvalidState("dense kernel given a sparse vector".into()))?;
            let t = spmv::spmv(rows, x, args, &comm)?;
            output::prepare(w, Storage::Dense, accum, identity, desc)?;
            output::write_dense(w, t, accum, identity)?;
            desc.record_direction(Direction::PullOnly);
        }
        (Strategy::GeMV, RawMatrix::Dense(mat)) => {
            if u.storage() == Storage::Sparse {
                u.sparse_to_dense(identity, desc)?;
            }
            let x = u
                .as_dense()
                .ok_or_else(|| GrbError::InvalidState("dense kernel given a sparse vector".into()))?;
            let t = gemv::gemv(mat, transposed, x, args, &comm)?;
            output::prepare(w, Storage::Dense, accum, identity, desc)?;
            output::write_dense(w, t, accum, identity)?;
            desc.record_direction(Direction::PullOnly);
        }
        (strategy, _) => {
            return Err(GrbError::InvalidState(format!(
                "{strategy} selected for a matrix of the other density class"
            )));
        }
    }

    if desc.debug() {
        log::debug!(
            "=== end {}: w {:?}, nvals {}, {:.3} ms ===",
            call.name(),
            w.storage(),
            w.nvals(identity),
            start.elapsed().as_secs_f64() * 1e3
        );
    }
    Ok(())
}

/// Columns of the effective operator, keyed by vector index.
fn push_lanes<T: Scalar>(csr: &CsrMatrix<T>, transposed: bool) -> Result<Compressed<'_, T>, GrbError> {
    if transposed {
        return Ok(csr.rows());
    }
    csr.cols()
        .ok_or_else(|| GrbError::InvalidState("matrix has no column orientation; materialize CSC first".into()))
}

/// Rows of the effective operator, keyed by output index.
fn pull_lanes<T: Scalar>(csr: &CsrMatrix<T>, transposed: bool) -> Result<Compressed<'_, T>, GrbError> {
    if !transposed {
        return Ok(csr.rows());
    }
    csr.cols()
        .ok_or_else(|| GrbError::InvalidState("matrix has no column orientation; materialize CSC first".into()))
}
