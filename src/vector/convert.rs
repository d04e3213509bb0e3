//! Dense ↔ sparse conversions and the density policy choosing between them.
//!
//! Sparse storage wins for low-occupancy frontiers, where work is
//! proportional to the number of stored entries; dense storage wins once
//! occupancy is high enough that scattering and index-chasing cost more than
//! scanning every slot. The crossover is the descriptor's `switchpoint`.
//!
//! Conversions build the new storage completely before swapping it in, so a
//! failed allocation leaves the vector in its previous representation.

use std::time::Instant;

use crate::config::Descriptor;
use crate::core::traits::Scalar;
use crate::error::{GrbError, try_alloc};
use crate::vector::{Repr, Storage, Vector};

/// Target representation for a vector with `nnz` entries out of `n`.
///
/// Sparse when `nnz / n < switchpoint`, dense otherwise; a density exactly at
/// the switchpoint goes dense.
pub fn select_storage(nnz: usize, n: usize, switchpoint: f64) -> Storage {
    if n == 0 {
        return Storage::Sparse;
    }
    let density = nnz as f64 / n as f64;
    if density < switchpoint { Storage::Sparse } else { Storage::Dense }
}

impl<T: Scalar> Vector<T> {
    /// Compact a dense vector, keeping slots that differ from `identity`.
    ///
    /// Fails with `InvalidState` if the vector is already sparse.
    pub fn dense_to_sparse(&mut self, identity: T, desc: &Descriptor) -> Result<(), GrbError> {
        let start = Instant::now();
        let vals = match &self.repr {
            Repr::Dense(vals) => vals,
            Repr::Sparse { .. } => {
                return Err(GrbError::InvalidState("dense_to_sparse on a sparse vector".into()));
            }
        };
        let nnz = vals.iter().filter(|&&v| v != identity).count();
        let mut indices = try_alloc(nnz)?;
        let mut values = try_alloc(nnz)?;
        for (i, &v) in vals.iter().enumerate() {
            if v != identity {
                indices.push(i);
                values.push(v);
            }
        }
        self.repr = Repr::Sparse { indices, values };
        if desc.debug() {
            log::debug!(
                "dense_to_sparse: n={}, nnz={}, {:.3} ms",
                self.n,
                nnz,
                start.elapsed().as_secs_f64() * 1e3
            );
        }
        Ok(())
    }

    /// Scatter a sparse vector into `size()` slots pre-filled with `identity`.
    ///
    /// Fails with `InvalidState` if the vector is already dense.
    pub fn sparse_to_dense(&mut self, identity: T, desc: &Descriptor) -> Result<(), GrbError> {
        let start = Instant::now();
        let (indices, values) = match &self.repr {
            Repr::Sparse { indices, values } => (indices, values),
            Repr::Dense(_) => {
                return Err(GrbError::InvalidState("sparse_to_dense on a dense vector".into()));
            }
        };
        let nnz = indices.len();
        let mut dense = try_alloc(self.n)?;
        dense.resize(self.n, identity);
        for (&i, &v) in indices.iter().zip(values) {
            dense[i] = v;
        }
        self.repr = Repr::Dense(dense);
        if desc.debug() {
            log::debug!(
                "sparse_to_dense: n={}, nnz={}, {:.3} ms",
                self.n,
                nnz,
                start.elapsed().as_secs_f64() * 1e3
            );
        }
        Ok(())
    }

    /// Density-adaptive conversion: go sparse below `switchpoint`, dense at or
    /// above it. No-op if already in the target form.
    pub fn convert(&mut self, identity: T, switchpoint: f64, desc: &Descriptor) -> Result<(), GrbError> {
        if self.n == 0 {
            return Ok(());
        }
        let target = select_storage(self.nvals(identity), self.n, switchpoint);
        if desc.debug() {
            log::debug!(
                "convert: density={:.4}, switchpoint={}, {:?} -> {:?}",
                self.nvals(identity) as f64 / self.n as f64,
                switchpoint,
                self.storage(),
                target
            );
        }
        self.convert_to(target, identity, desc)
    }

    /// Convert to `target`, doing nothing if already there.
    pub fn convert_to(&mut self, target: Storage, identity: T, desc: &Descriptor) -> Result<(), GrbError> {
        match (self.storage(), target) {
            (Storage::Dense, Storage::Sparse) => self.dense_to_sparse(identity, desc),
            (Storage::Sparse, Storage::Dense) => self.sparse_to_dense(identity, desc),
            _ => Ok(()),
        }
    }

    /// Re-tag the active representation without converting data.
    ///
    /// Used on a result vector whose representation is decided before a
    /// kernel overwrites it: the previous content is discarded and the new
    /// representation starts empty (sparse) or default-filled (dense). A
    /// vector already of `kind` keeps its content.
    pub fn set_storage(&mut self, kind: Storage) -> Result<(), GrbError> {
        if self.storage() == kind {
            return Ok(());
        }
        self.repr = match kind {
            Storage::Sparse => Repr::Sparse { indices: Vec::new(), values: Vec::new() },
            Storage::Dense => {
                let mut vals = try_alloc(self.n)?;
                vals.resize(self.n, T::default());
                Repr::Dense(vals)
            }
        };
        Ok(())
    }
}
