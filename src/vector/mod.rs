//! Vectors with a switchable dense/sparse representation.
//!
//! A [`Vector`] has a logical length `n` and exactly one active
//! representation: a dense array of `n` slots, or a sparse list of
//! `(index, value)` pairs with strictly increasing indices. Slots equal to the
//! semiring identity are semantically absent, so both forms describe the same
//! logical vector; [`convert`] moves between them.

use std::fmt;

use crate::core::traits::{BinaryOp, Scalar};
use crate::error::{GrbError, try_alloc};

pub mod convert;

pub use convert::select_storage;

/// Active representation of a vector, or density class of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Dense,
    Sparse,
}

#[derive(Debug, Clone, PartialEq)]
enum Repr<T> {
    Dense(Vec<T>),
    Sparse { indices: Vec<usize>, values: Vec<T> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    n: usize,
    repr: Repr<T>,
}

impl<T: Scalar> Vector<T> {
    /// An empty (all-absent) sparse vector of length `n`.
    pub fn new(n: usize) -> Self {
        Self { n, repr: Repr::Sparse { indices: Vec::new(), values: Vec::new() } }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn storage(&self) -> Storage {
        match self.repr {
            Repr::Dense(_) => Storage::Dense,
            Repr::Sparse { .. } => Storage::Sparse,
        }
    }

    /// Number of entries not equal to `identity`. Dense vectors are scanned.
    pub fn nvals(&self, identity: T) -> usize {
        match &self.repr {
            Repr::Dense(vals) => vals.iter().filter(|&&v| v != identity).count(),
            Repr::Sparse { indices, .. } => indices.len(),
        }
    }

    /// Stored value at `index`. Every in-range slot of a dense vector is stored.
    pub fn get(&self, index: usize) -> Option<T> {
        match &self.repr {
            Repr::Dense(vals) => vals.get(index).copied(),
            Repr::Sparse { indices, values } => {
                indices.binary_search(&index).ok().map(|p| values[p])
            }
        }
    }

    pub fn as_dense(&self) -> Option<&[T]> {
        match &self.repr {
            Repr::Dense(vals) => Some(vals),
            Repr::Sparse { .. } => None,
        }
    }

    pub fn as_sparse(&self) -> Option<(&[usize], &[T])> {
        match &self.repr {
            Repr::Dense(_) => None,
            Repr::Sparse { indices, values } => Some((indices, values)),
        }
    }

    /// Build from `(index, value)` pairs, replacing any previous content.
    ///
    /// The first `nvals` pairs are used. Repeated indices are merged with `dup`
    /// in input order; without `dup` they are rejected.
    pub fn build(
        &mut self,
        indices: &[usize],
        values: &[T],
        nvals: usize,
        dup: Option<&dyn BinaryOp<T>>,
    ) -> Result<(), GrbError> {
        if indices.len() != values.len() {
            return Err(GrbError::InvalidValue(format!(
                "index and value lists differ in length ({} vs {})",
                indices.len(),
                values.len()
            )));
        }
        if nvals > indices.len() {
            return Err(GrbError::InvalidValue(format!(
                "nvals {nvals} exceeds the {} supplied entries",
                indices.len()
            )));
        }
        if let Some(&bad) = indices[..nvals].iter().find(|&&i| i >= self.n) {
            return Err(GrbError::InvalidValue(format!("index {bad} out of range for length {}", self.n)));
        }

        let mut perm: Vec<usize> = (0..nvals).collect();
        perm.sort_by_key(|&p| indices[p]);

        let mut out_idx: Vec<usize> = try_alloc(nvals)?;
        let mut out_val: Vec<T> = try_alloc(nvals)?;
        for &p in &perm {
            let (i, v) = (indices[p], values[p]);
            if out_idx.last() == Some(&i) {
                let op = dup.ok_or_else(|| {
                    GrbError::InvalidValue(format!("duplicate index {i} and no dup operator"))
                })?;
                if let Some(last) = out_val.last_mut() {
                    *last = op.apply(*last, v);
                }
            } else {
                out_idx.push(i);
                out_val.push(v);
            }
        }
        self.repr = Repr::Sparse { indices: out_idx, values: out_val };
        Ok(())
    }

    /// Build a dense vector from exactly `size()` values.
    pub fn build_dense(&mut self, values: &[T]) -> Result<(), GrbError> {
        if values.len() != self.n {
            return Err(GrbError::InvalidValue(format!(
                "expected {} dense values, got {}",
                self.n,
                values.len()
            )));
        }
        let mut vals = try_alloc(self.n)?;
        vals.extend_from_slice(values);
        self.repr = Repr::Dense(vals);
        Ok(())
    }

    /// Make the vector dense with every slot set to `value`.
    pub fn fill(&mut self, value: T) -> Result<(), GrbError> {
        let mut vals = try_alloc(self.n)?;
        vals.resize(self.n, value);
        self.repr = Repr::Dense(vals);
        Ok(())
    }

    pub fn set_element(&mut self, value: T, index: usize) -> Result<(), GrbError> {
        if index >= self.n {
            return Err(GrbError::InvalidValue(format!("index {index} out of range for length {}", self.n)));
        }
        match &mut self.repr {
            Repr::Dense(vals) => vals[index] = value,
            Repr::Sparse { indices, values } => match indices.binary_search(&index) {
                Ok(p) => values[p] = value,
                Err(p) => {
                    indices.insert(p, index);
                    values.insert(p, value);
                }
            },
        }
        Ok(())
    }

    /// Entries not equal to `identity`, in increasing index order.
    pub fn extract_tuples(&self, identity: T) -> (Vec<usize>, Vec<T>) {
        match &self.repr {
            Repr::Dense(vals) => vals
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v != identity)
                .map(|(i, &v)| (i, v))
                .unzip(),
            Repr::Sparse { indices, values } => (indices.clone(), values.clone()),
        }
    }

    /// Drop all entries; the vector becomes empty and sparse.
    pub fn clear(&mut self) {
        self.repr = Repr::Sparse { indices: Vec::new(), values: Vec::new() };
    }

    pub(crate) fn replace_sparse(&mut self, indices: Vec<usize>, values: Vec<T>) {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        self.repr = Repr::Sparse { indices, values };
    }

    pub(crate) fn replace_dense(&mut self, values: Vec<T>) {
        debug_assert_eq!(values.len(), self.n);
        self.repr = Repr::Dense(values);
    }
}

impl<T: Scalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Dense(vals) => {
                write!(f, "Vector(n={}, dense): [", self.n)?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
            }
            Repr::Sparse { indices, values } => {
                write!(f, "Vector(n={}, sparse): [", self.n)?;
                for (k, (i, v)) in indices.iter().zip(values).enumerate() {
                    if k > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{i}: {v:?}")?;
                }
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ops::{Plus, Second};

    #[test]
    fn build_sorts_and_merges_duplicates() {
        let mut v = Vector::<f64>::new(6);
        v.build(&[4, 1, 4, 0], &[1.0, 2.0, 3.0, 4.0], 4, Some(&Plus)).unwrap();
        assert_eq!(v.as_sparse().unwrap(), (&[0usize, 1, 4][..], &[4.0, 2.0, 4.0][..]));

        v.build(&[2, 2], &[1.0, 9.0], 2, Some(&Second)).unwrap();
        assert_eq!(v.get(2), Some(9.0));
    }

    #[test]
    fn build_rejects_malformed_input() {
        let mut v = Vector::<i32>::new(3);
        assert!(matches!(v.build(&[0, 1], &[1], 1, None), Err(GrbError::InvalidValue(_))));
        assert!(matches!(v.build(&[0, 5], &[1, 2], 2, None), Err(GrbError::InvalidValue(_))));
        assert!(matches!(v.build(&[1, 1], &[1, 2], 2, None), Err(GrbError::InvalidValue(_))));
        assert!(matches!(v.build(&[0], &[1], 2, None), Err(GrbError::InvalidValue(_))));
        // only the first nvals entries are read
        v.build(&[0, 7], &[1, 2], 1, None).unwrap();
        assert_eq!(v.nvals(0), 1);
    }

    #[test]
    fn set_element_in_both_forms() {
        let mut v = Vector::<i32>::new(4);
        v.set_element(5, 2).unwrap();
        v.set_element(3, 0).unwrap();
        assert_eq!(v.as_sparse().unwrap().0, &[0, 2]);
        v.fill(-1).unwrap();
        v.set_element(0, 1).unwrap();
        assert_eq!(v.as_dense().unwrap(), &[-1, 0, -1, -1]);
        assert!(v.set_element(1, 4).is_err());
    }

    #[test]
    fn extract_skips_identity_slots() {
        let mut v = Vector::<f32>::new(4);
        v.build_dense(&[0.0, 2.0, 0.0, 1.5]).unwrap();
        assert_eq!(v.extract_tuples(0.0), (vec![1, 3], vec![2.0, 1.5]));
        assert_eq!(v.nvals(0.0), 2);
        v.clear();
        assert_eq!(v.storage(), Storage::Sparse);
        assert_eq!(v.nvals(0.0), 0);
    }

    #[test]
    fn display_lists_entries() {
        let mut v = Vector::<i32>::new(3);
        v.set_element(7, 1).unwrap();
        assert_eq!(v.to_string(), "Vector(n=3, sparse): [1: 7]");
    }
}
