// CSR storage with an optional CSC companion orientation

use bitflags::bitflags;
use faer::sparse::{SymbolicSparseColMat, SymbolicSparseRowMat};

use crate::core::traits::{BinaryOp, Scalar};
use crate::error::{GrbError, try_alloc};

bitflags! {
    /// Orientations a sparse matrix can serve directly.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Layout: u8 {
        const CSR       = 0b001;
        const CSC       = 0b010;
        // A = Aᵀ, so CSR rows double as columns
        const SYMMETRIC = 0b100;
    }
}

/// Borrowed compressed arrays of one orientation: lane `k` owns
/// `idx[ptr[k]..ptr[k + 1]]` and the matching values.
#[derive(Clone, Copy)]
pub struct Compressed<'a, T> {
    pub ptr: &'a [usize],
    pub idx: &'a [usize],
    pub val: &'a [T],
}

impl<'a, T> Compressed<'a, T> {
    pub fn lanes(&self) -> usize {
        self.ptr.len().saturating_sub(1)
    }

    pub fn lane_len(&self, k: usize) -> usize {
        self.ptr[k + 1] - self.ptr[k]
    }

    pub fn lane(&self, k: usize) -> (&'a [usize], &'a [T]) {
        let (s, e) = (self.ptr[k], self.ptr[k + 1]);
        (&self.idx[s..e], &self.val[s..e])
    }
}

#[derive(Clone)]
pub struct CsrMatrix<T> {
    csr: SymbolicSparseRowMat<usize>,
    values: Vec<T>,
    csc: Option<(SymbolicSparseColMat<usize>, Vec<T>)>,
    layout: Layout,
}

impl<T: Scalar> CsrMatrix<T> {
    /// Build from the first `nvals` `(row, col, value)` triplets. Repeated
    /// coordinates are merged with `dup` in input order, or rejected without it.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
        vals: &[T],
        nvals: usize,
        dup: Option<&dyn BinaryOp<T>>,
    ) -> Result<Self, GrbError> {
        if rows.len() != cols.len() || rows.len() != vals.len() {
            return Err(GrbError::InvalidValue(format!(
                "triplet lists differ in length ({}, {}, {})",
                rows.len(),
                cols.len(),
                vals.len()
            )));
        }
        if nvals > rows.len() {
            return Err(GrbError::InvalidValue(format!(
                "nvals {nvals} exceeds the {} supplied triplets",
                rows.len()
            )));
        }
        for p in 0..nvals {
            if rows[p] >= nrows || cols[p] >= ncols {
                return Err(GrbError::InvalidValue(format!(
                    "entry ({}, {}) out of range for {nrows}x{ncols}",
                    rows[p], cols[p]
                )));
            }
        }

        let mut perm: Vec<usize> = (0..nvals).collect();
        perm.sort_by_key(|&p| (rows[p], cols[p]));

        let mut row_ptr: Vec<usize> = try_alloc(nrows + 1)?;
        row_ptr.resize(nrows + 1, 0);
        let mut col_idx: Vec<usize> = try_alloc(nvals)?;
        let mut values: Vec<T> = try_alloc(nvals)?;
        let mut last: Option<(usize, usize)> = None;
        for &p in &perm {
            let coord = (rows[p], cols[p]);
            if last == Some(coord) {
                let op = dup.ok_or_else(|| {
                    GrbError::InvalidValue(format!("duplicate entry {coord:?} and no dup operator"))
                })?;
                if let Some(v) = values.last_mut() {
                    *v = op.apply(*v, vals[p]);
                }
                continue;
            }
            row_ptr[coord.0 + 1] += 1;
            col_idx.push(coord.1);
            values.push(vals[p]);
            last = Some(coord);
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }

        let csr = SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptr, None, col_idx);
        Ok(Self { csr, values, csc: None, layout: Layout::CSR })
    }

    /// Build from raw CSR arrays; column indices must be strictly increasing within each row.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, GrbError> {
        if row_ptr.len() != nrows + 1 || row_ptr[0] != 0 || row_ptr[nrows] != col_idx.len() {
            return Err(GrbError::InvalidValue("malformed row pointer array".into()));
        }
        if col_idx.len() != values.len() {
            return Err(GrbError::InvalidValue("column index and value arrays differ in length".into()));
        }
        for i in 0..nrows {
            let (s, e) = (row_ptr[i], row_ptr[i + 1]);
            if s > e || e > col_idx.len() {
                return Err(GrbError::InvalidValue(format!("row pointer decreases at row {i}")));
            }
            let row = &col_idx[s..e];
            if row.iter().any(|&j| j >= ncols) || row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(GrbError::InvalidValue(format!("row {i} has unsorted or out-of-range columns")));
            }
        }
        let csr = SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptr, None, col_idx);
        Ok(Self { csr, values, csc: None, layout: Layout::CSR })
    }

    pub fn nrows(&self) -> usize {
        self.csr.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.csr.ncols()
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn rows(&self) -> Compressed<'_, T> {
        Compressed { ptr: self.csr.row_ptr(), idx: self.csr.col_idx(), val: &self.values }
    }

    /// Column-keyed view: the materialized CSC, or the CSR of a symmetric matrix.
    pub fn cols(&self) -> Option<Compressed<'_, T>> {
        match &self.csc {
            Some((sym, vals)) => Some(Compressed { ptr: sym.col_ptr(), idx: sym.row_idx(), val: vals }),
            None if self.layout.contains(Layout::SYMMETRIC) => Some(self.rows()),
            None => None,
        }
    }

    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.nrows() {
            return None;
        }
        let (idx, val) = self.rows().lane(i);
        idx.binary_search(&j).ok().map(|p| val[p])
    }

    /// Build the column orientation if it is not there yet.
    pub fn materialize_csc(&mut self) -> Result<(), GrbError> {
        if self.csc.is_some() {
            return Ok(());
        }
        let (col_ptr, row_idx, vals) = transpose_arrays(self.rows(), self.ncols())?;
        let sym = SymbolicSparseColMat::new_checked(self.nrows(), self.ncols(), col_ptr, None, row_idx);
        self.csc = Some((sym, vals));
        self.layout |= Layout::CSC;
        Ok(())
    }

    /// Whether the matrix equals its transpose, pattern and values.
    pub fn is_symmetric(&self) -> Result<bool, GrbError> {
        if self.nrows() != self.ncols() {
            return Ok(false);
        }
        let rows = self.rows();
        let (ptr, idx, vals) = transpose_arrays(rows, self.ncols())?;
        Ok(ptr == rows.ptr && idx == rows.idx && vals == rows.val)
    }

    pub(crate) fn set_symmetric_flag(&mut self, symmetric: bool) {
        self.layout.set(Layout::SYMMETRIC, symmetric);
    }
}

/// Counting-sort transpose of compressed arrays with `nlanes_out` output lanes.
/// Output lanes come out sorted because input lanes are walked in order.
fn transpose_arrays<T: Scalar>(
    src: Compressed<'_, T>,
    nlanes_out: usize,
) -> Result<(Vec<usize>, Vec<usize>, Vec<T>), GrbError> {
    let nnz = src.idx.len();
    let mut ptr: Vec<usize> = try_alloc(nlanes_out + 1)?;
    ptr.resize(nlanes_out + 1, 0);
    for &j in src.idx {
        ptr[j + 1] += 1;
    }
    for j in 0..nlanes_out {
        ptr[j + 1] += ptr[j];
    }
    let mut next = ptr.clone();
    let mut idx: Vec<usize> = try_alloc(nnz)?;
    idx.resize(nnz, 0);
    let mut vals: Vec<T> = try_alloc(nnz)?;
    vals.resize(nnz, T::default());
    for k in 0..src.lanes() {
        let (lane_idx, lane_val) = src.lane(k);
        for (&j, &v) in lane_idx.iter().zip(lane_val) {
            let slot = next[j];
            idx[slot] = k;
            vals[slot] = v;
            next[j] += 1;
        }
    }
    Ok((ptr, idx, vals))
}
