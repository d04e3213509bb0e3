// Result write-back: replace or accumulate into the output vector

use crate::config::Descriptor;
use crate::core::traits::{BinaryOp, Scalar};
use crate::error::{GrbError, try_alloc};
use crate::vector::{Storage, Vector};

/// Put `w` into the representation the kernel writes.
///
/// Without an accumulator the old content is irrelevant and `w` is only
/// re-tagged; with one, `w` is converted so its entries survive.
pub(crate) fn prepare<T: Scalar>(
    w: &mut Vector<T>,
    kind: Storage,
    accum: Option<&dyn BinaryOp<T>>,
    identity: T,
    desc: &Descriptor,
) -> Result<(), GrbError> {
    match accum {
        Some(_) => w.convert_to(kind, identity, desc),
        None => w.set_storage(kind),
    }
}

fn combine<T: Scalar>(old: T, new: T, accum: &dyn BinaryOp<T>, identity: T) -> T {
    if old == identity {
        new
    } else if new == identity {
        old
    } else {
        accum.apply(old, new)
    }
}

/// Store a dense kernel result `t` into a dense `w`.
pub(crate) fn write_dense<T: Scalar>(
    w: &mut Vector<T>,
    mut t: Vec<T>,
    accum: Option<&dyn BinaryOp<T>>,
    identity: T,
) -> Result<(), GrbError> {
    if let Some(op) = accum {
        let old = w
            .as_dense()
            .ok_or_else(|| GrbError::InvalidState("accumulating into a sparse output".into()))?;
        for (slot, &prev) in t.iter_mut().zip(old) {
            *slot = combine(prev, *slot, op, identity);
        }
    }
    w.replace_dense(t);
    Ok(())
}

/// Store a sorted sparse kernel result into a sparse `w`, merging with the
/// previous entries when accumulating.
pub(crate) fn write_sparse<T: Scalar>(
    w: &mut Vector<T>,
    indices: Vec<usize>,
    values: Vec<T>,
    accum: Option<&dyn BinaryOp<T>>,
    identity: T,
) -> Result<(), GrbError> {
    let Some(op) = accum else {
        w.replace_sparse(indices, values);
        return Ok(());
    };
    let (old_idx, old_val) = w
        .as_sparse()
        .ok_or_else(|| GrbError::InvalidState("accumulating into a dense output".into()))?;
    let cap = old_idx.len() + indices.len();
    let mut out_idx: Vec<usize> = try_alloc(cap)?;
    let mut out_val: Vec<T> = try_alloc(cap)?;
    let (mut p, mut q) = (0, 0);
    while p < old_idx.len() || q < indices.len() {
        let (i, v) = match (old_idx.get(p), indices.get(q)) {
            (Some(&a), Some(&b)) if a == b => {
                p += 1;
                q += 1;
                (a, combine(old_val[p - 1], values[q - 1], op, identity))
            }
            (Some(&a), Some(&b)) if a < b => {
                p += 1;
                (a, old_val[p - 1])
            }
            (Some(&a), None) => {
                p += 1;
                (a, old_val[p - 1])
            }
            (_, Some(&b)) => {
                q += 1;
                (b, values[q - 1])
            }
            (None, None) => break,
        };
        if v != identity {
            out_idx.push(i);
            out_val.push(v);
        }
    }
    w.replace_sparse(out_idx, out_val);
    Ok(())
}
