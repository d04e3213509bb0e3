//! Output masks.

use crate::config::MaskMode;
use crate::core::traits::Scalar;
use crate::error::{GrbError, try_alloc};
use crate::vector::Vector;

/// Admission bitmap over output indices, built once per multiply.
///
/// Index `i` is admitted when the mask vector holds a non-default value at
/// `i`; `MaskMode::Complement` admits the opposite set.
#[derive(Debug, Clone)]
pub struct MaskView {
    admitted: Vec<bool>,
}

impl MaskView {
    pub fn new<M: Scalar>(mask: &Vector<M>, mode: MaskMode) -> Result<Self, GrbError> {
        let n = mask.size();
        let complement = mode == MaskMode::Complement;
        let mut admitted = try_alloc(n)?;
        admitted.resize(n, complement);
        match (mask.as_dense(), mask.as_sparse()) {
            (Some(vals), _) => {
                for (slot, &v) in admitted.iter_mut().zip(vals) {
                    *slot = (v != M::default()) != complement;
                }
            }
            (None, Some((indices, values))) => {
                for (&i, &v) in indices.iter().zip(values) {
                    admitted[i] = (v != M::default()) != complement;
                }
            }
            (None, None) => {}
        }
        Ok(Self { admitted })
    }

    #[inline]
    pub fn allows(&self, i: usize) -> bool {
        self.admitted.get(i).copied().unwrap_or(false)
    }
}

/// `true` when there is no mask or the mask admits `i`.
#[inline]
pub(crate) fn admits(mask: Option<&MaskView>, i: usize) -> bool {
    mask.is_none_or(|m| m.allows(i))
}
