use thiserror::Error;

// Unified error type for graphmv

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrbError {
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("out of memory: could not reserve {0} elements")]
    OutOfMemory(usize),
    #[error("uninitialized object: {0}")]
    Uninitialized(&'static str),
}

/// Status codes reported by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Info {
    Success,
    InvalidValue,
    InvalidState,
    NotImplemented,
    OutOfMemory,
    Uninitialized,
}

impl GrbError {
    /// Status code for this error.
    pub fn info(&self) -> Info {
        match self {
            GrbError::InvalidValue(_) => Info::InvalidValue,
            GrbError::InvalidState(_) => Info::InvalidState,
            GrbError::NotImplemented(_) => Info::NotImplemented,
            GrbError::OutOfMemory(_) => Info::OutOfMemory,
            GrbError::Uninitialized(_) => Info::Uninitialized,
        }
    }
}

impl<T> From<&Result<T, GrbError>> for Info {
    fn from(res: &Result<T, GrbError>) -> Self {
        match res {
            Ok(_) => Info::Success,
            Err(e) => e.info(),
        }
    }
}

/// Reserve room for `len` more elements, mapping allocation failure to `OutOfMemory`.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>, GrbError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| GrbError::OutOfMemory(len))?;
    Ok(v)
}
