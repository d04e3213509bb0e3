//! Per-run multiply configuration.
//!
//! A [`Descriptor`] is created once per algorithm run and handed to every
//! `mxv`/`vxm` call. The dispatcher reads the direction mode, load-balance mode
//! and switchpoint from it, and writes back the direction it actually used
//! ([`Descriptor::last_direction`]) so iterative callers can build their own
//! cross-iteration heuristics.
//!
//! A descriptor must not be shared by two concurrent multiplies; use one
//! descriptor per concurrent caller.

use std::ops::{Deref, DerefMut};

use crate::error::GrbError;

/// Direction mode for the multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Always iterate over the sparse active set (sparse vector).
    PushOnly,
    /// Always scan every output against a dense vector.
    PullOnly,
    /// Pick per call from the vector's density and the switchpoint.
    PushPull,
}

/// Work distribution strategy for the sparse × sparse kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBalance {
    /// Sequential, no load balancing.
    Simple,
    /// Lanes binned by length into thread, warp and block classes.
    ThreadWarpBlock,
    /// Merge-path partitioning.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransposeMode {
    Default,
    Transpose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    Default,
    /// Admit the indices the mask does *not* hold.
    Complement,
}

/// Operand slot a transpose intent applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Inp0,
    Inp1,
}

/// Multiply configuration and per-call bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    inp0: TransposeMode,
    inp1: TransposeMode,
    mask: MaskMode,
    direction: Direction,
    load_balance: LoadBalance,
    switchpoint: f64,
    tolerance: f64,
    debug: bool,
    nthreads: Option<usize>,
    last_direction: Option<Direction>,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            inp0: TransposeMode::Default,
            inp1: TransposeMode::Default,
            mask: MaskMode::Default,
            direction: Direction::PushPull,
            load_balance: LoadBalance::Merge,
            switchpoint: 0.01,
            tolerance: 0.0,
            debug: false,
            nthreads: None,
            last_direction: None,
        }
    }
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn load_balance(&self) -> LoadBalance {
        self.load_balance
    }
    pub fn set_load_balance(&mut self, mode: LoadBalance) {
        self.load_balance = mode;
    }
    pub fn with_load_balance(mut self, mode: LoadBalance) -> Self {
        self.load_balance = mode;
        self
    }

    /// Density threshold: a vector with `nnz / n < switchpoint` goes sparse.
    pub fn switchpoint(&self) -> f64 {
        self.switchpoint
    }
    pub fn set_switchpoint(&mut self, switchpoint: f64) -> Result<(), GrbError> {
        if !(0.0..=1.0).contains(&switchpoint) {
            return Err(GrbError::InvalidValue(format!(
                "switchpoint must lie in [0, 1], got {switchpoint}"
            )));
        }
        self.switchpoint = switchpoint;
        Ok(())
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), GrbError> {
        if !(tolerance >= 0.0) {
            return Err(GrbError::InvalidValue(format!(
                "tolerance must be non-negative, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(())
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Number of parallel partitions for the sparse kernels; `None` uses the backend width.
    pub fn nthreads(&self) -> Option<usize> {
        self.nthreads
    }
    pub fn set_nthreads(&mut self, nthreads: usize) -> Result<(), GrbError> {
        if nthreads == 0 {
            return Err(GrbError::InvalidValue("nthreads must be at least 1".into()));
        }
        self.nthreads = Some(nthreads);
        Ok(())
    }

    pub fn mask_mode(&self) -> MaskMode {
        self.mask
    }
    pub fn set_mask_mode(&mut self, mode: MaskMode) {
        self.mask = mode;
    }

    pub fn transpose(&self, input: Input) -> TransposeMode {
        match input {
            Input::Inp0 => self.inp0,
            Input::Inp1 => self.inp1,
        }
    }
    pub fn set_transpose(&mut self, input: Input, mode: TransposeMode) {
        match input {
            Input::Inp0 => self.inp0 = mode,
            Input::Inp1 => self.inp1 = mode,
        }
    }

    /// Flip the transpose intent of `input`.
    pub fn toggle(&mut self, input: Input) {
        let flipped = match self.transpose(input) {
            TransposeMode::Default => TransposeMode::Transpose,
            TransposeMode::Transpose => TransposeMode::Default,
        };
        self.set_transpose(input, flipped);
    }

    /// Direction used by the most recent multiply: `PushOnly` for the
    /// sparse × sparse path, `PullOnly` otherwise. `None` before the first call.
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub(crate) fn record_direction(&mut self, direction: Direction) {
        self.last_direction = Some(direction);
    }
}

/// Toggles a transpose intent for its lifetime and restores it on drop,
/// including on early error returns.
pub(crate) struct ToggleGuard<'a> {
    desc: &'a mut Descriptor,
    input: Input,
}

impl<'a> ToggleGuard<'a> {
    pub(crate) fn new(desc: &'a mut Descriptor, input: Input) -> Self {
        desc.toggle(input);
        Self { desc, input }
    }
}

impl Deref for ToggleGuard<'_> {
    type Target = Descriptor;
    fn deref(&self) -> &Descriptor {
        self.desc
    }
}

impl DerefMut for ToggleGuard<'_> {
    fn deref_mut(&mut self) -> &mut Descriptor {
        self.desc
    }
}

impl Drop for ToggleGuard<'_> {
    fn drop(&mut self) {
        self.desc.toggle(self.input);
    }
}
