//! graphmv: direction-optimizing sparse matrix-vector multiply over semirings
//!
//! This crate provides `mxv`/`vxm` for graph algorithms written as linear
//! algebra. Vectors switch between dense and sparse storage, and each multiply
//! picks push (sparse × sparse, merge-path load balanced) or pull (row-parallel
//! SpMV/GeMV) from the operands' storage and the descriptor's settings.

pub mod parallel;

pub mod algorithms;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod utils;
pub mod vector;

// Re-exports for convenience
pub use config::*;
pub use core::*;
pub use dispatch::{NO_MASK, mxv, vxm};
pub use error::*;
pub use matrix::*;
pub use utils::*;
pub use vector::*;
