//! Descriptor configuration: typed fields plus a string option surface.

pub mod descriptor;
pub mod options;

pub use descriptor::{Descriptor, Direction, Input, LoadBalance, MaskMode, TransposeMode};
pub(crate) use descriptor::ToggleGuard;
