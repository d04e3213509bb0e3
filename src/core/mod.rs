//! Operator abstraction: element bound, binary operators, semirings and the
//! matrix access interface consumed by the dispatcher.

pub mod ops;
pub mod traits;

pub use ops::*;
pub use traits::*;
