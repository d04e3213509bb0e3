//! Graph algorithms expressed as repeated `vxm` calls.

pub mod bfs;
pub mod sssp;

pub use bfs::bfs;
pub use sssp::sssp;
