//! Fork-join execution backends for the kernels.
//!
//! Kernels are written once against [`Comm`]: a backend reports how many
//! execution units it has and runs independent chunks of work, joining the
//! results in chunk order.

pub trait Comm {
    /// Number of parallel execution units.
    fn size(&self) -> usize;
    /// Whether chunks actually run concurrently.
    fn is_parallel(&self) -> bool;
    /// Run `f(0..chunks)` and collect the results in chunk order.
    fn map_chunks<R, F>(&self, chunks: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send;
    /// Fill `out[i] = f(i)` for every slot.
    fn fill_indexed<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;
}

/// Single-threaded backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Comm for SerialComm {
    fn size(&self) -> usize {
        1
    }
    fn is_parallel(&self) -> bool {
        false
    }
    fn map_chunks<R, F>(&self, chunks: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        (0..chunks).map(f).collect()
    }
    fn fill_indexed<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(i);
        }
    }
}

#[cfg(feature = "rayon")]
pub mod rayon_comm;
#[cfg(feature = "rayon")]
pub use rayon_comm::RayonComm;

pub enum UniverseComm {
    #[cfg(feature = "rayon")]
    Rayon(RayonComm),
    Serial(SerialComm),
}

impl Default for UniverseComm {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            UniverseComm::Rayon(RayonComm::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            UniverseComm::Serial(SerialComm)
        }
    }
}

impl Comm for UniverseComm {
    fn size(&self) -> usize {
        match self {
            #[cfg(feature = "rayon")]
            UniverseComm::Rayon(comm) => comm.size(),
            UniverseComm::Serial(comm) => comm.size(),
        }
    }
    fn is_parallel(&self) -> bool {
        match self {
            #[cfg(feature = "rayon")]
            UniverseComm::Rayon(comm) => comm.is_parallel(),
            UniverseComm::Serial(comm) => comm.is_parallel(),
        }
    }
    fn map_chunks<R, F>(&self, chunks: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            UniverseComm::Rayon(comm) => comm.map_chunks(chunks, f),
            UniverseComm::Serial(comm) => comm.map_chunks(chunks, f),
        }
    }
    fn fill_indexed<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            UniverseComm::Rayon(comm) => comm.fill_indexed(out, f),
            UniverseComm::Serial(comm) => comm.fill_indexed(out, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_preserves_chunk_order() {
        let out = SerialComm.map_chunks(4, |p| p * 10);
        assert_eq!(out, vec![0, 10, 20, 30]);
        let mut buf = vec![0usize; 5];
        SerialComm.fill_indexed(&mut buf, |i| i * i);
        assert_eq!(buf, vec![0, 1, 4, 9, 16]);
    }

    #[test]
    fn universe_has_at_least_one_unit() {
        let comm = UniverseComm::default();
        assert!(comm.size() >= 1);
        assert_eq!(comm.map_chunks(3, |p| p + 1), vec![1, 2, 3]);
    }
}
