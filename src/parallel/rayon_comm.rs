// rayon-based shared-memory backend

use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct RayonComm {
    units: usize,
}

impl RayonComm {
    pub fn new() -> Self {
        RayonComm { units: num_cpus::get().max(1) }
    }
}

impl Default for RayonComm {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Comm for RayonComm {
    fn size(&self) -> usize {
        self.units
    }
    fn is_parallel(&self) -> bool {
        true
    }
    fn map_chunks<R, F>(&self, chunks: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        (0..chunks).into_par_iter().map(f).collect()
    }
    fn fill_indexed<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        out.par_iter_mut().enumerate().for_each(|(i, slot)| {
            *slot = f(i);
        });
    }
}
