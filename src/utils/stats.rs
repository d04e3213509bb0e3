//! Per-iteration bookkeeping for traversals built on `mxv`/`vxm`.

use crate::config::Direction;

/// What a traversal did, one entry per multiply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraversalStats {
    pub iterations: usize,
    /// Entries in the vector each iteration produced.
    pub frontier_sizes: Vec<usize>,
    /// Direction the engine reported after each multiply.
    pub directions: Vec<Direction>,
    /// Whether the traversal reached its fixed point.
    pub converged: bool,
}

impl TraversalStats {
    pub fn record(&mut self, frontier: usize, direction: Option<Direction>) {
        self.iterations += 1;
        self.frontier_sizes.push(frontier);
        if let Some(d) = direction {
            self.directions.push(d);
        }
    }

    /// Iterations that ran the sparse × sparse (push) kernel.
    pub fn push_iterations(&self) -> usize {
        self.directions.iter().filter(|&&d| d == Direction::PushOnly).count()
    }

    pub fn pull_iterations(&self) -> usize {
        self.directions.iter().filter(|&&d| d == Direction::PullOnly).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_directions() {
        let mut s = TraversalStats::default();
        s.record(1, Some(Direction::PushOnly));
        s.record(40, Some(Direction::PullOnly));
        s.record(0, Some(Direction::PushOnly));
        assert_eq!(s.iterations, 3);
        assert_eq!(s.frontier_sizes, vec![1, 40, 0]);
        assert_eq!((s.push_iterations(), s.pull_iterations()), (2, 1));
    }
}
