//! Configuration for the shared-memory engine.

/// Configuration for [`solve_parallel`](crate::solve_parallel).
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads, each owning one priority queue.
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    /// Set the number of worker threads (clamped to at least 1).
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }
}
