//! Configuration for the distributed engine.

/// Configuration for [`solve_cluster`](crate::solve_cluster).
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// How many seed nodes the coordinator tries to stream to each worker
    /// during the initial expansion burst. The coordinator keeps whatever
    /// the burst produced beyond the streamed batch as its own local work.
    pub seed_batch_per_worker: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            seed_batch_per_worker: 4,
        }
    }
}

impl ClusterConfig {
    /// Set the per-worker seed batch size (clamped to at least 1).
    pub fn with_seed_batch_per_worker(mut self, batch: usize) -> Self {
        self.seed_batch_per_worker = batch.max(1);
        self
    }
}
