//! The shared incumbent: one critical section for updates, a lock-free cost
//! cache for the pruning reads on the hot path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::solver::node::Node;
use crate::solver::solution::Solution;

/// Process-wide incumbent for the shared-memory engine.
///
/// The full [`Solution`] lives behind a mutex so the accept rule and the
/// wholesale replacement happen in one critical section, so two same-cost
/// completions can never interleave a half-written tour. The cost alone is
/// mirrored into an atomic (as `f64` bits) so the prune check never takes
/// the lock. Costs only decrease, so a racy reader sees at worst a slightly
/// stale (larger) bound, which is always safe.
pub(crate) struct SharedIncumbent {
    cost_bits: AtomicU64,
    solution: Mutex<Solution>,
}

impl SharedIncumbent {
    pub fn new(solution: Solution) -> Self {
        Self {
            cost_bits: AtomicU64::new(solution.cost().to_bits()),
            solution: Mutex::new(solution),
        }
    }

    /// Current incumbent cost (or the ceiling), without locking.
    #[inline]
    pub fn cost(&self) -> f64 {
        f64::from_bits(self.cost_bits.load(Ordering::SeqCst))
    }

    /// Offer a completed tour. Returns whether the incumbent was replaced.
    pub fn offer(&self, node: &Node, cost: f64) -> bool {
        let mut solution = self.solution.lock().unwrap();
        if !solution.accepts(cost, node.current_city()) {
            return false;
        }
        solution.record(node, cost);
        self.cost_bits.store(cost.to_bits(), Ordering::SeqCst);
        true
    }

    /// Snapshot the final solution once the search is over.
    pub fn into_solution(self) -> Solution {
        self.solution.into_inner().unwrap()
    }
}
