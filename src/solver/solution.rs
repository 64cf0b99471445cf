//! The incumbent: best complete tour found so far.

use crate::problem::MAX_CITIES;
use crate::solver::node::Node;

/// Best complete tour found so far, seeded from the caller-supplied cost
/// ceiling. Replaced wholesale on every accepted improvement; never partially
/// updated.
///
/// The accept rule is the one documented tie-break applied everywhere,
/// for local completions, shared-memory updates, and adopted peer solutions:
/// strictly cheaper wins, and an equal-cost tour wins iff its last city
/// (the one closing the cycle back to 0) has the smaller index.
#[derive(Debug, Clone)]
pub struct Solution {
    has_solution: bool,
    cost: f64,
    n_cities: usize,
    tour: [u8; MAX_CITIES],
}

impl Solution {
    /// An empty incumbent whose cost is the pruning ceiling.
    pub fn with_ceiling(n_cities: usize, max_tour_cost: f64) -> Self {
        Self {
            has_solution: false,
            cost: max_tour_cost,
            n_cities,
            tour: [0; MAX_CITIES],
        }
    }

    /// Whether any complete tour within the ceiling was found.
    pub fn has_solution(&self) -> bool {
        self.has_solution
    }

    /// Cost of the best tour, or the ceiling if none was found.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The best tour as city indices, city 0 first (and implicitly last).
    /// `None` while no solution has been found.
    pub fn tour(&self) -> Option<&[u8]> {
        self.has_solution.then(|| &self.tour[..self.n_cities])
    }

    fn last_city(&self) -> usize {
        self.tour[self.n_cities - 1] as usize
    }

    /// The accept rule. `last_city` is the final city of the candidate tour,
    /// i.e. the one connecting back to city 0.
    ///
    /// An empty incumbent behaves as a phantom tour at the ceiling whose last
    /// city is 0, so a candidate costing exactly the ceiling loses the
    /// tie-break and the ceiling stays exclusive.
    pub(crate) fn accepts(&self, cost: f64, last_city: usize) -> bool {
        cost < self.cost || (cost == self.cost && last_city < self.last_city())
    }

    /// Record a completed node as the new incumbent. Callers check
    /// [`Solution::accepts`] first.
    pub(crate) fn record(&mut self, node: &Node, cost: f64) {
        self.has_solution = true;
        self.cost = cost;
        self.tour[..node.length()].copy_from_slice(node.tour());
    }

    /// Adopt a peer's solution iff it is strictly better under the shared
    /// tie-break rule. Returns whether the incumbent changed.
    pub(crate) fn adopt(&mut self, peer: &Solution) -> bool {
        if !peer.has_solution || !self.accepts(peer.cost, peer.last_city()) {
            return false;
        }
        *self = peer.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_node(cities: &[usize]) -> Node {
        let mut node = Node::root(0.0);
        for &city in &cities[1..] {
            node = node.extend(0.0, 0.0, city);
        }
        node
    }

    #[test]
    fn test_ceiling_prunes_before_any_solution() {
        let solution = Solution::with_ceiling(4, 100.0);
        assert!(!solution.has_solution());
        assert_eq!(solution.cost(), 100.0);
        assert!(solution.tour().is_none());
        // the ceiling is exclusive: only strictly cheaper tours get in
        assert!(solution.accepts(99.0, 3));
        assert!(!solution.accepts(100.0, 3));
        assert!(!solution.accepts(250.0, 3));
    }

    #[test]
    fn test_strictly_cheaper_wins() {
        let mut solution = Solution::with_ceiling(4, 1000.0);
        solution.record(&completed_node(&[0, 1, 2, 3]), 90.0);
        assert!(solution.accepts(80.0, 3));
        assert!(!solution.accepts(95.0, 1));
    }

    #[test]
    fn test_equal_cost_breaks_on_last_city() {
        let mut solution = Solution::with_ceiling(4, 1000.0);
        solution.record(&completed_node(&[0, 1, 2, 3]), 90.0);
        assert!(solution.accepts(90.0, 2));
        assert!(!solution.accepts(90.0, 3));
        assert!(!solution.accepts(90.0, 5));
    }

    #[test]
    fn test_adopt_applies_the_same_tie_break() {
        let mut mine = Solution::with_ceiling(4, 1000.0);
        mine.record(&completed_node(&[0, 1, 2, 3]), 90.0);

        let mut peer = Solution::with_ceiling(4, 1000.0);
        peer.record(&completed_node(&[0, 3, 1, 2]), 90.0);

        // same cost, peer's last city 2 < 3
        assert!(mine.adopt(&peer));
        assert_eq!(mine.tour().unwrap(), &[0, 3, 1, 2]);
        // adopting again is a no-op
        assert!(!mine.adopt(&peer));
    }

    #[test]
    fn test_adopt_ignores_empty_peer() {
        let mut mine = Solution::with_ceiling(4, 1000.0);
        let peer = Solution::with_ceiling(4, 50.0);
        assert!(!mine.adopt(&peer));
        assert!(!mine.has_solution());
    }
}
