//! Search-tree nodes: partial tours with an admissible lower bound and a
//! deterministic priority key.

use crate::problem::MAX_CITIES;

/// A partial tour. The tour prefix is a flat bounded array copied on branch,
/// so a node is a plain inline value: queues store nodes directly and nothing
/// on the hot path touches the allocator.
#[derive(Debug, Clone)]
pub struct Node {
    cost: f64,
    lb: f64,
    priority: f64,
    length: usize,
    visited: u64,
    tour: [u8; MAX_CITIES],
}

impl Node {
    /// The synthetic root: length 1, sitting at city 0, with the problem-wide
    /// initial lower bound.
    pub fn root(lb: f64) -> Self {
        Self::new(0.0, lb, 1, 0, 0, [0; MAX_CITIES])
    }

    /// Extend this node by one city, copying the prefix.
    pub fn extend(&self, cost: f64, lb: f64, next_city: usize) -> Self {
        Self::new(
            cost,
            lb,
            self.length + 1,
            next_city,
            self.visited,
            self.tour,
        )
    }

    fn new(
        cost: f64,
        lb: f64,
        length: usize,
        current_city: usize,
        parent_visited: u64,
        mut tour: [u8; MAX_CITIES],
    ) -> Self {
        tour[length - 1] = current_city as u8;
        Self {
            cost,
            lb,
            priority: lb * MAX_CITIES as f64 + current_city as f64,
            length,
            visited: parent_visited | (1u64 << current_city),
            tour,
        }
    }

    /// Sum of the edge costs used so far.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Admissible lower bound on any completion of this prefix.
    #[inline]
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Queue ordering key: `lb * MAX_CITIES + current_city`, so equal bounds
    /// break toward the smaller current city.
    #[inline]
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Number of cities in the prefix.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The city this partial tour currently sits at.
    #[inline]
    pub fn current_city(&self) -> usize {
        self.tour[self.length - 1] as usize
    }

    #[inline]
    pub fn is_visited(&self, city: usize) -> bool {
        self.visited & (1u64 << city) != 0
    }

    /// The tour prefix, city 0 first.
    #[inline]
    pub fn tour(&self) -> &[u8] {
        &self.tour[..self.length]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_node() {
        let root = Node::root(12.5);
        assert_eq!(root.cost(), 0.0);
        assert_eq!(root.lb(), 12.5);
        assert_eq!(root.length(), 1);
        assert_eq!(root.current_city(), 0);
        assert_eq!(root.tour(), &[0]);
        assert!(root.is_visited(0));
        assert!(!root.is_visited(1));
    }

    #[test]
    fn test_extend_copies_prefix() {
        let root = Node::root(10.0);
        let child = root.extend(4.0, 11.0, 3);
        let grandchild = child.extend(9.0, 13.0, 1);

        assert_eq!(grandchild.tour(), &[0, 3, 1]);
        assert_eq!(grandchild.current_city(), 1);
        assert!(grandchild.is_visited(0));
        assert!(grandchild.is_visited(1));
        assert!(grandchild.is_visited(3));
        assert!(!grandchild.is_visited(2));
        // the parent is untouched
        assert_eq!(child.tour(), &[0, 3]);
    }

    #[test]
    fn test_visited_matches_tour() {
        let mut node = Node::root(0.0);
        for city in [5usize, 2, 9] {
            node = node.extend(0.0, 0.0, city);
        }
        for city in 0..MAX_CITIES {
            let in_tour = node.tour().contains(&(city as u8));
            assert_eq!(node.is_visited(city), in_tour, "city {city}");
        }
    }

    #[test]
    fn test_priority_breaks_lb_ties_by_city() {
        let root = Node::root(10.0);
        let low_city = root.extend(1.0, 20.0, 2);
        let high_city = root.extend(1.0, 20.0, 7);
        assert!(low_city.priority() < high_city.priority());

        let tighter_lb = root.extend(1.0, 19.0, 63);
        assert!(tighter_lb.priority() < low_city.priority());
    }
}
