//! Admissible lower bounds.
//!
//! Both bounds assume every city eventually uses its two cheapest incident
//! edges. The floating-point operation order is fixed: equal-cost completions
//! are later compared for strict equality by the accept rule, so the
//! arithmetic here must be bit-for-bit reproducible on every thread and rank.

use crate::problem::Problem;
use crate::solver::node::Node;

/// Lower bound for the root: half the sum over cities of `min1 + min2`.
pub fn initial_lower_bound(problem: &Problem) -> f64 {
    let mut sum = 0.0;
    for city in 0..problem.n_cities() {
        sum += problem.min1(city) + problem.min2(city);
    }
    sum / 2.0
}

/// Incremental bound for extending `node` along the edge to `next_city`.
///
/// Each endpoint is charged its second-cheapest incident cost when the taken
/// edge is not strictly cheaper than that, otherwise its cheapest; the charge
/// is then swapped for the real edge cost.
pub fn extend_lower_bound(problem: &Problem, node: &Node, next_city: usize) -> f64 {
    let from = node.current_city();
    let cost_from_to = problem.road_cost(from, next_city);
    let cost_from = if cost_from_to >= problem.min2(from) {
        problem.min2(from)
    } else {
        problem.min1(from)
    };
    let cost_to = if cost_from_to >= problem.min2(next_city) {
        problem.min2(next_city)
    } else {
        problem.min1(next_city)
    };
    node.lb() + cost_from_to - (cost_from + cost_to) / 2.0
}
