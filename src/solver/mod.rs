//! Branch-and-bound engines.
//!
//! Three engines share the single expansion routine [`process_node`]:
//! sequential ([`sequential`]), shared-memory threads ([`parallel`]) and the
//! message-passing cluster ([`cluster`]). Each engine supplies a
//! [`SearchContext`] that decides where children go and how the incumbent is
//! guarded; the prune/accept semantics live here, once.

pub mod bound;
pub mod cluster;
pub mod node;
pub mod parallel;
pub(crate) mod queue;
pub mod sequential;
pub mod solution;

use crate::problem::Problem;
use crate::solver::bound::extend_lower_bound;
use crate::solver::node::Node;

/// Seam between the expansion algorithm and a concurrency variant.
pub(crate) trait SearchContext {
    /// Current incumbent cost (or the ceiling), used for pruning.
    fn best_cost(&self) -> f64;

    /// A complete tour closing back to city 0 with total cost `cost`.
    /// Implementations apply the accept rule under whatever guard they need.
    fn offer_tour(&mut self, node: &Node, cost: f64);

    /// Hand a freshly branched child to the engine's queue(s).
    fn push_child(&mut self, child: Node);
}

/// Expand one node: either offer it as a completed tour, or branch to every
/// unvisited neighbor whose extended bound still beats the incumbent.
///
/// A child is pruned iff its bound strictly exceeds the incumbent cost;
/// equal-bound children stay in play so equal-cost tours can compete under
/// the tie-break.
pub(crate) fn process_node<C: SearchContext>(problem: &Problem, node: &Node, ctx: &mut C) {
    let current = node.current_city();
    if node.length() == problem.n_cities() && problem.is_neighbor(current, 0) {
        let cost = node.cost() + problem.road_cost(current, 0);
        ctx.offer_tour(node, cost);
        return;
    }
    for city in 0..problem.n_cities() {
        if !problem.is_neighbor(current, city) || node.is_visited(city) {
            continue;
        }
        let lb = extend_lower_bound(problem, node, city);
        if lb > ctx.best_cost() {
            continue;
        }
        let cost = node.cost() + problem.road_cost(current, city);
        ctx.push_child(node.extend(cost, lb, city));
    }
}
