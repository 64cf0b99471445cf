//! Sequential engine: the pop-best / prune-or-expand loop every concurrency
//! variant builds on.

use log::debug;

use crate::problem::Problem;
use crate::solver::bound::initial_lower_bound;
use crate::solver::node::Node;
use crate::solver::queue::NodeQueue;
use crate::solver::solution::Solution;
use crate::solver::{process_node, SearchContext};

struct SequentialContext {
    queue: NodeQueue,
    solution: Solution,
}

impl SearchContext for SequentialContext {
    fn best_cost(&self) -> f64 {
        self.solution.cost()
    }

    fn offer_tour(&mut self, node: &Node, cost: f64) {
        if self.solution.accepts(cost, node.current_city()) {
            self.solution.record(node, cost);
            debug!("incumbent improved to {cost}");
        }
    }

    fn push_child(&mut self, child: Node) {
        self.queue.push(child);
    }
}

/// Solve on the calling thread. Returns the incumbent, which reports
/// `has_solution() == false` when no tour strictly under `max_tour_cost`
/// exists.
pub fn solve_sequential(problem: &Problem, max_tour_cost: f64) -> Solution {
    let mut ctx = SequentialContext {
        queue: NodeQueue::new(),
        solution: Solution::with_ceiling(problem.n_cities(), max_tour_cost),
    };

    let root = Node::root(initial_lower_bound(problem));
    process_node(problem, &root, &mut ctx);

    loop {
        let node = match ctx.queue.pop() {
            Some(node) => node,
            None => break,
        };
        // stale: the bound was valid when enqueued but the incumbent has
        // since improved past it
        if node.lb() >= ctx.solution.cost() {
            continue;
        }
        process_node(problem, &node, &mut ctx);
    }

    ctx.solution
}
