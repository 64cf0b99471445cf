//! Shared-memory engine: worker threads over per-thread queues with one
//! guarded incumbent.

mod balancer;
mod config;
mod incumbent;

pub use config::ParallelConfig;

use log::{debug, info};
use std::thread;

use crate::problem::Problem;
use crate::solver::bound::initial_lower_bound;
use crate::solver::node::Node;
use crate::solver::parallel::balancer::LoadBalancer;
use crate::solver::parallel::incumbent::SharedIncumbent;
use crate::solver::solution::Solution;
use crate::solver::{process_node, SearchContext};

struct BalancerContext<'a> {
    balancer: &'a LoadBalancer,
    incumbent: &'a SharedIncumbent,
}

impl SearchContext for BalancerContext<'_> {
    fn best_cost(&self) -> f64 {
        self.incumbent.cost()
    }

    fn offer_tour(&mut self, node: &Node, cost: f64) {
        if self.incumbent.offer(node, cost) {
            debug!("incumbent improved to {cost}");
        }
    }

    fn push_child(&mut self, child: Node) {
        self.balancer.push(child);
    }
}

/// Solve with `config.num_workers` threads. Children are spread round-robin
/// across per-thread queues; the search ends when every thread is idle at
/// once and every queue is drained.
pub fn solve_parallel(problem: &Problem, max_tour_cost: f64, config: &ParallelConfig) -> Solution {
    let n_workers = config.num_workers.max(1);
    info!("shared-memory solve with {n_workers} workers");

    let balancer = LoadBalancer::new(n_workers);
    let incumbent = SharedIncumbent::new(Solution::with_ceiling(
        problem.n_cities(),
        max_tour_cost,
    ));

    // seed before spawning: the root's children land round-robin so every
    // worker starts with something close to an even share
    let root = Node::root(initial_lower_bound(problem));
    process_node(
        problem,
        &root,
        &mut BalancerContext {
            balancer: &balancer,
            incumbent: &incumbent,
        },
    );

    let (balancer_ref, incumbent_ref) = (&balancer, &incumbent);
    thread::scope(|scope| {
        for worker in 0..n_workers {
            scope.spawn(move || {
                let mut ctx = BalancerContext {
                    balancer: balancer_ref,
                    incumbent: incumbent_ref,
                };
                while let Some(node) = balancer_ref.pop(worker, incumbent_ref) {
                    process_node(problem, &node, &mut ctx);
                }
            });
        }
    });

    incumbent.into_solution()
}
