//! Distributed engine: a pull-model coordinator protocol over an opaque
//! message transport.
//!
//! Rank 0 (the coordinator) expands the root into a seed batch, streams it
//! round-robin to the workers, then serves explicit work requests from its
//! remaining local queue while doing one bounded unit of local search between
//! polls. Workers run the usual pop/expand loop against their own queue and
//! block only while waiting for the reply to a work request they sent when
//! genuinely idle.
//!
//! Termination is race-free by construction: every work request carries the
//! count of nodes the worker has ever received, and the coordinator answers
//! "no more work" only when that count matches its own send count for that
//! worker, so a worker is never released while a node is still in flight to
//! it. When the counts disagree the coordinator stays silent; the in-flight
//! node itself unblocks the worker, which asks again once it drains. Solution
//! messages always precede their sender's next work request (in-order
//! delivery per sender), so by the time the last worker is released the
//! coordinator has consumed every improvement.

mod config;
mod message;
mod transport;

pub use config::ClusterConfig;
pub use message::Message;
pub use transport::{ChannelTransport, Transport};

use log::{debug, info, trace};
use std::thread;

use crate::error::Result;
use crate::problem::Problem;
use crate::solver::bound::initial_lower_bound;
use crate::solver::node::Node;
use crate::solver::queue::NodeQueue;
use crate::solver::sequential::solve_sequential;
use crate::solver::solution::Solution;
use crate::solver::{process_node, SearchContext};

/// Worker lifecycle. `Active ⇄ Idle` as the local queue drains and refills
/// via request/reply; `Idle → Terminated` only on a "no more work" reply,
/// which the protocol guarantees arrives with a confirmed-empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Active,
    Idle,
    Terminated,
}

/// Per-rank search state: the local queue, the local incumbent replica, and
/// the transport handle threaded through every call (never ambient globals).
struct ClusterContext<'a, T: Transport> {
    transport: &'a T,
    queue: NodeQueue,
    solution: Solution,
    improved: bool,
}

impl<'a, T: Transport> ClusterContext<'a, T> {
    fn new(transport: &'a T, solution: Solution) -> Self {
        Self {
            transport,
            queue: NodeQueue::new(),
            solution,
            improved: false,
        }
    }

    /// Pop the next non-stale node from the local queue.
    fn pop_fresh(&mut self) -> Option<Node> {
        while let Some(node) = self.queue.pop() {
            if node.lb() >= self.solution.cost() {
                continue;
            }
            return Some(node);
        }
        None
    }

    fn adopt(&mut self, peer: &Solution) {
        if self.solution.adopt(peer) {
            debug!(
                "rank {}: adopted peer solution at {}",
                self.transport.rank(),
                self.solution.cost()
            );
        }
    }

    /// If the last expansion improved the incumbent, send it to every other
    /// rank so all of them prune against at least as tight a bound.
    fn flush_improvement(&mut self) -> Result<()> {
        if !self.improved {
            return Ok(());
        }
        self.improved = false;
        debug!(
            "rank {}: broadcasting incumbent at {}",
            self.transport.rank(),
            self.solution.cost()
        );
        for rank in 0..self.transport.size() {
            if rank != self.transport.rank() {
                self.transport
                    .send(rank, Message::Solution(self.solution.clone()))?;
            }
        }
        Ok(())
    }
}

impl<T: Transport> SearchContext for ClusterContext<'_, T> {
    fn best_cost(&self) -> f64 {
        self.solution.cost()
    }

    fn offer_tour(&mut self, node: &Node, cost: f64) {
        if self.solution.accepts(cost, node.current_city()) {
            self.solution.record(node, cost);
            self.improved = true;
        }
    }

    fn push_child(&mut self, child: Node) {
        self.queue.push(child);
    }
}

/// Run this rank's side of the distributed search. Rank 0 returns the
/// globally optimal solution; other ranks return their local replica, which
/// may lag improvements that arrived after they were released.
pub fn solve_cluster<T: Transport>(
    problem: &Problem,
    max_tour_cost: f64,
    transport: &T,
    config: &ClusterConfig,
) -> Result<Solution> {
    if transport.size() <= 1 {
        return Ok(solve_sequential(problem, max_tour_cost));
    }
    if transport.rank() == 0 {
        run_coordinator(problem, max_tour_cost, transport, config)
    } else {
        run_worker(problem, max_tour_cost, transport)
    }
}

struct Coordinator<'a, T: Transport> {
    ctx: ClusterContext<'a, T>,
    /// Nodes sent per rank, compared against each request's received count.
    sent: Vec<u64>,
    finished: Vec<bool>,
    n_finished: usize,
}

fn run_coordinator<T: Transport>(
    problem: &Problem,
    max_tour_cost: f64,
    transport: &T,
    config: &ClusterConfig,
) -> Result<Solution> {
    let size = transport.size();
    let n_workers = size - 1;
    info!("coordinator: {n_workers} workers, seeding burst starting");

    let mut coordinator = Coordinator {
        ctx: ClusterContext::new(
            transport,
            Solution::with_ceiling(problem.n_cities(), max_tour_cost),
        ),
        sent: vec![0; size],
        finished: vec![false; size],
        n_finished: 0,
    };

    // local-expansion burst: grow the queue until it can feed everyone
    let batch = config.seed_batch_per_worker * n_workers;
    let root = Node::root(initial_lower_bound(problem));
    process_node(problem, &root, &mut coordinator.ctx);
    coordinator.ctx.flush_improvement()?;
    while coordinator.ctx.queue.len() < batch {
        let Some(node) = coordinator.ctx.pop_fresh() else {
            break;
        };
        process_node(problem, &node, &mut coordinator.ctx);
        coordinator.ctx.flush_improvement()?;
    }

    // stream the surplus round-robin; the overshoot stays local
    let mut target = 1;
    for _ in 0..batch {
        let Some(node) = coordinator.ctx.pop_fresh() else {
            break;
        };
        transport.send(target, Message::Node(node))?;
        coordinator.sent[target] += 1;
        target = if target == n_workers { 1 } else { target + 1 };
    }
    info!("coordinator: seeded, {} nodes kept local", coordinator.ctx.queue.len());

    // event loop: drain control traffic first, then one unit of local work;
    // block only when there is neither
    while coordinator.n_finished < n_workers {
        while let Some((from, message)) = transport.try_recv()? {
            coordinator.handle(from, message)?;
        }
        if coordinator.n_finished == n_workers {
            break;
        }
        if let Some(node) = coordinator.ctx.pop_fresh() {
            process_node(problem, &node, &mut coordinator.ctx);
            coordinator.ctx.flush_improvement()?;
        } else {
            let (from, message) = transport.recv()?;
            coordinator.handle(from, message)?;
        }
    }

    info!("coordinator: all workers released, search complete");
    Ok(coordinator.ctx.solution)
}

impl<T: Transport> Coordinator<'_, T> {
    fn handle(&mut self, from: usize, message: Message) -> Result<()> {
        match message {
            Message::Solution(peer) => self.ctx.adopt(&peer),
            Message::WorkRequest { received } => self.serve_request(from, received)?,
            other => panic!(
                "coordinator received {} from rank {from}: protocol invariant broken",
                other.kind()
            ),
        }
        Ok(())
    }

    fn serve_request(&mut self, from: usize, received: u64) -> Result<()> {
        debug_assert!(!self.finished[from], "request from released worker {from}");
        if let Some(node) = self.ctx.pop_fresh() {
            self.sent[from] += 1;
            self.ctx.transport.send(from, Message::Node(node))?;
        } else if received == self.sent[from] {
            self.ctx.transport.send(from, Message::NoMoreWork)?;
            self.finished[from] = true;
            self.n_finished += 1;
            trace!(
                "coordinator: released worker {from} ({} remaining)",
                self.ctx.transport.size() - 1 - self.n_finished
            );
        } else {
            // nodes are still in flight to this worker; they will unblock it
            // and it will ask again once they are drained
            trace!(
                "coordinator: deferring release of worker {from} ({} of {} nodes delivered)",
                received,
                self.sent[from]
            );
        }
        Ok(())
    }
}

fn run_worker<T: Transport>(
    problem: &Problem,
    max_tour_cost: f64,
    transport: &T,
) -> Result<Solution> {
    let rank = transport.rank();
    let mut ctx = ClusterContext::new(
        transport,
        Solution::with_ceiling(problem.n_cities(), max_tour_cost),
    );
    let mut received = 0u64;
    let mut state = WorkerState::Active;
    trace!("worker {rank}: {state:?}");

    loop {
        // drain pending traffic first so a message backlog never starves
        // behind local search work
        while let Some((from, message)) = transport.try_recv()? {
            match message {
                Message::Node(node) => {
                    received += 1;
                    ctx.queue.push(node);
                }
                Message::Solution(peer) => ctx.adopt(&peer),
                other => protocol_violation(rank, state, from, &other),
            }
        }

        // one bounded unit of local search
        if let Some(node) = ctx.pop_fresh() {
            process_node(problem, &node, &mut ctx);
            ctx.flush_improvement()?;
            continue;
        }

        // genuinely idle: ask for work and block on the reply alone
        state = WorkerState::Idle;
        trace!("worker {rank}: Active -> Idle, requesting work ({received} received)");
        transport.send(0, Message::WorkRequest { received })?;
        loop {
            let (from, message) = transport.recv()?;
            match message {
                Message::Node(node) => {
                    received += 1;
                    ctx.queue.push(node);
                    state = WorkerState::Active;
                    trace!("worker {rank}: Idle -> Active");
                    break;
                }
                // an improved bound cannot create work for an empty queue,
                // so it does not unblock the wait
                Message::Solution(peer) => ctx.adopt(&peer),
                Message::NoMoreWork => {
                    debug_assert!(ctx.queue.is_empty());
                    state = WorkerState::Terminated;
                    trace!("worker {rank}: Idle -> {state:?}");
                    return Ok(ctx.solution);
                }
                other => protocol_violation(rank, state, from, &other),
            }
        }
    }
}

fn protocol_violation(rank: usize, state: WorkerState, from: usize, message: &Message) -> ! {
    panic!(
        "worker {rank} in state {state:?} received {} from rank {from}: \
         termination-detection invariant broken",
        message.kind()
    );
}

/// Run a whole cluster inside one process, one thread per rank, and return
/// the coordinator's solution. This is the harness the CLI and the
/// equivalence tests use.
pub fn solve_local_cluster(
    problem: &Problem,
    max_tour_cost: f64,
    ranks: usize,
    config: &ClusterConfig,
) -> Result<Solution> {
    let ranks = ranks.max(1);
    info!("local cluster solve with {ranks} ranks");
    let mesh = ChannelTransport::mesh(ranks);
    thread::scope(|scope| {
        for transport in &mesh[1..] {
            scope.spawn(move || {
                if let Err(error) = solve_cluster(problem, max_tour_cost, transport, config) {
                    panic!("rank {} failed: {error}", transport.rank());
                }
            });
        }
        solve_cluster(problem, max_tour_cost, &mesh[0], config)
    })
}
