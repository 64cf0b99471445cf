//! Exact travelling-salesman solver by branch and bound.
//!
//! Three engines share one expansion core and therefore one set of prune and
//! accept rules:
//!
//! * [`solve_sequential`]: single thread, one priority queue.
//! * [`solve_parallel`]: shared-memory threads over per-thread queues with a
//!   round-robin load balancer and a lock-guarded incumbent.
//! * [`solve_cluster`]: message passing over a [`Transport`], where a coordinator
//!   rank seeds and serves pull-model work requests from worker ranks.
//!   [`solve_local_cluster`] runs a whole cluster in-process over channels.
//!
//! All three return the same optimal cost for the same instance; with the
//! documented tie-break they return the same tour as well.
//!
//! ```
//! use tsp_bnb::{ProblemBuilder, solve_sequential};
//!
//! let problem = ProblemBuilder::new(3)?
//!     .road(0, 1, 1.0)?
//!     .road(1, 2, 1.0)?
//!     .road(2, 0, 1.0)?
//!     .build();
//! let solution = solve_sequential(&problem, 100.0);
//! assert_eq!(solution.cost(), 3.0);
//! # Ok::<(), tsp_bnb::Error>(())
//! ```

mod error;
mod problem;
mod solver;

pub use error::{Error, Result};
pub use problem::{Problem, ProblemBuilder, MAX_CITIES};
pub use solver::bound::{extend_lower_bound, initial_lower_bound};
pub use solver::cluster::{
    solve_cluster, solve_local_cluster, ChannelTransport, ClusterConfig, Message, Transport,
};
pub use solver::node::Node;
pub use solver::parallel::{solve_parallel, ParallelConfig};
pub use solver::sequential::solve_sequential;
pub use solver::solution::Solution;
