//! Message kinds exchanged between ranks. The wire encoding is the
//! transport's business; only the kinds and their delivery order matter here.

use crate::solver::node::Node;
use crate::solver::solution::Solution;

/// A message between ranks.
#[derive(Debug, Clone)]
pub enum Message {
    /// A unit of work handed to a worker: a full node record.
    Node(Node),
    /// An improved incumbent, broadcast by whichever rank found it.
    Solution(Solution),
    /// A worker's explicit request for work. `received` counts every node
    /// the worker has ever received; the coordinator compares it against its
    /// own per-worker send count so it never declares a worker finished
    /// while a node is still in flight to it.
    WorkRequest { received: u64 },
    /// Coordinator reply: the search holds no further work for this worker.
    NoMoreWork,
}

impl Message {
    /// Short tag for logs and protocol-violation reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Node(_) => "NODE",
            Message::Solution(_) => "SOLUTION",
            Message::WorkRequest { .. } => "WORK-REQUEST",
            Message::NoMoreWork => "NO-MORE-WORK",
        }
    }
}
