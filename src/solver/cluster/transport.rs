//! Opaque transport between ranks, plus the in-process implementation used
//! by the test harness and the CLI's cluster mode.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::error::{Error, Result};
use crate::solver::cluster::message::Message;

/// What the cluster engine needs from a transport: rank identity, sends to
/// any peer, and both polling and blocking receives. Delivery must be
/// in-order per sender; nothing else is assumed.
pub trait Transport {
    /// This process's rank; rank 0 is the coordinator.
    fn rank(&self) -> usize;

    /// Total number of ranks.
    fn size(&self) -> usize;

    /// Send a message to `to`.
    fn send(&self, to: usize, message: Message) -> Result<()>;

    /// Non-blocking poll: the next pending `(from, message)` if any.
    fn try_recv(&self) -> Result<Option<(usize, Message)>>;

    /// Block until a message arrives. Used only when genuinely idle: a rank
    /// never blocks here while it still has local work.
    fn recv(&self) -> Result<(usize, Message)>;
}

/// In-process transport: one crossbeam channel per rank, full mesh of
/// senders. Channels preserve per-sender order, satisfying the contract.
pub struct ChannelTransport {
    rank: usize,
    peers: Vec<Sender<(usize, Message)>>,
    inbox: Receiver<(usize, Message)>,
}

impl ChannelTransport {
    /// Build a fully connected mesh of `size` rank endpoints.
    pub fn mesh(size: usize) -> Vec<ChannelTransport> {
        let (senders, inboxes): (Vec<_>, Vec<_>) =
            (0..size).map(|_| unbounded()).unzip();
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| ChannelTransport {
                rank,
                peers: senders.clone(),
                inbox,
            })
            .collect()
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn send(&self, to: usize, message: Message) -> Result<()> {
        self.peers[to]
            .send((self.rank, message))
            .map_err(|_| Error::Disconnected)
    }

    fn try_recv(&self) -> Result<Option<(usize, Message)>> {
        match self.inbox.try_recv() {
            Ok(received) => Ok(Some(received)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }

    fn recv(&self) -> Result<(usize, Message)> {
        self.inbox.recv().map_err(|_| Error::Disconnected)
    }
}
