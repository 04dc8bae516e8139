//! Inbound peer message adapter: a bounded work queue between peer ingress and
//! the validator core, with a drop-oldest-vote backpressure policy. Blocks are never
//! dropped.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use validator_sdk::{Block, Vote};

const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum PeerMessage {
    Block(Block),
    Vote(Vote),
}

pub struct InboundAdapter {
    sender: Sender<PeerMessage>,
    receiver: Receiver<PeerMessage>,
}

impl Default for InboundAdapter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl InboundAdapter {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        Self { sender, receiver }
    }

    pub fn process_block(&self, block: Block) {
        self.enqueue(PeerMessage::Block(block));
    }

    pub fn process_vote(&self, vote: Vote) {
        self.enqueue(PeerMessage::Vote(vote));
    }

    /// A bounded-blocking consumer loop would call this; returns `None` once every
    /// sender has been dropped.
    pub fn recv(&self) -> Option<PeerMessage> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<PeerMessage> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn sender(&self) -> Sender<PeerMessage> {
        self.sender.clone()
    }

    /// Non-blocking enqueue. On a full queue, evicts the oldest message if it's a
    /// vote (the channel's FIFO order means the oldest item is the next one
    /// `try_recv` would return). If the oldest item is a block, it is put back and
    /// the incoming vote is dropped instead; an incoming block always gets through
    /// by falling back to a blocking send after one eviction attempt.
    fn enqueue(&self, message: PeerMessage) {
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => self.enqueue_with_eviction(message),
            Err(TrySendError::Disconnected(_)) => {
                log::error!("peer ingress queue has no live receiver");
            }
        }
    }

    fn enqueue_with_eviction(&self, message: PeerMessage) {
        match self.receiver.try_recv() {
            Ok(PeerMessage::Vote(_)) => {
                log::warn!("peer ingress queue full, dropping oldest vote");
                self.final_send(message);
            }
            Ok(oldest @ PeerMessage::Block(_)) => {
                let _ = self.sender.try_send(oldest);
                match message {
                    PeerMessage::Vote(_) => log::warn!("peer ingress queue full of blocks, dropping incoming vote"),
                    PeerMessage::Block(_) => self.final_send(message),
                }
            }
            Err(_) => self.final_send(message),
        }
    }

    fn final_send(&self, message: PeerMessage) {
        if let Err(e) = self.sender.send(message) {
            log::error!("failed to deliver peer message after eviction: {}", e);
        }
    }
}
