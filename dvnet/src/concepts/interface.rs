use crate::feedback::QueueError;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError};
use std::time::Duration;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    In,
    Out,
}

/// How [`Interface::put`] behaves when the queue is at capacity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PutMode {
    /// fail with [`QueueError::Full`] right away
    NonBlocking,
    /// wait until there is room
    Blocking,
    /// wait at most this long, then fail with [`QueueError::Full`]
    Timeout(Duration),
}

#[derive(Clone, Debug)]
struct Queue {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl Queue {
    fn new(capacity: usize) -> Self {
        let (tx, rx) = if capacity == 0 {
            unbounded()
        } else {
            bounded(capacity)
        };
        Self { tx, rx }
    }
}

/// One endpoint of a link, a pair of FIFO queues of encoded packets.
///
/// Clones share the same queues, the link (or a test harness) holds a clone to move
/// packets between the outbound queue of one endpoint and the inbound queue of the other.
/// All synchronization is internal, callers never lock anything.
#[derive(Clone, Debug)]
pub struct Interface {
    inbound: Queue,
    outbound: Queue,
    capacity: usize,
}

impl Interface {
    /// capacity 0 means the queues are unbounded
    pub fn new(capacity: usize) -> Self {
        Self {
            inbound: Queue::new(capacity),
            outbound: Queue::new(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn queue(&self, direction: Direction) -> &Queue {
        match direction {
            Direction::In => &self.inbound,
            Direction::Out => &self.outbound,
        }
    }

    /// take a packet without blocking, `None` when the queue is empty
    pub fn try_get(&self, direction: Direction) -> Option<Vec<u8>> {
        self.queue(direction).rx.try_recv().ok()
    }

    pub fn get_timeout(&self, direction: Direction, timeout: Duration) -> Option<Vec<u8>> {
        match self.queue(direction).rx.recv_timeout(timeout) {
            Ok(pkt) => Some(pkt),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn put(&self, pkt: Vec<u8>, direction: Direction, mode: PutMode) -> Result<(), QueueError> {
        let tx = &self.queue(direction).tx;
        let full = QueueError::Full {
            capacity: self.capacity,
        };
        match mode {
            PutMode::NonBlocking => tx.try_send(pkt).map_err(|err| match err {
                TrySendError::Full(_) => full,
                TrySendError::Disconnected(_) => QueueError::Disconnected,
            }),
            PutMode::Blocking => tx.send(pkt).map_err(|_| QueueError::Disconnected),
            PutMode::Timeout(timeout) => tx.send_timeout(pkt, timeout).map_err(|err| match err {
                SendTimeoutError::Timeout(_) => full,
                SendTimeoutError::Disconnected(_) => QueueError::Disconnected,
            }),
        }
    }

    pub fn len(&self, direction: Direction) -> usize {
        self.queue(direction).rx.len()
    }

    pub fn is_empty(&self, direction: Direction) -> bool {
        self.queue(direction).rx.is_empty()
    }

    /// A receiving handle on one of the queues, for waiting in a [`crossbeam_channel::Select`].
    /// Readiness does not consume anything, packets are still taken with [`Interface::try_get`].
    pub fn receiver(&self, direction: Direction) -> &Receiver<Vec<u8>> {
        &self.queue(direction).rx
    }
}
