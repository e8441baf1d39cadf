use crate::concepts::packet::{Address, Packet};
use crate::concepts::route::Metric;
use thiserror::Error;

/// Failures while decoding a packet off the wire, or building an address.
/// These are fatal to the single packet only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("packet is {len} bytes long, shorter than the 6 byte header")]
    Malformed { len: usize },
    /// The protocol digit is neither data nor control, so the packet type cannot be dispatched
    #[error("unknown protocol digit {0:?}")]
    UnknownProtocol(char),
    #[error("invalid address field {0:?}")]
    InvalidAddress(String),
    #[error("address {0} does not fit in 5 decimal digits")]
    AddressOutOfRange(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Expected under load, the caller drops the packet.
    #[error("queue is full (capacity {capacity})")]
    Full { capacity: usize },
    #[error("queue is disconnected")]
    Disconnected,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    /// The advertised table could not be parsed, the whole update is ignored
    #[error("malformed control payload: {0}")]
    MalformedControlPayload(#[from] serde_json::Error),
    #[error("invalid metric {0:?}")]
    InvalidMetric(String),
    #[error("no neighbour is configured on interface {0}")]
    UnknownInterface(usize),
}

/// Rejected router configurations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("neighbour {addr} uses interface {itf}, but the router only has {count} interfaces")]
    InterfaceOutOfRange { addr: Address, itf: usize, count: usize },
    #[error("interface {0} is assigned to more than one neighbour")]
    DuplicateInterface(usize),
    #[error("neighbour {0} is configured more than once")]
    DuplicateNeighbour(Address),
    #[error("router {0} cannot be its own neighbour")]
    SelfNeighbour(Address),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    QueueFull,
    /// The router has no neighbour to send on
    NoRoute,
    /// The far end of the queue is gone
    Disconnected,
}

impl From<&QueueError> for DropReason {
    fn from(err: &QueueError) -> Self {
        match err {
            QueueError::Full { .. } => DropReason::QueueFull,
            QueueError::Disconnected => DropReason::Disconnected,
        }
    }
}

/// Structured events emitted by routers and hosts to their [`EventSink`](crate::framework::EventSink).
/// Nothing in the core logic writes to a console directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingEvent {
    /// A host enqueued a data packet
    Sent { node: Address, dst: Address },
    /// A router put a data packet on an outgoing interface
    Forwarded {
        node: Address,
        dst: Address,
        from_itf: usize,
        to_itf: usize,
        /// the packet left on the min-cost default route
        default_route: bool,
    },
    Dropped {
        node: Address,
        itf: Option<usize>,
        dst: Address,
        reason: DropReason,
    },
    /// Bytes or a control payload that could not be understood, they are thrown away
    Discarded {
        node: Address,
        itf: usize,
        error: String,
    },
    /// A data packet reached its destination
    Delivered { node: Address, packet: Packet },
    /// A full table advertisement was enqueued
    Advertised { node: Address, itf: usize },
    RouteChanged {
        node: Address,
        dst: Address,
        via: Address,
        old: Metric,
        new: Metric,
    },
}
