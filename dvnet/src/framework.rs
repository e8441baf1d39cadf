use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};

use crate::feedback::RoutingEvent;

/// Receives the structured events of a router or host.
///
/// Implementations must be cheap, `emit` is called from the node's own loop.
pub trait EventSink: Send {
    fn emit(&self, event: RoutingEvent);
}

/// Default sink, renders events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: RoutingEvent) {
        match event {
            RoutingEvent::Sent { node, dst } => {
                debug!("{node}: sending packet to {dst}")
            }
            RoutingEvent::Forwarded { node, dst, from_itf, to_itf, default_route } => {
                debug!("{node}: forwarding packet for {dst} from interface {from_itf} to {to_itf} (default route: {default_route})")
            }
            RoutingEvent::Dropped { node, itf, dst, reason } => {
                warn!("{node}: packet for {dst} lost on interface {itf:?}, {reason:?}")
            }
            RoutingEvent::Discarded { node, itf, error } => {
                warn!("{node}: discarded packet from interface {itf}: {error}")
            }
            RoutingEvent::Delivered { node, packet } => {
                info!("{node}: received packet \"{packet}\"")
            }
            RoutingEvent::Advertised { node, itf } => {
                debug!("{node}: sent routing update on interface {itf}")
            }
            RoutingEvent::RouteChanged { node, dst, via, old, new } => {
                info!("{node}: route to {dst} is now via {via}, cost {old} -> {new}")
            }
        }
    }
}

/// A sink that keeps every event, clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RoutingEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RoutingEvent>> {
        // a panicking node thread should not hide what it recorded
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<RoutingEvent> {
        self.lock().clone()
    }

    pub fn drain(&self) -> Vec<RoutingEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: RoutingEvent) {
        self.lock().push(event);
    }
}

/// Which table a router consults before falling back to its default route
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ForwardingPolicy {
    /// direct neighbours only, anything else goes to the cheapest neighbour
    #[default]
    CostTable,
    /// also follow the next hop learned by the distance-vector protocol
    RouteTable,
}

/// Protocol Parameters
#[derive(Debug, Clone)]
pub struct ProtocolParams {
    /// how long forwarding or advertising waits for room in an outbound queue before dropping
    pub enqueue_timeout: Duration,
    /// advertise the whole table on every interface when the loop starts
    pub advertise_on_start: bool,
    /// periodic full-table advertisement
    pub advertise_interval: Option<Duration>,
    /// do not echo a route update back on the interface it came from
    pub split_horizon: bool,
    pub forwarding: ForwardingPolicy,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            enqueue_timeout: Duration::from_millis(50),
            advertise_on_start: true,
            advertise_interval: None,
            split_horizon: false,
            forwarding: ForwardingPolicy::CostTable,
        }
    }
}
