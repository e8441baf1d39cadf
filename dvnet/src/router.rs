use crate::concepts::interface::{Direction, Interface, PutMode};
use crate::concepts::neighbour::Neighbour;
use crate::concepts::packet::{Address, Packet, Protocol};
use crate::concepts::route::{Metric, RouteEntry, RouteTable, INF};
use crate::feedback::{ConfigError, DropReason, RoutingError, RoutingEvent};
use crate::framework::{EventSink, ForwardingPolicy, LogSink, ProtocolParams};
use crate::util::{min_cost_neighbour, sum_inf};
use educe::Educe;
use log::error;
use std::collections::HashSet;

/// A multi-interface router running a distance-vector protocol.
///
/// The router owns its interfaces and both of its tables, only its own methods change them.
#[derive(Educe)]
#[educe(Debug)]
pub struct Router {
    address: Address,
    /// static cost table, in configured order
    links: Vec<Neighbour>,
    routes: RouteTable,
    interfaces: Vec<Interface>,
    params: ProtocolParams,
    #[educe(Debug(ignore))]
    sink: Box<dyn EventSink>,
}

impl Router {
    /// Creates a router with one interface per neighbour, `links[k].itf` names the interface
    /// that reaches neighbour `k`.
    pub fn new(address: Address, links: Vec<Neighbour>, queue_capacity: usize) -> Result<Self, ConfigError> {
        let count = links.len();
        let mut itfs = HashSet::new();
        let mut addrs = HashSet::new();
        for neigh in &links {
            if neigh.addr == address {
                return Err(ConfigError::SelfNeighbour(address));
            }
            if neigh.itf >= count {
                return Err(ConfigError::InterfaceOutOfRange {
                    addr: neigh.addr,
                    itf: neigh.itf,
                    count,
                });
            }
            if !itfs.insert(neigh.itf) {
                return Err(ConfigError::DuplicateInterface(neigh.itf));
            }
            if !addrs.insert(neigh.addr) {
                return Err(ConfigError::DuplicateNeighbour(neigh.addr));
            }
        }

        let mut routes = RouteTable::new();
        routes.insert(RouteEntry {
            dst: address,
            via: address,
            cost: Metric::Finite(0),
        });
        for neigh in &links {
            routes.insert(RouteEntry {
                dst: neigh.addr,
                via: neigh.addr,
                cost: Metric::Finite(neigh.link_cost),
            });
        }

        Ok(Self {
            address,
            interfaces: (0..count).map(|_| Interface::new(queue_capacity)).collect(),
            links,
            routes,
            params: ProtocolParams::default(),
            sink: Box::new(LogSink),
        })
    }

    pub fn with_params(mut self, params: ProtocolParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // region Accessors
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn links(&self) -> &[Neighbour] {
        &self.links
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn interface(&self, itf: usize) -> Option<&Interface> {
        self.interfaces.get(itf)
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// the neighbour reached through interface `itf`
    pub fn neighbour_on(&self, itf: usize) -> Option<&Neighbour> {
        self.links.iter().find(|neigh| neigh.itf == itf)
    }
    // endregion

    /// Adds an unreachable row for a destination that is known but not learned yet
    pub fn add_destination(&mut self, dst: Address) {
        if self.routes.get(&dst).is_none() {
            self.routes.insert(RouteEntry {
                dst,
                via: self.address,
                cost: INF,
            });
        }
    }

    fn emit(&self, event: RoutingEvent) {
        self.sink.emit(event);
    }

    fn enqueue(&self, itf: usize, packet: &Packet) -> bool {
        let mode = PutMode::Timeout(self.params.enqueue_timeout);
        match self.interfaces[itf].put(packet.encode(), Direction::Out, mode) {
            Ok(()) => true,
            Err(err) => {
                self.emit(RoutingEvent::Dropped {
                    node: self.address,
                    itf: Some(itf),
                    dst: packet.dst,
                    reason: DropReason::from(&err),
                });
                false
            }
        }
    }

    /// Takes at most one packet from every inbound queue, in interface order, and handles it.
    /// Returns how many packets were taken.
    pub fn process_queues(&mut self) -> usize {
        let mut taken = 0;
        for itf in 0..self.interfaces.len() {
            let Some(bytes) = self.interfaces[itf].try_get(Direction::In) else {
                continue;
            };
            taken += 1;
            match Packet::decode(&bytes) {
                Ok(packet) => match packet.protocol {
                    Protocol::Data => {
                        self.forward_packet(packet, itf);
                    }
                    Protocol::Control => {
                        self.update_routes(&packet, itf);
                    }
                },
                Err(err) => self.emit(RoutingEvent::Discarded {
                    node: self.address,
                    itf,
                    error: err.to_string(),
                }),
            }
        }
        taken
    }

    /// Picks the outgoing neighbour for a destination, and whether that is the default route
    fn select_neighbour(&self, dst: Address) -> Option<(&Neighbour, bool)> {
        if let Some(neigh) = self.links.iter().find(|neigh| neigh.addr == dst) {
            return Some((neigh, false));
        }
        if self.params.forwarding == ForwardingPolicy::RouteTable {
            if let Some(route) = self.routes.get(&dst).filter(|route| route.cost.is_finite()) {
                if let Some(neigh) = self.links.iter().find(|neigh| neigh.addr == route.via) {
                    return Some((neigh, false));
                }
            }
        }
        min_cost_neighbour(&self.links).map(|neigh| (neigh, true))
    }

    /// Forwards a data packet that arrived on interface `itf`.
    /// Returns the interface the packet was enqueued on, `None` if it was absorbed or dropped.
    pub fn forward_packet(&mut self, packet: Packet, itf: usize) -> Option<usize> {
        if packet.dst == self.address {
            self.emit(RoutingEvent::Delivered {
                node: self.address,
                packet,
            });
            return None;
        }

        let Some((neigh, default_route)) = self.select_neighbour(packet.dst) else {
            self.emit(RoutingEvent::Dropped {
                node: self.address,
                itf: None,
                dst: packet.dst,
                reason: DropReason::NoRoute,
            });
            return None;
        };
        let out_itf = neigh.itf;

        if !self.enqueue(out_itf, &packet) {
            return None;
        }
        self.emit(RoutingEvent::Forwarded {
            node: self.address,
            dst: packet.dst,
            from_itf: itf,
            to_itf: out_itf,
            default_route,
        });
        Some(out_itf)
    }

    /// Relaxes the routing table against a neighbour's advertised table.
    /// Returns whether any route changed, in which case the table is advertised again.
    pub fn update_routes(&mut self, packet: &Packet, itf: usize) -> bool {
        let neigh = match self.neighbour_on(itf) {
            Some(neigh) => neigh.clone(),
            None => {
                self.emit(RoutingEvent::Discarded {
                    node: self.address,
                    itf,
                    error: RoutingError::UnknownInterface(itf).to_string(),
                });
                return false;
            }
        };
        let advertised = match RouteTable::decode(&packet.payload) {
            Ok(rows) => rows,
            Err(err) => {
                self.emit(RoutingEvent::Discarded {
                    node: self.address,
                    itf,
                    error: err.to_string(),
                });
                return false;
            }
        };

        let mut changed = false;
        for row in advertised {
            if row.dst == self.address {
                continue; // we can safely ignore a route to ourself
            }
            let candidate = sum_inf(neigh.link_cost, row.cost);
            if !candidate.is_finite() {
                continue;
            }
            let old = self.routes.cost_to(&row.dst);
            // unknown and unreachable destinations are both INF here
            if candidate < old {
                self.routes.insert(RouteEntry {
                    dst: row.dst,
                    via: neigh.addr,
                    cost: candidate,
                });
                self.emit(RoutingEvent::RouteChanged {
                    node: self.address,
                    dst: row.dst,
                    via: neigh.addr,
                    old,
                    new: candidate,
                });
                changed = true;
            }
        }

        if changed {
            for out_itf in 0..self.interfaces.len() {
                if self.params.split_horizon && out_itf == itf {
                    continue;
                }
                self.send_routes(out_itf);
            }
        }
        changed
    }

    /// Sends the whole routing table on interface `itf`, returns whether it was enqueued
    pub fn send_routes(&mut self, itf: usize) -> bool {
        let Some(neigh) = self.neighbour_on(itf) else {
            return false;
        };
        let dst = neigh.addr;
        let payload = match self.routes.encode() {
            Ok(payload) => payload,
            Err(err) => {
                error!("{}: failed to serialize routing table: {err}", self.address);
                return false;
            }
        };
        let packet = Packet::control(dst, payload);
        if !self.enqueue(itf, &packet) {
            return false;
        }
        self.emit(RoutingEvent::Advertised {
            node: self.address,
            itf,
        });
        true
    }

    /// pushes the routing table to every neighbour
    pub fn advertise_all(&mut self) {
        for itf in 0..self.interfaces.len() {
            self.send_routes(itf);
        }
    }
}
