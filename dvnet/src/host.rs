use crate::concepts::interface::{Direction, Interface, PutMode};
use crate::concepts::packet::{Address, Packet, Protocol};
use crate::feedback::{DropReason, RoutingEvent};
use crate::framework::{EventSink, LogSink};
use educe::Educe;
use log::trace;

/// A network host, it originates data packets and absorbs the ones addressed to it.
#[derive(Educe)]
#[educe(Debug)]
pub struct Host {
    address: Address,
    interface: Interface,
    #[educe(Debug(ignore))]
    sink: Box<dyn EventSink>,
}

impl Host {
    /// a host has a single interface with unbounded queues
    pub fn new(address: Address) -> Self {
        Self {
            address,
            interface: Interface::new(0),
            sink: Box::new(LogSink),
        }
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Creates a data packet and enqueues it for transmission, waiting for room if needed
    pub fn send(&self, dst: Address, payload: impl Into<Vec<u8>>) {
        let packet = Packet::data(dst, payload);
        self.sink.emit(RoutingEvent::Sent {
            node: self.address,
            dst,
        });
        if let Err(err) = self
            .interface
            .put(packet.encode(), Direction::Out, PutMode::Blocking)
        {
            self.sink.emit(RoutingEvent::Dropped {
                node: self.address,
                itf: Some(0),
                dst,
                reason: DropReason::from(&err),
            });
        }
    }

    /// Takes one packet from the inbound queue, if there is one, and hands data packets
    /// to the consumer.
    pub fn receive(&mut self) -> Option<Packet> {
        let bytes = self.interface.try_get(Direction::In)?;
        match Packet::decode(&bytes) {
            Ok(packet) if packet.protocol == Protocol::Data => {
                self.sink.emit(RoutingEvent::Delivered {
                    node: self.address,
                    packet: packet.clone(),
                });
                Some(packet)
            }
            Ok(packet) => {
                trace!("{}: ignoring routing update for {}", self.address, packet.dst);
                None
            }
            Err(err) => {
                self.sink.emit(RoutingEvent::Discarded {
                    node: self.address,
                    itf: 0,
                    error: err.to_string(),
                });
                None
            }
        }
    }
}
