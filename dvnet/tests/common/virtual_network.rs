use dvnet::concepts::interface::{Direction, Interface};
use dvnet::concepts::neighbour::Neighbour;
use dvnet::concepts::packet::Address;
use dvnet::concepts::route::Metric;
use dvnet::framework::{EventLog, ProtocolParams};
use dvnet::host::Host;
use dvnet::router::Router;

use crate::common::link::{pump, Link};
use crate::common::{addr, init_logging};

/// A deterministic, single threaded network. Every tick moves packets across the links
/// and runs one poll cycle on every node.
pub struct VirtualNetwork {
    pub routers: Vec<Router>,
    pub hosts: Vec<Host>,
    pub links: Vec<Link>,
    pub log: EventLog,
}

impl VirtualNetwork {
    pub fn create(routers: &[u32], hosts: &[u32], links: &[(u32, u32, u32)]) -> VirtualNetwork {
        Self::create_with(routers, hosts, links, ProtocolParams::default())
    }

    /// `links` are `(a, b, cost)`, a router numbers its interfaces in the order its links appear
    pub fn create_with(
        routers: &[u32],
        hosts: &[u32],
        links: &[(u32, u32, u32)],
        params: ProtocolParams,
    ) -> VirtualNetwork {
        init_logging();
        let log = EventLog::new();
        let routers: Vec<Router> = routers
            .iter()
            .map(|&id| {
                let neighbours = links
                    .iter()
                    .filter(|(a, b, _)| *a == id || *b == id)
                    .enumerate()
                    .map(|(itf, (a, b, cost))| {
                        let nid = if *a == id { *b } else { *a };
                        Neighbour::new(addr(nid), itf, *cost)
                    })
                    .collect();
                Router::new(addr(id), neighbours, 0)
                    .unwrap()
                    .with_params(params.clone())
                    .with_sink(log.clone())
            })
            .collect();
        let hosts: Vec<Host> = hosts
            .iter()
            .map(|&id| Host::new(addr(id)).with_sink(log.clone()))
            .collect();

        let mut network = VirtualNetwork {
            routers,
            hosts,
            links: Vec::new(),
            log,
        };
        network.links = links
            .iter()
            .map(|(a, b, _)| (network.endpoint(*a, *b), network.endpoint(*b, *a)))
            .collect();
        network
    }

    /// the interface of `node` that faces `peer`
    fn endpoint(&self, node: u32, peer: u32) -> Interface {
        if let Some(host) = self.hosts.iter().find(|h| h.address() == addr(node)) {
            return host.interface().clone();
        }
        let router = self.router(node);
        let neigh = router
            .links()
            .iter()
            .find(|n| n.addr == addr(peer))
            .unwrap_or_else(|| panic!("{node} has no link to {peer}"));
        router.interface(neigh.itf).unwrap().clone()
    }

    pub fn router(&self, node: u32) -> &Router {
        self.routers
            .iter()
            .find(|r| r.address() == addr(node))
            .unwrap_or_else(|| panic!("No router {node} found"))
    }

    pub fn router_mut(&mut self, node: u32) -> &mut Router {
        self.routers
            .iter_mut()
            .find(|r| r.address() == addr(node))
            .unwrap_or_else(|| panic!("No router {node} found"))
    }

    pub fn host(&self, node: u32) -> &Host {
        self.hosts
            .iter()
            .find(|h| h.address() == addr(node))
            .unwrap_or_else(|| panic!("No host {node} found"))
    }

    pub fn get_next_hop(&self, cur: u32, dst: u32) -> Address {
        self.router(cur)
            .routes()
            .get(&addr(dst))
            .unwrap_or_else(|| panic!("No route found to {dst}"))
            .via
    }

    pub fn get_metric_to(&self, cur: u32, dst: u32) -> Metric {
        self.router(cur).routes().cost_to(&addr(dst))
    }

    /// what every router does when its loop starts
    pub fn advertise_all(&mut self) {
        for router in &mut self.routers {
            router.advertise_all();
        }
    }

    /// Returns how many packets moved or were handled
    pub fn tick(&mut self) -> usize {
        let mut work = pump(&self.links);
        for router in &mut self.routers {
            work += router.process_queues();
        }
        for host in &mut self.hosts {
            while !host.interface().is_empty(Direction::In) {
                host.receive();
                work += 1;
            }
        }
        work
    }

    /// Ticks until nothing is in flight, returns the number of ticks
    pub fn settle(&mut self) -> usize {
        for ticks in 0..1000 {
            if self.tick() == 0 {
                return ticks;
            }
        }
        panic!("network did not settle in 1000 ticks");
    }

    pub fn converge(&mut self) -> usize {
        self.advertise_all();
        self.settle()
    }
}
