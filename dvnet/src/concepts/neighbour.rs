use crate::concepts::packet::Address;

/// An entry of the static cost table, one per directly connected node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Neighbour {
    /// the routing network address of the neighbour
    pub addr: Address,
    /// index of the router interface that connects to this neighbour
    pub itf: usize,
    /// Direct link-cost to this neighbour. Lower is better.
    pub link_cost: u32,
}

impl Neighbour {
    pub fn new(addr: Address, itf: usize, link_cost: u32) -> Self {
        Self {
            addr,
            itf,
            link_cost,
        }
    }
}
