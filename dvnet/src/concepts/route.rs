use crate::concepts::packet::Address;
use crate::feedback::RoutingError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Cost of a path. `Infinite` is the unreachable sentinel, and compares greater than every finite cost.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Metric {
    Finite(u32),
    Infinite,
}

pub const INF: Metric = Metric::Infinite;

impl Metric {
    pub fn is_finite(self) -> bool {
        matches!(self, Metric::Finite(_))
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Finite(cost) => Display::fmt(cost, f),
            Metric::Infinite => f.pad("~"),
        }
    }
}

impl FromStr for Metric {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "~" {
            return Ok(Metric::Infinite);
        }
        s.parse()
            .map(Metric::Finite)
            .map_err(|_| RoutingError::InvalidMetric(s.to_string()))
    }
}

/// One row of a routing table
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub dst: Address,
    /// the next hop towards `dst`, or the owner of the table for its own row
    pub via: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub cost: Metric,
}

/// Routing table, one row per known destination, ordered by destination.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteTable {
    routes: BTreeMap<Address, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dst: &Address) -> Option<&RouteEntry> {
        self.routes.get(dst)
    }

    pub fn cost_to(&self, dst: &Address) -> Metric {
        self.routes.get(dst).map_or(INF, |route| route.cost)
    }

    /// inserts or replaces the row for `entry.dst`, returning the old row
    pub fn insert(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        self.routes.insert(entry.dst, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Serializes every row, in destination order, as the payload of a control packet
    pub fn encode(&self) -> Result<Vec<u8>, RoutingError> {
        let rows: Vec<&RouteEntry> = self.routes.values().collect();
        Ok(serde_json::to_vec(&rows)?)
    }

    /// Parses an advertised table back into its rows
    pub fn decode(payload: &[u8]) -> Result<Vec<RouteEntry>, RoutingError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

impl FromIterator<RouteEntry> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteEntry>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().map(|route| (route.dst, route)).collect(),
        }
    }
}

impl Display for RouteTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>5} | {:>5} | {:>5}", "dst", "via", "cost")?;
        for route in self.routes.values() {
            writeln!(f, "{:>5} | {:>5} | {:>5}", route.dst, route.via, route.cost)?;
        }
        Ok(())
    }
}
