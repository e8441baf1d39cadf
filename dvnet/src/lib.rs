//! dvnet simulates a small packet-switched network.
//!
//! [`host::Host`]s originate and absorb traffic, [`router::Router`]s forward it and run a
//! distance-vector protocol to learn routes. Nodes only talk through
//! [`concepts::interface::Interface`] queues, and each node runs its own loop
//! ([`node::start`]).

pub mod concepts;
pub mod feedback;
pub mod framework;
pub mod host;
pub mod node;
pub mod router;
pub mod util;
