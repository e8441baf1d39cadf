use crate::concepts::neighbour::Neighbour;
use crate::concepts::route::Metric;

/// Adds a link cost to an advertised metric, unreachable stays unreachable
///
/// # Examples
///
/// ```
/// use dvnet::concepts::route::{Metric, INF};
/// use dvnet::util::sum_inf;
///
/// assert_eq!(sum_inf(1, Metric::Finite(2)), Metric::Finite(3));
/// assert_eq!(sum_inf(1, INF), INF);
/// assert_eq!(sum_inf(u32::MAX, Metric::Finite(5)), Metric::Finite(u32::MAX));
/// ```
pub fn sum_inf(link_cost: u32, advertised: Metric) -> Metric {
    match advertised {
        Metric::Finite(cost) => Metric::Finite(link_cost.saturating_add(cost)),
        Metric::Infinite => Metric::Infinite,
    }
}

/// The cheapest neighbour, ties go to the one configured first
///
/// ```
/// use dvnet::concepts::neighbour::Neighbour;
/// use dvnet::concepts::packet::Address;
/// use dvnet::util::min_cost_neighbour;
///
/// let a = Address::new(1).unwrap();
/// let b = Address::new(2).unwrap();
/// let c = Address::new(3).unwrap();
/// let links = [Neighbour::new(a, 0, 3), Neighbour::new(b, 1, 1), Neighbour::new(c, 2, 1)];
/// assert_eq!(min_cost_neighbour(&links).map(|n| n.addr), Some(b));
/// assert!(min_cost_neighbour(&[]).is_none());
/// ```
pub fn min_cost_neighbour(links: &[Neighbour]) -> Option<&Neighbour> {
    // min_by_key keeps the first of several equal minimums
    links.iter().min_by_key(|neigh| neigh.link_cost)
}
