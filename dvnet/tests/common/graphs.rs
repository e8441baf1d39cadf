use dvnet::framework::ProtocolParams;

use crate::common::virtual_network::VirtualNetwork;

/// 1 - 2 - 3, unit costs
pub fn vnet_line() -> VirtualNetwork {
    VirtualNetwork::create(&[1, 2, 3], &[], &[(1, 2, 1), (2, 3, 1)])
}

pub fn vnet_simple_weighted() -> VirtualNetwork {
    VirtualNetwork::create(
        &[1, 2, 3, 4, 5],
        &[],
        &[
            (1, 2, 2),
            (1, 3, 1),
            (2, 3, 4),
            (2, 4, 5),
            (3, 4, 100),
            (3, 5, 8),
            (4, 5, 1),
        ],
    )
}

/// host 10 - router 1 - router 2 - host 20
pub fn vnet_hosts_line() -> VirtualNetwork {
    VirtualNetwork::create(&[1, 2], &[10, 20], &[(10, 1, 5), (1, 2, 1), (2, 20, 5)])
}

/// Router 1 has a cheap link to the dead end 2 and a dearer one to 3, which leads on to host 30.
pub fn vnet_dead_end(params: ProtocolParams) -> VirtualNetwork {
    VirtualNetwork::create_with(
        &[1, 2, 3],
        &[30],
        &[(1, 2, 1), (1, 3, 2), (3, 30, 1)],
        params,
    )
}
