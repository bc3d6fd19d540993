use serde::{Deserialize, Serialize};

use crate::network::{
    address::LinkAddress,
    router::{Hostname, RouterId},
};

/// One direction of one adjacency, as reported by one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub local_host: Hostname,
    pub local_interface: String,
    pub remote_router_id: RouterId,
    /// Neighbor address on the link. Empty when the vendor output has no address column.
    pub remote_ip: String,
    /// Dotted-decimal area, empty when the vendor output has no area column.
    pub area: String,
    pub state: String,
}

impl Link {
    pub fn remote_address(&self) -> LinkAddress {
        LinkAddress::parse(&self.remote_ip)
    }

    /// Logical unit / dot1q subinterface number of the local interface (`ge-0/0/0.120`,
    /// `Gi0/1.120`). Unit 0 is the Junos default and carries no information.
    pub fn interface_unit(&self) -> Option<u32> {
        let (_, unit) = self.local_interface.rsplit_once('.')?;
        unit.parse().ok().filter(|unit| *unit != 0)
    }

    /// Areas are compatible when equal or when either side did not report one.
    pub fn area_compatible(&self, other: &Link) -> bool {
        self.area.is_empty() || other.area.is_empty() || self.area == other.area
    }
}

/// Canonical key of one physical connection, independent of which end reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey {
    pub a: String,
    pub b: String,
}

impl ConnectionKey {
    pub fn new(host_a: &str, if_a: &str, host_b: &str, if_b: &str) -> Self {
        let a = format!("{host_a}:{if_a}");
        let b = format!("{host_b}:{if_b}");
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        ConnectionKey { a, b }
    }
}
