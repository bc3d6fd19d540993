//! Turns correlated links into the hostname-keyed peer topology.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::{
    network::{
        address::same_link,
        link::{ConnectionKey, Link},
        node::{NodeDetails, PeerEntry, Topology, UNKNOWN_INTERFACE},
        router::Hostname,
    },
    parsers::DeviceProfile,
    topology::{correlation::RouterIdMap, store::LinkStore},
};

pub struct TopologyAssembler<'a> {
    store: &'a LinkStore,
    map: &'a RouterIdMap,
    profiles: &'a BTreeMap<Hostname, DeviceProfile>,
}

impl<'a> TopologyAssembler<'a> {
    pub fn new(
        store: &'a LinkStore,
        map: &'a RouterIdMap,
        profiles: &'a BTreeMap<Hostname, DeviceProfile>,
    ) -> Self {
        TopologyAssembler {
            store,
            map,
            profiles,
        }
    }

    pub fn assemble(&self) -> Topology {
        let mut topology = Topology::new();
        for host in self.store.hosts() {
            topology.ensure_node(host, self.node_details(host));
        }

        let mut seen: HashSet<ConnectionKey> = HashSet::new();
        for link in self.store.links() {
            let (remote_host, remote_details) = match self.map.host_of(&link.remote_router_id) {
                Some(host) => (host.clone(), self.node_details(host)),
                None => {
                    let rid = link.remote_router_id.to_string();
                    let details = NodeDetails::pseudo_host(&rid);
                    (rid, details)
                }
            };
            let remote_interface = self.remote_interface(link, &remote_host);

            let key = ConnectionKey::new(
                &link.local_host,
                &link.local_interface,
                &remote_host,
                &remote_interface,
            );
            if !seen.insert(key) {
                trace!(
                    host = %link.local_host,
                    interface = %link.local_interface,
                    peer = %remote_host,
                    "connection already recorded from the other end"
                );
                continue;
            }

            topology.ensure_node(&remote_host, remote_details);
            connect(
                &mut topology,
                &link.local_host,
                &link.local_interface,
                &remote_host,
                &remote_interface,
            );
        }

        debug!(
            nodes = topology.len(),
            connections = seen.len(),
            "topology assembled"
        );
        topology
    }

    fn node_details(&self, host: &str) -> NodeDetails {
        let (platform, vendor) = self
            .profiles
            .get(host)
            .map(|profile| (profile.platform(), profile.vendor.as_str()))
            .unwrap_or(("unknown", "unknown"));
        NodeDetails {
            ip: self
                .map
                .router_id_of(host)
                .map(|rid| rid.to_string())
                .unwrap_or_default(),
            platform: platform.to_string(),
            vendor: vendor.to_string(),
            inferred: false,
            is_unmapped: false,
        }
    }

    /// Interface on `remote_host` that faces `link.local_host`, or `"unknown"`.
    fn remote_interface(&self, link: &Link, remote_host: &str) -> String {
        let facing: Vec<&Link> = match self.map.router_id_of(&link.local_host) {
            Some(local_rid) => {
                let towards_local: Vec<&Link> = self
                    .store
                    .links_from(remote_host)
                    .filter(|l| &l.remote_router_id == local_rid)
                    .collect();
                if towards_local.len() > 1 {
                    towards_local
                        .into_iter()
                        .filter(|l| same_link(&l.remote_ip, &link.remote_ip))
                        .collect()
                } else {
                    towards_local
                }
            }
            None => self
                .store
                .links_from(remote_host)
                .filter(|l| same_link(&l.remote_ip, &link.remote_ip))
                .collect(),
        };

        match facing.as_slice() {
            [only] => only.local_interface.clone(),
            _ => UNKNOWN_INTERFACE.to_string(),
        }
    }
}

/// Records the connection in both hosts' peer lists.
fn connect(
    topology: &mut Topology,
    local_host: &str,
    local_interface: &str,
    remote_host: &str,
    remote_interface: &str,
) {
    let local_entry = peer_entry(topology, local_host);
    let remote_entry = peer_entry(topology, remote_host);

    if let Some(node) = topology.nodes.get_mut(local_host) {
        node.peers
            .entry(remote_host.to_string())
            .or_insert(remote_entry)
            .add_connection(local_interface, remote_interface);
    }
    if let Some(node) = topology.nodes.get_mut(remote_host) {
        node.peers
            .entry(local_host.to_string())
            .or_insert(local_entry)
            .add_connection(remote_interface, local_interface);
    }
}

fn peer_entry(topology: &Topology, host: &str) -> PeerEntry {
    let details = topology
        .get(host)
        .map(|node| &node.node_details)
        .cloned()
        .unwrap_or_default();
    PeerEntry {
        ip: details.ip,
        platform: details.platform,
        connections: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::router::RouterId,
        parsers::{OspfVersion, Vendor},
    };

    fn link(host: &str, interface: &str, rid: &str, ip: &str) -> Link {
        Link {
            local_host: host.to_string(),
            local_interface: interface.to_string(),
            remote_router_id: rid.parse().unwrap(),
            remote_ip: ip.to_string(),
            area: String::new(),
            state: "FULL".to_string(),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> RouterIdMap {
        let mut map = RouterIdMap::new();
        for (rid, host) in pairs {
            map.insert(rid.parse::<RouterId>().unwrap(), host);
        }
        map
    }

    fn profiles(hosts: &[&str]) -> BTreeMap<Hostname, DeviceProfile> {
        hosts
            .iter()
            .map(|h| {
                (
                    h.to_string(),
                    DeviceProfile {
                        vendor: Vendor::Juniper,
                        version: OspfVersion::V2,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_both_ends_resolved() {
        let store = LinkStore::from_links(vec![
            link("R1", "ge-0/0/0", "2.2.2.2", "10.0.12.2"),
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
        ]);
        let map = map(&[("1.1.1.1", "R1"), ("2.2.2.2", "R2")]);
        let profiles = profiles(&["R1", "R2"]);
        let topology = TopologyAssembler::new(&store, &map, &profiles).assemble();

        let r1 = topology.get("R1").unwrap();
        assert_eq!(r1.node_details.ip, "1.1.1.1");
        assert_eq!(r1.node_details.platform, "juniper_junos");
        assert_eq!(r1.peers["R2"].ip, "2.2.2.2");
        assert_eq!(
            r1.peers["R2"].connections,
            vec![["ge-0/0/0".to_string(), "ge-0/0/1".to_string()]]
        );
        let r2 = topology.get("R2").unwrap();
        assert_eq!(
            r2.peers["R1"].connections,
            vec![["ge-0/0/1".to_string(), "ge-0/0/0".to_string()]]
        );
    }

    #[test]
    fn test_parallel_links_resolved_by_subnet() {
        let store = LinkStore::from_links(vec![
            link("R1", "ge-0/0/0", "2.2.2.2", "10.0.12.2"),
            link("R1", "ge-0/0/1", "2.2.2.2", "10.0.21.2"),
            link("R2", "xe-0/0/0", "1.1.1.1", "10.0.12.1"),
            link("R2", "xe-0/0/1", "1.1.1.1", "10.0.21.1"),
        ]);
        let map = map(&[("1.1.1.1", "R1"), ("2.2.2.2", "R2")]);
        let topology = TopologyAssembler::new(&store, &map, &BTreeMap::new()).assemble();

        let connections = &topology.get("R1").unwrap().peers["R2"].connections;
        assert_eq!(
            connections,
            &vec![
                ["ge-0/0/0".to_string(), "xe-0/0/0".to_string()],
                ["ge-0/0/1".to_string(), "xe-0/0/1".to_string()],
            ]
        );
        assert_eq!(topology.get("R1").unwrap().node_details.vendor, "unknown");
    }

    #[test]
    fn test_unmapped_router_id_becomes_pseudo_host() {
        let store = LinkStore::from_links(vec![link("R1", "ge-0/0/2", "9.9.9.9", "10.0.19.9")]);
        let map = map(&[("1.1.1.1", "R1")]);
        let topology = TopologyAssembler::new(&store, &map, &BTreeMap::new()).assemble();

        let pseudo = topology.get("9.9.9.9").unwrap();
        assert!(pseudo.node_details.inferred);
        assert!(pseudo.node_details.is_unmapped);
        assert_eq!(
            pseudo.peers["R1"].connections,
            vec![["unknown".to_string(), "ge-0/0/2".to_string()]]
        );
        assert_eq!(
            topology.get("R1").unwrap().peers["9.9.9.9"].connections,
            vec![["ge-0/0/2".to_string(), "unknown".to_string()]]
        );
    }

    #[test]
    fn test_unresolved_local_router_id_uses_subnet() {
        // R2's own router-id is unknown, but R1 is mapped and faces R2 on 10.0.12.0/24.
        let store = LinkStore::from_links(vec![
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
            link("R1", "ge-0/0/0", "7.7.7.7", "10.0.12.2"),
            link("R1", "ge-0/0/3", "8.8.8.8", "10.0.18.8"),
        ]);
        let map = map(&[("1.1.1.1", "R1")]);
        let topology = TopologyAssembler::new(&store, &map, &BTreeMap::new()).assemble();

        let r2 = topology.get("R2").unwrap();
        assert_eq!(r2.node_details.ip, "");
        assert_eq!(
            r2.peers["R1"].connections,
            vec![["ge-0/0/1".to_string(), "ge-0/0/0".to_string()]]
        );
    }

    #[test]
    fn test_every_link_is_represented() {
        let links = vec![
            link("R1", "ge-0/0/0", "2.2.2.2", "10.0.12.2"),
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
            link("R2", "ge-0/0/2", "3.3.3.3", "10.0.23.3"),
            link("R3", "Et1", "2.2.2.2", "10.0.23.2"),
            link("R3", "Et2", "6.6.6.6", "10.0.36.6"),
        ];
        let store = LinkStore::from_links(links.clone());
        let map = map(&[("1.1.1.1", "R1"), ("2.2.2.2", "R2"), ("3.3.3.3", "R3")]);
        let topology = TopologyAssembler::new(&store, &map, &BTreeMap::new()).assemble();

        for l in &links {
            let node = topology.get(&l.local_host).unwrap();
            let represented = node
                .peers
                .values()
                .any(|peer| peer.connections.iter().any(|[local, _]| local == &l.local_interface));
            assert!(represented, "{} {} lost", l.local_host, l.local_interface);
        }
    }
}
