/*!
Top-level topology build.

`TopologyBuilder` collects device captures and router-id seeds, then runs one build:
links -> `LinkStore` -> correlation -> assembly. A build is a pure function of what was
added; calling `build_schema` twice yields the same result.
*/

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    network::{
        link::Link,
        node::Topology,
        router::{Hostname, RouterId},
    },
    parsers::DeviceProfile,
    topology::{
        assembler::TopologyAssembler,
        correlation::{CorrelationConfig, CorrelationOutcome, correlate},
        source::{CaptureSource, DeviceCapture, RouterIdSeed, TopologyResult},
        store::LinkStore,
    },
};

/// Everything one build produced.
#[derive(Debug, Clone)]
pub struct TopologyBuild {
    pub topology: Topology,
    pub correlation: CorrelationOutcome,
    pub device_count: usize,
    pub link_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    config: CorrelationConfig,
    links: Vec<Link>,
    profiles: BTreeMap<Hostname, DeviceProfile>,
    seeds: BTreeMap<Hostname, RouterId>,
}

impl TopologyBuilder {
    pub fn new(config: CorrelationConfig) -> Self {
        TopologyBuilder {
            config,
            ..Self::default()
        }
    }

    /// Loads every capture and seed the source provides.
    pub fn from_source<S: CaptureSource>(
        source: &mut S,
        config: CorrelationConfig,
    ) -> TopologyResult<Self> {
        let mut builder = TopologyBuilder::new(config);
        for capture in source.fetch_captures()? {
            builder.add_capture(capture);
        }
        for seed in source.fetch_seeds()? {
            builder.add_seed(seed);
        }
        Ok(builder)
    }

    pub fn add_capture(&mut self, capture: DeviceCapture) {
        if let Some(existing) = self.profiles.get(&capture.hostname) {
            if *existing != capture.profile {
                warn!(
                    hostname = %capture.hostname,
                    "several captures for one device disagree on platform, keeping the first"
                );
            }
        } else {
            self.profiles
                .insert(capture.hostname.clone(), capture.profile);
        }
        self.links.extend(capture.links);
    }

    /// Records a device's own router-id. A second seed for the same host is ignored.
    pub fn add_seed(&mut self, seed: RouterIdSeed) {
        if let Some(existing) = self.seeds.get(&seed.hostname) {
            if *existing != seed.router_id {
                warn!(
                    hostname = %seed.hostname,
                    kept = %existing,
                    ignored = %seed.router_id,
                    "device has several overview router-ids"
                );
            }
            return;
        }
        self.seeds.insert(seed.hostname, seed.router_id);
    }

    pub fn device_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Correlates everything added so far and assembles the topology.
    pub fn build_schema(&self) -> TopologyBuild {
        let store = LinkStore::from_links(self.links.clone());
        let seeds: Vec<(Hostname, RouterId)> = self
            .seeds
            .iter()
            .map(|(host, rid)| (host.clone(), rid.clone()))
            .collect();
        let correlation = correlate(&store, &seeds, self.config);
        let topology = TopologyAssembler::new(&store, &correlation.map, &self.profiles).assemble();

        info!(
            devices = self.profiles.len(),
            links = store.len(),
            mapped = correlation.map.len(),
            unmapped = correlation.unmapped.len(),
            nodes = topology.len(),
            "topology built"
        );

        TopologyBuild {
            topology,
            correlation,
            device_count: self.profiles.len(),
            link_count: store.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parsers::{OspfVersion, Vendor, ospf_parser::source::CaptureDirectory},
        topology::correlation::Pass,
    };

    const LAB: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/lab");

    fn link(host: &str, interface: &str, rid: &str, ip: &str) -> Link {
        Link {
            local_host: host.to_string(),
            local_interface: interface.to_string(),
            remote_router_id: rid.parse().unwrap(),
            remote_ip: ip.to_string(),
            area: "0.0.0.0".to_string(),
            state: "FULL".to_string(),
        }
    }

    fn capture(host: &str, links: Vec<Link>) -> DeviceCapture {
        DeviceCapture {
            hostname: host.to_string(),
            profile: DeviceProfile {
                vendor: Vendor::Juniper,
                version: OspfVersion::V2,
            },
            links,
        }
    }

    fn three_routers() -> TopologyBuilder {
        let mut builder = TopologyBuilder::new(CorrelationConfig::default());
        builder.add_capture(capture(
            "R1",
            vec![link("R1", "ge-0/0/0", "2.2.2.2", "10.0.12.2")],
        ));
        builder.add_capture(capture(
            "R2",
            vec![
                link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
                link("R2", "ge-0/0/2", "3.3.3.3", "10.0.23.3"),
            ],
        ));
        builder.add_capture(capture(
            "R3",
            vec![link("R3", "ge-0/0/0", "2.2.2.2", "10.0.23.2")],
        ));
        builder
    }

    fn pair(local: &str, remote: &str) -> [String; 2] {
        [local.to_string(), remote.to_string()]
    }

    #[test]
    fn test_three_router_chain() {
        let topology = three_routers().build_schema().topology;
        assert_eq!(topology.len(), 3);

        let r1 = topology.get("R1").unwrap();
        assert_eq!(r1.node_details.ip, "1.1.1.1");
        assert_eq!(r1.peers["R2"].connections, vec![pair("ge-0/0/0", "ge-0/0/1")]);

        let r2 = topology.get("R2").unwrap();
        assert_eq!(r2.peers["R1"].connections, vec![pair("ge-0/0/1", "ge-0/0/0")]);
        assert_eq!(r2.peers["R3"].connections, vec![pair("ge-0/0/2", "ge-0/0/0")]);

        let r3 = topology.get("R3").unwrap();
        assert_eq!(r3.peers["R2"].connections, vec![pair("ge-0/0/0", "ge-0/0/2")]);
    }

    #[test]
    fn test_output_is_symmetric() {
        let build = three_routers().build_schema();
        let topology = &build.topology;
        for (host, node) in topology.iter().filter(|(_, n)| !n.is_inferred()) {
            for (peer, entry) in &node.peers {
                let back = &topology.get(peer).unwrap().peers[host.as_str()];
                for [local, remote] in &entry.connections {
                    assert!(
                        back.connections.contains(&pair(remote, local)),
                        "{host}:{local} -> {peer}:{remote} has no reverse"
                    );
                }
            }
        }
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = three_routers();
        let first = builder.build_schema();
        let second = builder.build_schema();
        assert_eq!(first.topology, second.topology);
        assert_eq!(first.correlation.map, second.correlation.map);
    }

    #[test]
    fn test_seed_is_kept_and_duplicates_ignored() {
        let mut builder = three_routers();
        builder.add_seed(RouterIdSeed {
            hostname: "R1".to_string(),
            router_id: "1.1.1.1".parse().unwrap(),
        });
        builder.add_seed(RouterIdSeed {
            hostname: "R1".to_string(),
            router_id: "10.10.10.10".parse().unwrap(),
        });
        let build = builder.build_schema();
        assert_eq!(build.correlation.count_for(Pass::Seed), 1);
        assert_eq!(build.topology.get("R1").unwrap().node_details.ip, "1.1.1.1");
    }

    #[test]
    fn test_lab_captures_end_to_end() {
        let mut source = CaptureDirectory::new(format!("{LAB}/neighbors"))
            .with_overviews(format!("{LAB}/overview"));
        let builder = TopologyBuilder::from_source(&mut source, CorrelationConfig::default()).unwrap();
        assert_eq!(builder.device_count(), 4);
        assert_eq!(builder.link_count(), 7);

        let build = builder.build_schema();
        let topology = &build.topology;
        assert_eq!(
            topology.nodes.keys().collect::<Vec<_>>(),
            vec!["9.9.9.9", "R1", "R2", "R3", "R4"]
        );

        let r1 = topology.get("R1").unwrap();
        assert_eq!(r1.node_details.platform, "cisco_ios");
        assert_eq!(r1.peers["R2"].connections, vec![pair("Gi0/0", "ge-0/0/0.0")]);
        assert_eq!(r1.peers["9.9.9.9"].connections, vec![pair("Gi0/2", "unknown")]);

        let r3 = topology.get("R3").unwrap();
        assert_eq!(r3.node_details.vendor, "arista");
        assert_eq!(r3.peers["R4"].connections, vec![pair("Et2", "eth0")]);

        let r4 = topology.get("R4").unwrap();
        assert_eq!(r4.node_details.ip, "4.4.4.4");
        assert_eq!(r4.node_details.platform, "unknown");

        let pseudo = topology.get("9.9.9.9").unwrap();
        assert!(pseudo.node_details.is_unmapped);
        assert_eq!(
            build.correlation.unmapped.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["9.9.9.9"]
        );
    }
}
