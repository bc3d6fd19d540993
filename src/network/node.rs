/*!
Serializable topology model.

The JSON shape is consumed directly by downstream mapping tools:

```text
{
  "<hostname>": {
    "node_details": { "ip": "<router-id>", "platform": "...", "vendor": "..." },
    "peers": {
      "<peer hostname>": { "ip": "<peer router-id>", "platform": "...", "connections": [["<local if>", "<remote if>"]] }
    }
  }
}
```
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::router::Hostname;

/// Interface name recorded when the far end of a connection cannot be resolved.
pub const UNKNOWN_INTERFACE: &str = "unknown";

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDetails {
    pub ip: String,
    pub platform: String,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inferred: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unmapped: bool,
}

impl NodeDetails {
    /// Placeholder for a router-id no correlation pass could attribute to a device.
    pub fn pseudo_host(router_id: &str) -> Self {
        NodeDetails {
            ip: router_id.to_string(),
            platform: "unknown".to_string(),
            vendor: "unknown".to_string(),
            inferred: true,
            is_unmapped: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub ip: String,
    pub platform: String,
    pub connections: Vec<[String; 2]>,
}

impl PeerEntry {
    /// Adds a `[local, remote]` interface pair unless the exact pair is already present.
    pub fn add_connection(&mut self, local_interface: &str, remote_interface: &str) -> bool {
        let pair = [local_interface.to_string(), remote_interface.to_string()];
        if self.connections.contains(&pair) {
            return false;
        }
        self.connections.push(pair);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub node_details: NodeDetails,
    pub peers: BTreeMap<Hostname, PeerEntry>,
}

impl TopologyNode {
    pub fn is_inferred(&self) -> bool {
        self.node_details.inferred
    }
}

/// Hostname-keyed peer graph. Keys are sorted so output is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    pub nodes: BTreeMap<Hostname, TopologyNode>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, host: &str) -> Option<&TopologyNode> {
        self.nodes.get(host)
    }

    /// Inserts a node if missing; an existing node keeps its details and peers.
    pub fn ensure_node(&mut self, host: &str, details: NodeDetails) -> &mut TopologyNode {
        self.nodes
            .entry(host.to_string())
            .or_insert_with(|| TopologyNode {
                node_details: details,
                peers: BTreeMap::new(),
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hostname, &TopologyNode)> {
        self.nodes.iter()
    }

    /// Every directed `(host, peer, local_if, remote_if)` edge in the topology.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str, &str)> {
        self.nodes.iter().flat_map(|(host, node)| {
            node.peers.iter().flat_map(move |(peer, entry)| {
                entry.connections.iter().map(move |[local, remote]| {
                    (host.as_str(), peer.as_str(), local.as_str(), remote.as_str())
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_host_flags_serialized_only_when_set() {
        let real = NodeDetails {
            ip: "1.1.1.1".to_string(),
            platform: "juniper_junos".to_string(),
            vendor: "juniper".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&real).unwrap();
        assert!(json.get("inferred").is_none());
        assert!(json.get("is_unmapped").is_none());

        let pseudo = serde_json::to_value(NodeDetails::pseudo_host("9.9.9.9")).unwrap();
        assert_eq!(pseudo["inferred"], true);
        assert_eq!(pseudo["is_unmapped"], true);
        assert_eq!(pseudo["ip"], "9.9.9.9");
    }

    #[test]
    fn test_topology_serializes_as_hostname_map() {
        let mut topology = Topology::new();
        let node = topology.ensure_node("R1", NodeDetails::default());
        node.peers
            .entry("R2".to_string())
            .or_default()
            .add_connection("ge-0/0/0", "ge-0/0/1");

        let json = serde_json::to_value(&topology).unwrap();
        assert_eq!(
            json["R1"]["peers"]["R2"]["connections"],
            serde_json::json!([["ge-0/0/0", "ge-0/0/1"]])
        );

        let back: Topology = serde_json::from_value(json).unwrap();
        assert_eq!(back, topology);
    }

    #[test]
    fn test_add_connection_deduplicates_exact_pairs() {
        let mut peer = PeerEntry::default();
        assert!(peer.add_connection("Gi0/0", "Gi0/1"));
        assert!(!peer.add_connection("Gi0/0", "Gi0/1"));
        assert!(peer.add_connection("Gi0/1", "Gi0/1"));
        assert_eq!(peer.connections.len(), 2);
    }
}
