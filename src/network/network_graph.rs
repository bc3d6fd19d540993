use std::collections::HashMap;

use petgraph::{
    Undirected,
    algo::connected_components,
    graph::{Graph, NodeIndex},
};

use crate::network::{node::Topology, router::Hostname};

/// Undirected graph view over a `Topology`, one edge per physical connection.
///
/// host_to_index maps hostnames to graph indices to allow safe lookups.
pub struct NetworkGraph {
    pub graph: Graph<Hostname, (String, String), Undirected>,
    pub host_to_index: HashMap<Hostname, NodeIndex>,
}

impl NetworkGraph {
    /// Build a new NetworkGraph from a topology.
    /// Peers that are not themselves nodes of the topology are ignored.
    pub fn build_new(topology: &Topology) -> Self {
        let mut graph = Graph::new_undirected();
        let mut host_to_index = HashMap::with_capacity(topology.len());
        for (host, _) in topology.iter() {
            let index = graph.add_node(host.clone());
            host_to_index.insert(host.clone(), index);
        }

        // Each connection is stored on both ends, so only take the copy held by the smaller hostname.
        for (host, peer, local, remote) in topology.edges() {
            if host > peer {
                continue;
            }
            if let (Some(&a), Some(&b)) = (host_to_index.get(host), host_to_index.get(peer)) {
                graph.add_edge(a, b, (local.to_string(), remote.to_string()));
            }
        }

        Self {
            graph,
            host_to_index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Number of connections terminating on a host.
    pub fn degree(&self, host: &str) -> usize {
        self.host_to_index
            .get(host)
            .map(|&index| self.graph.edges(index).count())
            .unwrap_or(0)
    }

    /// Hosts without any connection, sorted.
    pub fn isolated_hosts(&self) -> Vec<&Hostname> {
        let mut isolated: Vec<&Hostname> = self
            .graph
            .node_indices()
            .filter(|&index| self.graph.edges(index).next().is_none())
            .map(|index| &self.graph[index])
            .collect();
        isolated.sort();
        isolated
    }
}
