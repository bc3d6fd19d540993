use crate::{
    network::node::Topology,
    topology::{TopologyError, TopologyResult},
};

/// Pretty-printed topology mapping. Hostname keys come out sorted.
pub fn render_json(topology: &Topology) -> TopologyResult<String> {
    serde_json::to_string_pretty(topology)
        .map_err(|e| TopologyError::Output(format!("failed to serialize topology: {e}")))
}
