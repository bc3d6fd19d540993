use std::{fmt::Write, time::SystemTime};

use crate::{
    network::network_graph::NetworkGraph,
    topology::{TopologyBuild, correlation::Pass},
};

/// Plain-text report of one build.
pub fn render_summary(build: &TopologyBuild, generated_at: SystemTime) -> String {
    let topology = &build.topology;
    let correlation = &build.correlation;
    let graph = NetworkGraph::build_new(topology);
    let mut out = String::new();

    let _ = writeln!(out, "OSPF topology summary");
    let _ = writeln!(
        out,
        "Generated: {}",
        humantime::format_rfc3339_seconds(generated_at)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Devices captured:     {}", build.device_count);
    let _ = writeln!(out, "Links reported:       {}", build.link_count);
    let _ = writeln!(out, "Router-ids mapped:    {}", correlation.map.len());
    let _ = writeln!(out, "Router-ids unmapped:  {}", correlation.unmapped.len());
    let _ = writeln!(out, "Topology nodes:       {}", graph.node_count());
    let _ = writeln!(out, "Connections:          {}", graph.edge_count());
    let _ = writeln!(out, "Connected components: {}", graph.component_count());

    let _ = writeln!(out);
    let _ = writeln!(out, "Assignments by pass:");
    for pass in Pass::ALL {
        let _ = writeln!(out, "  {:<24}{}", pass.label(), correlation.count_for(pass));
    }
    for pass in &correlation.capped {
        let _ = writeln!(out, "  warning: {} stopped at the iteration cap", pass.label());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Peers:");
    for (host, node) in topology.iter().filter(|(_, node)| !node.is_inferred()) {
        let details = &node.node_details;
        let ip = if details.ip.is_empty() {
            "router-id unknown"
        } else {
            details.ip.as_str()
        };
        let _ = writeln!(
            out,
            "  {host} ({ip}, {}, {} connections)",
            details.platform,
            graph.degree(host)
        );
        for (peer, entry) in &node.peers {
            for [local, remote] in &entry.connections {
                let _ = writeln!(out, "    {local} -> {peer} {remote}");
            }
        }
    }

    let isolated = graph.isolated_hosts();
    if !isolated.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Isolated hosts:");
        for host in isolated {
            let _ = writeln!(out, "  {host}");
        }
    }

    if !correlation.unmapped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Unmapped router-ids:");
        for rid in &correlation.unmapped {
            let rid = rid.to_string();
            let reporters: Vec<&str> = topology
                .get(&rid)
                .map(|node| node.peers.keys().map(String::as_str).collect())
                .unwrap_or_default();
            let _ = writeln!(out, "  {rid} (reported by {})", reporters.join(", "));
        }
    }
    out
}
