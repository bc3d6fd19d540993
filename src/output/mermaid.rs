//! Mermaid `graph LR` rendering.
//!
//! Node ids are derived from the hostname with uuid v5 so the same device keeps the same id
//! across runs and hostnames with punctuation never leak into Mermaid syntax.

use std::fmt::Write;

use uuid::Uuid;

use crate::network::node::Topology;

fn node_id(host: &str) -> String {
    format!("n{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, host.as_bytes()).simple())
}

fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

pub fn render_mermaid(topology: &Topology) -> String {
    let mut out = String::from("graph LR\n");

    for (host, node) in topology.iter() {
        let id = node_id(host);
        let details = &node.node_details;
        if details.is_unmapped {
            let _ = writeln!(out, "    {id}((\"{}\"))", escape(host));
        } else if details.ip.is_empty() {
            let _ = writeln!(out, "    {id}[\"{}\"]", escape(host));
        } else {
            let _ = writeln!(out, "    {id}[\"{}<br/>{}\"]", escape(host), escape(&details.ip));
        }
    }

    // Connections are stored on both ends; draw the copy held by the smaller hostname.
    for (host, peer, local, remote) in topology.edges() {
        if host > peer {
            continue;
        }
        let _ = writeln!(
            out,
            "    {} ---|\"{} - {}\"| {}",
            node_id(host),
            escape(local),
            escape(remote),
            node_id(peer)
        );
    }

    let unmapped: Vec<String> = topology
        .iter()
        .filter(|(_, node)| node.node_details.is_unmapped)
        .map(|(host, _)| node_id(host))
        .collect();
    if !unmapped.is_empty() {
        let _ = writeln!(out, "    classDef unmapped stroke-dasharray: 5 5");
        let _ = writeln!(out, "    class {} unmapped", unmapped.join(","));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::node::NodeDetails;

    fn sample() -> Topology {
        let mut topology = Topology::new();
        let r1 = NodeDetails {
            ip: "1.1.1.1".to_string(),
            ..NodeDetails::default()
        };
        topology
            .ensure_node("R1", r1)
            .peers
            .entry("9.9.9.9".to_string())
            .or_default()
            .add_connection("Gi0/2", "unknown");
        topology
            .ensure_node("9.9.9.9", NodeDetails::pseudo_host("9.9.9.9"))
            .peers
            .entry("R1".to_string())
            .or_default()
            .add_connection("unknown", "Gi0/2");
        topology
    }

    #[test]
    fn test_node_ids_are_stable() {
        assert_eq!(node_id("R1"), node_id("R1"));
        assert_ne!(node_id("R1"), node_id("R2"));
        assert!(node_id("core rtr\"1").chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_render() {
        let text = render_mermaid(&sample());
        assert!(text.starts_with("graph LR\n"));
        assert!(text.contains(&format!("{}[\"R1<br/>1.1.1.1\"]", node_id("R1"))));
        assert!(text.contains(&format!("{}((\"9.9.9.9\"))", node_id("9.9.9.9"))));
        // "9.9.9.9" < "R1", so the edge is drawn from the pseudo-host side, once.
        assert_eq!(text.matches("---|").count(), 1);
        assert!(text.contains(&format!(
            "{} ---|\"unknown - Gi0/2\"| {}",
            node_id("9.9.9.9"),
            node_id("R1")
        )));
        assert!(text.contains("class "));
    }
}
