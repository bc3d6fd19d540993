use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::router::RouterId;

/// Patterns that print the device's own router-id, most specific first.
///
/// - Cisco IOS / Arista EOS `show ip ospf`, `show ipv6 ospf`:
///   `Routing Process "ospf 1" with ID 1.1.1.1`
/// - Cisco OSPFv3 banners: `OSPFv3 Router with ID (1.1.1.1) (Process ID 1)`
/// - Junos `show ospf overview`, `show ospf3 overview`: `Router ID: 1.1.1.1`
static ROUTER_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?m)Routing Process "[^"]*" with ID (?P<ROUTER_ID>\d{1,3}(?:\.\d{1,3}){3})"#,
        r"(?m)Router with ID \((?P<ROUTER_ID>\d{1,3}(?:\.\d{1,3}){3})\)",
        r"(?mi)^\s*Router ID:?\s+(?P<ROUTER_ID>\d{1,3}(?:\.\d{1,3}){3})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("built-in overview pattern must compile"))
    .collect()
});

/// Extracts the device's own router-id from an overview capture.
pub fn parse_router_id(text: &str) -> Option<RouterId> {
    ROUTER_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.name("ROUTER_ID"))
            .and_then(|m| m.as_str().parse().ok())
    })
}
