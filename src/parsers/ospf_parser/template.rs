//! Neighbor-table templates.
//!
//! Each template recognizes one vendor command by its column header and turns every
//! table row into a field record keyed by TextFSM-style upper-case names. Continuation
//! patterns add fields printed on the lines following a row (Junos prints the OSPFv3
//! neighbor address and, in detail output, the area that way).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::parsers::{OspfVersion, Vendor};

/// One parsed table row: field name to captured text.
pub type FieldRecord = BTreeMap<String, String>;

const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";
const STATE: &str = r"(?P<STATE>[A-Za-z0-9-]+)(?:/\s*(?P<ROLE>[A-Za-z-]*))?";

pub struct NeighborTemplate {
    pub name: &'static str,
    pub vendor: Vendor,
    pub version: OspfVersion,
    header: Regex,
    row: Regex,
    continuations: Vec<Regex>,
}

impl NeighborTemplate {
    fn new(
        name: &'static str,
        vendor: Vendor,
        version: OspfVersion,
        header: &str,
        row: &str,
        continuations: &[&str],
    ) -> Self {
        Self {
            name,
            vendor,
            version,
            header: compile(&format!("(?m){header}")),
            row: compile(row),
            continuations: continuations.iter().map(|c| compile(c)).collect(),
        }
    }

    /// True when the capture contains this template's column header.
    pub fn matches(&self, text: &str) -> bool {
        self.header.is_match(text)
    }

    /// Parses every row of the capture. Lines matching neither a row nor a continuation are ignored.
    pub fn parse(&self, text: &str) -> Vec<FieldRecord> {
        let mut records: Vec<FieldRecord> = Vec::new();
        for line in text.lines() {
            if let Some(caps) = self.row.captures(line) {
                records.push(capture_fields(&self.row, &caps));
                continue;
            }
            let Some(last) = records.last_mut() else {
                continue;
            };
            for continuation in &self.continuations {
                if let Some(caps) = continuation.captures(line) {
                    last.extend(capture_fields(continuation, &caps));
                }
            }
        }
        records
    }
}

fn compile(pattern: &str) -> Regex {
    let expanded = pattern.replace("{IPV4}", IPV4).replace("{STATE}", STATE);
    Regex::new(&expanded).expect("built-in neighbor template must compile")
}

fn capture_fields(regex: &Regex, caps: &Captures) -> FieldRecord {
    regex
        .capture_names()
        .flatten()
        .filter_map(|name| {
            caps.name(name)
                .map(|m| (name.to_string(), m.as_str().to_string()))
        })
        .collect()
}

static TEMPLATES: Lazy<Vec<NeighborTemplate>> = Lazy::new(|| {
    vec![
        NeighborTemplate::new(
            "cisco_ios_show_ip_ospf_neighbor",
            Vendor::Cisco,
            OspfVersion::V2,
            r"^\s*Neighbor ID\s+Pri\s+State\s+Dead Time\s+Address\s+Interface\s*$",
            r"^\s*(?P<NEIGHBOR_ID>{IPV4})\s+(?P<PRIORITY>\d+)\s+{STATE}\s+(?P<DEAD_TIME>\S+)\s+(?P<ADDRESS>\S+)\s+(?P<INTERFACE>\S+)\s*$",
            &[],
        ),
        NeighborTemplate::new(
            "cisco_ios_show_ipv6_ospf_neighbor",
            Vendor::Cisco,
            OspfVersion::V3,
            r"^\s*Neighbor ID\s+Pri\s+State\s+Dead Time\s+Interface ID\s+Interface\s*$",
            r"^\s*(?P<NEIGHBOR_ID>{IPV4})\s+(?P<PRIORITY>\d+)\s+{STATE}\s+(?P<DEAD_TIME>\S+)\s+(?P<INTERFACE_ID>\d+)\s+(?P<INTERFACE>\S+)\s*$",
            &[],
        ),
        NeighborTemplate::new(
            "arista_eos_show_ip_ospf_neighbor",
            Vendor::Arista,
            OspfVersion::V2,
            r"^\s*Neighbor ID\s+Instance\s+VRF\s+Pri\s+State\s+Dead Time\s+Address\s+Interface\s*$",
            r"^\s*(?P<NEIGHBOR_ID>{IPV4})\s+(?P<INSTANCE>\d+)\s+(?P<VRF>\S+)\s+(?P<PRIORITY>\d+)\s+{STATE}\s+(?P<DEAD_TIME>\S+)\s+(?P<ADDRESS>\S+)\s+(?P<INTERFACE>\S+)\s*$",
            &[],
        ),
        NeighborTemplate::new(
            "juniper_junos_show_ospf_neighbor",
            Vendor::Juniper,
            OspfVersion::V2,
            r"^\s*Address\s+Interface\s+State\s+ID\s+Pri\s+Dead\s*$",
            r"^\s*(?P<ADDRESS>{IPV4})\s+(?P<INTERFACE>\S+)\s+(?P<STATE>[A-Za-z0-9-]+)\s+(?P<ID>{IPV4})\s+(?P<PRIORITY>\d+)\s+(?P<DEAD>\d+)\s*$",
            &[r"^\s+Area\s+(?P<AREA>{IPV4})\b"],
        ),
        NeighborTemplate::new(
            "juniper_junos_show_ospf3_neighbor",
            Vendor::Juniper,
            OspfVersion::V3,
            r"^\s*ID\s+Interface\s+State\s+Pri\s+Dead\s*$",
            r"^\s*(?P<ID>{IPV4})\s+(?P<INTERFACE>\S+)\s+(?P<STATE>[A-Za-z0-9-]+)\s+(?P<PRIORITY>\d+)\s+(?P<DEAD>\d+)\s*$",
            &[
                r"^\s+Neighbor-address\s+(?P<ADDRESS>\S+)",
                r"^\s+Area\s+(?P<AREA>{IPV4})\b",
            ],
        ),
    ]
});

pub fn templates() -> &'static [NeighborTemplate] {
    &TEMPLATES
}

/// Picks the first template whose header appears in the capture, restricted to one
/// OSPF version when an override is given.
pub fn detect(text: &str, protocol_override: Option<OspfVersion>) -> Option<&'static NeighborTemplate> {
    templates()
        .iter()
        .filter(|t| protocol_override.is_none_or(|version| t.version == version))
        .find(|t| t.matches(text))
}
