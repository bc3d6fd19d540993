/*!
Field-name dispatch and normalization.

Templates (built-in or an external TextFSM run) name the same logical column differently:
Cisco prints `NEIGHBOR_ID`, Junos `ID`, hand-written templates `ROUTER_ID`. A `VendorFieldMap`
declares, once per (vendor, version), which names to try for each logical field.
`NeighborRecord` applies the map to a field record and normalizes the values.
*/

use std::net::Ipv4Addr;

use crate::{
    network::{address::bare_address, link::Link, router::RouterId},
    parsers::{OspfVersion, Vendor, ospf_parser::template::FieldRecord},
};

/// Candidate field names per logical neighbor field, tried in order.
#[derive(Debug)]
pub struct VendorFieldMap {
    pub router_id: &'static [&'static str],
    pub interface: &'static [&'static str],
    pub address: &'static [&'static str],
    pub area: &'static [&'static str],
    pub state: &'static [&'static str],
}

static CISCO_STYLE_V2: VendorFieldMap = VendorFieldMap {
    router_id: &["NEIGHBOR_ID", "ROUTER_ID"],
    interface: &["INTERFACE", "LOCAL_INTERFACE"],
    address: &["ADDRESS", "NEIGHBOR_ADDRESS", "IP_ADDRESS"],
    area: &["AREA", "AREA_ID"],
    state: &["STATE"],
};

static CISCO_STYLE_V3: VendorFieldMap = VendorFieldMap {
    router_id: &["NEIGHBOR_ID", "ROUTER_ID"],
    interface: &["INTERFACE", "LOCAL_INTERFACE"],
    address: &["ADDRESS", "LINK_LOCAL_ADDRESS", "NEIGHBOR_ADDRESS"],
    area: &["AREA", "AREA_ID"],
    state: &["STATE"],
};

static JUNOS: VendorFieldMap = VendorFieldMap {
    router_id: &["ID", "NEIGHBOR_ID", "ROUTER_ID"],
    interface: &["INTERFACE"],
    address: &["ADDRESS", "NEIGHBOR_ADDRESS"],
    area: &["AREA"],
    state: &["STATE"],
};

static GENERIC: VendorFieldMap = VendorFieldMap {
    router_id: &["NEIGHBOR_ID", "ROUTER_ID", "NEIGHBOR_ROUTER_ID", "RID", "ID"],
    interface: &["INTERFACE", "LOCAL_INTERFACE", "INTF", "PORT"],
    address: &[
        "ADDRESS",
        "NEIGHBOR_ADDRESS",
        "NEIGHBOR_IP",
        "IP_ADDRESS",
        "REMOTE_IP",
        "LINK_LOCAL_ADDRESS",
    ],
    area: &["AREA", "AREA_ID"],
    state: &["STATE", "NEIGHBOR_STATE", "ADJACENCY_STATE"],
};

impl VendorFieldMap {
    pub fn for_template(vendor: Vendor, version: OspfVersion) -> &'static VendorFieldMap {
        match (vendor, version) {
            (Vendor::Cisco | Vendor::Arista, OspfVersion::V2) => &CISCO_STYLE_V2,
            (Vendor::Cisco | Vendor::Arista, OspfVersion::V3) => &CISCO_STYLE_V3,
            (Vendor::Juniper, _) => &JUNOS,
            (Vendor::Unknown, _) => &GENERIC,
        }
    }

    pub fn generic() -> &'static VendorFieldMap {
        &GENERIC
    }

    /// First non-empty value among the candidate names. Name comparison ignores case.
    fn lookup<'r>(record: &'r FieldRecord, names: &[&str]) -> Option<&'r str> {
        names.iter().find_map(|name| {
            record
                .iter()
                .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.trim().is_empty())
                .map(|(_, value)| value.as_str())
        })
    }
}

/// One neighbor entry with its logical fields resolved and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRecord {
    pub router_id: Option<RouterId>,
    pub interface: String,
    pub address: String,
    pub area: String,
    pub state: String,
}

impl NeighborRecord {
    pub fn extract(record: &FieldRecord, map: &VendorFieldMap) -> Self {
        let field = |names: &[&str]| VendorFieldMap::lookup(record, names).unwrap_or_default();
        NeighborRecord {
            router_id: field(map.router_id).parse().ok(),
            interface: normalize_interface(field(map.interface)),
            address: normalize_address(field(map.address)),
            area: normalize_area(field(map.area)),
            state: normalize_state(field(map.state)),
        }
    }

    /// Builds the link record; entries without a router-id contribute nothing.
    pub fn into_link(self, local_host: &str) -> Option<Link> {
        Some(Link {
            local_host: local_host.to_string(),
            local_interface: self.interface,
            remote_router_id: self.router_id?,
            remote_ip: self.address,
            area: self.area,
            state: self.state,
        })
    }
}

const INTERFACE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("TwentyFiveGigE", "Twe"),
    ("HundredGigE", "Hu"),
    ("FortyGigabitEthernet", "Fo"),
    ("TenGigabitEthernet", "Te"),
    ("GigabitEthernet", "Gi"),
    ("FastEthernet", "Fa"),
    ("Ethernet", "Et"),
    ("Port-channel", "Po"),
    ("Loopback", "Lo"),
    ("Serial", "Se"),
    ("Tunnel", "Tu"),
    ("Vlan", "Vl"),
];

/// Shortens long Cisco/Arista interface names; Junos names pass through.
pub fn normalize_interface(raw: &str) -> String {
    let name = raw.trim();
    for (long, short) in INTERFACE_ABBREVIATIONS {
        let Some(prefix) = name.get(..long.len()) else {
            continue;
        };
        let rest = &name[long.len()..];
        if prefix.eq_ignore_ascii_case(long) && rest.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("{short}{rest}");
        }
    }
    name.to_string()
}

pub fn normalize_address(raw: &str) -> String {
    bare_address(raw).to_ascii_lowercase()
}

/// Integer areas (`0`, `51`) become dotted-decimal; anything else is kept trimmed.
pub fn normalize_area(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(n) => Ipv4Addr::from(n).to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Upper-cases the state and drops a DR/BDR role suffix (`FULL/DR` -> `FULL`).
pub fn normalize_state(raw: &str) -> String {
    raw.split('/').next().unwrap_or_default().trim().to_ascii_uppercase()
}
