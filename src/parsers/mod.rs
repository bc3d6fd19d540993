use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod ospf_parser;

/// Network operating system family a capture was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Cisco,
    Arista,
    Juniper,
    Unknown,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Arista => "arista",
            Vendor::Juniper => "juniper",
            Vendor::Unknown => "unknown",
        }
    }

    /// Platform label in the `vendor_os` form used by the inventory database.
    pub fn platform(&self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco_ios",
            Vendor::Arista => "arista_eos",
            Vendor::Juniper => "juniper_junos",
            Vendor::Unknown => "unknown",
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OspfVersion {
    V2,
    V3,
}

impl FromStr for OspfVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "v2" | "ospfv2" => Ok(OspfVersion::V2),
            "3" | "v3" | "ospfv3" => Ok(OspfVersion::V3),
            other => Err(format!("unsupported OSPF version '{other}', expected 2 or 3")),
        }
    }
}

impl Display for OspfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OspfVersion::V2 => write!(f, "OSPFv2"),
            OspfVersion::V3 => write!(f, "OSPFv3"),
        }
    }
}

/// What is known about a device from the capture that described it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub vendor: Vendor,
    pub version: OspfVersion,
}

impl DeviceProfile {
    pub fn platform(&self) -> &'static str {
        self.vendor.platform()
    }
}
