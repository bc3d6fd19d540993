use std::{
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device name as derived from a capture filename.
pub type Hostname = String;

/// OSPF router-id as reported in a neighbor table.
///
/// OSPFv2 and OSPFv3 both use 32-bit dotted-decimal router-ids, but some platforms print
/// vendor-specific forms, so anything that is not an address is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouterId {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("router-id is empty")]
pub struct EmptyRouterId;

impl FromStr for RouterId {
    type Err = EmptyRouterId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyRouterId);
        }
        if let Ok(ipv4) = s.parse::<Ipv4Addr>() {
            Ok(RouterId::Ipv4(ipv4))
        } else if let Ok(ipv6) = s.parse::<Ipv6Addr>() {
            Ok(RouterId::Ipv6(ipv6))
        } else {
            Ok(RouterId::Other(s.to_string()))
        }
    }
}

// Router-ids are used as JSON object keys and pseudo-host names, so they serialize as plain strings.

impl Serialize for RouterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for RouterId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl RouterId {
    pub fn as_string(&self) -> String {
        match self {
            Self::Ipv4(ip) => ip.to_string(),
            Self::Ipv6(ip) => ip.to_string(),
            Self::Other(string) => string.clone(),
        }
    }
}

impl Display for RouterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
