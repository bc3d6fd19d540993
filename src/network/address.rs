/*!
Neighbor addresses and the same-link test.

A neighbor table reports the address a neighbor uses on the shared link. Two reports
taken from opposite ends of the same point-to-point link should therefore sit in the
same subnet. The capture never carries prefix lengths, so the test works on fixed
boundaries:

- IPv4: same /24, or numerically adjacent across a /24 boundary (a /31 or /30 that
  straddles an octet boundary, e.g. `10.0.0.255` and `10.0.1.0`).
- IPv6 global: same /64.
- IPv6 link-local: every link uses `fe80::/64`, so the address says nothing about which
  link it is on and the test always fails.
- Mixed families, empty or unparseable input: fails.
*/

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::{Ipv4Network, Ipv6Network};

/// Classified neighbor address as reported in a neighbor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAddress {
    V4(Ipv4Addr),
    V6Global(Ipv6Addr),
    V6LinkLocal(Ipv6Addr),
    Unknown,
}

impl LinkAddress {
    /// Classifies a raw address string. Tolerates a `/len` prefix suffix and a `%scope` zone.
    pub fn parse(raw: &str) -> Self {
        match bare_address(raw).parse::<IpAddr>() {
            Ok(IpAddr::V4(v4)) => LinkAddress::V4(v4),
            Ok(IpAddr::V6(v6)) if is_link_local(&v6) => LinkAddress::V6LinkLocal(v6),
            Ok(IpAddr::V6(v6)) => LinkAddress::V6Global(v6),
            Err(_) => LinkAddress::Unknown,
        }
    }

    /// True when the address carries subnet information the same-link test can use.
    pub fn is_geometric(&self) -> bool {
        matches!(self, LinkAddress::V4(_) | LinkAddress::V6Global(_))
    }
}

/// Strips surrounding whitespace, a `/len` suffix and a `%scope` zone (`fe80::1%ge-0/0/0.0`).
pub fn bare_address(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_zone = trimmed.split('%').next().unwrap_or_default();
    without_zone.split('/').next().unwrap_or_default()
}

fn is_link_local(addr: &Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}

/// Decides whether two independently reported addresses plausibly sit on the same link.
pub fn same_link(a: &str, b: &str) -> bool {
    same_link_addresses(LinkAddress::parse(a), LinkAddress::parse(b))
}

pub fn same_link_addresses(a: LinkAddress, b: LinkAddress) -> bool {
    match (a, b) {
        (LinkAddress::V4(a), LinkAddress::V4(b)) => same_v4_link(a, b),
        (LinkAddress::V6Global(a), LinkAddress::V6Global(b)) => Ipv6Network::new(a, 64)
            .map(|net| net.contains(b))
            .unwrap_or(false),
        _ => false,
    }
}

/// Numeric distance between two geometric addresses of the same family.
///
/// Both ends of a point-to-point link are usually numerically adjacent, so among several
/// same-link matches the closest pair is the strongest evidence.
pub fn address_distance(a: LinkAddress, b: LinkAddress) -> Option<u128> {
    match (a, b) {
        (LinkAddress::V4(a), LinkAddress::V4(b)) => {
            Some(u128::from(u32::from(a).abs_diff(u32::from(b))))
        }
        (LinkAddress::V6Global(a), LinkAddress::V6Global(b)) => {
            Some(u128::from(a).abs_diff(u128::from(b)))
        }
        _ => None,
    }
}

fn same_v4_link(a: Ipv4Addr, b: Ipv4Addr) -> bool {
    let same_slash_24 = Ipv4Network::new(a, 24)
        .map(|net| net.contains(b))
        .unwrap_or(false);
    same_slash_24 || u32::from(a).abs_diff(u32::from(b)) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_distance() {
        let d = |a: &str, b: &str| address_distance(LinkAddress::parse(a), LinkAddress::parse(b));
        assert_eq!(d("10.0.0.1", "10.0.0.2"), Some(1));
        assert_eq!(d("10.0.0.6", "10.0.0.2"), Some(4));
        assert_eq!(d("2001:db8::1", "2001:db8::3"), Some(2));
        assert_eq!(d("fe80::1", "fe80::2"), None);
        assert_eq!(d("10.0.0.1", "2001:db8::1"), None);
    }

    #[test]
    fn test_same_link_ipv4() {
        assert!(same_link("10.0.0.1", "10.0.0.2"));
        assert!(same_link("10.0.0.255", "10.0.1.0"));
        assert!(same_link("10.0.1.0", "10.0.0.255"));
        assert!(!same_link("10.0.0.1", "10.1.0.1"));
        assert!(!same_link("10.0.0.254", "10.0.1.1"));
    }

    #[test]
    fn test_same_link_ipv6() {
        assert!(!same_link("fe80::1", "fe80::2"));
        assert!(same_link("2001:db8::1", "2001:db8::2"));
        assert!(!same_link("2001:db8::1", "2001:db9::1"));
        assert!(!same_link("2001:db8::1", "fe80::1"));
    }

    #[test]
    fn test_same_link_mixed_and_garbage() {
        assert!(!same_link("10.0.0.1", "fe80::1"));
        assert!(!same_link("", "10.0.0.1"));
        assert!(!same_link("not-an-address", "10.0.0.1"));
    }

    #[test]
    fn test_parse_strips_length_and_zone() {
        assert_eq!(
            LinkAddress::parse("10.0.12.2/30"),
            LinkAddress::V4(Ipv4Addr::new(10, 0, 12, 2))
        );
        assert!(matches!(
            LinkAddress::parse("FE80::5668:A3FF:FE1E:1A01%ge-0/0/0.0"),
            LinkAddress::V6LinkLocal(_)
        ));
        assert!(LinkAddress::parse("2001:db8:0:12::2").is_geometric());
        assert!(!LinkAddress::parse("fe80::1").is_geometric());
        assert_eq!(LinkAddress::parse(""), LinkAddress::Unknown);
    }

    #[test]
    fn test_bare_address() {
        assert_eq!(bare_address(" 10.0.12.2/30 "), "10.0.12.2");
        assert_eq!(bare_address("fe80::1%ge-0/0/0.0"), "fe80::1");
        assert_eq!(bare_address("2001:db8::1/64"), "2001:db8::1");
        assert_eq!(bare_address(""), "");
    }
}
