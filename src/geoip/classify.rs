//! Internal-network classification.
//!
//! Loopback, RFC 1918, carrier-grade NAT (used by Tailscale) and operator
//! configured IPv6 ranges are labelled without consulting the database.
//!
//! Checks run in a fixed order and the first match wins:
//! 1. configured local IPv6 ranges → LAN
//! 2. 100.64.0.0/10 → Tailscale
//! 3. 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16 → LAN
//! 4. 127.0.0.0/8, ::1 → localhost

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv6Net};

use super::types::Location;
use crate::error_handling::ConfigError;

/// Country label used for every internal address
pub const INTERNAL_NETWORK: &str = "Internal Network";
/// City label for private LAN addresses
pub const LAN: &str = "LAN";
/// City label for the carrier-grade NAT range
pub const TAILSCALE: &str = "Tailscale";
/// City label for loopback addresses
pub const LOCALHOST: &str = "localhost";

/// Operator-configured IPv6 ranges treated as the local network.
///
/// Parsed once at construction and never modified.
#[derive(Debug, Clone, Default)]
pub struct LocalRanges {
    ipv6: Vec<Ipv6Net>,
}

impl LocalRanges {
    /// Parses a comma-separated list of IPv6 CIDR blocks.
    ///
    /// Entries are trimmed and empty entries skipped. Any entry that is not a
    /// CIDR block, or is an IPv4 block, rejects the whole list.
    ///
    /// # Examples
    ///
    /// ```
    /// use geolite_service::LocalRanges;
    ///
    /// let ranges = LocalRanges::parse(" fd00::/8, ,fe80::/10 ").unwrap();
    /// assert_eq!(ranges.len(), 2);
    /// assert!(LocalRanges::parse("10.0.0.0/8").is_err());
    /// ```
    pub fn parse(setting: &str) -> Result<Self, ConfigError> {
        let mut ipv6 = Vec::new();

        for entry in setting.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let net: IpNet = entry
                .parse()
                .map_err(|e: ipnet::AddrParseError| ConfigError::InvalidIpv6Range {
                    range: entry.to_string(),
                    reason: e.to_string(),
                })?;

            match net {
                // IPv4-mapped blocks describe IPv4 space
                IpNet::V6(net) if net.network().to_ipv4_mapped().is_none() => ipv6.push(net),
                _ => {
                    return Err(ConfigError::InvalidIpv6Range {
                        range: entry.to_string(),
                        reason: "not an IPv6 range".to_string(),
                    })
                }
            }
        }

        Ok(Self { ipv6 })
    }

    /// Number of configured ranges.
    pub fn len(&self) -> usize {
        self.ipv6.len()
    }

    /// Returns `true` when no range is configured.
    pub fn is_empty(&self) -> bool {
        self.ipv6.is_empty()
    }

    /// Checks if the IPv6 address is within any configured range.
    pub fn contains(&self, ip: &Ipv6Addr) -> bool {
        self.ipv6.iter().any(|net| net.contains(ip))
    }

    /// Classifies an address, returning the synthetic label pair on a match.
    ///
    /// IPv4-mapped IPv6 addresses are classified as their IPv4 address.
    pub fn classify(&self, ip: IpAddr) -> Option<Location> {
        match ip.to_canonical() {
            IpAddr::V6(v6) => {
                if self.contains(&v6) {
                    Some(internal(LAN))
                } else if v6.is_loopback() {
                    Some(internal(LOCALHOST))
                } else {
                    None
                }
            }
            IpAddr::V4(v4) => {
                if is_cgnat(v4) {
                    Some(internal(TAILSCALE))
                } else if v4.is_private() {
                    Some(internal(LAN))
                } else if v4.is_loopback() {
                    Some(internal(LOCALHOST))
                } else {
                    None
                }
            }
        }
    }

    /// String form of [`classify`](Self::classify).
    ///
    /// Empty or unparseable input is "no classification available", not an error.
    pub fn classify_str(&self, ip: &str) -> Option<Location> {
        ip.parse().ok().and_then(|ip| self.classify(ip))
    }
}

fn internal(kind: &str) -> Location {
    Location::new(INTERNAL_NETWORK, kind)
}

/// 100.64.0.0/10
fn is_cgnat(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    octets[0] == 100 && (octets[1] & 0xc0) == 64
}
