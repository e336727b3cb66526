//! Picks the address printed at startup so operators know where to point a
//! browser. It has no effect on what the listener binds to.

use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("failed to enumerate network interfaces: {0}")]
    Interfaces(#[from] std::io::Error),

    #[error("no non-loopback IPv4 address found")]
    NoCandidate,
}

/// Last non-loopback IPv4 address among the host's interfaces.
pub fn resolve_advertised_address() -> Result<Ipv4Addr, AddressError> {
    let interfaces = if_addrs::get_if_addrs()?;
    last_non_loopback_ipv4(interfaces.iter().map(|iface| iface.ip()))
        .ok_or(AddressError::NoCandidate)
}

// The last match wins, not the first.
pub fn last_non_loopback_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs
        .into_iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
            _ => None,
        })
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn last_candidate_wins() {
        let addrs = [
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)),
            IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
            IpAddr::V4(Ipv4Addr::new(127, 0, 1, 1)),
        ];
        assert_eq!(last_non_loopback_ipv4(addrs), Some(Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[test]
    fn loopback_and_v6_only_is_none() {
        let addrs = [
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
        ];
        assert_eq!(last_non_loopback_ipv4(addrs), None);
    }
}
