//! Port-mapper universal addresses.
//!
//! An inet universal address is the host followed by the port split into
//! two decimal octets, high byte first: `0.0.0.0.8.1` is port 2049 on the
//! IPv4 wildcard, `::.8.1` the same on IPv6. Local endpoints use the socket
//! path verbatim.

use std::net::{IpAddr, SocketAddr};

use crate::error::UaddrError;
use crate::models::AddressDescriptor;

/// Render a descriptor as a universal address.
#[must_use]
pub fn format(address: &AddressDescriptor) -> String {
    match (address.socket_addr(), address.path()) {
        (Some(addr), _) => format_socket_addr(addr),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => String::new(),
    }
}

/// Render an inet socket address as a universal address.
#[must_use]
pub fn format_socket_addr(addr: SocketAddr) -> String {
    let [hi, lo] = addr.port().to_be_bytes();
    format!("{}.{hi}.{lo}", addr.ip())
}

/// Parse an inet universal address.
///
/// # Errors
/// Returns `UaddrError` when the port octets are missing or out of range, or
/// the host part is not an IP address.
pub fn parse(uaddr: &str) -> Result<SocketAddr, UaddrError> {
    let missing = || UaddrError::MissingPort(uaddr.to_owned());

    let (rest, lo) = uaddr.rsplit_once('.').ok_or_else(missing)?;
    let (host, hi) = rest.rsplit_once('.').ok_or_else(missing)?;

    let octet = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| UaddrError::InvalidPort(uaddr.to_owned()))
    };
    let port = u16::from_be_bytes([octet(hi)?, octet(lo)?]);

    let ip: IpAddr = host
        .parse()
        .map_err(|_| UaddrError::InvalidHost(uaddr.to_owned()))?;

    Ok(SocketAddr::new(ip, port))
}
