//! Transport and address models shared by binder clients and the registrar.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::UnknownNetId;

/// Transport identifier ("netid") as understood by the port mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NetId {
    Udp,
    Udp6,
    Tcp,
    Tcp6,
    /// Local connection-oriented, ordered-release transport.
    Ticotsord,
    /// Local connectionless transport.
    Ticlts,
}

impl NetId {
    pub const ALL: [NetId; 6] = [
        NetId::Udp,
        NetId::Udp6,
        NetId::Tcp,
        NetId::Tcp6,
        NetId::Ticotsord,
        NetId::Ticlts,
    ];

    /// The literal netid string passed to the directory service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NetId::Udp => "udp",
            NetId::Udp6 => "udp6",
            NetId::Tcp => "tcp",
            NetId::Tcp6 => "tcp6",
            NetId::Ticotsord => "ticotsord",
            NetId::Ticlts => "ticlts",
        }
    }

    #[must_use]
    pub const fn family(self) -> AddressFamily {
        match self {
            NetId::Udp | NetId::Tcp => AddressFamily::Inet,
            NetId::Udp6 | NetId::Tcp6 => AddressFamily::Inet6,
            NetId::Ticotsord | NetId::Ticlts => AddressFamily::Local,
        }
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetId {
    type Err = UnknownNetId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetId::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownNetId(s.to_owned()))
    }
}

/// Address family of a transport endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Inet,
    Inet6,
    Local,
}

/// Where a service is reachable, as handed to `register`.
///
/// Inet descriptors always carry the wildcard address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressDescriptor {
    InetV4 { port: u16 },
    InetV6 { port: u16 },
    LocalPath { path: PathBuf },
}

impl AddressDescriptor {
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        AddressDescriptor::LocalPath { path: path.into() }
    }

    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        match self {
            AddressDescriptor::InetV4 { .. } => AddressFamily::Inet,
            AddressDescriptor::InetV6 { .. } => AddressFamily::Inet6,
            AddressDescriptor::LocalPath { .. } => AddressFamily::Local,
        }
    }

    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        match self {
            AddressDescriptor::InetV4 { port } | AddressDescriptor::InetV6 { port } => Some(*port),
            AddressDescriptor::LocalPath { .. } => None,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            AddressDescriptor::LocalPath { path } => Some(path),
            AddressDescriptor::InetV4 { .. } | AddressDescriptor::InetV6 { .. } => None,
        }
    }

    /// Socket address for inet descriptors; `None` for local paths.
    #[must_use]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            AddressDescriptor::InetV4 { port } => {
                Some(SocketAddr::from((Ipv4Addr::UNSPECIFIED, *port)))
            }
            AddressDescriptor::InetV6 { port } => {
                Some(SocketAddr::from((Ipv6Addr::UNSPECIFIED, *port)))
            }
            AddressDescriptor::LocalPath { .. } => None,
        }
    }
}

impl fmt::Display for AddressDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressDescriptor::LocalPath { path } => write!(f, "{}", path.display()),
            AddressDescriptor::InetV4 { .. } | AddressDescriptor::InetV6 { .. } => {
                match self.socket_addr() {
                    Some(addr) => write!(f, "{addr}"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Port or filesystem path a binding points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindTarget {
    Port(u16),
    Path(PathBuf),
}

/// One transport a service is offered on.
///
/// Inet netids only pair with a port and local netids only with a path;
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportBinding {
    net_id: NetId,
    target: BindTarget,
}

impl TransportBinding {
    #[must_use]
    pub const fn udp(port: u16) -> Self {
        Self::inet(NetId::Udp, port)
    }

    #[must_use]
    pub const fn udp6(port: u16) -> Self {
        Self::inet(NetId::Udp6, port)
    }

    #[must_use]
    pub const fn tcp(port: u16) -> Self {
        Self::inet(NetId::Tcp, port)
    }

    #[must_use]
    pub const fn tcp6(port: u16) -> Self {
        Self::inet(NetId::Tcp6, port)
    }

    #[must_use]
    pub fn ticotsord(path: impl Into<PathBuf>) -> Self {
        Self {
            net_id: NetId::Ticotsord,
            target: BindTarget::Path(path.into()),
        }
    }

    #[must_use]
    pub fn ticlts(path: impl Into<PathBuf>) -> Self {
        Self {
            net_id: NetId::Ticlts,
            target: BindTarget::Path(path.into()),
        }
    }

    const fn inet(net_id: NetId, port: u16) -> Self {
        Self {
            net_id,
            target: BindTarget::Port(port),
        }
    }

    #[must_use]
    pub const fn net_id(&self) -> NetId {
        self.net_id
    }

    #[must_use]
    pub const fn target(&self) -> &BindTarget {
        &self.target
    }

    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        match self.target {
            BindTarget::Port(port) => Some(port),
            BindTarget::Path(_) => None,
        }
    }
}

/// A row of the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub program: u32,
    pub version: u32,
    pub net_id: NetId,
    pub address: AddressDescriptor,
    pub owner: String,
}

impl Mapping {
    /// Universal address string of this row.
    #[must_use]
    pub fn uaddr(&self) -> String {
        crate::uaddr::format(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn netid_strings_round_trip() {
        for net_id in NetId::ALL {
            assert_eq!(net_id.as_str().parse::<NetId>().unwrap(), net_id);
        }
        assert!("sctp".parse::<NetId>().is_err());
    }

    #[test]
    fn netid_families() {
        assert_eq!(NetId::Udp.family(), AddressFamily::Inet);
        assert_eq!(NetId::Tcp6.family(), AddressFamily::Inet6);
        assert_eq!(NetId::Ticlts.family(), AddressFamily::Local);
    }

    #[test]
    fn inet_bindings_carry_ports_local_bindings_carry_paths() {
        let udp = TransportBinding::udp(2049);
        assert_eq!(udp.net_id(), NetId::Udp);
        assert_eq!(udp.port(), Some(2049));

        let local = TransportBinding::ticotsord("/var/run/nfsd.sock");
        assert_eq!(local.port(), None);
        assert_eq!(
            local.target(),
            &BindTarget::Path(PathBuf::from("/var/run/nfsd.sock"))
        );
    }

    #[test]
    fn descriptor_socket_addr_is_wildcard() {
        let v4 = AddressDescriptor::InetV4 { port: 710 };
        assert_eq!(v4.socket_addr().unwrap().to_string(), "0.0.0.0:710");

        let v6 = AddressDescriptor::InetV6 { port: 904 };
        assert_eq!(v6.socket_addr().unwrap().to_string(), "[::]:904");

        assert!(AddressDescriptor::local("/tmp/x").socket_addr().is_none());
    }
}
