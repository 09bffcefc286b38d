#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for universal address formatting and parsing

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use registrar_sdk::{AddressDescriptor, UaddrError, uaddr};

#[test]
fn test_format_ipv4_wildcard() {
    let addr = AddressDescriptor::InetV4 { port: 2049 };
    assert_eq!(uaddr::format(&addr), "0.0.0.0.8.1");
}

#[test]
fn test_format_ipv6_wildcard() {
    let addr = AddressDescriptor::InetV6 { port: 32767 };
    assert_eq!(uaddr::format(&addr), "::.127.255");
}

#[test]
fn test_format_local_path_is_verbatim() {
    let addr = AddressDescriptor::local("/var/run/nfsd.ticotsord");
    assert_eq!(uaddr::format(&addr), "/var/run/nfsd.ticotsord");
}

#[test]
fn test_parse_ipv4() {
    let parsed = uaddr::parse("127.0.0.1.3.132").unwrap();
    assert_eq!(
        parsed,
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 900)
    );
}

#[test]
fn test_parse_ipv6() {
    let parsed = uaddr::parse("::.3.127").unwrap();
    assert_eq!(
        parsed,
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 895)
    );
}

#[test]
fn test_parse_rejects_missing_port() {
    assert!(matches!(
        uaddr::parse("localhost"),
        Err(UaddrError::MissingPort(_))
    ));
    assert!(matches!(uaddr::parse("8.1"), Err(UaddrError::MissingPort(_))));
}

#[test]
fn test_parse_rejects_out_of_range_octet() {
    assert!(matches!(
        uaddr::parse("0.0.0.0.256.1"),
        Err(UaddrError::InvalidPort(_))
    ));
}

#[test]
fn test_parse_rejects_bad_host() {
    assert!(matches!(
        uaddr::parse("not-a-host.8.1"),
        Err(UaddrError::InvalidHost(_))
    ));
}
