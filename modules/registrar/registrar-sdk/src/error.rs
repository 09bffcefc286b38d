//! Error types for the registrar SDK

use crate::models::NetId;

/// Error returned by a [`crate::BinderClient`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinderError {
    /// The directory refused the mapping (already registered, permission
    /// denied, transport not supported).
    #[error("mapping rejected: program {program} version {version} on {net_id}")]
    Rejected {
        program: u32,
        version: u32,
        net_id: NetId,
    },

    /// Nothing to withdraw for the given program/version.
    #[error("no mapping for program {program} version {version}")]
    NotRegistered { program: u32, version: u32 },

    /// The directory service could not be reached.
    #[error("directory service unavailable: {0}")]
    Unavailable(String),
}

/// Error returned when a universal address cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UaddrError {
    #[error("universal address has no port octets: {0:?}")]
    MissingPort(String),
    #[error("invalid port octet in universal address: {0:?}")]
    InvalidPort(String),
    #[error("invalid host in universal address: {0:?}")]
    InvalidHost(String),
}

/// Error returned when parsing an unknown transport identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown netid: {0:?}")]
pub struct UnknownNetId(pub String);
