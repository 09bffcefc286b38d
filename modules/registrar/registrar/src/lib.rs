//! Port-mapper registrar
//!
//! Announces the file service (NFS), its mount service and the status
//! service (statd) to the system port mapper, after withdrawing any stale
//! registrations. The public entry point is [`Orchestrator::run`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === PUBLIC API (from SDK) ===
pub use registrar_sdk::{
    AddressDescriptor, AddressFamily, BinderClient, BinderError, Mapping, NetId,
    TransportBinding, uaddr,
};

// === MODULE DEFINITION ===
pub mod config;
pub use config::{LocalTransportsConfig, RegistrarConfig};

pub mod domain;
pub use domain::local_directory::LocalDirectory;
pub use domain::mode::Mode;
pub use domain::orchestrator::{GroupReport, Orchestrator, RunReport};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
