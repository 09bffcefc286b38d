//! Registrar SDK - contract for talking to an RPC port mapper
//!
//! This crate holds everything a caller needs to announce RPC services to a
//! port mapper (binder) without depending on the registrar's policy:
//!
//! - **Binder contract**: the [`BinderClient`] trait with its two calls,
//!   `register` and `unregister`
//! - **Transport models**: [`NetId`], [`TransportBinding`], [`AddressDescriptor`]
//! - **Directory rows**: [`Mapping`] as returned by a directory dump
//! - **Universal addresses**: [`uaddr`] formatting and parsing
//!
//! Concrete binder clients (system libraries, in-process directories) live
//! outside this crate. Any platform-specific linkage detail, such as prefixed
//! symbol names of the system RPC library, stays inside those implementations.

#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod models;
pub mod uaddr;

pub use api::BinderClient;
pub use error::{BinderError, UaddrError, UnknownNetId};
pub use models::{
    AddressDescriptor, AddressFamily, BindTarget, Mapping, NetId, TransportBinding,
};
