//! Host bootstrap shared by the `pmreg` binaries.
//!
//! - [`config`]: layered application configuration (defaults, YAML, `APP__*`
//!   environment, CLI overrides) with a per-module settings bag
//! - [`host`]: logging initialization and home-directory resolution
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod host;

pub use config::{AppConfig, LoggingConfig, Section, SectionFile, ServerConfig};
pub use host::logging::{LoggingGuard, init_logging};
