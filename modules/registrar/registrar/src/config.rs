use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key of this module's section under `modules:` in the host config.
pub const MODULE_NAME: &str = "registrar";

/// Configuration for the registrar module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarConfig {
    /// Owner recorded for mappings held by the in-process directory.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Local-socket endpoints. Each configured path adds one registration
    /// group in full mode; an unset path means the group has no transports.
    #[serde(default)]
    pub local_transports: LocalTransportsConfig,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            local_transports: LocalTransportsConfig::default(),
        }
    }
}

fn default_owner() -> String {
    "superuser".to_owned()
}

/// Filesystem paths of the local-socket transports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalTransportsConfig {
    #[serde(default)]
    pub nfsd_ticlts: Option<PathBuf>,
    #[serde(default)]
    pub nfsd_ticotsord: Option<PathBuf>,
    #[serde(default)]
    pub mountd_ticlts: Option<PathBuf>,
    #[serde(default)]
    pub mountd_ticotsord: Option<PathBuf>,
}

impl LocalTransportsConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nfsd_ticlts.is_none()
            && self.nfsd_ticotsord.is_none()
            && self.mountd_ticlts.is_none()
            && self.mountd_ticotsord.is_none()
    }
}
