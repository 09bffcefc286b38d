//! Layered application configuration.
//!
//! Loading order is defaults, then the YAML file, then `APP__*` environment
//! variables (`__` separates nesting levels), then command-line overrides.
//! Typed global sections sit next to a free-form `modules` bag that each
//! module parses into its own config type.

use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::host::{default_home_dir, normalize_path};

/// Environment prefix for overrides, e.g. `APP__SERVER__HOME_DIR`.
pub const ENV_PREFIX: &str = "APP__";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default = "default_logging_config")]
    pub logging: LoggingConfig,
    /// Directory of per-module YAML files, merged into `modules` by file stem.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: `module_name` → arbitrary YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: default_logging_config(),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base for relative log paths; normalized to an absolute path on load.
    pub home_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir().join(".pmreg"),
        }
    }
}

impl ServerConfig {
    fn normalize_home_dir_inplace(&mut self) -> Result<()> {
        self.home_dir = normalize_path(
            self.home_dir
                .to_str()
                .context("home directory configuration is not a valid path")?,
        )
        .context("home_dir normalization failed")?;

        std::fs::create_dir_all(&self.home_dir).context("Failed to create home_dir")?;

        Ok(())
    }
}

/// Logging configuration: target prefix → sink settings.
/// Key "default" is the catch-all for records no other key matches.
pub type LoggingConfig = HashMap<String, Section>;

// Optional level that also accepts "off"
mod optional_level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    #[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(level: &Option<Level>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(level.as_ref().map_or("off", Level::as_str))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(None),
            other => other
                .parse::<Level>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid level: {s}"))),
        }
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn default() -> Option<Level> {
        Some(Level::INFO)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SectionFile {
    pub file: String,
    #[serde(
        default = "optional_level_serde::default",
        with = "optional_level_serde"
    )]
    pub file_level: Option<Level>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Section {
    #[serde(
        default = "optional_level_serde::default",
        with = "optional_level_serde"
    )]
    pub console_level: Option<Level>,
    #[serde(flatten)]
    pub section_file: Option<SectionFile>,
    /// Age-based retention, used when `max_backups` is unset.
    #[serde(default)]
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Section {
    /// Log file path, if a non-empty one is configured.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.section_file
            .as_ref()
            .map(|f| f.file.as_str())
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn file_level(&self) -> Option<Level> {
        self.section_file.as_ref().and_then(|f| f.file_level)
    }
}

#[must_use]
pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        "default".to_owned(),
        Section {
            console_level: Some(Level::INFO),
            section_file: Some(SectionFile {
                file: "logs/pmreg.log".to_owned(),
                file_level: Some(Level::DEBUG),
            }),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed, a value has the wrong
    /// shape, or `home_dir` cannot be resolved.
    pub fn load_layered(config_path: &Path) -> Result<Self> {
        Self::load_from(Some(config_path))
    }

    /// Load configuration from `config_path`, or from defaults and the
    /// environment when none is given.
    ///
    /// # Errors
    /// Returns an error if an explicit path is not a file, loading fails, or
    /// `home_dir` cannot be resolved.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.display()
            );
        }
        Self::load_from(config_path)
    }

    fn load_from(config_path: Option<&Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Yaml},
        };

        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: AppConfig = match config_path {
            Some(path) => figment
                .extract()
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => figment
                .extract()
                .context("Failed to load config from defaults and environment")?,
        };

        config
            .server
            .normalize_home_dir_inplace()
            .context("Failed to resolve server.home_dir")?;

        if let Some(dir) = config.modules_dir.as_ref() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Serialize configuration to YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Raise the default console level: `-v` debug, `-vv` and above trace.
    pub fn apply_cli_overrides(&mut self, verbose: u8) {
        if let Some(default_section) = self.logging.get_mut("default") {
            default_section.console_level = match verbose {
                0 => default_section.console_level,
                1 => Some(Level::DEBUG),
                _ => Some(Level::TRACE),
            };
        }
    }

    /// Parse the `modules.<name>` entry into `T`.
    ///
    /// A missing entry yields `T::default()`.
    ///
    /// # Errors
    /// Returns an error if the entry exists but does not match `T`.
    pub fn module_config<T>(&self, module_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module_name) {
            None => Ok(T::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid config for module '{module_name}'")),
        }
    }
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        if !is_yaml {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config {}", path.display()))?;
        let json: serde_json::Value = serde_saphyr::from_str(&raw)
            .with_context(|| format!("Failed to parse module config {}", path.display()))?;
        bag.insert(name.to_owned(), json);
    }
    Ok(())
}
