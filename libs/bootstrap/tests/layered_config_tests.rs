#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Precedence between the YAML file and `APP__*` environment overrides.

use std::fs;

use bootstrap::AppConfig;
use serde::Deserialize;
use tempfile::tempdir;
use tracing::Level;

#[derive(Debug, Default, Deserialize)]
struct Sockets {
    #[serde(default)]
    nfsd_ticlts: Option<String>,
    #[serde(default)]
    mountd_ticlts: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Registrar {
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    local_transports: Sockets,
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("pmreg.yaml");
    let yaml = format!(
        r#"
server:
  home_dir: "{home}"
logging:
  default:
    console_level: warn
    file: ""
modules:
  registrar:
    owner: superuser
    local_transports:
      mountd_ticlts: /var/run/mountd.ticlts
"#,
        home = dir.join("home").display()
    );
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn yaml_values_are_loaded() {
    let tmp = tempdir().unwrap();
    let path = write_config(tmp.path());

    let config = temp_env::with_vars_unset(
        [
            "APP__MODULES__REGISTRAR__OWNER",
            "APP__MODULES__REGISTRAR__LOCAL_TRANSPORTS__NFSD_TICLTS",
        ],
        || AppConfig::load_or_default(Some(&path)).unwrap(),
    );

    assert_eq!(config.server.home_dir, tmp.path().join("home"));
    assert_eq!(config.logging["default"].console_level, Some(Level::WARN));
    assert_eq!(config.logging["default"].file(), None);

    let registrar: Registrar = config.module_config("registrar").unwrap();
    assert_eq!(registrar.owner.as_deref(), Some("superuser"));
    assert_eq!(
        registrar.local_transports.mountd_ticlts.as_deref(),
        Some("/var/run/mountd.ticlts")
    );
    assert!(registrar.local_transports.nfsd_ticlts.is_none());
}

#[test]
fn environment_overrides_yaml() {
    let tmp = tempdir().unwrap();
    let path = write_config(tmp.path());

    let config = temp_env::with_vars(
        [
            ("APP__MODULES__REGISTRAR__OWNER", Some("daemon")),
            (
                "APP__MODULES__REGISTRAR__LOCAL_TRANSPORTS__NFSD_TICLTS",
                Some("/run/nfsd.sock"),
            ),
        ],
        || AppConfig::load_layered(&path).unwrap(),
    );

    let registrar: Registrar = config.module_config("registrar").unwrap();
    assert_eq!(registrar.owner.as_deref(), Some("daemon"));
    assert_eq!(
        registrar.local_transports.nfsd_ticlts.as_deref(),
        Some("/run/nfsd.sock")
    );
    assert_eq!(
        registrar.local_transports.mountd_ticlts.as_deref(),
        Some("/var/run/mountd.ticlts")
    );
}

#[test]
fn cli_verbosity_applies_after_file() {
    let tmp = tempdir().unwrap();
    let path = write_config(tmp.path());

    let mut config = AppConfig::load_layered(&path).unwrap();
    config.apply_cli_overrides(1);

    assert_eq!(config.logging["default"].console_level, Some(Level::DEBUG));
}

#[test]
fn malformed_yaml_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("broken.yaml");
    fs::write(&path, "server: [unclosed\n").unwrap();

    let err = AppConfig::load_layered(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.yaml"));
}

#[test]
fn environment_applies_without_config_file() {
    let tmp = tempdir().unwrap();

    let config = temp_env::with_vars(
        [
            ("HOME", Some(tmp.path().to_str().unwrap())),
            ("APP__MODULES__REGISTRAR__OWNER", Some("daemon")),
            (
                "APP__MODULES__REGISTRAR__LOCAL_TRANSPORTS__NFSD_TICLTS",
                Some("/run/nfsd.sock"),
            ),
        ],
        || AppConfig::load_or_default(None).unwrap(),
    );

    assert_eq!(config.server.home_dir, tmp.path().join(".pmreg"));
    let registrar: Registrar = config.module_config("registrar").unwrap();
    assert_eq!(registrar.owner.as_deref(), Some("daemon"));
    assert_eq!(
        registrar.local_transports.nfsd_ticlts.as_deref(),
        Some("/run/nfsd.sock")
    );
    assert!(registrar.local_transports.mountd_ticlts.is_none());
}
