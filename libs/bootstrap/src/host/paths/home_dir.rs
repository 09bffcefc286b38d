use std::{
    env,
    path::{Path, PathBuf},
};

/// Errors for resolving the home directory and paths below it
#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("HOME environment variable is not set")]
    HomeMissing,
    #[error("path '{path}' is invalid: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// User home, falling back to the working directory and then the temp dir.
#[must_use]
pub fn default_home_dir() -> PathBuf {
    env::home_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(env::temp_dir)
}

/// Expand a leading `~` or `~/` to the user home directory.
///
/// `~user` forms are not supported and are returned unchanged.
///
/// # Errors
/// Returns `HomeDirError::HomeMissing` if the home directory cannot be determined.
pub fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return env::home_dir().ok_or(HomeDirError::HomeMissing);
    }
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = env::home_dir().ok_or(HomeDirError::HomeMissing)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

/// Normalize a configured path into an absolute one.
///
/// - `~` prefix: expand to user home directory
/// - Absolute path: use as-is
/// - Other: resolve against the current directory
///
/// # Errors
/// Returns `HomeDirError` if the home directory is unknown or the current
/// directory cannot be read.
pub fn normalize_path(raw: &str) -> Result<PathBuf, HomeDirError> {
    let expanded = expand_tilde(raw)?;
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    std::path::absolute(&expanded).map_err(|source| HomeDirError::InvalidPath {
        path: raw.to_owned(),
        source,
    })
}

/// Resolve `path` against `base` unless it is already absolute.
#[must_use]
pub fn resolve_under(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
