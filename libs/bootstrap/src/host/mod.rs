pub mod logging;
pub mod paths;

pub use paths::{HomeDirError, default_home_dir, expand_tilde, normalize_path, resolve_under};
