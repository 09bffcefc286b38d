mod home_dir;

pub use home_dir::{HomeDirError, default_home_dir, expand_tilde, normalize_path, resolve_under};
