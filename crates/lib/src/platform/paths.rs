use std::path::PathBuf;

use crate::consts::{APP_NAME, ROOT_ENV};

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  env_path("USERPROFILE").unwrap_or_default()
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  env_path("HOME").unwrap_or_default()
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  env_path("APPDATA").unwrap_or_else(home_dir).join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = env_path("XDG_DATA_HOME").unwrap_or_else(|| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  env_path("LOCALAPPDATA")
    .unwrap_or_else(home_dir)
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  let cache_home = env_path("XDG_CACHE_HOME").unwrap_or_else(|| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

/// Returns the root under which packages are created by default
///
/// `TORCHPKG_ROOT` takes precedence over `<data_dir>/packages`.
pub fn packages_dir() -> PathBuf {
  env_path(ROOT_ENV).unwrap_or_else(|| data_dir().join("packages"))
}

/// Returns the parent directory for per-run build scratch directories
pub fn scratch_dir() -> PathBuf {
  cache_dir().join("build")
}
