//! Filesystem layout and environment inputs.
//!
//! All environment lookups the orchestrator depends on are centralized here:
//! the root directory, the versioned install tree beneath it, the download
//! cache, and the ordered hook search path.

use std::env;
use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, ENV_HOOK_PATH, ENV_ROOT};

/// Returns the user's home directory
#[cfg(windows)]
fn home_dir() -> PathBuf {
  let userprofile = env::var("USERPROFILE").expect("USERPROFILE not set");
  PathBuf::from(userprofile)
}

/// Returns the user's home directory
#[cfg(not(windows))]
fn home_dir() -> PathBuf {
  let home = env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}

/// The verso directory layout, rooted at `$VERSO_ROOT` (default `~/.verso`).
#[derive(Debug, Clone)]
pub struct VersoPaths {
  root: PathBuf,
}

impl VersoPaths {
  /// Resolve the layout from the environment.
  pub fn from_env() -> Self {
    let root = env::var_os(ENV_ROOT)
      .map(PathBuf::from)
      .unwrap_or_else(|| home_dir().join(format!(".{APP_NAME}")));
    Self { root }
  }

  /// Create a layout rooted at an explicit directory.
  pub fn with_root(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding one subdirectory per installed version.
  pub fn versions_dir(&self) -> PathBuf {
    self.root.join("versions")
  }

  /// Install prefix for a version name. The mapping is pure: one name, one
  /// prefix.
  pub fn prefix(&self, version_name: &str) -> PathBuf {
    self.versions_dir().join(version_name)
  }

  /// Conventional download cache directory under the root.
  pub fn cache_dir(&self) -> PathBuf {
    self.root.join("cache")
  }

  /// Ordered hook directories: `$VERSO_HOOK_PATH` entries in list order,
  /// falling back to `$VERSO_ROOT/hooks`.
  pub fn hook_dirs(&self) -> Vec<PathBuf> {
    match env::var_os(ENV_HOOK_PATH) {
      Some(raw) => env::split_paths(&raw).filter(|p| !p.as_os_str().is_empty()).collect(),
      None => vec![self.root.join("hooks")],
    }
  }
}
