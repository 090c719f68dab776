//! Install-target resolution and partial-install cleanup.
//!
//! `InstallTarget` captures everything the run needs to know about the
//! destination: the canonical version name, the install prefix, and whether
//! the prefix already existed when the run started. `CleanupGuard` is the
//! single teardown routine shared by the failure branch and the interruption
//! path; it only ever removes a prefix this run would have created.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::paths::VersoPaths;

/// The resolved destination of one orchestration run.
#[derive(Debug, Clone)]
pub struct InstallTarget {
  /// The definition as given by the caller (version name or path to a
  /// definition file). Never mutated.
  pub definition: String,
  /// Leaf name of the install directory.
  pub version_name: String,
  /// `root/versions/<version_name>`.
  pub prefix: PathBuf,
  /// Whether `prefix` existed on disk at resolution time. Checked exactly
  /// once; never rechecked later in the run.
  pub preexisted: bool,
}

impl InstallTarget {
  /// Resolve the target for `definition`.
  ///
  /// The version name defaults to the final path segment of the definition;
  /// an override set by a hook script wins and is not recomputed.
  pub fn resolve(definition: &str, paths: &VersoPaths, name_override: Option<String>) -> Self {
    let version_name = name_override.unwrap_or_else(|| version_name_of(definition));
    let prefix = paths.prefix(&version_name);
    let preexisted = prefix.exists();

    debug!(
      version_name = %version_name,
      prefix = %prefix.display(),
      preexisted,
      "resolved install target"
    );

    Self {
      definition: definition.to_string(),
      version_name,
      prefix,
      preexisted,
    }
  }

  /// Whether the prefix already looks like a functional installation, i.e.
  /// its characteristic `bin/` subdirectory exists. This is the confirmation
  /// gate's check, distinct from `preexisted`.
  pub fn has_install_marker(&self) -> bool {
    self.prefix.join("bin").exists()
  }
}

/// Derive the canonical version name: the last path segment of the
/// definition.
fn version_name_of(definition: &str) -> String {
  definition
    .rsplit(['/', std::path::MAIN_SEPARATOR])
    .next()
    .unwrap_or(definition)
    .to_string()
}

/// Removes a partially created prefix on failure or interruption.
///
/// The guard is armed at creation and runs at most once; a prefix that
/// predates the run is never touched.
#[derive(Debug)]
pub struct CleanupGuard {
  prefix: PathBuf,
  preexisted: bool,
  armed: bool,
}

impl CleanupGuard {
  pub fn new(target: &InstallTarget) -> Self {
    Self {
      prefix: target.prefix.clone(),
      preexisted: target.preexisted,
      armed: true,
    }
  }

  /// Remove the prefix recursively iff this run created it. Idempotent:
  /// repeat calls and an already-missing prefix are both no-ops.
  pub fn run(&mut self) -> io::Result<()> {
    if !self.armed {
      return Ok(());
    }
    self.armed = false;

    if self.preexisted {
      debug!(prefix = %self.prefix.display(), "prefix predates this run, leaving it in place");
      return Ok(());
    }

    match fs::remove_dir_all(&self.prefix) {
      Ok(()) => {
        info!(prefix = %self.prefix.display(), "removed partially installed prefix");
        Ok(())
      }
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(err) => Err(err),
    }
  }
}
