//! Delegation to the external build engine.
//!
//! The engine (`verso-build`) owns fetching and compiling; this module only
//! assembles its invocation, blocks until it terminates, and interprets the
//! raw exit status exactly once into a tagged [`BuildOutcome`]. Engine
//! diagnostics go to the inherited stdio streams and are never duplicated
//! here.

use std::env;
use std::io;
use std::path::Path;

use tokio::process::Command;
use tokio::signal;
use tracing::{debug, info, warn};

use crate::consts::{BUILD_COMMAND, ENV_BUILD_CACHE_PATH, ENV_BUILD_PATH, ENV_BUILD_ROOT};
use crate::install::InstallTarget;
use crate::paths::VersoPaths;

/// Caller-requested build options, forwarded to the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFlags {
  /// Keep the engine's working tree after the build.
  pub keep: bool,
  /// Forward verbose output.
  pub verbose: bool,
}

/// The interpreted result of one engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
  /// Exit status 0.
  Success,
  /// Exit status 2: the engine does not recognize the definition.
  DefinitionNotFound,
  /// Any other non-zero exit status, forwarded verbatim.
  Failed(i32),
  /// The run was interrupted while the engine was active; the child has
  /// been killed and reaped.
  Interrupted,
}

impl BuildOutcome {
  /// Interpret a raw exit code. This is the only place status numerals are
  /// compared.
  pub fn interpret(code: Option<i32>) -> Self {
    match code {
      Some(0) => BuildOutcome::Success,
      Some(2) => BuildOutcome::DefinitionNotFound,
      Some(status) => BuildOutcome::Failed(status),
      // Killed by a signal without an exit code; treat as a plain failure.
      None => BuildOutcome::Failed(1),
    }
  }
}

/// Errors spawning or waiting on the engine.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  #[error("build engine '{BUILD_COMMAND}' not found on PATH")]
  EngineNotFound,

  #[error("failed to run build engine '{BUILD_COMMAND}': {0}")]
  Io(#[from] io::Error),
}

/// Invoke the engine for the resolved target and block until it terminates.
///
/// Exactly one invocation happens per orchestration run. The engine may
/// write into the prefix and into its scratch location; neither is inspected
/// here. Ctrl-c while the engine runs kills the child and yields
/// [`BuildOutcome::Interrupted`].
pub async fn invoke(target: &InstallTarget, paths: &VersoPaths, flags: BuildFlags) -> Result<BuildOutcome, BuildError> {
  let mut keep = flags.keep;

  let mut command = Command::new(BUILD_COMMAND);

  // A build-scratch-root override relocates the working tree and implies
  // keep-mode: the caller asked for the tree to land somewhere durable.
  if let Some(build_root) = env::var_os(ENV_BUILD_ROOT) {
    let build_path = Path::new(&build_root).join(&target.version_name);
    debug!(build_path = %build_path.display(), "using build root override");
    command.env(ENV_BUILD_PATH, build_path);
    keep = true;
  }

  if env::var_os(ENV_BUILD_CACHE_PATH).is_none() {
    let cache_dir = paths.cache_dir();
    if cache_dir.is_dir() {
      debug!(cache = %cache_dir.display(), "using conventional cache directory");
      command.env(ENV_BUILD_CACHE_PATH, cache_dir);
    }
  }

  if keep {
    command.arg("--keep");
  }
  if flags.verbose {
    command.arg("--verbose");
  }
  command.arg(&target.definition).arg(&target.prefix);

  info!(
    definition = %target.definition,
    prefix = %target.prefix.display(),
    keep,
    "invoking build engine"
  );

  let mut child = command.spawn().map_err(|err| {
    if err.kind() == io::ErrorKind::NotFound {
      BuildError::EngineNotFound
    } else {
      BuildError::Io(err)
    }
  })?;

  tokio::select! {
    status = child.wait() => {
      let status = status?;
      let outcome = BuildOutcome::interpret(status.code());
      debug!(?outcome, "build engine terminated");
      Ok(outcome)
    }
    _ = signal::ctrl_c() => {
      warn!("interrupted, stopping build engine");
      // The terminal already delivered SIGINT to the foreground group; kill
      // covers detached children, then reap.
      child.kill().await?;
      Ok(BuildOutcome::Interrupted)
    }
  }
}
