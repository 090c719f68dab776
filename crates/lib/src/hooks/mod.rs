//! Lua hook discovery and execution.
//!
//! Hook units are Lua scripts discovered from an ordered list of hook
//! directories. Each script executes once at discovery time with the `verso`
//! global in scope (see `globals`); through it the script appends callbacks
//! to the before/after phase and may override the derived version name
//! before installation begins.
//!
//! Phases run callbacks in registration order, synchronously, all against
//! one shared mutable context table: a later callback observes mutations
//! made by an earlier one.

mod globals;

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use crate::install::InstallTarget;

/// Errors from hook discovery or execution.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
  /// Lua runtime setup error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// A hook directory or script could not be read.
  #[error("cannot read hooks from '{path}': {source}")]
  Scan { path: PathBuf, source: io::Error },

  /// A hook script failed while executing at discovery time.
  #[error("hook script '{path}' failed: {source}")]
  Script { path: PathBuf, source: LuaError },

  /// A registered callback failed.
  #[error("{phase} hook from '{path}' failed: {source}")]
  Callback {
    phase: &'static str,
    path: PathBuf,
    source: LuaError,
  },
}

/// One registered callback and the script that registered it.
#[derive(Debug, Clone)]
pub struct Hook {
  callback: LuaFunction,
  source: PathBuf,
}

/// Mutable state shared between Rust and the registrar globals.
#[derive(Debug, Default)]
struct HookState {
  before: Vec<Hook>,
  after: Vec<Hook>,
  version_name: Option<String>,
  /// Script currently executing at discovery time, for provenance.
  current_script: Option<PathBuf>,
}

/// The hook runtime for one orchestration run.
///
/// Owns the Lua instance so that registered callbacks stay valid for the
/// whole run.
pub struct HookEngine {
  lua: Lua,
  state: Rc<RefCell<HookState>>,
  /// Shared context table passed to every callback of both phases. Created
  /// here so a phase can never observe a missing table.
  context: LuaTable,
}

impl HookEngine {
  /// Create a runtime with the `verso` registrar global in scope.
  pub fn new(definition: &str) -> Result<Self, HookError> {
    let lua = Lua::new();
    let state = Rc::new(RefCell::new(HookState::default()));
    globals::register_globals(&lua, definition, Rc::clone(&state))?;

    let context = lua.create_table()?;
    context.set("definition", definition)?;

    Ok(Self { lua, state, context })
  }

  /// Discover and execute hook scripts.
  ///
  /// Directories are visited in the given order; within a directory, `.lua`
  /// files execute in file-name order. A missing directory is skipped.
  pub fn discover(&self, hook_dirs: &[PathBuf]) -> Result<(), HookError> {
    for dir in hook_dirs {
      for script in scan_dir(dir)? {
        self.execute_script(&script)?;
      }
    }
    Ok(())
  }

  fn execute_script(&self, path: &Path) -> Result<(), HookError> {
    let source = fs::read_to_string(path).map_err(|source| HookError::Scan {
      path: path.to_path_buf(),
      source,
    })?;

    self.state.borrow_mut().current_script = Some(path.to_path_buf());
    let result = self
      .lua
      .load(&source)
      .set_name(format!("@{}", path.display()))
      .exec();
    self.state.borrow_mut().current_script = None;

    result.map_err(|source| HookError::Script {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), "executed hook script");
    Ok(())
  }

  /// Version-name override set by a hook script, if any.
  pub fn version_name_override(&self) -> Option<String> {
    self.state.borrow().version_name.clone()
  }

  /// Run the before phase against the resolved target.
  ///
  /// Fills in the target's resolved fields on the shared context table.
  pub fn run_before(&self, target: &InstallTarget) -> Result<(), HookError> {
    self.context.set("version_name", target.version_name.as_str())?;
    self.context.set("prefix", target.prefix.to_string_lossy().into_owned())?;

    self.run_phase("before")
  }

  /// Run the after phase. Called exactly once per run, after the build
  /// terminates and before its outcome is branched on.
  pub fn run_after(&self) -> Result<(), HookError> {
    self.run_phase("after")
  }

  fn run_phase(&self, phase: &'static str) -> Result<(), HookError> {
    // Snapshot the hook list so a callback calling the registrar mid-phase
    // cannot alias the borrow; the phase runs what was registered at entry.
    let hooks: Vec<Hook> = {
      let state = self.state.borrow();
      match phase {
        "before" => state.before.clone(),
        _ => state.after.clone(),
      }
    };

    if hooks.is_empty() {
      return Ok(());
    }

    debug!(phase, count = hooks.len(), "running hooks");
    for hook in &hooks {
      hook.callback.call::<()>(self.context.clone()).map_err(|source| HookError::Callback {
        phase,
        path: hook.source.clone(),
        source,
      })?;
    }
    Ok(())
  }
}

/// List the `.lua` scripts of one hook directory in file-name order.
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>, HookError> {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      debug!(dir = %dir.display(), "hook directory does not exist, skipping");
      return Ok(Vec::new());
    }
    Err(source) => {
      return Err(HookError::Scan {
        path: dir.to_path_buf(),
        source,
      });
    }
  };

  let mut scripts = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|source| HookError::Scan {
      path: dir.to_path_buf(),
      source,
    })?;
    let path = entry.path();
    if path.extension().is_some_and(|ext| ext == "lua") {
      scripts.push(path);
    }
  }
  scripts.sort();
  Ok(scripts)
}
