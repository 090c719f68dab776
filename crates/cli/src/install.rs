//! The installation flow.
//!
//! Wires the library pieces together in order: resolve the target, gate on a
//! preexisting installation, run before-hooks, delegate to the build engine,
//! run after-hooks, then branch on the interpreted outcome. The after phase
//! always runs before the branch; cleanup only ever runs on the failure and
//! interruption paths.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use verso_lib::builder::{self, BuildFlags, BuildOutcome};
use verso_lib::catalog;
use verso_lib::consts::LOCAL_COMMAND;
use verso_lib::hooks::{HookEngine, HookError};
use verso_lib::install::{CleanupGuard, InstallTarget};
use verso_lib::paths::VersoPaths;
use verso_lib::rehash;

use crate::Cli;
use crate::output::{print_error, print_success, print_warning};
use crate::prompts;

// Helper to convert HookError to anyhow::Error (works around mlua not being
// Send+Sync)
fn map_hook_err<T>(result: Result<T, HookError>) -> Result<T> {
  result.map_err(|e| anyhow::anyhow!("{e}"))
}

pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
  if cli.list {
    let definitions = catalog::list_definitions().await.context("cannot list available versions")?;
    println!("Available versions:");
    for name in &definitions {
      println!("  {name}");
    }
    return Ok(ExitCode::SUCCESS);
  }

  let Some(definition) = cli.definition.clone().or_else(local_default_version) else {
    print_error("no version given and no local default version found");
    eprintln!("Usage: verso [--force] [--keep] [--verbose] <version>");
    return Ok(ExitCode::FAILURE);
  };

  let paths = VersoPaths::from_env();

  // Hook scripts execute once, up front; they may register callbacks and
  // override the version name before it is read by the resolver.
  let engine = map_hook_err(HookEngine::new(&definition))?;
  map_hook_err(engine.discover(&paths.hook_dirs()))?;

  let target = InstallTarget::resolve(&definition, &paths, engine.version_name_override());

  if target.has_install_marker() && !cli.force {
    print_warning(&format!("{} already exists", target.prefix.display()));
    if !prompts::confirm("continue with installation?")? {
      debug!("installation declined");
      return Ok(ExitCode::FAILURE);
    }
  }

  let mut cleanup = CleanupGuard::new(&target);

  map_hook_err(engine.run_before(&target))?;

  let flags = BuildFlags {
    keep: cli.keep,
    verbose: cli.verbose,
  };
  let outcome = builder::invoke(&target, &paths, flags).await?;

  // Unconditional after phase, regardless of how the build terminated,
  // before the outcome is branched on.
  let after_result = map_hook_err(engine.run_after());

  match outcome {
    BuildOutcome::Success => {
      after_result?;
      if let Err(err) = rehash::run().await {
        print_warning(&format!("rehash failed: {err}"));
      }
      print_success(&format!(
        "Installed {} to {}",
        target.version_name,
        target.prefix.display()
      ));
      Ok(ExitCode::SUCCESS)
    }
    BuildOutcome::DefinitionNotFound => {
      cleanup.run().context("cleanup failed")?;
      after_result?;
      print_error(&format!("definition not found: {definition}"));
      print_not_found_help(&definition).await;
      Ok(ExitCode::from(2))
    }
    BuildOutcome::Failed(status) => {
      cleanup.run().context("cleanup failed")?;
      after_result?;
      // The engine's own diagnostics are already on the shared streams.
      Ok(forwarded_exit_code(status))
    }
    BuildOutcome::Interrupted => {
      // Teardown is shared with the failure branch and idempotent; then
      // terminate with the conventional interrupted status rather than a
      // normal return. Errors can only be reported here, never returned.
      if let Err(err) = cleanup.run() {
        print_warning(&format!("cleanup failed: {err}"));
      }
      if let Err(err) = after_result {
        print_warning(&format!("{err:#}"));
      }
      std::process::exit(130);
    }
  }
}

/// Forward the engine's exit status verbatim.
fn forwarded_exit_code(status: i32) -> ExitCode {
  ExitCode::from(u8::try_from(status).unwrap_or(1))
}

/// Candidates and the pointer to the listing command, on stderr.
async fn print_not_found_help(definition: &str) {
  eprintln!();
  match catalog::list_definitions().await {
    Ok(entries) => {
      let candidates = catalog::suggest(&entries, definition);
      if !candidates.is_empty() {
        eprintln!("The following versions contain `{definition}' in the name:");
        for name in candidates {
          eprintln!("  {name}");
        }
        eprintln!();
      }
    }
    Err(err) => debug!(error = %err, "could not fetch catalog for suggestions"),
  }
  eprintln!("See all available versions with `verso --list'.");
}

/// Externally supplied local default version, used when no definition is
/// given on the command line.
fn local_default_version() -> Option<String> {
  let output = std::process::Command::new(LOCAL_COMMAND).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if version.is_empty() { None } else { Some(version) }
}
