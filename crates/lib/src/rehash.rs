//! Post-install trigger: shim regeneration.
//!
//! On a successful install the external `verso-rehash` step runs exactly
//! once, after the after-hooks. Its failure is advisory; the caller reports
//! it as a warning, never as an installation failure.

use std::io;

use tokio::process::Command;
use tracing::debug;

use crate::consts::REHASH_COMMAND;

/// Errors from the rehash trigger. Advisory only.
#[derive(Debug, thiserror::Error)]
pub enum RehashError {
  #[error("failed to run '{REHASH_COMMAND}': {0}")]
  Io(#[from] io::Error),

  #[error("'{REHASH_COMMAND}' exited with status {0:?}")]
  Failed(Option<i32>),
}

/// Run the external rehash step, blocking until it terminates.
pub async fn run() -> Result<(), RehashError> {
  debug!("running rehash");
  let status = Command::new(REHASH_COMMAND).status().await?;
  if status.success() {
    Ok(())
  } else {
    Err(RehashError::Failed(status.code()))
  }
}
