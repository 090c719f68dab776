//! The definition catalog and failure-diagnosis suggestions.
//!
//! The catalog is owned by the build engine; it is fetched on demand by
//! running `verso-build --definitions` and never cached. Suggestion is
//! simple substring containment over the catalog, preserving its order.

use tokio::process::Command;
use tracing::debug;

use crate::builder::BuildError;
use crate::consts::BUILD_COMMAND;

/// Fetch the ordered list of all installable definition names.
pub async fn list_definitions() -> Result<Vec<String>, BuildError> {
  let output = Command::new(BUILD_COMMAND).arg("--definitions").output().await.map_err(|err| {
    if err.kind() == std::io::ErrorKind::NotFound {
      BuildError::EngineNotFound
    } else {
      BuildError::Io(err)
    }
  })?;

  if !output.status.success() {
    return Err(BuildError::Io(std::io::Error::other(format!(
      "'{BUILD_COMMAND} --definitions' exited with {}",
      output.status
    ))));
  }

  let definitions: Vec<String> = String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect();

  debug!(count = definitions.len(), "fetched definition catalog");
  Ok(definitions)
}

/// Catalog entries containing `query` as a substring, in catalog order.
///
/// Plain containment, not fuzzy matching: this runs when the engine already
/// rejected the definition, and the goal is to surface near-misses like a
/// missing patch level.
pub fn suggest<'a>(catalog: &'a [String], query: &str) -> Vec<&'a str> {
  catalog
    .iter()
    .filter(|name| name.contains(query))
    .map(String::as_str)
    .collect()
}
