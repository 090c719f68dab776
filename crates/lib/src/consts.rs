//! Shared constants: application name, environment variables, and the names
//! of the external collaborator commands.

/// Application name, used for the default root directory (`~/.verso`).
pub const APP_NAME: &str = "verso";

/// Root directory override.
pub const ENV_ROOT: &str = "VERSO_ROOT";

/// Ordered, path-separator separated list of hook directories.
pub const ENV_HOOK_PATH: &str = "VERSO_HOOK_PATH";

/// Build-scratch root override. When set, the engine builds under
/// `$VERSO_BUILD_ROOT/<version-name>` and keep-mode is forced on.
pub const ENV_BUILD_ROOT: &str = "VERSO_BUILD_ROOT";

/// Exact build working directory, passed to the engine.
pub const ENV_BUILD_PATH: &str = "VERSO_BUILD_PATH";

/// Download cache directory, passed to the engine. Auto-set from
/// `$VERSO_ROOT/cache` when that directory exists and no override was given.
pub const ENV_BUILD_CACHE_PATH: &str = "VERSO_BUILD_CACHE_PATH";

/// The external build engine. Fetches and compiles a definition into a
/// prefix; `--definitions` prints the catalog.
pub const BUILD_COMMAND: &str = "verso-build";

/// The external shim regeneration step, invoked after a successful install.
pub const REHASH_COMMAND: &str = "verso-rehash";

/// The external local-default-version lookup, used when no definition is
/// given on the command line.
pub const LOCAL_COMMAND: &str = "verso-local";
