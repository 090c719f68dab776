//! Interruption mid-build.

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::common::TestEnv;

/// SIGINT during the build must still run after-hooks, remove a freshly
/// created prefix and terminate with the conventional interrupted status.
#[test]
fn interruption_runs_after_hooks_cleans_up_and_exits_130() {
  let env = TestEnv::new();
  let log = env.log_path();

  // A build engine that announces itself and then blocks.
  env.write_stub(
    "verso-build",
    &format!("echo build-started >> {:?}\nsleep 30", log.to_str().unwrap()),
  );

  let hooks = env.root_path().join("hooks");
  std::fs::create_dir_all(&hooks).unwrap();
  std::fs::write(
    hooks.join("after.lua"),
    format!(
      "verso.register_after(function(ctx) local f = assert(io.open({:?}, 'a')); f:write('after-hook\\n'); f:close() end)",
      log.to_str().unwrap()
    ),
  )
  .unwrap();

  let mut child = Command::new(env!("CARGO_BIN_EXE_verso"))
    .arg("3.2.2")
    .env("VERSO_ROOT", env.root_path())
    .env("PATH", env.stub_path())
    .env_remove("VERSO_HOOK_PATH")
    .env_remove("VERSO_BUILD_ROOT")
    .env_remove("VERSO_BUILD_CACHE_PATH")
    .env_remove("RUST_LOG")
    .stdin(Stdio::null())
    .spawn()
    .unwrap();

  // Wait for the engine to be running, then interrupt the orchestrator.
  let deadline = Instant::now() + Duration::from_secs(10);
  while !env.read_log().contains("build-started") {
    assert!(Instant::now() < deadline, "build stub never started");
    std::thread::sleep(Duration::from_millis(20));
  }
  std::thread::sleep(Duration::from_millis(100));

  let killed = Command::new("kill").args(["-INT", &child.id().to_string()]).status().unwrap();
  assert!(killed.success());

  let status = child.wait().unwrap();
  assert_eq!(status.code(), Some(130));

  let log = env.read_log();
  assert!(log.contains("after-hook"), "after hooks must run on interruption: {log}");
  assert!(!env.prefix("3.2.2").exists(), "interrupted install must not leave a new prefix");
}
