//! Hook script behavior through the full binary.

#![cfg(unix)]

use std::path::Path;

use predicates::prelude::*;

use super::common::TestEnv;

/// Write a Lua hook script into a directory.
fn write_hook(dir: &Path, name: &str, body: &str) {
  std::fs::create_dir_all(dir).unwrap();
  std::fs::write(dir.join(name), body).unwrap();
}

/// Lua snippet appending a line to the shared log.
fn lua_append(env: &TestEnv, line: &str) -> String {
  format!(
    "local f = assert(io.open({:?}, 'a')); f:write('{line}\\n'); f:close()",
    env.log_path().to_str().unwrap()
  )
}

#[test]
fn before_hooks_run_in_order_before_the_build() {
  let env = TestEnv::new();
  env.stub_build_success();
  env.stub_rehash();

  let hooks = env.root_path().join("hooks");
  write_hook(
    &hooks,
    "order.lua",
    &format!(
      "verso.register_before(function(ctx) {} end)\nverso.register_before(function(ctx) {} end)",
      lua_append(&env, "before-1"),
      lua_append(&env, "before-2"),
    ),
  );

  env.verso_cmd().arg("3.2.2").assert().success();

  let log = env.read_log();
  let b1 = log.find("before-1").expect("first before hook ran");
  let b2 = log.find("before-2").expect("second before hook ran");
  let build = log.find("verso-build").expect("build ran");
  assert!(b1 < b2 && b2 < build, "phase order violated: {log}");
}

#[test]
fn after_hooks_run_even_when_the_build_fails() {
  let env = TestEnv::new();
  env.stub_build_failure();

  let hooks = env.root_path().join("hooks");
  write_hook(
    &hooks,
    "after.lua",
    &format!("verso.register_after(function(ctx) {} end)", lua_append(&env, "after-hook")),
  );

  env.verso_cmd().arg("3.2.2").assert().failure().code(1);

  let log = env.read_log();
  let build = log.find("verso-build").expect("build ran");
  let after = log.find("after-hook").expect("after hook ran despite failure");
  assert!(build < after);
  assert_eq!(log.matches("after-hook").count(), 1);
}

#[test]
fn version_name_override_moves_the_prefix() {
  let env = TestEnv::new();
  env.stub_build_success();
  env.stub_rehash();

  let hooks = env.root_path().join("hooks");
  write_hook(&hooks, "rename.lua", "verso.set_version_name(verso.definition .. '-custom')");

  env
    .verso_cmd()
    .arg("3.2.2")
    .assert()
    .success()
    .stdout(predicate::str::contains("3.2.2-custom"));

  assert!(env.prefix("3.2.2-custom").join("bin").exists());
  assert!(!env.prefix("3.2.2").exists());
}

#[test]
fn hook_path_directories_are_searched_in_list_order() {
  let env = TestEnv::new();
  env.stub_build_success();
  env.stub_rehash();

  let dir_a = env.temp.path().join("hooks-a");
  let dir_b = env.temp.path().join("hooks-b");
  // File names alone would order b's script first.
  write_hook(&dir_a, "zz.lua", &lua_append(&env, "from-a"));
  write_hook(&dir_b, "aa.lua", &lua_append(&env, "from-b"));

  let hook_path = std::env::join_paths([&dir_a, &dir_b]).unwrap();
  env
    .verso_cmd()
    .env("VERSO_HOOK_PATH", hook_path)
    .arg("3.2.2")
    .assert()
    .success();

  let log = env.read_log();
  let a = log.find("from-a").expect("hook from first directory ran");
  let b = log.find("from-b").expect("hook from second directory ran");
  assert!(a < b, "hook directory order violated: {log}");
}

#[test]
fn callbacks_share_one_mutable_context() {
  let env = TestEnv::new();
  env.stub_build_success();
  env.stub_rehash();

  let hooks = env.root_path().join("hooks");
  write_hook(
    &hooks,
    "shared.lua",
    &format!(
      r#"verso.register_before(function(ctx) ctx.note = 'seen' end)
verso.register_after(function(ctx)
  local f = assert(io.open({:?}, 'a'))
  f:write('note=' .. tostring(ctx.note) .. '\n')
  f:close()
end)"#,
      env.log_path().to_str().unwrap()
    ),
  );

  env.verso_cmd().arg("3.2.2").assert().success();
  assert!(env.read_log().contains("note=seen"));
}

#[test]
fn broken_hook_script_aborts_before_the_build() {
  let env = TestEnv::new();
  env.stub_build_success();

  let hooks = env.root_path().join("hooks");
  write_hook(&hooks, "broken.lua", "this is not lua (");

  env
    .verso_cmd()
    .arg("3.2.2")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("broken.lua"));

  assert!(!env.read_log().contains("verso-build"));
}
