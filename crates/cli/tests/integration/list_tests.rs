//! `--list` behavior.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn list_prints_catalog_indented_and_exits_zero() {
  let env = TestEnv::new();
  env.stub_build_not_found(&["3.2.1", "3.2.2"]);

  env
    .verso_cmd()
    .arg("--list")
    .assert()
    .success()
    .stdout(predicate::str::contains("Available versions:\n  3.2.1\n  3.2.2"));
}

#[test]
fn list_performs_no_resolution_and_no_build() {
  let env = TestEnv::new();
  env.stub_build_not_found(&["3.2.1"]);

  // Even with a definition present, --list only prints the catalog.
  env.verso_cmd().arg("--list").arg("3.2.1").assert().success();

  assert!(!env.root_path().join("versions").exists());
  assert!(!env.read_log().contains("verso-build"), "no install invocation may happen");
}
