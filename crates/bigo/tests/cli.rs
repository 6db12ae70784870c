use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

/// `bigo` run inside a scratch directory with a default config file.
fn bigo_cmd(dir: &TempDir) -> Command {
  let config = dir.path().join("bigo.json");
  if !config.exists() {
    fs::write(&config, "{}").unwrap();
  }
  let mut cmd = Command::cargo_bin("bigo").expect("binary exists");
  cmd.current_dir(dir.path()).arg("--config").arg(&config).env_remove("BIGO_LOG");
  cmd
}

#[test]
fn test_stdin_compact() {
  let temp = TempDir::new().unwrap();

  bigo_cmd(&temp)
    .arg("--compact")
    .write_stdin("for (let i = 0; i < n; i++) { sum += i; }")
    .assert()
    .success()
    .stdout(contains("<stdin>: time O(n) | space O(n)"));
}

#[test]
fn test_stdin_dash_json() {
  let temp = TempDir::new().unwrap();

  let output = bigo_cmd(&temp)
    .args(["--format", "json", "-"])
    .write_stdin("function dijkstra(g) { return g; }")
    .output()
    .unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value[0]["path"], "<stdin>");
  assert_eq!(value[0]["time"], "O((V + E) log V)");
}

#[test]
fn test_directory_walk() {
  let temp = TempDir::new().unwrap();
  let src = temp.path().join("src");
  fs::create_dir_all(&src).unwrap();
  fs::create_dir_all(temp.path().join("target")).unwrap();
  fs::write(src.join("search.js"), "function binarySearch(a, x) { return -1; }").unwrap();
  fs::write(src.join("plain.py"), "x = 1\n").unwrap();
  fs::write(temp.path().join("target/gen.rs"), "fn gen() {}").unwrap();

  bigo_cmd(&temp)
    .args(["--compact", "."])
    .assert()
    .success()
    .stdout(
      contains("search.js: time O(log n)")
        .and(contains("plain.py: time O(1)"))
        .and(contains("gen.rs").not()),
    );
}

#[test]
fn test_pretty_with_diagnostics() {
  let temp = TempDir::new().unwrap();
  let file = temp.path().join("rec.rs");
  fs::write(&file, "fn walk(n: u64) -> u64 { if n < 2 { n } else { walk(n - 1) + walk(n - 2) } }").unwrap();

  bigo_cmd(&temp)
    .arg("--diagnostics")
    .arg(&file)
    .assert()
    .success()
    .stdout(contains("O(2^n)").and(contains("rule: recursion-branching")).and(contains("walk x2")));
}

#[test]
fn test_missing_path_fails() {
  let temp = TempDir::new().unwrap();

  bigo_cmd(&temp)
    .arg("does/not/exist.js")
    .assert()
    .failure()
    .stderr(contains("does/not/exist.js"));
}

#[test]
fn test_invalid_config_fails() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("broken.json");
  fs::write(&config, "{ not json").unwrap();

  let mut cmd = Command::cargo_bin("bigo").expect("binary exists");
  cmd
    .current_dir(temp.path())
    .arg("--config")
    .arg(&config)
    .write_stdin("let x = 1;")
    .assert()
    .failure()
    .stderr(contains("failed to load config"));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
  let temp = TempDir::new().unwrap();

  bigo_cmd(&temp)
    .args(["--verbose", "--compact"])
    .write_stdin("let x = 1;")
    .assert()
    .success()
    .stderr(contains("analysis complete"))
    .stdout(contains("<stdin>: time O(1) | space O(1)").and(contains("analysis complete").not()));
}

#[test]
fn test_log_level_from_environment() {
  let temp = TempDir::new().unwrap();

  bigo_cmd(&temp)
    .env("BIGO_LOG", "bigo=debug")
    .arg("--compact")
    .write_stdin("let x = 1;")
    .assert()
    .success()
    .stderr(contains("analysis complete"));

  bigo_cmd(&temp)
    .arg("--compact")
    .write_stdin("let x = 1;")
    .assert()
    .success()
    .stderr(contains("analysis complete").not());
}
