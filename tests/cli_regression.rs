// Regression tests for the qtest binary.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const PEOPLE: &str = r#"{
  "columns": [
    {"name": "ID", "type": "integer"},
    {"name": "NAME", "type": "string"}
  ],
  "rows": [[1, "a"], [2, "b"]]
}"#;

const PEOPLE_CHANGED: &str = r#"{
  "columns": [
    {"name": "ID", "type": "integer"},
    {"name": "NAME", "type": "string"}
  ],
  "rows": [[1, "a"], [2, "c"], [3, "d"]]
}"#;

fn qtest() -> Command {
    let mut cmd = Command::cargo_bin("qtest").unwrap();
    cmd.env_remove("QTEST_ERRORS_DIR")
        .env_remove("QTEST_EXPECTED_RESULTS_DIR")
        .env_remove("QTEST_TRANSACTION_OPTION")
        .env_remove("QTEST_LOG_LEVEL");
    cmd
}

fn encode(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
    let input = dir.join(format!("{}.json", name));
    let output = dir.join(format!("{}.tbl", name));
    fs::write(&input, json).unwrap();
    qtest()
        .arg("encode")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Wrote 2 columns"));
    output
}

#[test]
fn strategy_selection_is_case_insensitive() {
    qtest()
        .args(["strategy", "JNDI"])
        .assert()
        .success()
        .stdout(contains("jndi"));
    qtest()
        .args(["strategy", "nonsense"])
        .assert()
        .success()
        .stdout(contains("default"));
    qtest()
        .arg("strategy")
        .assert()
        .success()
        .stdout(contains("default"));
}

#[test]
fn dump_of_missing_file_reports_diagnostic() {
    qtest()
        .args(["dump", "tests/no_such_table.tbl"])
        .assert()
        .code(2)
        .stderr(contains("qtest::resource").or(contains("Failed to access")));
}

#[test]
fn encode_then_dump() {
    let tmp = tempfile::tempdir().unwrap();
    let table = encode(tmp.path(), "people", PEOPLE);
    qtest()
        .arg("dump")
        .arg(&table)
        .assert()
        .success()
        .stdout(contains("Query Results...").and(contains("1: 2, b")));
}

#[test]
fn diff_exits_nonzero_on_mismatch() {
    let tmp = tempfile::tempdir().unwrap();
    let expected = encode(tmp.path(), "expected", PEOPLE);
    let actual = encode(tmp.path(), "actual", PEOPLE_CHANGED);

    qtest()
        .arg("diff")
        .arg(&expected)
        .arg(&expected)
        .assert()
        .success()
        .stdout(contains("Tables are equal"));
    qtest()
        .arg("diff")
        .arg(&expected)
        .arg(&actual)
        .assert()
        .code(1)
        .stdout(contains("Row count mismatch").and(contains("+2: 3, d")));
}

#[test]
fn check_writes_reports_on_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let errors = tmp.path().join("errors");
    let expected_root = tmp.path().join("expected");
    fs::create_dir_all(expected_root.join("People")).unwrap();
    fs::write(expected_root.join("People").join("Q1.json"), PEOPLE).unwrap();
    let config = tmp.path().join("qtest.yaml");
    fs::write(
        &config,
        format!(
            "errors_dir: {}\nexpected_results_dir: {}\n",
            errors.display(),
            expected_root.display()
        ),
    )
    .unwrap();

    let same = encode(tmp.path(), "same", PEOPLE);
    qtest()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .args(["--query-set", "People", "--query-id", "Q1", "--actual"])
        .arg(&same)
        .assert()
        .success()
        .stdout(contains("PASS"));

    let changed = encode(tmp.path(), "changed", PEOPLE_CHANGED);
    qtest()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .args(["--query-set", "People", "--query-id", "Q1", "--actual"])
        .arg(&changed)
        .args(["--query", "select ID, NAME from People"])
        .assert()
        .code(1)
        .stdout(contains("FAIL").and(contains("People_Q1.err.json")));

    let report = fs::read_to_string(errors.join("People_Q1.err.json")).unwrap();
    assert!(report.contains("select ID, NAME from People"));
    let messages = fs::read_to_string(errors.join("People_Q1.err.messages.txt")).unwrap();
    assert_eq!(messages.lines().count(), 2);
}

#[test]
fn check_without_errors_dir_is_a_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("qtest.yaml");
    fs::write(&config, "log_level: info\n").unwrap();
    let table = encode(tmp.path(), "people", PEOPLE);

    qtest()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .args(["--query-set", "People", "--query-id", "Q1", "--actual"])
        .arg(&table)
        .assert()
        .code(2)
        .stderr(contains("errors_dir"));
}

#[test]
fn environment_overrides_the_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let expected_root = tmp.path().join("expected");
    fs::create_dir_all(expected_root.join("People")).unwrap();
    fs::write(expected_root.join("People").join("Q1.json"), PEOPLE).unwrap();
    let config = tmp.path().join("qtest.yaml");
    fs::write(
        &config,
        format!(
            "transaction-option: local\nerrors_dir: {}\nexpected_results_dir: {}\n",
            tmp.path().join("errors").display(),
            expected_root.display()
        ),
    )
    .unwrap();
    let table = encode(tmp.path(), "people", PEOPLE);

    qtest()
        .env("QTEST_TRANSACTION_OPTION", "jndi")
        .args(["--log-level", "debug", "check", "--config"])
        .arg(&config)
        .args(["--query-set", "People", "--query-id", "Q1", "--actual"])
        .arg(&table)
        .assert()
        .success()
        .stderr(contains("Configured transaction strategy: jndi"));
}
