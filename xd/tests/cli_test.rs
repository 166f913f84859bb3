//! Tests for the xd binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn dataset() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "pl_name,pl_bmasse,pl_orbper").unwrap();
    for (i, (mass, period)) in [(1.0, 10.0), (2.0, 20.0), (3.0, 30.0), (4.0, 40.0), (5.0, 50.0)]
        .iter()
        .enumerate()
    {
        writeln!(file, "p{},{},{}", i, mass, period).unwrap();
    }
    file
}

#[test]
fn test_columns_lists_headers() {
    let file = dataset();
    Command::cargo_bin("xd")
        .unwrap()
        .arg("columns")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pl_bmasse"))
        .stdout(predicate::str::contains("pl_orbper"));
}

#[test]
fn test_quantile_prints_range() {
    let file = dataset();
    Command::cargo_bin("xd")
        .unwrap()
        .args(["quantile"])
        .arg(file.path())
        .args(["pl_bmasse", "--lo", "0.25", "--hi", "0.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0000"))
        .stdout(predicate::str::contains("4.0000"));
}

#[test]
fn test_unknown_column_fails() {
    let file = dataset();
    Command::cargo_bin("xd")
        .unwrap()
        .args(["stats"])
        .arg(file.path())
        .arg("pl_rade")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column"));
}
