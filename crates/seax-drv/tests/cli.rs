//! End-to-end CLI tests for the `seax` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_source(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".c")
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(source.as_bytes())
        .expect("failed to write temp file");
    file
}

#[test]
fn analyses_a_simple_file() {
    let file = write_source("int f(int x) { if (x > 0) return 1; return -1; }");

    Command::cargo_bin("seax")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("considered an entry point"))
        .stdout(predicate::str::contains("(x > 0) -> 1"))
        .stdout(predicate::str::contains("(!(x > 0)) -> -1"));
}

#[test]
fn reports_the_call_table() {
    let file = write_source("int g() { return 2; } int h() { return g(); }");

    Command::cargo_bin("seax")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("call analysis complete"))
        .stdout(predicate::str::contains("calls: g"));
}

#[test]
fn accepts_a_deepness_option() {
    let file = write_source("int f() { int i = 0; while (i < 2) { i = i + 1; } return i; }");

    Command::cargo_bin("seax")
        .unwrap()
        .arg(file.path())
        .arg("--deepness")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("true -> 2"));
}

#[test]
fn missing_file_is_a_fatal_error() {
    Command::cargo_bin("seax")
        .unwrap()
        .arg("no-such-file.c")
        .assert()
        .failure()
        .stdout(predicate::str::contains("fatal"));
}

#[test]
fn syntax_errors_are_fatal() {
    let file = write_source("int f( { return 1; }");

    Command::cargo_bin("seax")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure();
}
