use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::Builder;

#[test]
fn exits_success_on_a_well_formed_file() {
    let mut file = Builder::new().suffix(".c").tempfile().unwrap();
    file.write_all(b"int main(void) { return 0; }\n").unwrap();

    Command::cargo_bin("cfmt")
        .unwrap()
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn exits_failure_and_reports_location_on_a_lex_error() {
    let mut file = Builder::new().suffix(".c").tempfile().unwrap();
    file.write_all(b"char *s = \"unterminated;\n").unwrap();

    Command::cargo_bin("cfmt")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("lex error"));
}

#[test]
fn exits_failure_on_a_missing_file() {
    Command::cargo_bin("cfmt")
        .unwrap()
        .arg("/nonexistent/definitely-not-here.c")
        .assert()
        .failure();
}
