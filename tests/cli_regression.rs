// Regression tests for the CLI surface.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn parse_subcommand_prints_ast_json() {
    let mut cmd = Command::cargo_bin("chatmark").unwrap();
    cmd.arg("parse").arg("<@123>");
    cmd.assert()
        .success()
        .stdout(contains(r#""type": "mention""#).and(contains(r#""id": "123""#)));
}

#[test]
fn parse_subcommand_reads_stdin_when_no_argument() {
    let mut cmd = Command::cargo_bin("chatmark").unwrap();
    cmd.arg("parse").write_stdin("@everyone");
    cmd.assert()
        .success()
        .stdout(contains(r#""type": "atAll""#).and(contains(r#""scope": "everyone""#)));
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("chatmark").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("serve").and(contains("parse")));
}
