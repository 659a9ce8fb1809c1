use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;
use tempfile::NamedTempFile;

fn cli_command() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("cpt-cli"))
}

#[test]
fn an_unconstrained_depth_first_search_produces_a_tune_and_fitness() {
    let mut cmd = cli_command();
    cmd.arg("--tune-length")
        .arg("6")
        .arg("--random-seed")
        .arg("7")
        .arg("--optimize-depth-first")
        .arg("--checks")
        .arg("default");

    cmd.assert().success().stdout(contains("Fitness:").and(contains("V:CantusFirmus")).and(contains("V:Contrapunctus")));
}

#[test]
fn no_check_cf_without_a_cantus_firmus_is_a_user_error() {
    let mut cmd = cli_command();
    cmd.arg("--tune-length").arg("6").arg("--no-check-cf");

    cmd.assert().failure().code(1).stderr(contains("--no-check-cf requires --cantus-firmus"));
}

#[test]
fn trace_file_round_trips_through_a_later_gene_file_import() {
    let trace = NamedTempFile::new().unwrap();
    let mut cmd = cli_command();
    cmd.arg("--tune-length")
        .arg("6")
        .arg("--random-seed")
        .arg("11")
        .arg("--optimize-depth-first")
        .arg("--gene-format")
        .arg("trace")
        .arg("--trace-file")
        .arg(trace.path());
    cmd.assert().success();

    let contents = std::fs::read_to_string(trace.path()).unwrap();
    assert!(contents.contains("%# 0:"));

    let mut replay = cli_command();
    replay
        .arg("--tune-length")
        .arg("6")
        .arg("--gene-format")
        .arg("trace")
        .arg("--gene-file")
        .arg(trace.path());
    replay.assert().success().stdout(contains("Fitness:"));
}

#[test]
fn explain_cp_cf_prints_a_per_rule_breakdown() {
    let mut cmd = cli_command();
    cmd.arg("--tune-length")
        .arg("6")
        .arg("--random-seed")
        .arg("3")
        .arg("--optimize-depth-first")
        .arg("--explain-cp-cf");

    cmd.assert().success().stdout(contains("Fitness:"));
}
