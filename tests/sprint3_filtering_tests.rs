// Sprint 3: Sample filtering with -e expressions
//
// The filter restricts which samples enter the aggregation, so every
// reported number reflects the restricted stream. Malformed expressions
// fail at startup with a typed error, never mid-replay.

#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;

fn run_filtered(expr: &str, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("jitsum").unwrap();
    cmd.arg("-i")
        .arg("jsonl")
        .arg("-e")
        .arg(expr)
        .write_stdin(input.to_string())
        .assert()
}

const MIXED: &str = concat!(
    "{\"period\": 100, \"dso\": \"jit.map\", \"symbol\": \"iseq_foo\"}\n",
    "{\"period\": 50, \"dso\": \"jit.map\", \"symbol\": \"iseq_bar\"}\n",
    "{\"period\": 30, \"dso\": \"jit.map\", \"symbol\": \"stub_baz\"}\n",
    "{\"period\": 25, \"dso\": \"libc.so\", \"symbol\": \"memcpy\"}\n",
);

#[test]
fn test_symbol_name_list_keeps_only_named() {
    run_filtered("symbol=iseq_foo,stub_baz", MIXED)
        .success()
        .stdout(predicate::str::contains("iseq_foo"))
        .stdout(predicate::str::contains("stub_baz"))
        .stdout(predicate::str::contains("iseq_bar").not())
        // Filtering happens before recording: total is 100 + 30.
        .stdout(predicate::str::contains("total cycles: 130"));
}

#[test]
fn test_symbol_regex_matches_prefix() {
    run_filtered("symbol=/^iseq_/", MIXED)
        .success()
        .stdout(predicate::str::contains("total cycles: 150"))
        .stdout(predicate::str::contains("iseq_foo"))
        .stdout(predicate::str::contains("iseq_bar"))
        .stdout(predicate::str::contains("stub_baz").not());
}

#[test]
fn test_dso_name_list_restricts_total() {
    run_filtered("dso=jit.map", MIXED)
        .success()
        .stdout(predicate::str::contains("total cycles: 180"))
        .stdout(predicate::str::contains("JITed cycles: 180 (100.0%)"))
        .stdout(predicate::str::contains("memcpy").not());
}

#[test]
fn test_dso_regex_form_for_paths() {
    let input = concat!(
        "{\"period\": 10, \"dso\": \"/tmp/perf-1.map\", \"symbol\": \"foo\"}\n",
        "{\"period\": 90, \"dso\": \"/usr/lib/libc.so\", \"symbol\": \"memcpy\"}\n",
    );
    run_filtered(r"dso=/\.map$/", input)
        .success()
        .stdout(predicate::str::contains("total cycles: 10"));
}

#[test]
fn test_sentinel_values_are_matchable() {
    // A sample with no module origin matches the substituted sentinel.
    let input = concat!(
        "{\"period\": 5, \"symbol\": \"foo\"}\n",
        "{\"period\": 95, \"dso\": \"libc.so\"}\n",
    );
    run_filtered("dso=unknown-module", input)
        .success()
        .stdout(predicate::str::contains("total cycles: 5"));
}

#[test]
fn test_filter_may_leave_nothing() {
    run_filtered("symbol=no_such_symbol", MIXED)
        .success()
        .stdout("total cycles: 0\n");
}

#[test]
fn test_unknown_filter_key_fails_startup() {
    run_filtered("trace=write", "")
        .failure()
        .stderr(predicate::str::contains("unknown filter key"));
}

#[test]
fn test_missing_key_fails_startup() {
    run_filtered("iseq_foo", "")
        .failure()
        .stderr(predicate::str::contains("invalid filter expression"));
}

#[test]
fn test_unterminated_regex_fails_startup() {
    run_filtered("symbol=/^iseq_", "")
        .failure()
        .stderr(predicate::str::contains("unterminated regex"));
}

#[test]
fn test_bad_regex_fails_startup() {
    run_filtered("symbol=/[unclosed/", "")
        .failure()
        .stderr(predicate::str::contains("invalid regex"));
}
