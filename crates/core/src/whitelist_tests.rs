// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use yare::parameterized;

#[parameterized(
    c_source = { "util.c", true },
    header = { "util.h", true },
    man_page = { "echo.1", true },
    games_man = { "fortune.6", true },
    makefile = { "Makefile", true },
    rust_file = { "main.rs", false },
    jsonl = { "tests00.jsonl", false },
    lowercase_makefile = { "makefile", false },
)]
fn c_whitelist(name: &str, expected: bool) {
    assert_eq!(Whitelist::c_files().matches_name(name), expected);
}

#[parameterized(
    rust_source = { "main.rs", true },
    cargo_toml = { "Cargo.toml", true },
    cargo_lock = { "Cargo.lock", true },
    c_source = { "util.c", false },
    backup = { "backup.rs.bak", false },
)]
fn rs_whitelist(name: &str, expected: bool) {
    assert_eq!(Whitelist::rs_files().matches_name(name), expected);
}

#[parameterized(
    harness = { "testcmp.sh", true },
    seed = { "seed_tests.jsonl", true },
    numbered = { "tests03.jsonl", true },
    bare_tests = { "tests.jsonl", true },
    norm_rules = { "norm_rules.jsonl", true },
    fuzzer = { "fuzzer_template.py", true },
    record = { "test_cases_record.md", true },
    other_jsonl = { "cases.jsonl", false },
)]
fn tests_whitelist(name: &str, expected: bool) {
    assert_eq!(Whitelist::test_cases().matches_name(name), expected);
}

#[test]
fn logs_whitelist_matches_logs_only() {
    let wl = Whitelist::log_files();
    assert!(wl.matches_name("translator_output.log"));
    assert!(!wl.matches_name("notes.txt"));
}

#[test]
fn matches_uses_basename_only() {
    let wl = Whitelist::c_files();
    assert!(wl.matches(&PathBuf::from("/deep/nested/dir/main.c")));
    assert!(!wl.matches(&PathBuf::from("/deep/main.c/notes.txt")));
}

#[test]
fn sandbox_union_covers_all_three_tables() {
    let wl = Whitelist::sandbox_union();
    assert!(wl.matches_name("main.c"));
    assert!(wl.matches_name("main.rs"));
    assert!(wl.matches_name("tests00.jsonl"));
    assert!(!wl.matches_name("agent_output.log"));
}
