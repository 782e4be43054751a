// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn loaded_count_is_parsed() {
    let output = "Setting up...\nLoaded 18 tests total\nRunning...";
    assert_eq!(parse_loaded_count(output), Some(18));
}

#[test]
fn loaded_count_absent() {
    assert_eq!(parse_loaded_count("no such line"), None);
}

#[test]
fn results_line_is_parsed() {
    let output = "noise\nResults: 15 passed, 3 failed out of 18 tests\ntrailer";
    assert_eq!(
        parse_results_line(output),
        Some(HarnessResults { passed: 15, failed: 3, total: 18 })
    );
}

#[test]
fn inconsistent_results_are_rejected() {
    // 15 + 2 != 18: the harness cannot account for every test.
    let output = "Results: 15 passed, 2 failed out of 18 tests";
    assert_eq!(parse_results_line(output), None);
}

#[test]
fn missing_results_line() {
    assert_eq!(parse_results_line("All tests passed!"), None);
}

#[parameterized(
    passed = { "running...\nAll tests passed!\n", true },
    done = { "All tests done.", true },
    failed = { "Results: 1 passed, 2 failed out of 3 tests", false },
)]
fn pass_markers(output: &str, expected: bool) {
    assert_eq!(harness_passed(output), expected);
}

#[test]
fn test_cases_are_counted_across_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tests00.jsonl"),
        "{\"name\":\"a\"}\n{\"name\":\"b\"}\n\nnot json\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("tests01.jsonl"), "{\"name\":\"c\"}\n").unwrap();
    std::fs::write(dir.path().join("seed_tests.jsonl"), "{\"name\":\"seed\"}\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "{}").unwrap();

    // seed_tests.jsonl does not match tests*.jsonl and is not counted.
    assert_eq!(count_test_cases(dir.path()), 3);
}

#[test]
fn counting_missing_dir_is_zero() {
    assert_eq!(count_test_cases(std::path::Path::new("/nonexistent")), 0);
}
