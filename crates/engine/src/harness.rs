// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of `testcmp.sh` output and test-suite counting.

use std::path::Path;

/// Pass/fail counts from a `Results:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessResults {
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
}

/// Parse `Loaded N tests total`.
pub fn parse_loaded_count(output: &str) -> Option<u32> {
    for line in output.lines() {
        let count = line
            .trim()
            .strip_prefix("Loaded ")
            .and_then(|rest| rest.strip_suffix(" tests total"));
        if let Some(count) = count {
            return count.trim().parse().ok();
        }
    }
    None
}

/// Parse `Results: X passed, Y failed out of Z tests`.
///
/// Returns `None` when the line is absent or when `X + Y != Z` (a harness
/// that cannot account for every test is not trusted).
pub fn parse_results_line(output: &str) -> Option<HarnessResults> {
    for line in output.lines() {
        if !(line.contains("Results:")
            && line.contains("passed")
            && line.contains("failed")
            && line.contains("out of"))
        {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut passed = None;
        let mut failed = None;
        let mut total = None;
        for (i, token) in tokens.iter().enumerate() {
            if *token == "passed," && i > 0 {
                passed = tokens[i - 1].parse().ok();
            }
            if *token == "failed" && i > 0 {
                failed = tokens[i - 1].parse().ok();
            }
            if *token == "of" && i + 1 < tokens.len() {
                total = tokens[i + 1].parse().ok();
            }
        }
        let (passed, failed, total) = (passed?, failed?, total?);
        if passed + failed != total {
            return None;
        }
        return Some(HarnessResults { passed, failed, total });
    }
    None
}

/// Whether the harness declared a clean run.
pub fn harness_passed(output: &str) -> bool {
    output.contains("All tests passed!") || output.contains("All tests done.")
}

/// Count test cases across `tests*.jsonl` files at the top of `dir`.
///
/// Only lines that parse as JSON count; blank and broken lines are skipped
/// the way the harness itself skips them.
pub fn count_test_cases(dir: &Path) -> u32 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    let mut total = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !(name.starts_with("tests") && name.ends_with(".jsonl")) {
            continue;
        }
        let Ok(body) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if serde_json::from_str::<serde_json::Value>(line).is_ok() {
                total += 1;
            }
        }
    }
    total
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
