// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whitelist tables gating every workspace mirror.
//!
//! A whitelist is a set of glob patterns matched against file *basenames*.
//! The four tables below decide which files move between the sandbox, the
//! committed areas, and the per-iteration backups.

use glob::Pattern;
use std::path::Path;

/// C sources and man pages seeded into `c_files/` at initialization.
pub const C_WHITELIST: &[&str] = &["*.c", "*.h", "*.1", "*.6", "*.7", "*.8", "Makefile"];

/// Rust translation artifacts committed to `rs_files/`.
pub const RS_WHITELIST: &[&str] = &["*.rs", "Cargo.toml", "Cargo.lock"];

/// Test-harness artifacts committed to `test_cases/`.
pub const TESTS_WHITELIST: &[&str] = &[
    "testcmp.sh",
    "norm_rules.jsonl",
    "seed_tests.jsonl",
    "tests*.jsonl",
    "fuzzer_template.py",
    "test_cases_record.md",
];

/// Agent transcripts committed to `log_files/`.
pub const LOGS_WHITELIST: &[&str] = &["*.log"];

/// A compiled pattern table.
#[derive(Debug, Clone)]
pub struct Whitelist {
    patterns: Vec<Pattern>,
}

impl Whitelist {
    /// Compile a pattern table. Invalid glob syntax in a built-in table is a
    /// programming error; callers building dynamic lists should validate
    /// patterns first (invalid entries are dropped).
    pub fn new(patterns: &[&str]) -> Self {
        Self { patterns: patterns.iter().filter_map(|p| Pattern::new(p).ok()).collect() }
    }

    /// The built-in C source table.
    pub fn c_files() -> Self {
        Self::new(C_WHITELIST)
    }

    /// The built-in Rust artifact table.
    pub fn rs_files() -> Self {
        Self::new(RS_WHITELIST)
    }

    /// The built-in test-case table.
    pub fn test_cases() -> Self {
        Self::new(TESTS_WHITELIST)
    }

    /// The built-in log-file table.
    pub fn log_files() -> Self {
        Self::new(LOGS_WHITELIST)
    }

    /// Union of the C, Rust, and test-case tables (sandbox seeding, finalize).
    pub fn sandbox_union() -> Self {
        let mut patterns: Vec<&str> = Vec::new();
        patterns.extend_from_slice(C_WHITELIST);
        patterns.extend_from_slice(RS_WHITELIST);
        patterns.extend_from_slice(TESTS_WHITELIST);
        Self::new(&patterns)
    }

    /// Whether a path's basename matches any pattern in the table.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Whether a bare basename matches any pattern in the table.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
#[path = "whitelist_tests.rs"]
mod tests;
