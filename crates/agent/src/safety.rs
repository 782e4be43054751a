// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Banned-pattern scanning over agent-produced Rust code.
//!
//! The translation contract requires 100% safe Rust without interior
//! mutability or shared-ownership escapes, so both runners rescan emitted
//! sources before accepting a final result.

use std::path::{Path, PathBuf};

/// Banned substrings and the message appended when one is found.
const BANNED: &[(&str, &str)] = &[
    ("unsafe {", "[ERROR] Detected `unsafe` in the code. You are not allowed to use `unsafe` code."),
    ("unsafe{", "[ERROR] Detected `unsafe` in the code. You are not allowed to use `unsafe` code."),
    ("::RefCell", "[ERROR] Detected `::RefCell` in the code. You are not allowed to use `::RefCell` in your code."),
    ("::Cell", "[ERROR] Detected `::Cell` in the code. You are not allowed to use `::Cell` in your code."),
    ("ffi::", "[ERROR] Detected `ffi::` in the code. You are not allowed to use `ffi::` in your code."),
    ("::Rc", "[ERROR] Detected `::Rc` in the code. You are not allowed to use `::Rc` in your code."),
    ("::Arc", "[ERROR] Detected `::Arc` in the code. You are not allowed to use `::Arc` in your code."),
    ("::Mutex", "[ERROR] Detected `::Mutex` in the code. You are not allowed to use `::Mutex` in your code."),
];

/// One banned pattern found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub message: String,
}

/// Check a code fragment. Returns the first banned-pattern message found.
pub fn check_code(code: &str) -> Option<&'static str> {
    BANNED.iter().find(|(needle, _)| code.contains(needle)).map(|(_, msg)| *msg)
}

/// Scan `sandbox/ts/src/*.rs` for banned patterns.
pub fn scan_rust_sources(sandbox_dir: &Path) -> Vec<Violation> {
    let src_dir = sandbox_dir.join("ts").join("src");
    let mut violations = Vec::new();
    let Ok(entries) = std::fs::read_dir(&src_dir) else {
        return violations;
    };
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "rs").unwrap_or(false))
        .collect();
    paths.sort();
    for path in paths {
        let Ok(code) = std::fs::read_to_string(&path) else {
            continue;
        };
        if let Some(message) = check_code(&code) {
            violations.push(Violation { path, message: message.to_string() });
        }
    }
    violations
}

/// Format violations as the corrective message sent back to the agent.
pub fn violations_message(violations: &[Violation]) -> String {
    let mut parts = Vec::new();
    for v in violations {
        parts.push(format!("In file `{}`:\n{}", v.path.display(), v.message));
    }
    format!(
        "[ERROR] Detected not allowed code structure(s) in the following Rust files:\n{}",
        parts.join("\n\n")
    )
}

#[cfg(test)]
#[path = "safety_tests.rs"]
mod tests;
