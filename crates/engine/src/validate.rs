// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-attempt validation protocols.
//!
//! Every worker attempt ends here: re-hydrate protected files over
//! whatever the agent did, rebuild from scratch, and interrogate the
//! harness. Validation failures are recoverable (the worker retries);
//! only missing committed areas are hard errors.

use crate::agents::DiscriminatorSpec;
use crate::error::EngineError;
use crate::harness::{count_test_cases, harness_passed, parse_results_line};
use crate::workspace::InstanceWorkspace;
use actor_core::Whitelist;
use actor_snapshot::sync;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Fallback binary name when the project-named binary is absent.
const FALLBACK_BINARY: &str = "binary1";

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub output: String,
}

impl Verdict {
    fn invalid(output: impl Into<String>) -> Self {
        Self { valid: false, output: output.into() }
    }

    fn valid(output: impl Into<String>) -> Self {
        Self { valid: true, output: output.into() }
    }
}

/// Run a shell command, returning (succeeded, combined output).
pub async fn run_shell(command: &str, cwd: &Path) -> (bool, String) {
    let result = Command::new("bash")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .await;
    match result {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&stderr);
            }
            (output.status.success(), text)
        }
        Err(e) => (false, e.to_string()),
    }
}

/// Delete any file or directory named `main` in the sandbox. A binary or
/// directory under that name can shadow the reference naming the harness
/// relies on.
pub fn remove_main_artifact(sandbox: &Path) {
    let target = sandbox.join("main");
    if target.is_dir() {
        let _ = std::fs::remove_dir_all(&target);
    } else if target.exists() {
        let _ = std::fs::remove_file(&target);
    }
}

/// Drop all `tests*.jsonl` from the sandbox and restore the committed
/// suite, returning the sandbox to the last-validated test state.
pub fn recover_test_cases(ws: &InstanceWorkspace) -> Result<(), EngineError> {
    let sandbox = ws.sandbox();
    if let Ok(entries) = std::fs::read_dir(&sandbox) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with("tests") && name.ends_with(".jsonl") {
                let _ = std::fs::remove_file(entry.path());
            }
        }
    }
    let committed = ws.test_cases();
    if !committed.is_dir() {
        return Err(EngineError::MissingArea(committed.display().to_string()));
    }
    sync(&committed, &sandbox, &Whitelist::test_cases())?;
    Ok(())
}

/// Validate a translator attempt.
///
/// Hydrates `c_files/` and `test_cases/` over the sandbox first, so edits
/// to protected files never survive into the build.
pub async fn validate_translation(
    project_name: &str,
    ws: &InstanceWorkspace,
) -> Result<Verdict, EngineError> {
    let sandbox = ws.sandbox();
    ws.hydrate_sandbox(&[
        (ws.c_files(), Whitelist::c_files()),
        (ws.test_cases(), Whitelist::test_cases()),
    ])?;

    let (ok, output) = run_shell("make clean && make all", &sandbox).await;
    if !ok {
        return Ok(Verdict::invalid(output));
    }

    let (ok, output) = run_shell("cargo clean && cargo build --release", &sandbox.join("ts")).await;
    if !ok {
        if output.contains("unclosed") || output.contains("unexpected closing") {
            return Ok(Verdict::invalid("file corrupted"));
        }
        return Ok(Verdict::invalid("compile error"));
    }

    remove_main_artifact(&sandbox);

    let compare = format!("./testcmp.sh compare ./ts/target/release/{project_name}");
    let (_, output) = run_shell(&compare, &sandbox).await;
    if harness_passed(&output) {
        Ok(Verdict::valid(output))
    } else {
        Ok(Verdict::invalid(output))
    }
}

/// Validate a discriminator attempt.
///
/// Checks, in order: the C build, the harness against C, the
/// `previous + k_new` count rule, and (for ACToR on non-BSD inputs, except
/// the last attempt) that the Rust binary fails at least one new case.
/// Invalid attempts recover the committed suite before returning.
pub async fn validate_tests(
    project_name: &str,
    ws: &InstanceWorkspace,
    worker_num: u32,
    spec: &DiscriminatorSpec,
    is_bsd: bool,
) -> Result<Verdict, EngineError> {
    let sandbox = ws.sandbox();
    ws.hydrate_sandbox(&[(ws.c_files(), Whitelist::c_files())])?;

    let (ok, output) = run_shell("make clean && make all", &sandbox).await;
    if !ok {
        recover_test_cases(ws)?;
        return Ok(Verdict::invalid(format!("C code compilation failed: {output}")));
    }

    remove_main_artifact(&sandbox);

    let compare_bin = if sandbox.join(project_name).exists() {
        format!("./{project_name}")
    } else if sandbox.join(FALLBACK_BINARY).exists() {
        format!("./{FALLBACK_BINARY}")
    } else {
        recover_test_cases(ws)?;
        return Ok(Verdict::invalid(format!(
            "Neither {project_name} nor {FALLBACK_BINARY} binary found after compilation."
        )));
    };

    let (_, output) = run_shell(&format!("./testcmp.sh compare {compare_bin}"), &sandbox).await;
    if !harness_passed(&output) {
        recover_test_cases(ws)?;
        return Ok(Verdict::invalid(format!("Testcmp.sh comparison failed: {output}")));
    }

    let current_count = count_test_cases(&sandbox);
    let committed = ws.test_cases();
    if !committed.is_dir() {
        return Err(EngineError::MissingArea(committed.display().to_string()));
    }
    let last_count = count_test_cases(&committed);
    let expected = spec.k_new + last_count;
    if current_count != expected {
        recover_test_cases(ws)?;
        return Ok(Verdict::invalid(format!(
            "Test count validation failed. Expected {expected}, got {current_count}"
        )));
    }

    if !is_bsd {
        let compare = format!("./testcmp.sh compare ./ts/target/release/{project_name}");
        let (_, output) = run_shell(&compare, &sandbox).await;
        let Some(results) = parse_results_line(&output) else {
            recover_test_cases(ws)?;
            return Ok(Verdict::invalid(format!("No results line from harness: {output}")));
        };
        if results.total != current_count {
            recover_test_cases(ws)?;
            return Ok(Verdict::invalid(format!(
                "Total tests mismatch: {} vs {current_count}",
                results.total
            )));
        }
        if results.passed > results.total - spec.k_new && worker_num < 2 {
            recover_test_cases(ws)?;
            return Ok(Verdict::invalid(format!(
                "Mismatch count validation failed. Expected the Rust code to fail on the new \
                 test cases, but it passed on {} / {} tests",
                results.passed, results.total
            )));
        }
    }

    ws.commit_discrimination()?;
    Ok(Verdict::valid(format!("Test validation successful. Test count: {current_count}")))
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
