// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline launch.
//!
//! The launched shape is:
//!
//! ```text
//! setsid bash -c "touch <stdin> && lptail -f <stdin> \
//!     | (stdbuf -oL bash -c '<cmd>') 1><stdout> 2><stderr>"
//! ```
//!
//! `setsid` detaches the orchestrator into a new session, so the whole
//! pipeline survives the caller's exit and shares one process group.

use crate::error::LpsError;
use crate::paths::{LprocPaths, StreamKind};
use crate::scan;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

/// How long `start` polls for the pipeline to appear in `/proc`.
const READINESS_ATTEMPTS: u32 = 20;
const READINESS_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The pipeline showed up in a `/proc` sweep.
    Running { pgid: Option<i32> },
    /// Launched, but not yet visible; the caller may re-check later.
    StillStarting,
}

/// Launch a detached pipeline for `name` running `command`.
pub fn start_lproc(
    paths: &LprocPaths,
    name: &str,
    command: &str,
) -> Result<StartOutcome, LpsError> {
    let conflicts = paths.existing_files(name);
    if !conflicts.is_empty() {
        return Err(LpsError::NameConflict(conflicts));
    }
    std::fs::create_dir_all(paths.root())
        .map_err(|e| LpsError::io(format!("creating {}", paths.root().display()), e))?;

    let stdin = paths.stream_file(name, StreamKind::Stdin);
    let stdout = paths.stream_file(name, StreamKind::Stdout);
    let stderr = paths.stream_file(name, StreamKind::Stderr);
    let lptail = lptail_path()?;

    let inner = format!(
        "touch {stdin} && {lptail} -f {stdin} | (stdbuf -oL bash -c {cmd}) 1>{stdout} 2>{stderr}",
        stdin = shell_quote(&stdin.to_string_lossy()),
        lptail = shell_quote(&lptail.to_string_lossy()),
        cmd = shell_quote(command),
        stdout = shell_quote(&stdout.to_string_lossy()),
        stderr = shell_quote(&stderr.to_string_lossy()),
    );

    let child = Command::new("setsid")
        .arg("bash")
        .arg("-c")
        .arg(&inner)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(LpsError::Spawn)?;

    // Reap the intermediate setsid process in the background so a
    // long-lived caller accumulates no zombies.
    std::thread::spawn(move || {
        let mut child = child;
        let _ = child.wait();
    });

    for _ in 0..READINESS_ATTEMPTS {
        if let Some(info) = scan::find_lproc(paths, name) {
            return Ok(StartOutcome::Running { pgid: info.pgid });
        }
        std::thread::sleep(READINESS_INTERVAL);
    }
    Ok(StartOutcome::StillStarting)
}

/// Locate the `lptail` follower: next to the current executable first,
/// then on PATH.
fn lptail_path() -> Result<PathBuf, LpsError> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("lptail");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    let path_var = std::env::var("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join("lptail");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(LpsError::LptailNotFound)
}

/// POSIX single-quote escaping for embedding in `bash -c`.
pub(crate) fn shell_quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "_-./=".contains(c)) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
