// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin readers over `/proc` for the process-tree scanner.
//!
//! Everything here degrades to "not found" on any read failure; a process
//! that vanishes mid-sweep must never crash the caller.

use nix::sys::signal::kill;
use nix::unistd::{getpgid, Pid};
use std::fs;
use std::path::Path;

/// argv tokens from `/proc/<pid>/cmdline`, or empty on any failure.
pub fn cmdline_tokens(pid: i32) -> Vec<String> {
    let Ok(data) = fs::read(format!("/proc/{pid}/cmdline")) else {
        return Vec::new();
    };
    data.split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect()
}

/// Process name from `/proc/<pid>/comm`.
pub fn comm(pid: i32) -> Option<String> {
    fs::read_to_string(format!("/proc/{pid}/comm")).ok().map(|s| s.trim().to_string())
}

/// Parent PID from the `PPid:` line of `/proc/<pid>/status`.
pub fn ppid(pid: i32) -> Option<i32> {
    let status = fs::read_to_string(format!("/proc/{pid}/status")).ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("PPid:") {
            return rest.trim().parse().ok();
        }
    }
    None
}

/// Child PIDs via `/proc/<pid>/task/<pid>/children`.
pub fn children(pid: i32) -> Vec<i32> {
    let Ok(content) = fs::read_to_string(format!("/proc/{pid}/task/{pid}/children")) else {
        return Vec::new();
    };
    content.split_whitespace().filter_map(|tok| tok.parse().ok()).collect()
}

/// Name and full command for a PID.
pub fn process_info(pid: i32) -> Option<(String, String)> {
    let name = comm(pid)?;
    let tokens = cmdline_tokens(pid);
    let cmd = if tokens.is_empty() { name.clone() } else { tokens.join(" ") };
    Some((name, cmd))
}

/// Whether the process still exists (signal 0 probe).
pub fn alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

/// The process group id of a PID, if it can be read.
pub fn pgid_of(pid: i32) -> Option<i32> {
    getpgid(Some(Pid::from_raw(pid))).ok().map(Pid::as_raw)
}

/// Numeric PIDs currently present in `/proc`.
pub fn all_pids() -> Vec<i32> {
    let Ok(entries) = fs::read_dir("/proc") else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str().and_then(|s| s.parse().ok()))
        .collect()
}

/// Basename of an argv token (`/usr/bin/lptail` -> `lptail`).
pub fn argv_basename(token: &str) -> &str {
    Path::new(token).file_name().and_then(|n| n.to_str()).unwrap_or(token)
}

#[cfg(test)]
#[path = "procfs_tests.rs"]
mod tests;
