// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor operations: list, info, kill, delete, export, append.
//!
//! Operations return structured reports; rendering belongs to the CLI.

use crate::error::LpsError;
use crate::paths::{LprocPaths, StreamKind};
use crate::procfs;
use crate::scan::{self, LProcInfo};
use chrono::{DateTime, Local};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

/// Grace window after SIGTERM before escalating to SIGKILL.
const TERM_WINDOW: Duration = Duration::from_millis(1500);
const TERM_POLL: Duration = Duration::from_millis(100);
const KILL_SETTLE: Duration = Duration::from_millis(200);

/// Per-stream file facts for `list`/`info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub kind: StreamKind,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<String>,
    pub age_secs: Option<u64>,
}

/// One row of `lproc -l`.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub name: String,
    pub running: Option<LProcInfo>,
    pub files: Vec<FileReport>,
}

/// Full report of `lproc -i NAME`.
#[derive(Debug, Clone)]
pub struct InfoReport {
    pub name: String,
    pub running: Option<LProcInfo>,
    pub files: Vec<FileReport>,
    /// Seconds since the most recent write to any stream file; the
    /// liveness signal the agent runner's stall watchdog reads.
    pub age_any_io: Option<u64>,
}

/// What `kill` actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// Files exist but no pipeline was running; nothing to signal.
    NotRunning,
    /// Every pipeline process is gone. Files are retained.
    Terminated { pgid: Option<i32> },
}

fn file_report(paths: &LprocPaths, name: &str, kind: StreamKind) -> FileReport {
    let path = paths.stream_file(name, kind);
    match std::fs::metadata(&path) {
        Ok(meta) => {
            let modified = meta.modified().ok();
            let age_secs = modified
                .and_then(|m| SystemTime::now().duration_since(m).ok())
                .map(|d| d.as_secs());
            let modified_str = modified.map(|m| {
                DateTime::<Local>::from(m).format("%Y-%m-%d %H:%M:%S").to_string()
            });
            FileReport { kind, path, size: meta.len(), modified: modified_str, age_secs }
        }
        Err(_) => FileReport { kind, path, size: 0, modified: None, age_secs: None },
    }
}

fn file_reports(paths: &LprocPaths, name: &str) -> Vec<FileReport> {
    StreamKind::ALL.iter().map(|k| file_report(paths, name, *k)).collect()
}

/// All LProcs known from stdin files in the managed root, classified as
/// running or inactive by one `/proc` sweep.
pub fn list_lprocs(paths: &LprocPaths) -> Vec<ListEntry> {
    let mut index = scan::scan_index(paths);
    let mut names: Vec<String> = Vec::new();
    if let Ok(entries) = std::fs::read_dir(paths.root()) {
        for entry in entries.flatten() {
            if let Some(name) = paths.name_from_stdin(&entry.path()) {
                names.push(name);
            }
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let stdin = paths.stream_file(&name, StreamKind::Stdin);
            let running = index.remove(&stdin);
            let files = file_reports(paths, &name);
            ListEntry { name, running, files }
        })
        .collect()
}

/// Status, process group, and per-file ages for one LProc.
pub fn lproc_info(paths: &LprocPaths, name: &str) -> Result<InfoReport, LpsError> {
    let stdin = paths.stream_file(name, StreamKind::Stdin);
    if !stdin.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }
    let running = scan::find_lproc(paths, name);
    let files = file_reports(paths, name);
    let age_any_io = files.iter().filter_map(|f| f.age_secs).min();
    Ok(InfoReport { name: name.to_string(), running, files, age_any_io })
}

/// Terminate a pipeline: SIGTERM to the process group, a grace window of
/// short polls, then SIGKILL escalation (group first, stray PIDs second).
/// Residual live PIDs after the window are a hard error. Files are kept.
pub fn kill_lproc(paths: &LprocPaths, name: &str) -> Result<KillOutcome, LpsError> {
    let stdin = paths.stream_file(name, StreamKind::Stdin);
    if !stdin.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }

    let Some(info) = scan::find_lproc(paths, name) else {
        return Ok(KillOutcome::NotRunning);
    };

    let pids = info.all_pids();
    let pgid = info.pgid;

    if let Some(pgid) = pgid {
        if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
            tracing::warn!(pgid, error = %e, "killpg SIGTERM failed");
        }
    } else {
        for pid in &pids {
            let _ = nix::sys::signal::kill(Pid::from_raw(*pid), Signal::SIGTERM);
        }
    }

    let deadline = Instant::now() + TERM_WINDOW;
    while Instant::now() < deadline {
        if !pids.iter().any(|pid| procfs::alive(*pid)) {
            break;
        }
        std::thread::sleep(TERM_POLL);
    }

    let remaining: Vec<i32> = pids.iter().copied().filter(|pid| procfs::alive(*pid)).collect();
    if !remaining.is_empty() {
        if let Some(pgid) = pgid {
            if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
                tracing::warn!(pgid, error = %e, "killpg SIGKILL failed");
            }
        }
        // Stray processes may have left the group; hit them individually.
        for pid in &remaining {
            if procfs::alive(*pid) {
                let _ = nix::sys::signal::kill(Pid::from_raw(*pid), Signal::SIGKILL);
            }
        }
        std::thread::sleep(KILL_SETTLE);
    }

    let still_alive: Vec<i32> = pids.into_iter().filter(|pid| procfs::alive(*pid)).collect();
    if !still_alive.is_empty() {
        return Err(LpsError::ProcessesStillAlive(still_alive));
    }
    Ok(KillOutcome::Terminated { pgid })
}

/// Archive pipeline files. Refuses while the pipeline is running.
///
/// Files move to `<archive_root>/<name>_<YYYYMMDD_HHMMSS>/`; the timestamped
/// subdirectory keeps repeated archives of the same name from colliding.
pub fn delete_lproc(paths: &LprocPaths, name: &str) -> Result<PathBuf, LpsError> {
    let stdin = paths.stream_file(name, StreamKind::Stdin);
    if !stdin.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }
    if scan::find_lproc(paths, name).is_some() {
        return Err(LpsError::StillRunning(name.to_string()));
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let dest_dir = paths.archive_root().join(format!("{name}_{stamp}"));
    std::fs::create_dir_all(&dest_dir)
        .map_err(|e| LpsError::io(format!("creating {}", dest_dir.display()), e))?;

    for file in paths.existing_files(name) {
        if let Some(base) = file.file_name() {
            let dest = dest_dir.join(base);
            if let Err(e) = std::fs::rename(&file, &dest) {
                tracing::warn!(file = %file.display(), error = %e, "archive move failed");
            }
        }
    }
    Ok(dest_dir)
}

/// Copy the three stream files into `folder` (created if absent).
/// Returns the streams actually copied.
pub fn export_lproc(
    paths: &LprocPaths,
    name: &str,
    folder: &std::path::Path,
) -> Result<Vec<StreamKind>, LpsError> {
    let stdin = paths.stream_file(name, StreamKind::Stdin);
    if !stdin.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }
    std::fs::create_dir_all(folder)
        .map_err(|e| LpsError::io(format!("creating {}", folder.display()), e))?;

    let mut copied = Vec::new();
    for kind in StreamKind::ALL {
        let src = paths.stream_file(name, kind);
        if !src.exists() {
            continue;
        }
        let Some(base) = src.file_name() else {
            continue;
        };
        std::fs::copy(&src, folder.join(base))
            .map_err(|e| LpsError::io(format!("copying {}", src.display()), e))?;
        copied.push(kind);
    }
    Ok(copied)
}

/// Append exactly `expected` newline-terminated lines from `input` to
/// `<name>.stdin`. A line-count mismatch writes nothing.
pub fn append_lines(
    paths: &LprocPaths,
    name: &str,
    expected: i64,
    input: &mut dyn Read,
) -> Result<usize, LpsError> {
    if expected <= 0 {
        return Err(LpsError::InvalidLineCount(expected));
    }
    let expected = expected as usize;

    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .map_err(|e| LpsError::io("reading stdin".to_string(), e))?;
    if raw.is_empty() {
        return Err(LpsError::EmptyInput);
    }

    let stripped = raw.trim_end_matches(['\r', '\n']);
    let lines: Vec<&str> = if stripped.is_empty() { Vec::new() } else { stripped.lines().collect() };
    if lines.len() != expected {
        return Err(LpsError::LineCountMismatch { expected, actual: lines.len() });
    }

    let stdin_path = paths.stream_file(name, StreamKind::Stdin);
    if !stdin_path.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }

    let payload = format!("{}\n", lines.join("\n"));
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&stdin_path)
        .map_err(|e| LpsError::io(format!("opening {}", stdin_path.display()), e))?;
    file.write_all(payload.as_bytes())
        .map_err(|e| LpsError::io(format!("appending to {}", stdin_path.display()), e))?;
    Ok(expected)
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
