// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass `/proc` scanner.
//!
//! The anchor for each pipeline is its `lptail -f <stdin>` follower: from
//! there the scanner walks up to the orchestrator bash and back down
//! through the subshell to the inner `bash -c` and the command processes.
//! One sweep builds an index keyed by stdin path; lookups against that
//! index answer "is LProc X running".

use crate::paths::{LprocPaths, StreamKind};
use crate::procfs;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

/// One process in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
    pub cmd: String,
}

impl ProcessInfo {
    fn read(pid: i32) -> Option<Self> {
        let (name, cmd) = procfs::process_info(pid)?;
        Some(Self { pid, name, cmd })
    }
}

/// Everything the scanner reconstructs about one running pipeline.
#[derive(Debug, Clone)]
pub struct LProcInfo {
    pub name: String,
    pub stdin_file: PathBuf,
    pub stdout_file: PathBuf,
    pub stderr_file: PathBuf,
    /// The `lptail -f <stdin>` follower.
    pub tail: ProcessInfo,
    /// The orchestrator bash that owns the whole pipeline.
    pub orchestrator: ProcessInfo,
    /// Process group id shared by every pipeline member.
    pub pgid: Option<i32>,
    /// `-c` payload of the orchestrator bash.
    pub outer_bash_c: String,
    /// The inner `bash -c` running the user command, when still present.
    pub inner_bash: Option<ProcessInfo>,
    /// `-c` payload of the inner bash.
    pub inner_bash_c: String,
    /// The command processes themselves.
    pub commands: Vec<ProcessInfo>,
}

impl LProcInfo {
    /// All PIDs the kill path must account for.
    pub fn all_pids(&self) -> Vec<i32> {
        let mut pids = vec![self.tail.pid, self.orchestrator.pid];
        pids.extend(self.commands.iter().map(|p| p.pid));
        pids
    }
}

/// Sweep `/proc` once and index every managed pipeline by stdin path.
pub fn scan_index(paths: &LprocPaths) -> HashMap<PathBuf, LProcInfo> {
    let mut index = HashMap::new();
    for pid in procfs::all_pids() {
        let argv = procfs::cmdline_tokens(pid);
        if argv.is_empty() || procfs::argv_basename(&argv[0]) != "lptail" {
            continue;
        }
        let Some(stdin_path) = follow_target(&argv) else {
            continue;
        };
        let Some(name) = paths.name_from_stdin(&stdin_path) else {
            continue;
        };
        if let Some(info) = reconstruct(paths, pid, &argv, stdin_path, name) {
            index.insert(info.stdin_file.clone(), info);
        }
    }
    index
}

/// Look up a single LProc by name via a fresh sweep.
pub fn find_lproc(paths: &LprocPaths, name: &str) -> Option<LProcInfo> {
    let stdin = paths.stream_file(name, StreamKind::Stdin);
    scan_index(paths).remove(&stdin)
}

/// The `<path>` following `-f` in an lptail argv.
fn follow_target(argv: &[String]) -> Option<PathBuf> {
    let fi = argv.iter().position(|a| a == "-f")?;
    argv.get(fi + 1).map(PathBuf::from)
}

fn reconstruct(
    paths: &LprocPaths,
    tail_pid: i32,
    tail_argv: &[String],
    stdin_path: PathBuf,
    name: String,
) -> Option<LProcInfo> {
    let orchestrator_pid = procfs::ppid(tail_pid)?;
    let orchestrator = ProcessInfo::read(orchestrator_pid)?;

    // Siblings of lptail under the orchestrator; the subshell hosting the
    // command preferably carries stdbuf in its cmdline.
    let siblings: Vec<i32> = procfs::children(orchestrator_pid)
        .into_iter()
        .filter(|pid| *pid != tail_pid)
        .collect();
    let subshell_pid = siblings
        .iter()
        .copied()
        .find(|pid| {
            procfs::process_info(*pid).map(|(_, cmd)| cmd.contains("stdbuf")).unwrap_or(false)
        })
        .or_else(|| siblings.first().copied());

    let (inner_bash, mut inner_bash_c) = locate_inner_bash(subshell_pid);
    let commands = resolve_commands(subshell_pid, inner_bash.as_ref());

    let pgid = procfs::pgid_of(orchestrator_pid);
    let outer_bash_c = bash_c_payload(&procfs::cmdline_tokens(orchestrator_pid));
    if inner_bash_c.is_empty() {
        // The inner bash may have exec'd away; recover its payload from the
        // outer command line.
        inner_bash_c = extract_inner_payload(&outer_bash_c);
    }

    Some(LProcInfo {
        stdout_file: paths.stream_file(&name, StreamKind::Stdout),
        stderr_file: paths.stream_file(&name, StreamKind::Stderr),
        name,
        stdin_file: stdin_path,
        tail: ProcessInfo {
            pid: tail_pid,
            name: procfs::comm(tail_pid).unwrap_or_else(|| "lptail".to_string()),
            cmd: tail_argv.join(" "),
        },
        orchestrator,
        pgid,
        outer_bash_c,
        inner_bash,
        inner_bash_c,
        commands,
    })
}

/// Find the inner `bash -c` that receives the piped stdin.
///
/// Checked in order: the subshell itself, direct children of the subshell,
/// then children of an intermediate stdbuf wrapper.
fn locate_inner_bash(subshell_pid: Option<i32>) -> (Option<ProcessInfo>, String) {
    let Some(subshell) = subshell_pid else {
        return (None, String::new());
    };

    if let Some(found) = bash_c_of(subshell) {
        return found;
    }

    let level1 = procfs::children(subshell);
    for child in &level1 {
        if let Some(found) = bash_c_of(*child) {
            return found;
        }
    }
    for child in &level1 {
        let argv = procfs::cmdline_tokens(*child);
        if argv.first().map(|a| procfs::argv_basename(a)) == Some("stdbuf") {
            for grandchild in procfs::children(*child) {
                if let Some(found) = bash_c_of(grandchild) {
                    return found;
                }
            }
        }
    }
    (None, String::new())
}

fn bash_c_of(pid: i32) -> Option<(Option<ProcessInfo>, String)> {
    let argv = procfs::cmdline_tokens(pid);
    if argv.first().map(|a| procfs::argv_basename(a)) != Some("bash") {
        return None;
    }
    let payload = bash_c_payload(&argv);
    if payload.is_empty() {
        return None;
    }
    Some((ProcessInfo::read(pid), payload))
}

/// Resolve the command processes of the pipeline.
///
/// When the inner bash has exec'd its final command it has no children; in
/// that case the subshell itself is the command, unless it is still a
/// bash/stdbuf wrapper.
fn resolve_commands(subshell_pid: Option<i32>, inner_bash: Option<&ProcessInfo>) -> Vec<ProcessInfo> {
    let subshell_is_wrapper = subshell_pid
        .map(|pid| {
            let argv = procfs::cmdline_tokens(pid);
            matches!(
                argv.first().map(|a| procfs::argv_basename(a)),
                Some("bash") | Some("stdbuf")
            )
        })
        .unwrap_or(true);

    let pids: Vec<i32> = match inner_bash {
        Some(inner) => {
            let kids = procfs::children(inner.pid);
            if kids.is_empty() && !subshell_is_wrapper {
                subshell_pid.into_iter().collect()
            } else {
                kids
            }
        }
        None => {
            if !subshell_is_wrapper {
                subshell_pid.into_iter().collect()
            } else {
                subshell_pid.map(procfs::children).unwrap_or_default()
            }
        }
    };
    pids.into_iter().filter_map(ProcessInfo::read).collect()
}

/// The token following `-c` in a bash argv, if any.
fn bash_c_payload(argv: &[String]) -> String {
    argv.iter()
        .position(|a| a == "-c")
        .and_then(|ci| argv.get(ci + 1))
        .cloned()
        .unwrap_or_default()
}

/// Heuristically extract an inner `bash -c '<payload>'` from an outer
/// command string.
fn extract_inner_payload(outer: &str) -> String {
    static INNER_RE: std::sync::OnceLock<Option<Regex>> = std::sync::OnceLock::new();
    let re = INNER_RE.get_or_init(|| Regex::new(r#"bash\s+-c\s+(['"])(.*?)\1"#).ok());
    re.as_ref()
        .and_then(|re| re.captures(outer))
        .map(|cap| cap[2].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
