// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External session runner.
//!
//! Drives one LProc-hosted proxy session: seed the task prompt, poll the
//! stdout tail every few seconds for a final `result`, rescan emitted
//! sources for banned patterns before accepting it, and watch the
//! `AGE_ANY_IO` liveness signal, so a silent pipeline gets a
//! force-restart-with-resume nudge instead of hanging forever.

use crate::error::AgentError;
use crate::safety;
use actor_lps::{
    append_lines, delete_lproc, kill_lproc, lproc_info, pretty_stream, start_lproc, LprocPaths,
    StreamKind,
};
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

/// Tuning for one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Rescan `sandbox/ts/src/*.rs` before accepting the final result.
    pub sanity_check: bool,
    /// Seconds of stream silence before a force-restart-resume is issued.
    pub stall_timeout_secs: u64,
    /// Delay between stdout polls.
    pub poll_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sanity_check: true,
            stall_timeout_secs: 180,
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// What one poll of the session decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPoll {
    /// Final result observed and accepted.
    Done,
    /// Final result observed but banned patterns remain; the corrective
    /// message must be sent and the session continues.
    Violations(String),
    /// No result yet and the pipeline has been silent too long.
    Stalled,
    /// No result yet; keep waiting.
    Waiting,
}

/// Decide what to do with the current tail line and liveness age.
pub fn assess_poll(
    last_stdout_line: &str,
    sandbox_dir: &Path,
    age_any_io: Option<u64>,
    opts: &SessionOptions,
) -> SessionPoll {
    let is_result = serde_json::from_str::<Value>(last_stdout_line.trim())
        .ok()
        .and_then(|obj| obj.get("type").and_then(Value::as_str).map(|t| t == "result"))
        .unwrap_or(false);

    if is_result {
        if opts.sanity_check {
            let violations = safety::scan_rust_sources(sandbox_dir);
            if !violations.is_empty() {
                return SessionPoll::Violations(safety::violations_message(&violations));
            }
        }
        return SessionPoll::Done;
    }

    match age_any_io {
        Some(age) if age > opts.stall_timeout_secs => SessionPoll::Stalled,
        _ => SessionPoll::Waiting,
    }
}

/// The message appended when the stall watchdog fires.
pub const STALL_NUDGE: &str = "[CLAUDIX:FORCE_RESTART_RESUME] You should continue your task.";

/// Run one agent session named `name` over the LPS.
///
/// `command` is the proxy invocation (it must speak stream-JSONL on its
/// stdio). The sandbox is `work_dir/sandbox/`; the rendered transcript
/// lands in `work_dir/log_files/<name>_output.log`.
pub async fn run_session(
    paths: &LprocPaths,
    name: &str,
    command: &str,
    work_dir: &Path,
    task_prompt: &str,
    opts: &SessionOptions,
) -> Result<(), AgentError> {
    let sandbox_dir = work_dir.join("sandbox");
    let log_path = work_dir.join("log_files").join(format!("{name}_output.log"));

    // Clear any leftover pipeline from a previous attempt, best effort.
    reset_lproc(paths, name).await;

    {
        let paths = paths.clone();
        let name = name.to_string();
        let command = command.to_string();
        tokio::task::spawn_blocking(move || start_lproc(&paths, &name, &command))
            .await
            .map_err(|e| AgentError::Model(format!("start task panicked: {e}")))??;
    }

    std::fs::create_dir_all(work_dir.join("log_files"))
        .map_err(|e| AgentError::io("creating log_files", e))?;

    seed_prompt(paths, name, task_prompt)?;

    loop {
        tokio::time::sleep(opts.poll_interval).await;

        let last_line = tail_stdout_line(paths, name).unwrap_or_default();
        let age_any_io = lproc_info(paths, name).ok().and_then(|info| info.age_any_io);

        match assess_poll(&last_line, &sandbox_dir, age_any_io, opts) {
            SessionPoll::Done => break,
            SessionPoll::Violations(message) => {
                tracing::warn!(name, "banned patterns detected; asking the agent to fix them");
                append_user_message(paths, name, &message)?;
            }
            SessionPoll::Stalled => {
                tracing::warn!(name, "session stalled; forcing restart with resume");
                append_user_message(paths, name, STALL_NUDGE)?;
            }
            SessionPoll::Waiting => {
                // Keep the transcript fresh while the session runs.
                let _ = persist_transcript(paths, name, &log_path);
            }
        }
    }

    persist_transcript(paths, name, &log_path)?;
    teardown_lproc(paths, name).await?;
    Ok(())
}

async fn reset_lproc(paths: &LprocPaths, name: &str) {
    let paths = paths.clone();
    let name = name.to_string();
    let _ = tokio::task::spawn_blocking(move || {
        let _ = kill_lproc(&paths, &name);
        let _ = delete_lproc(&paths, &name);
    })
    .await;
}

async fn teardown_lproc(paths: &LprocPaths, name: &str) -> Result<(), AgentError> {
    let paths = paths.clone();
    let name = name.to_string();
    tokio::task::spawn_blocking(move || -> Result<(), AgentError> {
        kill_lproc(&paths, &name)?;
        delete_lproc(&paths, &name)?;
        Ok(())
    })
    .await
    .map_err(|e| AgentError::Model(format!("teardown task panicked: {e}")))?
}

fn seed_prompt(paths: &LprocPaths, name: &str, task_prompt: &str) -> Result<(), AgentError> {
    append_user_message(paths, name, task_prompt)
}

fn append_user_message(paths: &LprocPaths, name: &str, text: &str) -> Result<(), AgentError> {
    let line = crate::protocol::user_message(text).to_string();
    let payload = format!("{line}\n");
    append_lines(paths, name, 1, &mut Cursor::new(payload))?;
    Ok(())
}

fn tail_stdout_line(paths: &LprocPaths, name: &str) -> Option<String> {
    let mut buf = Vec::new();
    pretty_stream(paths, name, StreamKind::Stdout, 1, "un", &[], &mut buf).ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// Render the whole stdout transcript through the `cc` converter.
fn persist_transcript(paths: &LprocPaths, name: &str, log_path: &Path) -> Result<(), AgentError> {
    let mut rendered = Vec::new();
    pretty_stream(paths, name, StreamKind::Stdout, -1, "cc", &[], &mut rendered)?;
    std::fs::write(log_path, rendered)
        .map_err(|e| AgentError::io(format!("writing {}", log_path.display()), e))
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
