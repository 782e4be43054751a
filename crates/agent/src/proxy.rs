// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proxy-side child management and result accounting.
//!
//! The proxy sits between the LProc pipeline and the LLM CLI child. It
//! tracks how many results are owed (`expected` user turns vs `seen`
//! results), captures the child's session id for resume restarts, and
//! restarts the child on request, synthesizing failure results for any
//! answers the killed child still owed.

use crate::protocol::RestartVariant;
use parking_lot::Mutex;
use serde_json::Value;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};

/// Result accounting shared between the stdout pump and the control loop.
#[derive(Debug, Default)]
pub struct ProxyState {
    expected: u64,
    seen: u64,
    latest_session_id: Option<String>,
}

/// What the stdout pump learned from one child output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdoutNote {
    None,
    /// First line of an assistant text message, for stderr previews.
    Preview(String),
    /// The line was not a processable JSON object.
    Warning(String),
}

impl ProxyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn inc_expected(&mut self) {
        self.expected += 1;
    }

    /// Results still owed by the child.
    pub fn missing(&self) -> u64 {
        self.expected.saturating_sub(self.seen)
    }

    /// After synthesizing failures, owed and seen are even again.
    pub fn balance(&mut self) {
        self.seen = self.expected;
    }

    /// Account for an extra synthesized message (NO_SEND reminder).
    pub fn note_extra_seen(&mut self) {
        self.seen += 1;
    }

    pub fn latest_session_id(&self) -> Option<&str> {
        self.latest_session_id.as_deref()
    }

    /// Digest one child stdout line: count results, capture session ids,
    /// and surface an assistant preview when one is present.
    pub fn observe_stdout_line(&mut self, line: &str) -> StdoutNote {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return StdoutNote::None;
        }
        let obj: Value = match serde_json::from_str(trimmed) {
            Ok(obj) => obj,
            Err(_) => {
                return StdoutNote::Warning(format!(
                    "Unparseable JSON from child: {}",
                    truncate(trimmed, 100)
                ))
            }
        };
        let Some(obj) = obj.as_object() else {
            return StdoutNote::Warning(format!("Non-dict JSON from child: {}", truncate(trimmed, 100)));
        };

        if let Some(sid) = obj.get("session_id").and_then(Value::as_str) {
            self.latest_session_id = Some(sid.to_string());
        }

        match obj.get("type").and_then(Value::as_str) {
            Some("result") => {
                self.seen += 1;
                StdoutNote::None
            }
            Some("assistant") => assistant_preview(obj),
            _ => StdoutNote::None,
        }
    }
}

fn assistant_preview(obj: &serde_json::Map<String, Value>) -> StdoutNote {
    let texts: Vec<&str> = obj
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|i| i.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|i| i.get("text").and_then(Value::as_str))
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let body = texts.join("\n");
    let body = body.trim();
    if body.is_empty() {
        return StdoutNote::None;
    }
    let first = body.lines().next().unwrap_or_default();
    let multi = body.contains('\n');
    StdoutNote::Preview(if multi { format!("{first} ...") } else { first.to_string() })
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Remove any `--resume <id>` pair from an argv.
pub fn strip_resume_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--resume" {
            skip_next = true;
            continue;
        }
        out.push(arg.clone());
    }
    out
}

/// The argv used when restarting with a preserved session.
pub fn resume_args(args: &[String], session_id: &str) -> Vec<String> {
    let mut out = strip_resume_args(args);
    out.push("--resume".to_string());
    out.push(session_id.to_string());
    out
}

/// The supervised LLM CLI child plus its I/O pumps.
pub struct ChildRunner {
    args: Vec<String>,
    state: Arc<Mutex<ProxyState>>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl ChildRunner {
    pub fn new(args: Vec<String>, state: Arc<Mutex<ProxyState>>) -> Self {
        Self { args, state, child: None, stdin: None }
    }

    pub fn state(&self) -> Arc<Mutex<ProxyState>> {
        Arc::clone(&self.state)
    }

    /// Spawn the child with the current argv and start the stdout/stderr
    /// pumps. Child stdout is mirrored to our stdout unchanged; previews
    /// and warnings go to stderr.
    pub async fn start(&mut self) -> std::io::Result<()> {
        self.spawn_with(self.args.clone()).await
    }

    async fn spawn_with(&mut self, args: Vec<String>) -> std::io::Result<()> {
        let Some((program, rest)) = args.split_first() else {
            return Err(std::io::Error::other("empty child command"));
        };
        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        self.stdin = child.stdin.take();

        if let Some(stdout) = child.stdout.take() {
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    println!("{line}");
                    let note = state.lock().observe_stdout_line(&line);
                    match note {
                        StdoutNote::Preview(preview) => eprintln!("{preview}"),
                        StdoutNote::Warning(warning) => eprintln!("[claudix] Warning: {warning}"),
                        StdoutNote::None => {}
                    }
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("{line}");
                }
            });
        }

        eprintln!("[claudix] started PID {:?}: {}", child.id(), args.join(" "));
        self.child = Some(child);
        Ok(())
    }

    /// Close stdin, terminate, and reap the child.
    pub async fn stop(&mut self) -> Option<i32> {
        self.stdin = None;
        let mut child = self.child.take()?;
        let _ = child.start_kill();
        match tokio::time::timeout(Duration::from_secs(3), child.wait()).await {
            Ok(Ok(status)) => status.code(),
            _ => {
                let _ = child.kill().await;
                None
            }
        }
    }

    pub async fn restart(&mut self) -> std::io::Result<()> {
        self.stop().await;
        self.spawn_with(self.args.clone()).await
    }

    /// Restart with `--resume <latest_session_id>`. Falls back to a plain
    /// restart (with a warning) when no session id has been captured yet.
    pub async fn restart_with_resume(&mut self) -> std::io::Result<()> {
        self.stop().await;
        let session_id = self.state.lock().latest_session_id().map(str::to_string);
        match session_id {
            Some(sid) => {
                let args = resume_args(&self.args, &sid);
                eprintln!("[claudix] restarting with --resume {sid}");
                self.args = args.clone();
                self.spawn_with(args).await
            }
            None => {
                eprintln!("[claudix] Warning: no session_id tracked yet, restarting without resume");
                self.spawn_with(self.args.clone()).await
            }
        }
    }

    /// Write one line to the child's stdin. Returns false when the child
    /// has closed its input (commonly because it already exited).
    pub async fn write_line(&mut self, line: &str) -> bool {
        let Some(stdin) = self.stdin.as_mut() else {
            return false;
        };
        let payload = format!("{line}\n");
        stdin.write_all(payload.as_bytes()).await.is_ok() && stdin.flush().await.is_ok()
    }

    /// Non-blocking child exit probe.
    pub fn try_wait(&mut self) -> Option<i32> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(Some(status)) => Some(status.code().unwrap_or(1)),
            _ => None,
        }
    }

    /// Handle a forced restart end-to-end: synthesize owed results on
    /// stdout, rebalance counters, emit the NO_SEND reminder if the
    /// variant calls for one, and relaunch (with resume when requested).
    pub async fn force_restart(&mut self, variant: RestartVariant) -> std::io::Result<()> {
        let missing = self.state.lock().missing();
        eprintln!(
            "[claudix] {variant:?} requested; killing child (missing {missing} results)..."
        );
        self.stop().await;

        if missing > 0 {
            let failure = crate::protocol::failure_result(variant);
            for _ in 0..missing {
                println!("{failure}");
            }
            self.state.lock().balance();
            eprintln!("[claudix] Injected {missing} failure messages and balanced counters");
        }

        if !variant.forwards_message() {
            let reminder = crate::protocol::no_send_reminder(variant);
            println!("{reminder}");
            self.state.lock().note_extra_seen();
        }

        if variant.resumes() {
            self.restart_with_resume().await
        } else {
            self.spawn_with(self.args.clone()).await
        }
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
