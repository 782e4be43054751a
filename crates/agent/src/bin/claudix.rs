// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `claudix`: proxy between an LProc pipeline and an LLM CLI child.
//!
//! Mirrors child stdout/stderr, previews assistant text on stderr, tracks
//! owed results per user turn, and honors `[CLAUDIX:*]` restart sentinels
//! embedded in user messages. When the `sand` sandbox utility is on PATH
//! the child runs under `sand --in-docker --`.

use actor_agent::protocol::{extract_restart, is_user_message, RestartVariant};
use actor_agent::proxy::{ChildRunner, ProxyState};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default child invocation; override with `CLAUDIX_CMD`.
const DEFAULT_CMD: &str = "claude -p --dangerously-skip-permissions --model sonnet \
    --output-format stream-json --input-format stream-json --verbose";

fn build_child_args(extra: Vec<String>) -> Vec<String> {
    let base = std::env::var("CLAUDIX_CMD").unwrap_or_else(|_| DEFAULT_CMD.to_string());
    let mut args: Vec<String> = Vec::new();
    if sand_available() {
        args.extend(["sand".to_string(), "--in-docker".to_string(), "--".to_string()]);
    }
    args.extend(base.split_whitespace().map(str::to_string));
    args.extend(extra);
    args
}

fn sand_available() -> bool {
    let path_var = std::env::var("PATH").unwrap_or_default();
    std::env::split_paths(&path_var).any(|dir| dir.join("sand").is_file())
}

#[tokio::main]
async fn main() {
    let extra: Vec<String> = std::env::args().skip(1).collect();
    std::process::exit(run(extra).await);
}

async fn run(extra: Vec<String>) -> i32 {
    let args = build_child_args(extra);
    let state = Arc::new(Mutex::new(ProxyState::new()));
    let mut runner = ChildRunner::new(args, Arc::clone(&state));
    if let Err(e) = runner.start().await {
        eprintln!("[claudix] Error launching child: {e}");
        return 1;
    }

    // Read stdin on a plain thread so the main loop can poll the child
    // for exit between lines instead of blocking forever on input.
    let (tx, mut rx) = mpsc::channel::<String>(64);
    std::thread::spawn(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
        // Dropping tx signals end-of-input.
    });

    let mut child_rc: Option<i32> = None;

    loop {
        if let Some(code) = runner.try_wait() {
            child_rc = Some(code);
            break;
        }

        let line = match tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
            Err(_) => continue,
            Ok(None) => break,
            Ok(Some(line)) => line,
        };

        if line.is_empty() {
            let _ = runner.write_line("").await;
            continue;
        }

        let parsed: Option<Value> = match serde_json::from_str(&line) {
            Ok(obj) => Some(obj),
            Err(_) => {
                let preview: String = line.chars().take(100).collect();
                eprintln!(
                    "[claudix] Warning: Malformed JSON received on stdin (forwarding to child): {preview}"
                );
                None
            }
        };

        let (variant, stripped) = match &parsed {
            Some(obj) => extract_restart(obj),
            None => (None, None),
        };

        match variant {
            None => {
                if parsed.as_ref().map(is_user_message).unwrap_or(false) {
                    state.lock().inc_expected();
                }
                if !runner.write_line(&line).await {
                    child_rc = Some(runner.try_wait().unwrap_or(1));
                    eprintln!("[claudix] Child process closed stdin; exiting.");
                    break;
                }
            }
            Some(RestartVariant::Restart) => {
                let expected_at_trigger = state.lock().expected();
                let mut waited = 0u64;
                while state.lock().seen() < expected_at_trigger {
                    waited += 2;
                    eprintln!("[claudix] RESTART requested; waiting for result... {waited}s");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
                eprintln!("[claudix] All results received; restarting child...");
                if let Err(e) = runner.restart().await {
                    eprintln!("[claudix] Error restarting child: {e}");
                    child_rc = Some(1);
                    break;
                }
                if !forward_stripped(&mut runner, &state, stripped).await {
                    child_rc = Some(runner.try_wait().unwrap_or(1));
                    break;
                }
            }
            Some(variant) => {
                if let Err(e) = runner.force_restart(variant).await {
                    eprintln!("[claudix] Error restarting child: {e}");
                    child_rc = Some(1);
                    break;
                }
                if variant.forwards_message()
                    && !forward_stripped(&mut runner, &state, stripped).await
                {
                    child_rc = Some(runner.try_wait().unwrap_or(1));
                    break;
                }
            }
        }
    }

    let rc = runner.stop().await;
    child_rc.or(rc).unwrap_or(0)
}

async fn forward_stripped(
    runner: &mut ChildRunner,
    state: &Arc<Mutex<ProxyState>>,
    stripped: Option<Value>,
) -> bool {
    let Some(stripped) = stripped else {
        return true;
    };
    if is_user_message(&stripped) {
        state.lock().inc_expected();
        eprintln!("[claudix] Sending modified message to new instance (counted as user message)");
    }
    if runner.write_line(&stripped.to_string()).await {
        true
    } else {
        eprintln!("[claudix] Warning: failed to write to restarted process stdin.");
        false
    }
}
