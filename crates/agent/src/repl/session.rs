// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The REPL session loop.

use super::config::{ReplConfig, COMPLETION_SENTINEL, MAX_TOKENS_PER_QUERY};
use super::model::{Message, Model};
use super::outcome::{DoneStatus, StepOutcome};
use crate::error::AgentError;
use crate::safety;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Checkpoint document persisted after every message.
#[derive(Debug, Serialize, Deserialize)]
struct Checkpoint {
    messages: Vec<Message>,
    total_cost: f64,
    #[serde(default)]
    total_tokens: u64,
}

/// A REPL-style agent bound to one sandbox directory.
pub struct ReplAgent<M: Model> {
    pub agent_id: String,
    config: ReplConfig,
    model: M,
    messages: Vec<Message>,
    sandbox_dir: PathBuf,
    log_path: PathBuf,
    checkpoint_path: PathBuf,
    total_cost: f64,
    total_tokens: u64,
    steps: u32,
}

impl<M: Model> ReplAgent<M> {
    /// Create an agent, restoring an existing checkpoint when one is
    /// present and well-formed (system + user prefix required).
    pub fn new(
        agent_id: &str,
        config: ReplConfig,
        model: M,
        sandbox_dir: &Path,
        log_path: &Path,
        checkpoint_path: &Path,
    ) -> Result<Self, AgentError> {
        let mut agent = Self {
            agent_id: agent_id.to_string(),
            config,
            model,
            messages: Vec::new(),
            sandbox_dir: sandbox_dir.to_path_buf(),
            log_path: log_path.to_path_buf(),
            checkpoint_path: checkpoint_path.to_path_buf(),
            total_cost: 0.0,
            total_tokens: 0,
            steps: 0,
        };

        if checkpoint_path.exists() {
            match agent.restore_checkpoint() {
                Ok(()) => return Ok(agent),
                Err(e) => tracing::warn!(error = %e, "ignoring unusable checkpoint"),
            }
        }
        if let Some(parent) = checkpoint_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AgentError::io("creating checkpoint dir", e))?;
        }
        agent.write_checkpoint()?;
        Ok(agent)
    }

    fn restore_checkpoint(&mut self) -> Result<(), AgentError> {
        let body = std::fs::read_to_string(&self.checkpoint_path)
            .map_err(|e| AgentError::io("reading checkpoint", e))?;
        let checkpoint: Checkpoint = serde_json::from_str(&body).map_err(|e| {
            AgentError::Checkpoint {
                path: self.checkpoint_path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        let valid = checkpoint.messages.len() >= 2
            && checkpoint.messages[0].role == "system"
            && checkpoint.messages[1].role == "user";
        if !valid {
            return Err(AgentError::Checkpoint {
                path: self.checkpoint_path.display().to_string(),
                message: "missing system/user prefix".to_string(),
            });
        }
        self.messages = checkpoint.messages;
        self.total_cost = checkpoint.total_cost;
        self.total_tokens = checkpoint.total_tokens;
        Ok(())
    }

    fn write_checkpoint(&self) -> Result<(), AgentError> {
        let doc = Checkpoint {
            messages: self.messages.clone(),
            total_cost: self.total_cost,
            total_tokens: self.total_tokens,
        };
        let body = serde_json::to_string_pretty(&doc).map_err(|e| AgentError::Checkpoint {
            path: self.checkpoint_path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.checkpoint_path, body)
            .map_err(|e| AgentError::io("writing checkpoint", e))
    }

    fn add_message(&mut self, role: &str, content: &str) -> Result<(), AgentError> {
        self.append_log(&format!(
            "==============================================\n[INFO] Role: {role}\n[INFO] Content: {content}\n"
        ));
        self.messages.push(Message::new(role, content));
        self.write_checkpoint()
    }

    fn append_log(&self, text: &str) {
        if let Some(parent) = self.log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(mut file) =
            std::fs::OpenOptions::new().create(true).append(true).open(&self.log_path)
        {
            let _ = file.write_all(text.as_bytes());
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Run steps until the session ends; returns (status, final message).
    pub async fn run(&mut self, task: &str) -> Result<(DoneStatus, String), AgentError> {
        if self.messages.is_empty() {
            let system = self.config.system_template.clone();
            self.add_message("system", &system)?;
            let instance = self.config.render_instance(task);
            self.add_message("user", &instance)?;
        }
        // A restored checkpoint may end on an assistant turn; replay its
        // action so the conversation resumes on a user message.
        if self.messages.last().map(|m| m.role == "assistant").unwrap_or(false) {
            let content = self.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            match self.observe(&content).await? {
                StepOutcome::Done { status, message } => return Ok((status, message)),
                StepOutcome::Continue(obs) | StepOutcome::Retry(obs) => {
                    self.add_message("user", &obs)?;
                }
            }
        }

        loop {
            match self.step().await? {
                StepOutcome::Done { status, message } => return Ok((status, message)),
                StepOutcome::Continue(obs) | StepOutcome::Retry(obs) => {
                    self.add_message("user", &obs)?;
                }
            }
        }
    }

    /// One turn: query the model, record the reply, execute its action.
    pub async fn step(&mut self) -> Result<StepOutcome, AgentError> {
        if let Some(limit_msg) = self.limits_exceeded() {
            return Ok(StepOutcome::Done {
                status: DoneStatus::LimitsExceeded,
                message: limit_msg,
            });
        }

        let response = self.model.query(&self.messages).await?;
        self.steps += 1;
        self.total_cost += response.cost;
        self.total_tokens = response.total_tokens;
        self.append_log(&format!(
            "==============================================\n[INFO] Used tokens: {}\n[INFO] Cost of the last query: {}\n[INFO] Total Cost Until Now: {}\n",
            response.total_tokens, response.cost, self.total_cost
        ));
        let content = response.content.clone();
        self.add_message("assistant", &content)?;
        self.observe(&content).await
    }

    fn limits_exceeded(&self) -> Option<String> {
        if self.total_cost >= self.config.cost_limit {
            return Some(format!(
                "cost limit reached: ${:.2} >= ${:.2}",
                self.total_cost, self.config.cost_limit
            ));
        }
        if self.config.step_limit > 0 && self.steps >= self.config.step_limit {
            return Some(format!("step limit reached: {} steps", self.steps));
        }
        let effective = self.model.max_context_length().saturating_sub(MAX_TOKENS_PER_QUERY);
        if effective > 0 && self.total_tokens >= effective {
            return Some(format!(
                "context limit reached: {} >= {} tokens",
                self.total_tokens, effective
            ));
        }
        None
    }

    /// Parse the assistant reply, run its action, and classify the result.
    async fn observe(&mut self, content: &str) -> Result<StepOutcome, AgentError> {
        let action = match parse_action(content) {
            Ok(action) => action,
            Err(count) => return Ok(StepOutcome::Retry(self.config.render_format_error(count))),
        };

        if let Some(message) = safety::check_code(&action) {
            return Ok(StepOutcome::Retry(message.to_string()));
        }

        let timeout = Duration::from_secs(self.config.action_timeout_secs);
        let (output, timed_out) = execute_shell(&action, &self.sandbox_dir, timeout).await?;

        self.append_log(&format!(
            "==============================================\nAction: {action}\nOutput: {} bytes\n",
            output.len()
        ));

        if timed_out {
            return Ok(StepOutcome::Retry(self.config.render_timeout(&action, &output)));
        }

        if let Some(final_output) = submitted_output(&output) {
            return Ok(StepOutcome::Done { status: DoneStatus::Submitted, message: final_output });
        }

        Ok(StepOutcome::Continue(self.config.render_observation(&output)))
    }
}

/// Extract exactly one fenced bash action. Errs with the count found.
pub fn parse_action(content: &str) -> Result<String, usize> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = RE.get_or_init(|| Regex::new(r"(?s)```bash\n(.*?)\n```").ok()).as_ref() else {
        return Err(0);
    };
    let actions: Vec<String> = re.captures_iter(content).map(|c| c[1].trim().to_string()).collect();
    match actions.len() {
        1 => Ok(actions.into_iter().next().unwrap_or_default()),
        n => Err(n),
    }
}

/// Check action output for the completion sentinel; returns the final
/// output (everything after the sentinel line) when present.
pub fn submitted_output(output: &str) -> Option<String> {
    let mut lines = output.trim_start().lines();
    if lines.next()?.trim() != COMPLETION_SENTINEL {
        return None;
    }
    Some(lines.collect::<Vec<_>>().join("\n"))
}

/// Run a shell action in the sandbox with a timeout.
///
/// Returns (combined output, timed_out). On timeout the action is killed
/// and its partial output is discarded.
async fn execute_shell(
    action: &str,
    cwd: &Path,
    timeout: Duration,
) -> Result<(String, bool), AgentError> {
    let mut child = Command::new("bash")
        .arg("-c")
        .arg(action)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AgentError::io("spawning action", e))?;

    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let reader = async {
        let mut stdout = String::new();
        let mut stderr = String::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut stdout).await;
        }
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut stderr).await;
        }
        if stderr.is_empty() {
            stdout
        } else if stdout.is_empty() {
            stderr
        } else {
            format!("{stdout}\n{stderr}")
        }
    };

    match tokio::time::timeout(timeout, reader).await {
        Ok(output) => {
            let _ = child.wait().await;
            Ok((output, false))
        }
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            Ok((String::new(), true))
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
