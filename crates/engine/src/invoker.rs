// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent invocation seam between workers and runners.
//!
//! Workers name the session, build the prompt, and hand both to an
//! invoker. The default invoker dispatches on the agent kind's runner
//! family; tests substitute a scripted invoker that edits the sandbox.

use crate::agents::{AgentKind, RunnerFamily};
use crate::error::EngineError;
use actor_agent::repl::{AnthropicModel, ReplAgent, ReplConfig};
use actor_agent::{run_session, SessionOptions};
use actor_lps::LprocPaths;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Drive one agent session to completion over `work_dir/sandbox/`.
    async fn run(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
        kind: &AgentKind,
    ) -> Result<(), EngineError>;
}

/// Production invoker: external sessions over the LPS, in-process
/// sessions over the REPL runner.
pub struct DefaultInvoker {
    paths: LprocPaths,
    /// Proxy invocation hosted inside the LProc (speaks stream-JSONL).
    proxy_command: String,
}

impl DefaultInvoker {
    pub fn new(paths: LprocPaths, proxy_command: impl Into<String>) -> Self {
        Self { paths, proxy_command: proxy_command.into() }
    }

    pub fn with_default_proxy(paths: LprocPaths) -> Self {
        Self::new(paths, "claudix")
    }

    async fn run_external(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
    ) -> Result<(), EngineError> {
        run_session(
            &self.paths,
            session_name,
            &self.proxy_command,
            work_dir,
            prompt,
            &SessionOptions::default(),
        )
        .await?;
        Ok(())
    }

    async fn run_in_process(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
        kind: &AgentKind,
    ) -> Result<(), EngineError> {
        let api_key = api_key()?;
        let model = AnthropicModel::new(&kind.model, &api_key);
        let log_dir = work_dir.join("log_files");
        let mut agent = ReplAgent::new(
            session_name,
            ReplConfig::default(),
            model,
            &work_dir.join("sandbox"),
            &log_dir.join(format!("{session_name}_output.log")),
            &log_dir.join(format!("{session_name}_checkpoint.json")),
        )?;
        let (status, message) = agent.run(prompt).await?;
        tracing::info!(session = session_name, %status, "in-process session finished: {message}");
        Ok(())
    }
}

fn api_key() -> Result<String, EngineError> {
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    std::fs::read_to_string("./__secret__/claude.key")
        .map(|k| k.trim().to_string())
        .map_err(|e| EngineError::io("reading ./__secret__/claude.key", e))
}

#[async_trait]
impl AgentInvoker for DefaultInvoker {
    async fn run(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
        kind: &AgentKind,
    ) -> Result<(), EngineError> {
        match kind.family {
            RunnerFamily::External => self.run_external(session_name, work_dir, prompt).await,
            RunnerFamily::InProcess => {
                self.run_in_process(session_name, work_dir, prompt, kind).await
            }
        }
    }
}
