// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translator and discriminator worker loops.
//!
//! A worker drives up to three agent attempts. Each attempt runs a
//! session named `<instance>_<role>_iter_<k>_worker_<w>`, then validates
//! the sandbox; the first valid attempt wins.

use crate::agents::{AgentKind, DiscriminatorSpec};
use crate::error::EngineError;
use crate::invoker::AgentInvoker;
use crate::prompts;
use crate::validate::{self, Verdict};
use crate::workspace::InstanceWorkspace;
use serde_json::{json, Value};

/// Attempts per worker before surrendering.
pub const MAX_WORKERS: u32 = 3;

/// Context shared by both worker roles.
pub struct WorkerCtx<'a> {
    pub project_name: &'a str,
    pub instance_name: &'a str,
    pub workspace: &'a InstanceWorkspace,
    pub invoker: &'a dyn AgentInvoker,
    pub is_bsd: bool,
}

/// Run the translator pass for `iteration`.
///
/// The Rust subset of the sandbox is committed to `rs_files/` when the
/// loop ends, valid or not; the last attempt is the best state we have.
pub async fn run_translator(
    ctx: &WorkerCtx<'_>,
    kind: &AgentKind,
    iteration: u32,
) -> Result<Value, EngineError> {
    let mut verdict = Verdict { valid: false, output: String::new() };

    for worker_num in 0..MAX_WORKERS {
        tracing::info!(
            instance = ctx.instance_name,
            iteration,
            worker_num,
            "translator worker running"
        );
        let session_name =
            format!("{}_translator_iter_{}_worker_{}", ctx.instance_name, iteration, worker_num);
        let prompt = prompts::translator_prompt(ctx.project_name, iteration, worker_num);
        ctx.invoker
            .run(&session_name, ctx.workspace.working_dir(), &prompt, kind)
            .await?;

        verdict = validate::validate_translation(ctx.project_name, ctx.workspace).await?;
        if verdict.valid {
            tracing::info!(instance = ctx.instance_name, iteration, "translation validated");
            break;
        }
        tracing::warn!(
            instance = ctx.instance_name,
            iteration,
            worker_num,
            "translation validation failed"
        );
    }

    ctx.workspace.commit_translation()?;

    Ok(json!({
        "status": "completed",
        "valid": verdict.valid,
        "output": verdict.output,
    }))
}

/// Run the discriminator pass for `iteration`.
///
/// Valid attempts commit their suite during validation; the committed
/// `test_cases/` area is authoritative afterward either way.
pub async fn run_discriminator(
    ctx: &WorkerCtx<'_>,
    kind: &AgentKind,
    spec: &DiscriminatorSpec,
    iteration: u32,
) -> Result<Value, EngineError> {
    let mut verdict = Verdict { valid: false, output: String::new() };

    for worker_num in 0..MAX_WORKERS {
        tracing::info!(
            instance = ctx.instance_name,
            iteration,
            worker_num,
            "discriminator worker running"
        );
        let session_name = format!(
            "{}_discriminator_iter_{}_worker_{}",
            ctx.instance_name, iteration, worker_num
        );
        let prompt = prompts::discriminator_prompt(spec, iteration, worker_num, ctx.is_bsd);
        ctx.invoker
            .run(&session_name, ctx.workspace.working_dir(), &prompt, kind)
            .await?;

        verdict =
            validate::validate_tests(ctx.project_name, ctx.workspace, worker_num, spec, ctx.is_bsd)
                .await?;
        if verdict.valid {
            tracing::info!(instance = ctx.instance_name, iteration, "discrimination validated");
            break;
        }
        tracing::warn!(
            instance = ctx.instance_name,
            iteration,
            worker_num,
            "discrimination validation failed"
        );
    }

    Ok(json!({
        "status": "completed",
        "valid": verdict.valid,
        "output": verdict.output,
    }))
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
