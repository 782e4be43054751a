// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The iteration state machine.
//!
//! ```text
//! QUEUED -> INITIALIZING -> TRANSLATING (iteration 0) -> backup 0
//!   -> while iteration <= max: DISCRIMINATING -> TRANSLATING -> backup k
//!   -> COMPLETED   (or STOPPED / ERROR)
//! ```
//!
//! Iteration 0 is skipped when the workspace was restored from a backup
//! (continuation/fork sets `current_iteration > 0`). Stop and pause flags
//! are honored at every phase boundary, never mid-agent.

use crate::error::EngineError;
use crate::instance::ProjectInstance;
use crate::invoker::AgentInvoker;
use crate::worker::{self, WorkerCtx};
use actor_core::{Clock, Phase, ProjectStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

enum Control {
    Continue,
    Stopped,
}

/// Run one instance to a terminal state. All errors are captured into the
/// state document; this function never propagates them to the scheduler.
pub async fn run_instance<C: Clock>(
    inst: Arc<ProjectInstance>,
    invoker: Arc<dyn AgentInvoker>,
    clock: C,
) {
    if let Err(e) = drive(&inst, invoker.as_ref(), &clock).await {
        tracing::error!(instance = inst.instance_name, error = %e, "instance failed");
        {
            let mut state = inst.state.lock();
            state.status = ProjectStatus::Error;
            state.errors.push(e.to_string());
        }
        let _ = inst.save_state(&clock.now_iso());
    }
}

async fn drive<C: Clock>(
    inst: &Arc<ProjectInstance>,
    invoker: &dyn AgentInvoker,
    clock: &C,
) -> Result<(), EngineError> {
    // A restored session arrives with a populated workspace and a nonzero
    // iteration; it must not be re-seeded from the input.
    let is_restored = inst.current_iteration() > 0 && inst.workspace.is_populated();

    if !is_restored {
        inst.set_status(ProjectStatus::Initializing, None);
        inst.state.lock().start_time = Some(clock.now_iso());
        inst.save_state(&clock.now_iso())?;
        inst.workspace.initialize(&inst.input_dir)?;
        inst.save_state(&clock.now_iso())?;
    } else if inst.state.lock().start_time.is_none() {
        inst.state.lock().start_time = Some(clock.now_iso());
        inst.save_state(&clock.now_iso())?;
    }

    let ctx = WorkerCtx {
        project_name: &inst.project_name,
        instance_name: &inst.instance_name,
        workspace: &inst.workspace,
        invoker,
        is_bsd: inst.is_bsd,
    };

    // Iteration 0: bootstrap translation, no discrimination before it.
    if inst.current_iteration() == 0 {
        if let Control::Stopped = check_control(inst, clock).await? {
            return Ok(());
        }

        inst.set_status(ProjectStatus::Translating, Some(Phase::InitialTranslation));
        inst.save_state(&clock.now_iso())?;

        let details = worker::run_translator(&ctx, &inst.translator, 0).await?;
        push_history(inst, clock, "translate", details)?;
        inst.workspace.commit_translation()?;

        if let Control::Stopped = check_control(inst, clock).await? {
            return Ok(());
        }

        let backup = inst.workspace.create_backup(0)?;
        {
            let mut state = inst.state.lock();
            state.push_backup(&clock.now_iso(), 0, &backup);
            state.current_iteration = 1;
        }
        inst.save_state(&clock.now_iso())?;
    }

    // Refinement loop: discriminate, then translate, then back up.
    while inst.current_iteration() <= inst.max_iterations() {
        if let Control::Stopped = check_control(inst, clock).await? {
            return Ok(());
        }
        let iteration = inst.current_iteration();

        inst.set_status(ProjectStatus::Discriminating, Some(Phase::Discrimination));
        inst.save_state(&clock.now_iso())?;
        let details = worker::run_discriminator(
            &ctx,
            &inst.discriminator,
            &inst.discriminator_spec,
            iteration,
        )
        .await?;
        push_history(inst, clock, "discriminate", details)?;
        inst.workspace.commit_discrimination()?;

        if let Control::Stopped = check_control(inst, clock).await? {
            return Ok(());
        }

        inst.set_status(ProjectStatus::Translating, Some(Phase::Translation));
        inst.save_state(&clock.now_iso())?;
        let details = worker::run_translator(&ctx, &inst.translator, iteration).await?;
        push_history(inst, clock, "translate", details)?;
        inst.workspace.commit_translation()?;

        if let Control::Stopped = check_control(inst, clock).await? {
            return Ok(());
        }

        let backup = inst.workspace.create_backup(iteration)?;
        {
            let mut state = inst.state.lock();
            state.push_backup(&clock.now_iso(), iteration, &backup);
            state.current_iteration += 1;
        }
        inst.save_state(&clock.now_iso())?;
    }

    // Finalize: mirror the working tree into the output directory.
    inst.workspace.finalize(&inst.output_dir)?;
    {
        let mut state = inst.state.lock();
        state.status = ProjectStatus::Completed;
        state.end_time = Some(clock.now_iso());
    }
    inst.save_state(&clock.now_iso())?;
    tracing::info!(instance = inst.instance_name, "instance completed");
    Ok(())
}

/// Honor stop/pause at a phase boundary. Pause spins at one-second steps
/// and still honors stop while paused.
async fn check_control<C: Clock>(
    inst: &Arc<ProjectInstance>,
    clock: &C,
) -> Result<Control, EngineError> {
    if inst.flags.should_stop() {
        inst.set_status(ProjectStatus::Stopped, None);
        inst.save_state(&clock.now_iso())?;
        return Ok(Control::Stopped);
    }
    while inst.flags.should_pause() {
        inst.set_status(ProjectStatus::Paused, None);
        inst.save_state(&clock.now_iso())?;
        tokio::time::sleep(Duration::from_secs(1)).await;
        if inst.flags.should_stop() {
            inst.set_status(ProjectStatus::Stopped, None);
            inst.save_state(&clock.now_iso())?;
            return Ok(Control::Stopped);
        }
    }
    Ok(Control::Continue)
}

fn push_history<C: Clock>(
    inst: &Arc<ProjectInstance>,
    clock: &C,
    event_type: &str,
    details: serde_json::Value,
) -> Result<(), EngineError> {
    inst.state.lock().push_history(&clock.now_iso(), event_type, json!(details));
    inst.save_state(&clock.now_iso())?;
    Ok(())
}

#[cfg(test)]
#[path = "iteration_tests.rs"]
mod tests;
