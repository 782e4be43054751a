// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Continuation and fork: rebuild an instance from an iteration backup.
//!
//! Restoring at iteration `k` reproduces the workspace exactly as it
//! stood after iteration `k` committed: fresh C sources from the input,
//! committed areas from the backup, and a sandbox holding the union of
//! all three. The new instance then begins at iteration `k + 1`.

use crate::discovery::DiscoveredSession;
use crate::error::ServerError;
use actor_core::{generate_session_id, Clock, Config, ProjectStatus, Whitelist};
use actor_engine::ProjectInstance;
use actor_snapshot::sync;
use serde_json::json;
use std::sync::Arc;

/// What to rebuild and how.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub session: DiscoveredSession,
    /// Iteration whose backup becomes the starting state.
    pub iteration: u32,
    pub max_iterations: u32,
    /// `continue` reuses the source session id; `fork` mints a new one.
    pub fork: bool,
    /// Fork-only agent overrides; `None` keeps the source session's ids.
    pub translator: Option<String>,
    pub discriminator: Option<String>,
}

/// Rebuild an instance from a backup. The caller registers the result
/// with the scheduler.
pub fn restore_instance<C: Clock>(
    config: &Config,
    req: &RestoreRequest,
    clock: &C,
) -> Result<Arc<ProjectInstance>, ServerError> {
    let source = &req.session;

    let input_dir = config.input_dir(&source.project_name);
    if !input_dir.is_dir() {
        return Err(ServerError::MissingInput(input_dir.display().to_string()));
    }
    let backup_source = source.backup_dir.join(format!("iteration_{}", req.iteration));
    if !backup_source.is_dir() {
        return Err(ServerError::MissingBackup(backup_source.display().to_string()));
    }

    let session_id = if req.fork {
        generate_session_id(&source.project_name, &clock.now_iso())
    } else {
        source.session_id.clone()
    };
    let translator = req.translator.clone().unwrap_or_else(|| source.translator.clone());
    let discriminator =
        req.discriminator.clone().unwrap_or_else(|| source.discriminator.clone());

    let inst = ProjectInstance::create(
        config,
        &source.project_name,
        &session_id,
        &translator,
        &discriminator,
        req.max_iterations,
    )?;

    let ws = &inst.workspace;
    std::fs::create_dir_all(ws.working_dir())
        .map_err(|e| ServerError::io("creating working dir", e))?;
    std::fs::create_dir_all(ws.backup_dir())
        .map_err(|e| ServerError::io("creating backup dir", e))?;
    std::fs::create_dir_all(&inst.output_dir)
        .map_err(|e| ServerError::io("creating output dir", e))?;

    // Committed areas: C from the input, the rest from the backup.
    sync(&input_dir, &ws.c_files(), &Whitelist::c_files())?;
    sync(&backup_source.join("rs_files"), &ws.rs_files(), &Whitelist::rs_files())?;
    sync(&backup_source.join("test_cases"), &ws.test_cases(), &Whitelist::test_cases())?;
    sync(&backup_source.join("log_files"), &ws.log_files(), &Whitelist::log_files())?;

    // Sandbox: the union the agent saw right after iteration `k`.
    sync(&ws.rs_files(), &ws.sandbox(), &Whitelist::rs_files())?;
    sync(&ws.test_cases(), &ws.sandbox(), &Whitelist::test_cases())?;
    sync(&ws.c_files(), &ws.sandbox(), &Whitelist::c_files())?;

    {
        let mut state = inst.state.lock();
        state.status = ProjectStatus::Queued;
        state.current_iteration = req.iteration + 1;
        state.current_phase = None;
        state.start_time = Some(clock.now_iso());
        state.push_history(
            &clock.now_iso(),
            "restored_from_backup",
            json!({
                "message": format!(
                    "Restored from session {} iteration {}",
                    source.session_id, req.iteration
                ),
                "source_session": source.session_id,
                "source_iteration": req.iteration,
            }),
        );
        // The history entry above stamps the pre-restore iteration.
        let last = state.history.len() - 1;
        state.history[last].iteration = req.iteration;
    }
    inst.save_state(&clock.now_iso())?;

    Ok(inst)
}

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;
