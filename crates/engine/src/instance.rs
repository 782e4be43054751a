// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One live project instance: resolved agents, workspace paths, control
//! flags, and the mutable state document.

use crate::agents::{AgentKind, DiscriminatorSpec};
use crate::error::EngineError;
use crate::workspace::InstanceWorkspace;
use actor_core::{clock, Config, Phase, ProjectStatus, TranslationState};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop/pause flags, checked at phase boundaries only.
#[derive(Debug, Default)]
pub struct ControlFlags {
    stop: AtomicBool,
    pause: AtomicBool,
}

impl ControlFlags {
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn request_pause(&self) {
        self.pause.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.pause.store(false, Ordering::SeqCst);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn should_pause(&self) -> bool {
        self.pause.load(Ordering::SeqCst)
    }
}

/// A single translation run of one project.
#[derive(Debug)]
pub struct ProjectInstance {
    pub project_name: String,
    pub session_id: String,
    pub instance_name: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub workspace: InstanceWorkspace,
    pub translator: AgentKind,
    pub discriminator: AgentKind,
    pub discriminator_spec: DiscriminatorSpec,
    pub is_bsd: bool,
    pub state: Mutex<TranslationState>,
    pub flags: ControlFlags,
}

impl ProjectInstance {
    /// Build an instance from resolved configuration. Unknown agent ids
    /// fail here, before anything touches the filesystem.
    pub fn create(
        config: &Config,
        project_name: &str,
        session_id: &str,
        translator_id: &str,
        discriminator_id: &str,
        max_iterations: u32,
    ) -> Result<Arc<Self>, EngineError> {
        let translator = AgentKind::translator(translator_id)?;
        let (discriminator, discriminator_spec) = AgentKind::discriminator(discriminator_id)?;

        let instance_name = format!("{project_name}_{session_id}");
        let workspace = InstanceWorkspace::new(
            config.working_dir(&instance_name),
            config.backup_dir(&instance_name),
        );
        let state = TranslationState::new(
            project_name,
            session_id,
            translator_id,
            discriminator_id,
            max_iterations,
        );

        Ok(Arc::new(Self {
            project_name: project_name.to_string(),
            session_id: session_id.to_string(),
            instance_name,
            input_dir: config.input_dir(project_name),
            output_dir: config.output_dir(&format!("{project_name}_{session_id}")),
            workspace,
            translator,
            discriminator,
            discriminator_spec,
            is_bsd: config.is_bsd(),
            state: Mutex::new(state),
            flags: ControlFlags::default(),
        }))
    }

    /// Adopt an existing state document (continuation/fork restores).
    pub fn with_state(self: Arc<Self>, state: TranslationState) -> Arc<Self> {
        *self.state.lock() = state;
        self
    }

    /// Persist the state document, refreshing `last_updated`.
    pub fn save_state(&self, now_iso: &str) -> Result<(), EngineError> {
        self.state.lock().save(&self.workspace.state_file(), now_iso)?;
        Ok(())
    }

    pub fn status(&self) -> ProjectStatus {
        self.state.lock().status
    }

    pub fn set_status(&self, status: ProjectStatus, phase: Option<Phase>) {
        let mut state = self.state.lock();
        state.status = status;
        if phase.is_some() {
            state.current_phase = phase;
        }
    }

    pub fn current_iteration(&self) -> u32 {
        self.state.lock().current_iteration
    }

    pub fn max_iterations(&self) -> u32 {
        self.state.lock().max_iterations
    }

    /// Elapsed wall-clock seconds between start and end (or `now_iso` for
    /// a running instance). `None` when the instance never started.
    pub fn elapsed_secs(&self, now_iso: &str) -> Option<u64> {
        let state = self.state.lock();
        let start = clock::parse_iso(state.start_time.as_deref()?)?;
        let end = state
            .end_time
            .as_deref()
            .and_then(clock::parse_iso)
            .or_else(|| clock::parse_iso(now_iso))?;
        let secs = (end - start).num_seconds();
        Some(secs.max(0) as u64)
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
