// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted per-instance state document (`.translation_state.json`).
//!
//! Each instance worker exclusively owns writes to its own state file.
//! Saves are atomic (write to a temp sibling, then rename) so a crash never
//! leaves a half-written document behind.

use crate::status::{Phase, ProjectStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the state document inside an instance's working directory.
pub const STATE_FILE_NAME: &str = ".translation_state.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write state file {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("invalid state file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

/// One entry in the audit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub iteration: u32,
    pub event_type: String,
    pub details: Value,
}

/// One committed per-iteration backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub name: String,
    pub path: String,
    pub timestamp: String,
    pub iteration: u32,
    pub session_id: String,
}

fn default_max_iterations() -> u32 {
    10
}

/// The full state document for one project instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationState {
    pub project_name: String,
    pub project_instance: String,
    pub session_id: String,
    pub translator: String,
    pub discriminator: String,
    pub status: ProjectStatus,
    pub current_iteration: u32,
    pub current_phase: Option<Phase>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    pub history: Vec<HistoryEntry>,
    pub last_updated: Option<String>,
    pub backups: Vec<BackupRecord>,
    pub errors: Vec<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TranslationState {
    /// Fresh state for a newly created instance.
    pub fn new(
        project_name: &str,
        session_id: &str,
        translator: &str,
        discriminator: &str,
        max_iterations: u32,
    ) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_instance: format!("{project_name}_{session_id}"),
            session_id: session_id.to_string(),
            translator: translator.to_string(),
            discriminator: discriminator.to_string(),
            status: ProjectStatus::Queued,
            current_iteration: 0,
            current_phase: None,
            max_iterations,
            history: Vec::new(),
            last_updated: None,
            backups: Vec::new(),
            errors: Vec::new(),
            start_time: None,
            end_time: None,
        }
    }

    /// Persist atomically, refreshing `last_updated` with the given timestamp.
    pub fn save(&mut self, path: &Path, now_iso: &str) -> Result<(), StateError> {
        self.last_updated = Some(now_iso.to_string());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StateError::Write { path: path.display().to_string(), source: e })?;
        }
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| StateError::Parse { path: path.display().to_string(), source: e })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .map_err(|e| StateError::Write { path: tmp.display().to_string(), source: e })?;
        fs::rename(&tmp, path)
            .map_err(|e| StateError::Write { path: path.display().to_string(), source: e })?;
        Ok(())
    }

    /// Load a state document from disk.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let body = fs::read_to_string(path)
            .map_err(|e| StateError::Read { path: path.display().to_string(), source: e })?;
        serde_json::from_str(&body)
            .map_err(|e| StateError::Parse { path: path.display().to_string(), source: e })
    }

    /// Append an audit event stamped with the current iteration.
    pub fn push_history(&mut self, now_iso: &str, event_type: &str, details: Value) {
        self.history.push(HistoryEntry {
            timestamp: now_iso.to_string(),
            iteration: self.current_iteration,
            event_type: event_type.to_string(),
            details,
        });
    }

    /// Record a committed backup for iteration `iteration`.
    pub fn push_backup(&mut self, now_iso: &str, iteration: u32, path: &Path) {
        self.backups.push(BackupRecord {
            name: format!("iteration_{iteration}"),
            path: path.display().to_string(),
            timestamp: now_iso.to_string(),
            iteration,
            session_id: self.session_id.clone(),
        });
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
