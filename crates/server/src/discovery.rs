// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk discovery: translatable projects and prior sessions.

use crate::error::ServerError;
use actor_core::{Config, TranslationState, STATE_FILE_NAME};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One candidate project under the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProject {
    pub name: String,
    pub path: PathBuf,
    pub file_count: usize,
    pub has_readme: bool,
}

/// One prior session reconstructed from its state document and backups.
#[derive(Debug, Clone)]
pub struct DiscoveredSession {
    pub project_name: String,
    pub session_id: String,
    pub instance_name: String,
    pub translator: String,
    pub discriminator: String,
    pub status: String,
    pub current_iteration: u32,
    pub max_iterations: u32,
    /// Iteration numbers with an on-disk backup, ascending.
    pub available_backups: Vec<u32>,
    pub last_updated: String,
    pub working_dir: PathBuf,
    pub backup_dir: PathBuf,
}

#[derive(Deserialize)]
struct DangerousList {
    #[serde(default)]
    ignore_list: Vec<String>,
}

fn load_ignore_list(path: &Path) -> Result<Vec<String>, ServerError> {
    if !path.exists() {
        return Err(ServerError::MissingDangerousList(path.display().to_string()));
    }
    let body = std::fs::read_to_string(path)
        .map_err(|e| ServerError::io(format!("reading {}", path.display()), e))?;
    let list: DangerousList = serde_json::from_str(&body).map_err(|e| {
        ServerError::InvalidDangerousList { path: path.display().to_string(), source: e }
    })?;
    Ok(list.ignore_list)
}

/// Enumerate project directories under the configured input root,
/// excluding hidden names and everything on the dangerous ignore list.
pub fn discover_projects(config: &Config) -> Result<Vec<DiscoveredProject>, ServerError> {
    let base = &config.input_directory;
    if !base.is_dir() {
        return Ok(Vec::new());
    }
    let ignore = load_ignore_list(&config.dangerous_list)?;

    let mut projects = Vec::new();
    let entries = std::fs::read_dir(base)
        .map_err(|e| ServerError::io(format!("reading {}", base.display()), e))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') || ignore.contains(&name) {
            continue;
        }
        let file_count = count_files(&path);
        let has_readme = path.join("README.md").exists() || path.join("readme.md").exists();
        projects.push(DiscoveredProject { name, path, file_count, has_readme });
    }
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                count += 1;
            }
        }
    }
    count
}

/// Enumerate prior sessions from working-directory state documents,
/// newest first. Unreadable state files are skipped.
pub fn discover_sessions(config: &Config) -> Vec<DiscoveredSession> {
    let mut sessions = Vec::new();
    let Ok(entries) = std::fs::read_dir(&config.working_directory) else {
        return sessions;
    };
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let state_file = dir.join(STATE_FILE_NAME);
        if !state_file.exists() {
            continue;
        }
        let Ok(state) = TranslationState::load(&state_file) else {
            continue;
        };
        let Some(instance_name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string)
        else {
            continue;
        };

        let backup_dir = config.backup_dir(&instance_name);
        sessions.push(DiscoveredSession {
            project_name: state.project_name,
            session_id: state.session_id,
            translator: state.translator,
            discriminator: state.discriminator,
            status: state.status.to_string(),
            current_iteration: state.current_iteration,
            max_iterations: state.max_iterations,
            available_backups: enumerate_backups(&backup_dir),
            last_updated: state.last_updated.unwrap_or_default(),
            working_dir: dir,
            backup_dir,
            instance_name,
        });
    }
    sessions.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    sessions
}

/// Iteration numbers present as `iteration_<k>` backup directories.
pub fn enumerate_backups(backup_dir: &Path) -> Vec<u32> {
    let mut iterations = Vec::new();
    let Ok(entries) = std::fs::read_dir(backup_dir) else {
        return iterations;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(num) = name.strip_prefix("iteration_") {
            if let Ok(num) = num.parse() {
                iterations.push(num);
            }
        }
    }
    iterations.sort_unstable();
    iterations
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
