// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator configuration.
//!
//! One explicit `Config` value is built at startup and threaded through the
//! scheduler; there are no process-wide mutable settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("input directory does not exist: {0}")]
    MissingInputDir(String),
}

fn default_max_parallel() -> usize {
    5
}

fn default_input_directory() -> PathBuf {
    PathBuf::from("./input")
}

fn default_working_directory() -> PathBuf {
    PathBuf::from("./.working")
}

fn default_backups_directory() -> PathBuf {
    PathBuf::from("./.backups")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output")
}

fn default_dangerous_list() -> PathBuf {
    PathBuf::from("./scripts/dangerous.json")
}

/// Orchestrator settings, loaded from a JSON file or assembled by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    #[serde(default = "default_input_directory")]
    pub input_directory: PathBuf,
    #[serde(default = "default_working_directory")]
    pub working_directory: PathBuf,
    #[serde(default = "default_backups_directory")]
    pub backups_directory: PathBuf,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// Sidecar file with an `ignore_list` of project names never offered
    /// for translation.
    #[serde(default = "default_dangerous_list")]
    pub dangerous_list: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            input_directory: default_input_directory(),
            working_directory: default_working_directory(),
            backups_directory: default_backups_directory(),
            output_directory: default_output_directory(),
            dangerous_list: default_dangerous_list(),
        }
    }
}

impl Config {
    /// Load from a JSON file. Missing file or invalid JSON is fatal.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read { path: path.display().to_string(), source: e })?;
        serde_json::from_str(&body)
            .map_err(|e| ConfigError::Parse { path: path.display().to_string(), source: e })
    }

    /// Per-instance working directory.
    pub fn working_dir(&self, instance_name: &str) -> PathBuf {
        self.working_directory.join(instance_name)
    }

    /// Per-instance backup root.
    pub fn backup_dir(&self, instance_name: &str) -> PathBuf {
        self.backups_directory.join(instance_name)
    }

    /// Per-instance output (finalize) directory.
    pub fn output_dir(&self, instance_name: &str) -> PathBuf {
        self.output_directory.join(instance_name)
    }

    /// Input directory for a project.
    pub fn input_dir(&self, project_name: &str) -> PathBuf {
        self.input_directory.join(project_name)
    }

    /// Whether the configured input set uses the BSD harness conventions.
    /// Drives the discriminator prompt variant and validation relaxations.
    pub fn is_bsd(&self) -> bool {
        self.input_directory.to_string_lossy().contains("BSD")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
