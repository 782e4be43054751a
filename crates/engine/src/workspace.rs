// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instance workspace layout and committed-area management.
//!
//! ```text
//! working_root/<instance>/
//!   sandbox/      mutable scratch where the agent operates
//!   c_files/      immutable whitelisted C sources
//!   rs_files/     committed Rust artifacts
//!   test_cases/   committed discriminator artifacts
//!   log_files/    agent transcripts
//!   .translation_state.json
//! ```

use crate::error::EngineError;
use actor_core::{Whitelist, STATE_FILE_NAME};
use actor_snapshot::sync;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InstanceWorkspace {
    working_dir: PathBuf,
    backup_dir: PathBuf,
}

impl InstanceWorkspace {
    pub fn new(working_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self { working_dir: working_dir.into(), backup_dir: backup_dir.into() }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn sandbox(&self) -> PathBuf {
        self.working_dir.join("sandbox")
    }

    pub fn c_files(&self) -> PathBuf {
        self.working_dir.join("c_files")
    }

    pub fn rs_files(&self) -> PathBuf {
        self.working_dir.join("rs_files")
    }

    pub fn test_cases(&self) -> PathBuf {
        self.working_dir.join("test_cases")
    }

    pub fn log_files(&self) -> PathBuf {
        self.working_dir.join("log_files")
    }

    pub fn state_file(&self) -> PathBuf {
        self.working_dir.join(STATE_FILE_NAME)
    }

    pub fn backup_path(&self, iteration: u32) -> PathBuf {
        self.backup_dir.join(format!("iteration_{iteration}"))
    }

    /// Whether the working tree already holds files (a restored session).
    pub fn is_populated(&self) -> bool {
        std::fs::read_dir(&self.working_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Seed every area from the project input directory.
    pub fn initialize(&self, input_dir: &Path) -> Result<(), EngineError> {
        for dir in [
            self.sandbox(),
            self.c_files(),
            self.rs_files(),
            self.test_cases(),
            self.log_files(),
        ] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| EngineError::io(format!("creating {}", dir.display()), e))?;
        }
        std::fs::create_dir_all(&self.backup_dir)
            .map_err(|e| EngineError::io(format!("creating {}", self.backup_dir.display()), e))?;

        sync(input_dir, &self.sandbox(), &Whitelist::sandbox_union())?;
        sync(input_dir, &self.c_files(), &Whitelist::c_files())?;
        sync(input_dir, &self.rs_files(), &Whitelist::rs_files())?;
        sync(input_dir, &self.test_cases(), &Whitelist::test_cases())?;
        sync(input_dir, &self.log_files(), &Whitelist::log_files())?;
        Ok(())
    }

    /// Commit the Rust subset of the sandbox to `rs_files/`.
    pub fn commit_translation(&self) -> Result<(), EngineError> {
        sync(&self.sandbox(), &self.rs_files(), &Whitelist::rs_files())?;
        Ok(())
    }

    /// Commit the test-case subset of the sandbox to `test_cases/`.
    pub fn commit_discrimination(&self) -> Result<(), EngineError> {
        sync(&self.sandbox(), &self.test_cases(), &Whitelist::test_cases())?;
        Ok(())
    }

    /// Snapshot the committed areas for iteration `iteration`.
    pub fn create_backup(&self, iteration: u32) -> Result<PathBuf, EngineError> {
        let backup = self.backup_path(iteration);
        sync(&self.rs_files(), &backup.join("rs_files"), &Whitelist::rs_files())?;
        sync(&self.test_cases(), &backup.join("test_cases"), &Whitelist::test_cases())?;
        sync(&self.log_files(), &backup.join("log_files"), &Whitelist::log_files())?;
        Ok(backup)
    }

    /// Mirror the working tree's C, Rust, and test subsets into the output
    /// directory on completion.
    pub fn finalize(&self, output_dir: &Path) -> Result<(), EngineError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| EngineError::io(format!("creating {}", output_dir.display()), e))?;
        sync(&self.working_dir, output_dir, &Whitelist::sandbox_union())?;
        Ok(())
    }

    /// Re-hydrate protected areas into the sandbox, overwriting any edits
    /// the agent made to them.
    pub fn hydrate_sandbox(&self, areas: &[(PathBuf, Whitelist)]) -> Result<(), EngineError> {
        for (src, whitelist) in areas {
            if !src.is_dir() {
                return Err(EngineError::MissingArea(src.display().to_string()));
            }
            sync(src, &self.sandbox(), whitelist)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
