// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifiers.
//!
//! Every translation run of a project gets a 6-hex session id derived from
//! the project name and creation time, so multiple instances of the same
//! project can coexist under `working_root`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Derive a 6-hex session id from the project name and a creation timestamp.
///
/// The timestamp is passed in (ISO-8601 from the caller's clock) rather than
/// read here, so restores can reproduce ids and tests stay deterministic.
pub fn generate_session_id(project_name: &str, created_at: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{project_name}_{created_at}").as_bytes());
    let digest = hasher.finalize();
    // 3 bytes -> 6 hex chars
    digest.iter().take(3).map(|byte| format!("{byte:02x}")).collect()
}

/// The unique identity of one translation run: `project_name + "_" + session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    pub project_name: String,
    pub session_id: String,
}

impl InstanceId {
    pub fn new(project_name: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), session_id: session_id.into() }
    }

    /// Directory-name form used under `working_root` and `backup_root`.
    pub fn instance_name(&self) -> String {
        format!("{}_{}", self.project_name, self.session_id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.project_name, self.session_id)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
