// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status rows for presentation layers.
//!
//! Built from in-memory instance state, never from disk, so the table
//! reflects what the scheduler is actually doing.

use serde::Serialize;

/// One row of the status table.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    /// 1-based display position, also accepted for instance resolution.
    pub index: usize,
    pub project_name: String,
    pub session_id: String,
    pub instance_name: String,
    pub status: String,
    pub phase: Option<String>,
    pub current_iteration: u32,
    pub max_iterations: u32,
    /// Human-readable elapsed time, `"N/A"` before the instance starts.
    pub elapsed: String,
}
