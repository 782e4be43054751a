// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project execution status and iteration phase.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a project instance.
///
/// Transitions are one-directional within a run, except `Paused`, which
/// returns to the prior running state when the pause flag clears.
/// `Stopped` and `Error` are terminal for the current worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Queued,
    Initializing,
    Translating,
    Discriminating,
    Paused,
    Completed,
    Stopped,
    Error,
}

impl ProjectStatus {
    /// True for states that end the instance worker.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Stopped | ProjectStatus::Error)
    }

    /// True while the instance worker owns the workspace.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Initializing
                | ProjectStatus::Translating
                | ProjectStatus::Discriminating
                | ProjectStatus::Paused
        )
    }
}

crate::simple_display! {
    ProjectStatus {
        Queued => "queued",
        Initializing => "initializing",
        Translating => "translating",
        Discriminating => "discriminating",
        Paused => "paused",
        Completed => "completed",
        Stopped => "stopped",
        Error => "error",
    }
}

/// The phase an instance is executing within an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InitialTranslation,
    Discrimination,
    Translation,
}

crate::simple_display! {
    Phase {
        InitialTranslation => "initial_translation",
        Discrimination => "discrimination",
        Translation => "translation",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
