// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    queued = { ProjectStatus::Queued, "queued" },
    initializing = { ProjectStatus::Initializing, "initializing" },
    translating = { ProjectStatus::Translating, "translating" },
    discriminating = { ProjectStatus::Discriminating, "discriminating" },
    paused = { ProjectStatus::Paused, "paused" },
    completed = { ProjectStatus::Completed, "completed" },
    stopped = { ProjectStatus::Stopped, "stopped" },
    error = { ProjectStatus::Error, "error" },
)]
fn status_display(status: ProjectStatus, expected: &str) {
    assert_eq!(status.to_string(), expected);
}

#[test]
fn status_serde_snake_case() {
    let json = serde_json::to_string(&ProjectStatus::Discriminating).unwrap();
    assert_eq!(json, "\"discriminating\"");

    let parsed: ProjectStatus = serde_json::from_str("\"queued\"").unwrap();
    assert_eq!(parsed, ProjectStatus::Queued);
}

#[test]
fn terminal_states() {
    assert!(ProjectStatus::Completed.is_terminal());
    assert!(ProjectStatus::Stopped.is_terminal());
    assert!(ProjectStatus::Error.is_terminal());
    assert!(!ProjectStatus::Queued.is_terminal());
    assert!(!ProjectStatus::Paused.is_terminal());
}

#[test]
fn active_states() {
    assert!(ProjectStatus::Translating.is_active());
    assert!(ProjectStatus::Paused.is_active());
    assert!(!ProjectStatus::Queued.is_active());
    assert!(!ProjectStatus::Completed.is_active());
}

#[test]
fn phase_display() {
    assert_eq!(Phase::InitialTranslation.to_string(), "initial_translation");
    assert_eq!(Phase::Discrimination.to_string(), "discrimination");
    assert_eq!(Phase::Translation.to_string(), "translation");
}
