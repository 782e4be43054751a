// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn sample() -> TranslationState {
    TranslationState::new("echo", "d7ea02", "CC-Sonnet-4.5", "CC-Sonnet-4.5-ACToR", 10)
}

#[test]
fn new_state_starts_queued_at_iteration_zero() {
    let state = sample();
    assert_eq!(state.status, ProjectStatus::Queued);
    assert_eq!(state.current_iteration, 0);
    assert_eq!(state.project_instance, "echo_d7ea02");
    assert!(state.history.is_empty());
    assert!(state.backups.is_empty());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);

    let mut state = sample();
    state.status = ProjectStatus::Translating;
    state.current_phase = Some(Phase::InitialTranslation);
    state.save(&path, "2026-01-15T10:00:00").unwrap();

    let loaded = TranslationState::load(&path).unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.last_updated.as_deref(), Some("2026-01-15T10:00:00"));
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("echo_d7ea02").join(STATE_FILE_NAME);

    sample().save(&path, "2026-01-15T10:00:00").unwrap();
    assert!(path.exists());
}

#[test]
fn save_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    sample().save(&path, "2026-01-15T10:00:00").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![STATE_FILE_NAME.to_string()]);
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TranslationState::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, StateError::Read { .. }));
}

#[test]
fn load_invalid_json_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    std::fs::write(&path, "{not json").unwrap();
    let err = TranslationState::load(&path).unwrap_err();
    assert!(matches!(err, StateError::Parse { .. }));
}

#[test]
fn missing_max_iterations_defaults_to_ten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);

    let mut doc = serde_json::to_value(sample()).unwrap();
    doc.as_object_mut().unwrap().remove("max_iterations");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    let loaded = TranslationState::load(&path).unwrap();
    assert_eq!(loaded.max_iterations, 10);
}

#[test]
fn push_history_stamps_current_iteration() {
    let mut state = sample();
    state.current_iteration = 3;
    state.push_history("2026-01-15T10:00:00", "translate", json!({"status": "completed"}));

    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].iteration, 3);
    assert_eq!(state.history[0].event_type, "translate");
}

#[test]
fn push_backup_records_iteration_and_session() {
    let mut state = sample();
    state.push_backup("2026-01-15T10:00:00", 2, std::path::Path::new("/backups/echo_d7ea02/iteration_2"));

    assert_eq!(state.backups.len(), 1);
    assert_eq!(state.backups[0].name, "iteration_2");
    assert_eq!(state.backups[0].iteration, 2);
    assert_eq!(state.backups[0].session_id, "d7ea02");
}
