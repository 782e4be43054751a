// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use actor_core::FakeClock;
use std::fs;
use std::path::Path;

struct Fixture {
    _root: tempfile::TempDir,
    config: Config,
    session: DiscoveredSession,
}

fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.input_directory = root.path().join("input");
    config.working_directory = root.path().join("working");
    config.backups_directory = root.path().join("backups");
    config.output_directory = root.path().join("output");

    // Original input.
    let input = config.input_directory.join("echo");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("echo.c"), "int main(){}").unwrap();
    fs::write(input.join("Makefile"), "all:\n").unwrap();

    // Source session with backups 0..=2.
    let backup_dir = config.backup_dir("echo_aaaaaa");
    for k in 0..=2u32 {
        let backup = backup_dir.join(format!("iteration_{k}"));
        fs::create_dir_all(backup.join("rs_files/ts/src")).unwrap();
        fs::write(backup.join("rs_files/ts/Cargo.toml"), format!("# iteration {k}")).unwrap();
        fs::write(backup.join("rs_files/ts/src/main.rs"), "fn main(){}").unwrap();
        fs::create_dir_all(backup.join("test_cases")).unwrap();
        fs::write(
            backup.join("test_cases/tests00.jsonl"),
            "{\"name\":\"seed\"}\n".repeat((k + 1) as usize),
        )
        .unwrap();
        fs::create_dir_all(backup.join("log_files")).unwrap();
        fs::write(backup.join("log_files/agent.log"), "transcript").unwrap();
    }

    let session = DiscoveredSession {
        project_name: "echo".to_string(),
        session_id: "aaaaaa".to_string(),
        instance_name: "echo_aaaaaa".to_string(),
        translator: "CC-Sonnet-4.5".to_string(),
        discriminator: "CC-Sonnet-4.5-ACToR".to_string(),
        status: "stopped".to_string(),
        current_iteration: 3,
        max_iterations: 10,
        available_backups: vec![0, 1, 2],
        last_updated: "2026-01-15T10:00:00".to_string(),
        working_dir: config.working_directory.join("echo_aaaaaa"),
        backup_dir,
    };
    Fixture { _root: root, config, session }
}

fn request(f: &Fixture, iteration: u32, fork: bool) -> RestoreRequest {
    RestoreRequest {
        session: f.session.clone(),
        iteration,
        max_iterations: 5,
        fork,
        translator: None,
        discriminator: None,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn continue_restores_committed_areas_and_sandbox_union() {
    let f = fixture();
    let clock = FakeClock::new();

    let inst = restore_instance(&f.config, &request(&f, 2, false), &clock).unwrap();

    // Same session id, next iteration.
    assert_eq!(inst.session_id, "aaaaaa");
    assert_eq!(inst.instance_name, "echo_aaaaaa");
    let state = inst.state.lock();
    assert_eq!(state.current_iteration, 3);
    assert_eq!(state.status, actor_core::ProjectStatus::Queued);
    assert_eq!(state.max_iterations, 5);
    drop(state);

    // Committed areas mirror the chosen backup.
    assert_eq!(read(&inst.workspace.rs_files().join("ts/Cargo.toml")), "# iteration 2");
    assert_eq!(
        read(&inst.workspace.test_cases().join("tests00.jsonl")).lines().count(),
        3
    );
    assert!(inst.workspace.log_files().join("agent.log").exists());
    assert_eq!(read(&inst.workspace.c_files().join("echo.c")), "int main(){}");

    // Sandbox is the union of all three areas.
    let sandbox = inst.workspace.sandbox();
    assert!(sandbox.join("echo.c").exists());
    assert!(sandbox.join("ts/Cargo.toml").exists());
    assert!(sandbox.join("tests00.jsonl").exists());
    assert!(sandbox.join("Makefile").exists());
}

#[test]
fn restore_records_the_source_in_history() {
    let f = fixture();
    let clock = FakeClock::new();
    let inst = restore_instance(&f.config, &request(&f, 1, false), &clock).unwrap();

    let state = inst.state.lock();
    assert_eq!(state.history.len(), 1);
    let entry = &state.history[0];
    assert_eq!(entry.event_type, "restored_from_backup");
    assert_eq!(entry.iteration, 1);
    assert_eq!(entry.details["source_session"], "aaaaaa");
    assert_eq!(entry.details["source_iteration"], 1);
}

#[test]
fn restore_persists_the_state_document() {
    let f = fixture();
    let clock = FakeClock::new();
    let inst = restore_instance(&f.config, &request(&f, 0, false), &clock).unwrap();

    let loaded = actor_core::TranslationState::load(&inst.workspace.state_file()).unwrap();
    assert_eq!(loaded.current_iteration, 1);
    assert_eq!(loaded.session_id, "aaaaaa");
}

#[test]
fn fork_mints_a_new_session_id_and_takes_overrides() {
    let f = fixture();
    let clock = FakeClock::new();
    let mut req = request(&f, 2, true);
    req.translator = Some("SWE-Sonnet-4.5".to_string());

    let inst = restore_instance(&f.config, &req, &clock).unwrap();

    assert_ne!(inst.session_id, "aaaaaa");
    assert_eq!(inst.session_id.len(), 6);
    assert_eq!(inst.project_name, "echo");
    assert_eq!(inst.state.lock().translator, "SWE-Sonnet-4.5");
    // The fork works in its own instance directory.
    assert!(inst.workspace.working_dir().ends_with(format!("echo_{}", inst.session_id)));
}

#[test]
fn missing_backup_is_an_error() {
    let f = fixture();
    let clock = FakeClock::new();
    let err = restore_instance(&f.config, &request(&f, 9, false), &clock).unwrap_err();
    assert!(matches!(err, ServerError::MissingBackup(_)));
}

#[test]
fn missing_input_is_an_error() {
    let f = fixture();
    let clock = FakeClock::new();
    let mut req = request(&f, 2, false);
    req.session.project_name = "vanished".to_string();
    let err = restore_instance(&f.config, &req, &clock).unwrap_err();
    assert!(matches!(err, ServerError::MissingInput(_)));
}
