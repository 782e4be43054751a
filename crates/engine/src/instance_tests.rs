// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use actor_core::{Clock, FakeClock};

fn config(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.input_directory = root.join("input");
    config.working_directory = root.join("working");
    config.backups_directory = root.join("backups");
    config.output_directory = root.join("output");
    config
}

fn create(root: &std::path::Path) -> Arc<ProjectInstance> {
    ProjectInstance::create(
        &config(root),
        "echo",
        "d7ea02",
        "CC-Sonnet-4.5",
        "CC-Sonnet-4.5-ACToR",
        10,
    )
    .unwrap()
}

#[test]
fn create_resolves_agents_and_paths() {
    let root = tempfile::tempdir().unwrap();
    let inst = create(root.path());

    assert_eq!(inst.instance_name, "echo_d7ea02");
    assert_eq!(inst.discriminator_spec.k_new, 3);
    assert!(inst.workspace.working_dir().ends_with("working/echo_d7ea02"));
    assert!(inst.input_dir.ends_with("input/echo"));
    assert_eq!(inst.status(), ProjectStatus::Queued);
    assert!(!inst.is_bsd);
}

#[test]
fn create_rejects_unknown_agents() {
    let root = tempfile::tempdir().unwrap();
    let config = config(root.path());
    assert!(ProjectInstance::create(&config, "echo", "x", "Nope", "CC-Sonnet-4.5-ACToR", 10)
        .is_err());
    assert!(ProjectInstance::create(&config, "echo", "x", "CC-Sonnet-4.5", "Nope", 10).is_err());
}

#[test]
fn save_state_writes_the_document() {
    let root = tempfile::tempdir().unwrap();
    let inst = create(root.path());
    inst.save_state("2026-01-15T10:00:00").unwrap();

    let loaded = actor_core::TranslationState::load(&inst.workspace.state_file()).unwrap();
    assert_eq!(loaded.project_instance, "echo_d7ea02");
    assert_eq!(loaded.last_updated.as_deref(), Some("2026-01-15T10:00:00"));
}

#[test]
fn control_flags_default_clear() {
    let flags = ControlFlags::default();
    assert!(!flags.should_stop());
    assert!(!flags.should_pause());

    flags.request_pause();
    assert!(flags.should_pause());
    flags.resume();
    assert!(!flags.should_pause());

    flags.request_stop();
    assert!(flags.should_stop());
}

#[test]
fn elapsed_uses_end_time_when_finished() {
    let root = tempfile::tempdir().unwrap();
    let inst = create(root.path());
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    let start = clock.now_iso();
    clock.advance_ms(90_000);
    let end = clock.now_iso();
    clock.advance_ms(1_000_000);
    let later = clock.now_iso();

    {
        let mut state = inst.state.lock();
        state.start_time = Some(start);
        state.end_time = Some(end);
    }
    assert_eq!(inst.elapsed_secs(&later), Some(90));
}

#[test]
fn elapsed_is_none_before_start() {
    let root = tempfile::tempdir().unwrap();
    let inst = create(root.path());
    assert_eq!(inst.elapsed_secs("2026-01-15T10:00:00"), None);
}
