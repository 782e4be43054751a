// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::instance::ProjectInstance;
use crate::test_support::{fake_toolchain, seed_input, FailingInvoker, FakeInvoker};
use actor_core::{Config, SystemClock};
use serial_test::serial;
use std::sync::Arc;

struct Fixture {
    _root: tempfile::TempDir,
    _guard: crate::test_support::PathGuard,
    inst: Arc<ProjectInstance>,
}

fn fixture(max_iterations: u32) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    seed_input(&root.path().join("input/echo"));
    let guard = fake_toolchain(&root.path().join("fakebin"));

    let mut config = Config::default();
    config.input_directory = root.path().join("input");
    config.working_directory = root.path().join("working");
    config.backups_directory = root.path().join("backups");
    config.output_directory = root.path().join("output");

    let inst = ProjectInstance::create(
        &config,
        "echo",
        "d7ea02",
        "CC-Sonnet-4.5",
        "CC-Sonnet-4.5-ACToR",
        max_iterations,
    )
    .unwrap();
    Fixture { _root: root, _guard: guard, inst }
}

#[tokio::test]
#[serial]
async fn one_iteration_runs_the_full_lifecycle() {
    let f = fixture(1);
    let invoker = Arc::new(FakeInvoker::new(3));

    run_instance(Arc::clone(&f.inst), invoker.clone(), SystemClock).await;

    let state = f.inst.state.lock();
    assert_eq!(state.status, ProjectStatus::Completed);
    assert_eq!(state.current_iteration, 2);
    assert!(state.end_time.is_some());

    // Phase ordering: bootstrap translate, then discriminate + translate.
    let events: Vec<&str> = state.history.iter().map(|h| h.event_type.as_str()).collect();
    assert_eq!(events, vec!["translate", "discriminate", "translate"]);

    // Backups for iterations 0 and 1, with committed artifacts inside.
    let backup0 = f.inst.workspace.backup_path(0);
    let backup1 = f.inst.workspace.backup_path(1);
    assert!(backup0.join("rs_files/ts/Cargo.toml").exists());
    assert!(backup1.join("rs_files/ts/Cargo.toml").exists());
    assert!(backup1.join("test_cases/tests00.jsonl").exists());
    assert_eq!(state.backups.len(), 2);
    assert_eq!(state.backups[1].iteration, 1);

    // Seed suite grew by k_new during the discriminator pass.
    assert_eq!(crate::harness::count_test_cases(&f.inst.workspace.test_cases()), 4);

    // Finalized output mirrors the committed subsets.
    assert!(f.inst.output_dir.join("c_files/echo.c").exists());
}

#[tokio::test]
#[serial]
async fn backup_matches_committed_area_exactly() {
    let f = fixture(1);
    run_instance(Arc::clone(&f.inst), Arc::new(FakeInvoker::new(3)), SystemClock).await;

    let committed = crate::harness::count_test_cases(&f.inst.workspace.test_cases());
    let backed_up =
        crate::harness::count_test_cases(&f.inst.workspace.backup_path(1).join("test_cases"));
    assert_eq!(committed, backed_up);
}

#[tokio::test]
#[serial]
async fn stop_before_start_never_translates() {
    let f = fixture(1);
    f.inst.flags.request_stop();

    run_instance(Arc::clone(&f.inst), Arc::new(FakeInvoker::new(3)), SystemClock).await;

    let state = f.inst.state.lock();
    assert_eq!(state.status, ProjectStatus::Stopped);
    assert!(state.history.is_empty());
    assert!(state.backups.is_empty());
}

/// Wraps the scripted invoker and raises the stop flag mid-session, like
/// an operator issuing `stop` while a worker is running.
struct StopDuringRun {
    inner: FakeInvoker,
    flags: std::sync::OnceLock<Arc<ProjectInstance>>,
}

#[async_trait::async_trait]
impl crate::invoker::AgentInvoker for StopDuringRun {
    async fn run(
        &self,
        session_name: &str,
        work_dir: &std::path::Path,
        prompt: &str,
        kind: &crate::agents::AgentKind,
    ) -> Result<(), crate::error::EngineError> {
        if let Some(inst) = self.flags.get() {
            inst.flags.request_stop();
        }
        self.inner.run(session_name, work_dir, prompt, kind).await
    }
}

#[tokio::test]
#[serial]
async fn stop_during_translator_finishes_the_worker_but_skips_the_backup() {
    let f = fixture(1);
    let invoker =
        Arc::new(StopDuringRun { inner: FakeInvoker::new(3), flags: std::sync::OnceLock::new() });
    invoker.flags.set(Arc::clone(&f.inst)).ok();

    run_instance(Arc::clone(&f.inst), invoker.clone(), SystemClock).await;

    let state = f.inst.state.lock();
    assert_eq!(state.status, ProjectStatus::Stopped);
    // The bootstrap translator ran to completion and committed...
    assert_eq!(state.history.len(), 1);
    assert!(f.inst.workspace.rs_files().join("ts/Cargo.toml").exists());
    // ...but the stop landed before the iteration-0 backup was written.
    assert!(state.backups.is_empty());
    assert!(!f.inst.workspace.backup_path(0).exists());
}

#[tokio::test]
#[serial]
async fn restored_session_skips_initialization_and_iteration_zero() {
    let f = fixture(1);
    // Simulate a restore: populated workspace, iteration already past max.
    f.inst.workspace.initialize(&f.inst.input_dir).unwrap();
    std::fs::write(f.inst.workspace.c_files().join("echo.c"), "int main(){return 7;}").unwrap();
    {
        let mut state = f.inst.state.lock();
        state.current_iteration = 2;
    }

    run_instance(Arc::clone(&f.inst), Arc::new(FakeInvoker::new(3)), SystemClock).await;

    let state = f.inst.state.lock();
    assert_eq!(state.status, ProjectStatus::Completed);
    // No worker ran; the restored workspace was not re-seeded.
    assert!(state.history.is_empty());
    let body = std::fs::read_to_string(f.inst.workspace.c_files().join("echo.c")).unwrap();
    assert_eq!(body, "int main(){return 7;}");
}

#[tokio::test]
#[serial]
async fn agent_failure_surfaces_as_error_status() {
    let f = fixture(1);
    run_instance(Arc::clone(&f.inst), Arc::new(FailingInvoker), SystemClock).await;

    let state = f.inst.state.lock();
    assert_eq!(state.status, ProjectStatus::Error);
    assert_eq!(state.errors.len(), 1);
    // The state document remains on disk for discovery.
    assert!(f.inst.workspace.state_file().exists());
}
