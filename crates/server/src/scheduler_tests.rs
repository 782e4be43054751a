// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use actor_core::SystemClock;
use actor_engine::test_support::{fake_toolchain, seed_input, DelayedInvoker, FakeInvoker};
use serial_test::serial;
use std::time::Duration;

struct Fixture {
    _root: tempfile::TempDir,
    _guard: actor_engine::test_support::PathGuard,
    config: Config,
}

fn fixture(max_parallel: usize) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let guard = fake_toolchain(&root.path().join("fakebin"));
    let mut config = Config::default();
    config.max_parallel = max_parallel;
    config.input_directory = root.path().join("input");
    config.working_directory = root.path().join("working");
    config.backups_directory = root.path().join("backups");
    config.output_directory = root.path().join("output");
    Fixture { _root: root, _guard: guard, config }
}

fn add_project(f: &Fixture, server: &TranslationServer<SystemClock>, name: &str, session: &str) {
    seed_input(&f.config.input_directory.join(name));
    let inst = ProjectInstance::create(
        &f.config,
        name,
        session,
        "CC-Sonnet-4.5",
        "CC-Sonnet-4.5-ACToR",
        0,
    )
    .unwrap();
    server.add_instance(inst);
}

#[tokio::test]
#[serial]
async fn worker_count_never_exceeds_max_parallel() {
    let f = fixture(2);
    let invoker = Arc::new(DelayedInvoker { inner: FakeInvoker::new(3), delay_ms: 200 });
    let server = TranslationServer::new(f.config.clone(), SystemClock, invoker);
    for (name, session) in [("alpha", "a00001"), ("beta", "b00002"), ("gamma", "c00003"), ("delta", "d00004")]
    {
        add_project(&f, &server, name, session);
    }

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        server.tick();
        assert!(server.active_count() <= 2, "capacity exceeded");
        let rows = server.status_rows();
        if rows.iter().all(|r| r.status == "completed") {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "instances never finished");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
#[serial]
async fn queued_instances_start_in_insertion_order() {
    let f = fixture(1);
    let invoker = Arc::new(DelayedInvoker { inner: FakeInvoker::new(3), delay_ms: 100 });
    let server = TranslationServer::new(f.config.clone(), SystemClock, invoker);
    add_project(&f, &server, "first", "aaaaaa");
    add_project(&f, &server, "second", "bbbbbb");

    server.tick();
    // Single slot: only the first instance may leave the queue.
    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    loop {
        let rows = server.status_rows();
        if rows[0].status != "queued" {
            assert_eq!(rows[1].status, "queued");
            break;
        }
        assert!(std::time::Instant::now() < deadline, "first instance never started");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
#[serial]
async fn resolution_accepts_index_name_instance_and_session() {
    let f = fixture(2);
    let server =
        TranslationServer::new(f.config.clone(), SystemClock, Arc::new(FakeInvoker::new(3)));
    add_project(&f, &server, "echo", "d7ea02");
    add_project(&f, &server, "cat", "beef01");

    assert_eq!(server.resolve("1").unwrap().project_name, "echo");
    assert_eq!(server.resolve("2").unwrap().project_name, "cat");
    assert_eq!(server.resolve("cat_beef01").unwrap().project_name, "cat");
    assert_eq!(server.resolve("echo").unwrap().session_id, "d7ea02");
    assert_eq!(server.resolve("beef01").unwrap().project_name, "cat");
    assert!(server.resolve("nonesuch").is_none());
    assert!(server.resolve("0").is_none());
}

#[tokio::test]
#[serial]
async fn stop_flags_the_instance_and_unknown_ids_error() {
    let f = fixture(2);
    let server =
        TranslationServer::new(f.config.clone(), SystemClock, Arc::new(FakeInvoker::new(3)));
    add_project(&f, &server, "echo", "d7ea02");

    server.stop("echo").unwrap();
    assert!(server.resolve("echo").unwrap().flags.should_stop());

    assert!(matches!(server.stop("ghost"), Err(ServerError::UnknownInstance(_))));
}

#[tokio::test]
#[serial]
async fn stop_all_flags_every_instance() {
    let f = fixture(2);
    let server =
        TranslationServer::new(f.config.clone(), SystemClock, Arc::new(FakeInvoker::new(3)));
    add_project(&f, &server, "echo", "d7ea02");
    add_project(&f, &server, "cat", "beef01");

    server.stop_all();
    for row in server.status_rows() {
        assert!(server.resolve(&row.instance_name).unwrap().flags.should_stop());
    }
}

#[tokio::test]
#[serial]
async fn status_rows_reflect_in_memory_state() {
    let f = fixture(2);
    let server =
        TranslationServer::new(f.config.clone(), SystemClock, Arc::new(FakeInvoker::new(3)));
    add_project(&f, &server, "echo", "d7ea02");

    let rows = server.status_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].index, 1);
    assert_eq!(rows[0].project_name, "echo");
    assert_eq!(rows[0].session_id, "d7ea02");
    assert_eq!(rows[0].status, "queued");
    assert_eq!(rows[0].elapsed, "N/A");

    // A stopped-before-start instance completes its worker quickly.
    server.stop("echo").unwrap();
    server.tick();
    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    loop {
        if server.status_rows()[0].status == "stopped" {
            break;
        }
        assert!(std::time::Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
