// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::agents::{DiscriminatorSpec, DiscriminatorVariant};
use crate::test_support::{fake_toolchain, seed_input, write_exec, PathGuard};
use serial_test::serial;
use std::fs;

struct Fixture {
    _root: tempfile::TempDir,
    ws: InstanceWorkspace,
    _path_guard: PathGuard,
}

fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input/echo");
    seed_input(&input);
    let guard = fake_toolchain(&root.path().join("fakebin"));

    let ws = InstanceWorkspace::new(
        root.path().join("working/echo_d7ea02"),
        root.path().join("backups/echo_d7ea02"),
    );
    ws.initialize(&input).unwrap();
    fs::create_dir_all(ws.sandbox().join("ts/src")).unwrap();
    fs::write(ws.sandbox().join("ts/Cargo.toml"), "[package]\nname = \"echo\"\n").unwrap();

    Fixture { _root: root, ws, _path_guard: guard }
}

fn actor_spec() -> DiscriminatorSpec {
    DiscriminatorSpec { variant: DiscriminatorVariant::Actor, k_new: 3, seed_tests: 15 }
}

fn add_new_tests(ws: &InstanceWorkspace, count: usize) {
    let body: String = (0..count).map(|i| format!("{{\"name\":\"new{i}\"}}\n")).collect();
    fs::write(ws.sandbox().join("tests01.jsonl"), body).unwrap();
}

#[tokio::test]
#[serial]
async fn translation_passes_with_clean_harness() {
    let f = fixture();
    let verdict = validate_translation("echo", &f.ws).await.unwrap();
    assert!(verdict.valid, "{}", verdict.output);
    assert!(verdict.output.contains("All tests passed!"));
}

#[tokio::test]
#[serial]
async fn translation_hydration_overwrites_tampered_tests() {
    let f = fixture();
    fs::write(f.ws.sandbox().join("tests00.jsonl"), "{\"name\":\"cheat\"}\n").unwrap();

    validate_translation("echo", &f.ws).await.unwrap();

    let body = fs::read_to_string(f.ws.sandbox().join("tests00.jsonl")).unwrap();
    assert_eq!(body, "{\"name\":\"seed\"}\n");
}

#[tokio::test]
#[serial]
async fn translation_fails_when_rust_fails_tests() {
    let f = fixture();
    fs::write(f.ws.sandbox().join(".rust_pass"), "0\n").unwrap();

    let verdict = validate_translation("echo", &f.ws).await.unwrap();
    assert!(!verdict.valid);
    assert!(verdict.output.contains("failed"));
}

#[tokio::test]
#[serial]
async fn rust_build_failure_is_a_compile_error() {
    let f = fixture();
    let bin = f.ws.sandbox().join("localbin");
    fs::create_dir_all(&bin).unwrap();
    write_exec(&bin.join("cargo"), "#!/bin/bash\necho 'type mismatch'\nexit 1\n");
    let _guard = PathGuard::prepend(&bin);

    let verdict = validate_translation("echo", &f.ws).await.unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.output, "compile error");
}

#[tokio::test]
#[serial]
async fn unclosed_delimiters_mean_corruption() {
    let f = fixture();
    let bin = f.ws.sandbox().join("localbin");
    fs::create_dir_all(&bin).unwrap();
    write_exec(&bin.join("cargo"), "#!/bin/bash\necho 'error: unclosed delimiter'\nexit 1\n");
    let _guard = PathGuard::prepend(&bin);

    let verdict = validate_translation("echo", &f.ws).await.unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.output, "file corrupted");
}

#[tokio::test]
#[serial]
async fn discriminator_accepts_failing_rust_with_exact_count() {
    let f = fixture();
    add_new_tests(&f.ws, 3);
    // Rust passes only the seed test; the three new cases fail.
    fs::write(f.ws.sandbox().join(".rust_pass"), "1\n").unwrap();

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), false).await.unwrap();
    assert!(verdict.valid, "{}", verdict.output);
    // Valid attempts commit the new suite.
    assert!(f.ws.test_cases().join("tests01.jsonl").exists());
}

#[tokio::test]
#[serial]
async fn discriminator_rejects_wrong_count_and_recovers() {
    let f = fixture();
    add_new_tests(&f.ws, 2);
    fs::write(f.ws.sandbox().join(".rust_pass"), "1\n").unwrap();

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), false).await.unwrap();
    assert!(!verdict.valid);
    assert!(verdict.output.contains("Expected 4, got 3"));
    // Recovery dropped the extra file and restored the committed suite.
    assert!(!f.ws.sandbox().join("tests01.jsonl").exists());
    assert!(f.ws.sandbox().join("tests00.jsonl").exists());
}

#[tokio::test]
#[serial]
async fn discriminator_rejects_rust_passing_everything_before_last_attempt() {
    let f = fixture();
    add_new_tests(&f.ws, 3);

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), false).await.unwrap();
    assert!(!verdict.valid);
    assert!(verdict.output.contains("Mismatch count validation failed"));
}

#[tokio::test]
#[serial]
async fn discriminator_last_attempt_skips_the_mismatch_check() {
    let f = fixture();
    add_new_tests(&f.ws, 3);

    let verdict = validate_tests("echo", &f.ws, 2, &actor_spec(), false).await.unwrap();
    assert!(verdict.valid, "{}", verdict.output);
}

#[tokio::test]
#[serial]
async fn bsd_harness_skips_the_rust_check_entirely() {
    let f = fixture();
    add_new_tests(&f.ws, 3);

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), true).await.unwrap();
    assert!(verdict.valid, "{}", verdict.output);
}

#[tokio::test]
#[serial]
async fn discriminator_rejects_harness_failure_against_c() {
    let f = fixture();
    add_new_tests(&f.ws, 3);
    // Break the harness for the C comparison as well.
    write_exec(
        &f.ws.sandbox().join("testcmp.sh"),
        "#!/bin/bash\necho 'Results: 1 passed, 3 failed out of 4 tests'\n",
    );
    // Protect the broken harness from hydration by also committing it.
    write_exec(
        &f.ws.test_cases().join("testcmp.sh"),
        "#!/bin/bash\necho 'Results: 1 passed, 3 failed out of 4 tests'\n",
    );

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), false).await.unwrap();
    assert!(!verdict.valid);
    assert!(verdict.output.contains("Testcmp.sh comparison failed"));
}

#[tokio::test]
#[serial]
async fn missing_binaries_fail_before_running_the_harness() {
    let f = fixture();
    add_new_tests(&f.ws, 3);
    let bin = f.ws.sandbox().join("localbin");
    fs::create_dir_all(&bin).unwrap();
    // make succeeds but produces no binary at all.
    write_exec(&bin.join("make"), "#!/bin/bash\nexit 0\n");
    let _guard = PathGuard::prepend(&bin);

    let verdict = validate_tests("echo", &f.ws, 0, &actor_spec(), false).await.unwrap();
    assert!(!verdict.valid);
    assert!(verdict.output.contains("binary found after compilation"));
}

#[test]
fn remove_main_handles_files_and_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main"), "binary").unwrap();
    remove_main_artifact(dir.path());
    assert!(!dir.path().join("main").exists());

    fs::create_dir_all(dir.path().join("main/sub")).unwrap();
    remove_main_artifact(dir.path());
    assert!(!dir.path().join("main").exists());
}
