// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn tmp_file(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.stdin");
    std::fs::write(&path, body).unwrap();
    (dir, path)
}

#[test]
fn streams_existing_content() {
    let (_dir, path) = tmp_file("one\ntwo\n");
    let mut state = TailState::new();
    let mut out = Vec::new();

    state.drain(&path, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
}

#[test]
fn emits_appended_lines_incrementally() {
    let (_dir, path) = tmp_file("first\n");
    let mut state = TailState::new();
    let mut out = Vec::new();
    state.drain(&path, &mut out).unwrap();

    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"second\n").unwrap();
    state.drain(&path, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "first\nsecond\n");
}

#[test]
fn buffers_partial_lines_until_newline() {
    let (_dir, path) = tmp_file("par");
    let mut state = TailState::new();
    let mut out = Vec::new();
    state.drain(&path, &mut out).unwrap();
    assert!(out.is_empty());

    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"tial\n").unwrap();
    state.drain(&path, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "partial\n");
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = TailState::new();
    let mut out = Vec::new();
    state.drain(&dir.path().join("absent"), &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn truncation_restarts_from_zero() {
    let (_dir, path) = tmp_file("old content that goes away\n");
    let mut state = TailState::new();
    let mut out = Vec::new();
    state.drain(&path, &mut out).unwrap();

    std::fs::write(&path, "fresh\n").unwrap();
    out.clear();
    state.drain(&path, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "fresh\n");
}
