// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, body).unwrap();
    path
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn c_wl() -> Whitelist {
    Whitelist::c_files()
}

#[test]
fn copies_whitelisted_files_preserving_layout() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "main.c", "int main(){}");
    write(src.path(), "lib/util.h", "#pragma once");
    write(src.path(), "README.md", "not whitelisted");

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert_eq!(read(dst.path(), "main.c"), "int main(){}");
    assert_eq!(read(dst.path(), "lib/util.h"), "#pragma once");
    assert!(!dst.path().join("README.md").exists());
}

#[test]
fn prunes_whitelisted_files_absent_from_source() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "keep.c", "new");
    write(dst.path(), "keep.c", "old");
    write(dst.path(), "stale.c", "gone after sync");
    write(dst.path(), "notes.txt", "preserved");

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert_eq!(read(dst.path(), "keep.c"), "new");
    assert!(!dst.path().join("stale.c").exists());
    assert_eq!(read(dst.path(), "notes.txt"), "preserved");
}

#[test]
fn overwrites_tampered_destination_files() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "tests00.jsonl", "{\"name\": \"committed\"}");
    write(dst.path(), "tests00.jsonl", "{\"name\": \"tampered\"}");

    sync(src.path(), dst.path(), &Whitelist::test_cases()).unwrap();

    assert_eq!(read(dst.path(), "tests00.jsonl"), "{\"name\": \"committed\"}");
}

#[test]
fn directories_beyond_depth_cap_are_ignored() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "a/b/c/d/e/deep.c", "at depth 5");
    write(src.path(), "a/b/c/d/e/f/too_deep.c", "at depth 6");

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert!(dst.path().join("a/b/c/d/e/deep.c").exists());
    assert!(!dst.path().join("a/b/c/d/e/f/too_deep.c").exists());
}

#[test]
fn file_at_size_cap_is_skipped_one_below_is_copied() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let at_cap = vec![b'x'; MAX_FILE_SIZE as usize];
    let below_cap = vec![b'y'; MAX_FILE_SIZE as usize - 1];
    fs::write(src.path().join("at_cap.c"), &at_cap).unwrap();
    fs::write(src.path().join("below_cap.c"), &below_cap).unwrap();

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert!(!dst.path().join("at_cap.c").exists());
    assert!(dst.path().join("below_cap.c").exists());
}

#[test]
fn empty_directories_are_cleaned_up() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "src/main.c", "x");
    // A stale whitelisted file whose removal leaves its directory empty
    write(dst.path(), "old/gone.c", "x");

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert!(!dst.path().join("old").exists());
    assert!(dst.path().join("src/main.c").exists());
}

#[test]
fn destination_root_is_never_removed() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    sync(src.path(), dst.path(), &c_wl()).unwrap();

    assert!(dst.path().is_dir());
}

#[test]
fn sync_is_idempotent() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "main.c", "int main(){}");
    write(src.path(), "sub/util.h", "h");

    sync(src.path(), dst.path(), &c_wl()).unwrap();
    let first: Vec<_> = walk(dst.path());
    sync(src.path(), dst.path(), &c_wl()).unwrap();
    let second: Vec<_> = walk(dst.path());

    assert_eq!(first, second);
}

#[test]
fn missing_source_is_an_error() {
    let dst = TempDir::new().unwrap();
    let err = sync(Path::new("/nonexistent-src"), dst.path(), &c_wl()).unwrap_err();
    assert!(matches!(err, SnapshotError::MissingSource(_)));
}

#[test]
fn creates_destination_if_absent() {
    let src = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    write(src.path(), "main.c", "x");
    let dst = parent.path().join("fresh");

    sync(src.path(), &dst, &c_wl()).unwrap();

    assert!(dst.join("main.c").exists());
}

#[test]
fn custom_caps_are_honored() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    write(src.path(), "a/nested.c", "x");
    write(src.path(), "top.c", "y");

    let opts = SyncOptions { max_depth: 0, max_file_size: MAX_FILE_SIZE };
    sync_with(src.path(), dst.path(), &c_wl(), opts).unwrap();

    assert!(dst.path().join("top.c").exists());
    assert!(!dst.path().join("a/nested.c").exists());
}

fn walk(root: &Path) -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap().flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                let body = fs::read_to_string(&path).unwrap();
                out.push((rel, body));
            }
        }
    }
    out.sort();
    out
}
