// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "cat", "cat" },
    path = { "/usr/bin/env", "/usr/bin/env" },
    with_space = { "echo hi", "'echo hi'" },
    with_quote = { "it's", r"'it'\''s'" },
    empty = { "", "''" },
    with_dollar = { "echo $HOME", "'echo $HOME'" },
)]
fn quoting(input: &str, expected: &str) {
    assert_eq!(shell_quote(input), expected);
}

#[test]
fn start_refuses_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LprocPaths::from_root(dir.path());
    std::fs::create_dir_all(paths.root()).unwrap();
    std::fs::write(paths.stream_file("demo", StreamKind::Stdout), "leftover").unwrap();

    let err = start_lproc(&paths, "demo", "cat").unwrap_err();
    match err {
        LpsError::NameConflict(files) => {
            assert_eq!(files.len(), 1);
            assert!(files[0].ends_with("demo.stdout"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
