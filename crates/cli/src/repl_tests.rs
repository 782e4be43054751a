// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    all = { "all", 3, &[0, 1, 2] },
    all_mixed_case = { "ALL", 2, &[0, 1] },
    commas = { "1,3", 3, &[0, 2] },
    spaces = { "2 3", 3, &[1, 2] },
    duplicates = { "1,1,2", 3, &[0, 1] },
    out_of_range = { "0,4,2", 3, &[1] },
    garbage = { "x,y", 3, &[] },
    empty = { "", 3, &[] },
)]
fn selection_parsing(input: &str, len: usize, expected: &[usize]) {
    assert_eq!(parse_selection(input, len), expected);
}

#[test]
fn backups_default_is_the_latest() {
    assert_eq!(backups_default(&[0, 1, 2]), "2");
    assert_eq!(backups_default(&[]), "0");
}
