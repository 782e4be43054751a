// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    zero = { 0, "0s" },
    seconds_only = { 42, "42s" },
    minute_boundary = { 60, "1m 0s" },
    minutes = { 323, "5m 23s" },
    hour_boundary = { 3600, "1h 0m 0s" },
    mixed = { 7503, "2h 5m 3s" },
)]
fn elapsed_formats(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}
