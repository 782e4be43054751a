// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let before = clock.epoch_ms();
    clock.advance_ms(5_000);
    assert_eq!(clock.epoch_ms(), before + 5_000);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42_000);
    assert_eq!(clock.epoch_ms(), 42_000);
}

#[test]
fn system_clock_is_nonzero() {
    assert!(SystemClock.epoch_ms() > 0);
}

#[test]
fn now_iso_round_trips_through_parse() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    let iso = clock.now_iso();
    let parsed = parse_iso(&iso).unwrap();
    assert_eq!(parsed.timestamp_millis(), 1_700_000_000_000);
}

#[test]
fn parse_iso_rejects_garbage() {
    assert!(parse_iso("not a timestamp").is_none());
}
