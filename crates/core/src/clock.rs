// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use chrono::{DateTime, Local, TimeZone};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    fn epoch_ms(&self) -> u64;

    /// Local time in ISO-8601 form (seconds precision), the format used in
    /// state documents and history entries.
    fn now_iso(&self) -> String {
        let ms = self.epoch_ms() as i64;
        match Local.timestamp_millis_opt(ms) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
            }
            chrono::LocalResult::None => String::from("1970-01-01T00:00:00.000000"),
        }
    }
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    epoch_ms: Arc<AtomicI64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self { epoch_ms: Arc::new(AtomicI64::new(1_000_000)) }
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance_ms(&self, ms: i64) {
        self.epoch_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the epoch milliseconds value
    pub fn set_epoch_ms(&self, ms: i64) {
        self.epoch_ms.store(ms, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        self.epoch_ms.load(Ordering::SeqCst).max(0) as u64
    }
}

/// Parse an ISO timestamp produced by [`Clock::now_iso`].
pub fn parse_iso(s: &str) -> Option<DateTime<Local>> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).single())
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
