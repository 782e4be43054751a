// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `lptail` follower.
//!
//! A line-buffered `tail -f` analog over a regular file: stream existing
//! content, then block for appended data. Unlike `tail`, it never exits on
//! EOF, since the pipeline it feeds only ends when the group is killed.
//! Truncation (file shrank) reopens from offset zero.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

/// Poll cadence while waiting for new data.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Follower cursor: byte offset plus any incomplete trailing line.
#[derive(Debug, Default)]
pub struct TailState {
    offset: u64,
    pending: String,
}

impl TailState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit any newly appended complete lines to `out`.
    ///
    /// Partial trailing lines are buffered until their newline arrives.
    /// A missing file is treated as "no data yet" (`touch` races the
    /// follower at pipeline start); truncation restarts from offset zero.
    pub fn drain(&mut self, path: &Path, out: &mut dyn Write) -> std::io::Result<()> {
        let len = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };

        if len < self.offset {
            self.offset = 0;
            self.pending.clear();
        }
        if len <= self.offset {
            return Ok(());
        }

        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut reader = BufReader::new(file);
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = reader.read_line(&mut buf)?;
            if n == 0 {
                break;
            }
            self.offset += n as u64;
            self.pending.push_str(&buf);
            if self.pending.ends_with('\n') {
                out.write_all(self.pending.as_bytes())?;
                out.flush()?;
                self.pending.clear();
            }
        }
        Ok(())
    }
}

/// Follow `path` forever, writing complete lines to `out`.
///
/// Returns only on a write error (downstream pipe closed) or if the file
/// becomes permanently unreadable.
pub fn follow(path: &Path, out: &mut dyn Write) -> std::io::Result<()> {
    let mut state = TailState::new();
    loop {
        state.drain(path, out)?;
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
#[path = "tail_tests.rs"]
mod tests;
