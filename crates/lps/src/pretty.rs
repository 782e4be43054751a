// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pretty`: feed the tail of a stream file through a converter.

use crate::convert;
use crate::error::LpsError;
use crate::paths::{LprocPaths, StreamKind};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read the last `n` lines of a file as one string.
///
/// `-1` returns the whole file; `0` returns an empty string.
pub fn read_last_n_lines(path: &Path, n: i64) -> Result<String, LpsError> {
    if n == -1 {
        return std::fs::read_to_string(path)
            .map_err(|e| LpsError::io(format!("reading {}", path.display()), e));
    }
    if n < 0 {
        return Err(LpsError::InvalidTailLength(n));
    }
    if n == 0 {
        return Ok(String::new());
    }

    let file =
        File::open(path).map_err(|e| LpsError::io(format!("opening {}", path.display()), e))?;
    let reader = BufReader::new(file);
    let mut window: VecDeque<String> = VecDeque::with_capacity(n as usize);
    for line in reader.lines() {
        let line = line.map_err(|e| LpsError::io(format!("reading {}", path.display()), e))?;
        if window.len() == n as usize {
            window.pop_front();
        }
        window.push_back(line);
    }
    let mut out = String::new();
    for line in window {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Render the last `nlines` of a stream through a registered converter,
/// writing the converter's output to `out`.
pub fn pretty_stream(
    paths: &LprocPaths,
    name: &str,
    stream: StreamKind,
    nlines: i64,
    converter: &str,
    args: &[String],
    out: &mut dyn Write,
) -> Result<(), LpsError> {
    let src = paths.stream_file(name, stream);
    if !src.exists() {
        return Err(LpsError::NotFound(name.to_string()));
    }
    let converter = convert::lookup(converter, stream)?;
    let data = read_last_n_lines(&src, nlines)?;
    converter.convert(&data, args, out)
}

#[cfg(test)]
#[path = "pretty_tests.rs"]
mod tests;
