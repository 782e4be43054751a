// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LProc root directory and file-path resolution.

use crate::error::LpsError;
use std::fmt;
use std::path::{Path, PathBuf};

/// The three streams backing an LProc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdin,
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [StreamKind::Stdin, StreamKind::Stdout, StreamKind::Stderr];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdin => "stdin",
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LpsError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdin" => Ok(StreamKind::Stdin),
            "stdout" => Ok(StreamKind::Stdout),
            "stderr" => Ok(StreamKind::Stderr),
            other => Err(LpsError::InvalidStream(other.to_string())),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved locations for pipeline files and archives.
#[derive(Debug, Clone)]
pub struct LprocPaths {
    root: PathBuf,
}

impl LprocPaths {
    /// Resolve the managed root: `LPROC_DIR` env var if set, else
    /// `$HOME/.lproc`. The directory (and its archive) are created lazily
    /// by the operations that write into them.
    pub fn resolve() -> Result<Self, LpsError> {
        if let Ok(dir) = std::env::var("LPROC_DIR") {
            if !dir.is_empty() {
                return Ok(Self { root: PathBuf::from(dir) });
            }
        }
        let home = std::env::var("HOME").map_err(|_| LpsError::NoRoot)?;
        Ok(Self { root: Path::new(&home).join(".lproc") })
    }

    /// Use an explicit root (tests, embedded use).
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `delete` moves retired pipeline files.
    pub fn archive_root(&self) -> PathBuf {
        self.root.join("archive")
    }

    /// `<root>/<name>.<stream>`
    pub fn stream_file(&self, name: &str, kind: StreamKind) -> PathBuf {
        self.root.join(format!("{name}.{kind}"))
    }

    /// The stream files for `name` that exist on disk.
    pub fn existing_files(&self, name: &str) -> Vec<PathBuf> {
        StreamKind::ALL
            .iter()
            .map(|k| self.stream_file(name, *k))
            .filter(|p| p.exists())
            .collect()
    }

    /// Derive the LProc name from a managed `.stdin` path, if it is one.
    pub fn name_from_stdin(&self, path: &Path) -> Option<String> {
        if path.parent() != Some(self.root.as_path()) {
            return None;
        }
        let file = path.file_name()?.to_str()?;
        file.strip_suffix(".stdin").map(str::to_string)
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
