// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LpsError {
    /// `start` refused because pipeline files already exist.
    #[error("lproc files already exist: {}", format_paths(.0))]
    NameConflict(Vec<PathBuf>),

    /// Named LProc has no stdin file on disk.
    #[error("lproc '{0}' not found (missing stdin file)")]
    NotFound(String),

    /// `delete` refused because the pipeline is still running.
    #[error("lproc '{0}' is still running; kill it first")]
    StillRunning(String),

    /// Processes survived the SIGTERM/SIGKILL escalation window.
    #[error("processes still alive after kill: {0:?}")]
    ProcessesStillAlive(Vec<i32>),

    /// `append` received the wrong number of input lines.
    #[error("expected {expected} line(s) on stdin, received {actual}")]
    LineCountMismatch { expected: usize, actual: usize },

    /// `append` received no data at all.
    #[error("no data received on stdin")]
    EmptyInput,

    /// Invalid line count argument (must be positive).
    #[error("line count must be a positive integer, got {0}")]
    InvalidLineCount(i64),

    /// A numeric CLI argument that did not parse.
    #[error("invalid numeric argument: {0}")]
    InvalidNumber(String),

    /// Invalid tail length for `pretty` (must be >= 0, or -1 for whole file).
    #[error("line count must be non-negative or -1 for the whole file, got {0}")]
    InvalidTailLength(i64),

    /// Unknown stream name.
    #[error("stream must be one of stdin|stdout|stderr, got '{0}'")]
    InvalidStream(String),

    /// No converter registered under this name for this stream.
    #[error("converter '{name}' not registered for stream '{stream}'")]
    UnknownConverter { name: String, stream: String },

    /// Converter rejected its input.
    #[error("converter failed: {0}")]
    ConverterFailed(String),

    /// Could not determine a home directory for the default lproc root.
    #[error("cannot resolve lproc root: HOME is not set and LPROC_DIR is empty")]
    NoRoot,

    /// The follower binary could not be located.
    #[error("lptail binary not found next to the current executable or on PATH")]
    LptailNotFound,

    #[error("failed to launch pipeline: {0}")]
    Spawn(std::io::Error),

    #[error("{context}: {source}")]
    Io { context: String, source: std::io::Error },
}

impl LpsError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
