// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Engine(#[from] actor_engine::EngineError),

    #[error(transparent)]
    State(#[from] actor_core::StateError),

    #[error(transparent)]
    Snapshot(#[from] actor_snapshot::SnapshotError),

    #[error("no instance matches '{0}'")]
    UnknownInstance(String),

    #[error("original input directory not found: {0}")]
    MissingInput(String),

    #[error("backup not found: {0}")]
    MissingBackup(String),

    #[error("dangerous-list file not found: {0}")]
    MissingDangerousList(String),

    #[error("invalid dangerous-list file {path}: {source}")]
    InvalidDangerousList { path: String, source: serde_json::Error },

    #[error("{context}: {source}")]
    Io { context: String, source: std::io::Error },
}

impl ServerError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}
