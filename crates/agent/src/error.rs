// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent runner error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Lps(#[from] actor_lps::LpsError),

    #[error("agent session produced no parseable output")]
    NoOutput,

    #[error("model query failed: {0}")]
    Model(String),

    #[error("model API returned status {status}: {body}")]
    ModelStatus { status: u16, body: String },

    #[error("checkpoint error at {path}: {message}")]
    Checkpoint { path: String, message: String },

    #[error("cost or context limits exceeded: {0}")]
    LimitsExceeded(String),

    #[error("{context}: {source}")]
    Io { context: String, source: std::io::Error },
}

impl AgentError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}
