// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown translator id: {0}")]
    UnknownTranslator(String),

    #[error("unknown discriminator id: {0}")]
    UnknownDiscriminator(String),

    #[error(transparent)]
    Snapshot(#[from] actor_snapshot::SnapshotError),

    #[error(transparent)]
    State(#[from] actor_core::StateError),

    #[error("agent session failed: {0}")]
    Agent(#[from] actor_agent::AgentError),

    #[error("missing committed area: {0}")]
    MissingArea(String),

    #[error("{context}: {source}")]
    Io { context: String, source: std::io::Error },
}

impl EngineError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}
