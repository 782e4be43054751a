// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step outcomes for the REPL loop.
//!
//! Each step either feeds the conversation forward, retries after a
//! recoverable problem, or ends the session.

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneStatus {
    /// The agent printed the completion sentinel.
    Submitted,
    /// Cost ceiling or effective context length reached.
    LimitsExceeded,
}

actor_core::simple_display! {
    DoneStatus {
        Submitted => "submitted",
        LimitsExceeded => "limits_exceeded",
    }
}

/// The result of one REPL step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Action executed; its observation becomes the next user message.
    Continue(String),
    /// Recoverable problem (format error, action timeout); the message
    /// becomes the next user message and the loop retries.
    Retry(String),
    /// Session over.
    Done { status: DoneStatus, message: String },
}
