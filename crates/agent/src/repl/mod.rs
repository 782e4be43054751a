// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-process REPL runner.
//!
//! For agents without a stream-JSONL CLI: a message list persisted to a
//! checkpoint, one fenced bash action per assistant turn executed in the
//! sandbox, and hard ceilings on cost and context.

mod config;
mod model;
mod outcome;
mod session;

pub use config::ReplConfig;
pub use model::{AnthropicModel, Message, Model, ModelResponse};
pub use outcome::{DoneStatus, StepOutcome};
pub use session::ReplAgent;
