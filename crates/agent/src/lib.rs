// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! actor-agent: drive one LLM-agent session to completion.
//!
//! Two interchangeable runners share the same contract: given a task
//! prompt, drive to completion or fatal failure:
//!
//! - the external runner hosts a `claudix` proxy inside an LProc and
//!   steers it by appending stream-JSONL messages to the pipeline stdin,
//! - the in-process runner is a minimal REPL agent talking to an LLM API
//!   and executing one fenced bash action per turn in the sandbox.

pub mod error;
pub mod protocol;
pub mod proxy;
pub mod repl;
pub mod runner;
pub mod safety;

pub use error::AgentError;
pub use protocol::{
    extract_restart, failure_result, no_send_reminder, user_message, RestartVariant,
};
pub use proxy::ProxyState;
pub use runner::{run_session, SessionOptions, SessionPoll};
pub use safety::{check_code, scan_rust_sources, Violation};
