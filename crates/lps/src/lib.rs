// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! actor-lps: the Long-Process Supervisor.
//!
//! An LProc is a detached command pipeline whose stdio is backed by three
//! regular files: appends to `<name>.stdin` are followed by `lptail` and
//! piped into the command, whose stdout/stderr accumulate in the other two
//! files. The whole pipeline shares one process group, so signals reach
//! every member. A single `/proc` sweep is the source of truth for what is
//! running.

pub mod convert;
pub mod error;
pub mod ops;
pub mod paths;
pub mod pretty;
pub mod procfs;
pub mod scan;
pub mod start;
pub mod tail;

pub use error::LpsError;
pub use ops::{
    append_lines, delete_lproc, export_lproc, kill_lproc, list_lprocs, lproc_info, FileReport,
    InfoReport, KillOutcome, ListEntry,
};
pub use paths::{LprocPaths, StreamKind};
pub use pretty::{pretty_stream, read_last_n_lines};
pub use scan::{find_lproc, scan_index, LProcInfo, ProcessInfo};
pub use start::{start_lproc, StartOutcome};
