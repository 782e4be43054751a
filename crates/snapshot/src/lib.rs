// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! actor-snapshot: whitelist-filtered directory mirroring.
//!
//! The single `sync` primitive moves files between the sandbox, the
//! committed areas, and the per-iteration backups. It is the mechanism
//! behind the anti-cheating property: re-hydrating the sandbox from the
//! committed areas overwrites any protected file an agent tampered with.

use actor_core::Whitelist;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Directories nested deeper than this below the sync root are ignored.
pub const MAX_DEPTH: usize = 5;

/// Files at or above this size are never copied.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("source directory does not exist: {0}")]
    MissingSource(String),
    #[error("failed to create destination {path}: {source}")]
    CreateDest { path: String, source: std::io::Error },
}

/// Caps applied to a mirror operation.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub max_depth: usize,
    pub max_file_size: u64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { max_depth: MAX_DEPTH, max_file_size: MAX_FILE_SIZE }
    }
}

/// Mirror the whitelisted subset of `src` into `dst`.
///
/// Three phases, in order:
/// 1. prune: delete every regular file under `dst` whose basename matches
///    the whitelist (non-matching files are preserved),
/// 2. copy: walk `src` up to the depth cap and copy every whitelisted
///    regular file smaller than the size cap, preserving metadata,
/// 3. cleanup: remove directories left empty under `dst` (never `dst`
///    itself).
///
/// Per-file failures are skipped, not surfaced; a partial mirror is
/// preferred over an aborted one. The only hard errors are a missing
/// source directory and an uncreatable destination.
pub fn sync(src: &Path, dst: &Path, whitelist: &Whitelist) -> Result<(), SnapshotError> {
    sync_with(src, dst, whitelist, SyncOptions::default())
}

/// [`sync`] with explicit depth and size caps.
pub fn sync_with(
    src: &Path,
    dst: &Path,
    whitelist: &Whitelist,
    opts: SyncOptions,
) -> Result<(), SnapshotError> {
    if !src.is_dir() {
        return Err(SnapshotError::MissingSource(src.display().to_string()));
    }
    fs::create_dir_all(dst)
        .map_err(|e| SnapshotError::CreateDest { path: dst.display().to_string(), source: e })?;

    prune_whitelisted(dst, whitelist, opts.max_depth, 0);
    copy_whitelisted(src, dst, whitelist, &opts, 0);
    remove_empty_dirs(dst, dst);
    Ok(())
}

fn prune_whitelisted(dir: &Path, whitelist: &Whitelist, max_depth: usize, depth: usize) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            prune_whitelisted(&path, whitelist, max_depth, depth + 1);
        } else if file_type.is_file() && whitelist.matches(&path) {
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), error = %e, "prune skipped file");
            }
        }
    }
}

fn copy_whitelisted(
    src_dir: &Path,
    dst_dir: &Path,
    whitelist: &Whitelist,
    opts: &SyncOptions,
    depth: usize,
) {
    if depth > opts.max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(src_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let src_path = entry.path();
        let Some(name) = src_path.file_name() else {
            continue;
        };
        let dst_path = dst_dir.join(name);
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            copy_whitelisted(&src_path, &dst_path, whitelist, opts, depth + 1);
        } else if file_type.is_file() && whitelist.matches(&src_path) {
            if let Err(e) = copy_one(&src_path, &dst_path, opts.max_file_size) {
                tracing::debug!(path = %src_path.display(), error = %e, "copy skipped file");
            }
        }
    }
}

fn copy_one(src: &Path, dst: &Path, max_file_size: u64) -> std::io::Result<()> {
    let size = fs::metadata(src)?.len();
    if size >= max_file_size {
        return Ok(());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    // Keep source mtimes so downstream age checks stay meaningful
    if let Ok(meta) = fs::metadata(src) {
        if let Ok(mtime) = meta.modified() {
            let _ = copy_mtime(dst, mtime);
        }
    }
    Ok(())
}

fn copy_mtime(path: &Path, mtime: std::time::SystemTime) -> std::io::Result<()> {
    let file = fs::File::options().append(true).open(path)?;
    file.set_modified(mtime)
}

/// Remove empty directories bottom-up, never removing `root` itself.
fn remove_empty_dirs(dir: &Path, root: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            remove_empty_dirs(&path, root);
        }
    }
    if dir != root && is_empty_dir(dir) {
        if let Err(e) = fs::remove_dir(dir) {
            tracing::debug!(path = %dir.display(), error = %e, "empty-dir cleanup skipped");
        }
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).map(|mut entries| entries.next().is_none()).unwrap_or(false)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
