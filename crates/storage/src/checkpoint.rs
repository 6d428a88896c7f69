// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint persistence for crash recovery (§4.1).
//!
//! `{basename}.stat` is the sole durable authority across restarts. Writes
//! go to a temporary path, are flushed, then atomically renamed into place,
//! rotating the previous checkpoint into a `.bak` backup first.

use crate::error::StoreError;
use asre_core::Replica;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current checkpoint schema version (§4.1 `restore`: "fails ... on version
/// mismatch").
pub const CURRENT_CHECKPOINT_VERSION: u32 = 1;

/// The on-disk envelope written to `{basename}.stat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(rename = "v")]
    pub version: u32,
    pub replicas: Vec<Replica>,
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    fn new(replicas: Vec<Replica>) -> Self {
        Self { version: CURRENT_CHECKPOINT_VERSION, replicas, created_at: Utc::now() }
    }

    /// `restore(bytes) -> table` (§4.1): rejects version mismatches and
    /// truncated/unparseable bytes alike as `CorruptCheckpoint`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let checkpoint: Checkpoint = serde_json::from_slice(bytes).map_err(|e| StoreError::CorruptCheckpoint {
            reason: format!("could not parse checkpoint: {e}"),
        })?;
        if checkpoint.version != CURRENT_CHECKPOINT_VERSION {
            return Err(StoreError::CorruptCheckpoint {
                reason: format!(
                    "checkpoint version {} does not match expected version {}",
                    checkpoint.version, CURRENT_CHECKPOINT_VERSION
                ),
            });
        }
        Ok(checkpoint)
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`. The
/// oldest backup is removed when the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

/// Write `replicas` to `{basename}.stat` (§4.1 checkpoint protocol):
/// serialize to a sibling temp path, flush, rotate the previous checkpoint
/// into `.bak`, then atomically rename the temp file into place.
pub fn write_checkpoint(stat_path: &Path, replicas: &[Replica]) -> Result<(), StoreError> {
    let checkpoint = Checkpoint::new(replicas.to_vec());
    let body = serde_json::to_vec_pretty(&checkpoint)?;

    let tmp_path = stat_path.with_extension("stat.tmp");
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(&body)?;
        tmp.flush()?;
        tmp.sync_all()?;
    }

    if stat_path.exists() {
        let bak_path = rotate_bak_path(stat_path);
        fs::rename(stat_path, bak_path)?;
    }

    fs::rename(&tmp_path, stat_path)?;
    tracing::debug!(path = %stat_path.display(), replicas = replicas.len(), "wrote checkpoint");
    Ok(())
}

/// Read and validate `{basename}.stat`. A missing file is not corruption —
/// the caller distinguishes "no checkpoint yet" from "checkpoint present but
/// unreadable" by checking [`Path::exists`] first.
pub fn read_checkpoint(stat_path: &Path) -> Result<Checkpoint, StoreError> {
    let bytes = fs::read(stat_path)?;
    Checkpoint::from_bytes(&bytes)
}

/// Apply the restart reset (§4.1): `stateid_current`/`cycle_current` are
/// taken as authoritative from the checkpoint, but `running_status` is
/// forced to `W` and `last_handle` cleared regardless of what was persisted,
/// because the pilot has no knowledge of prior handles across restarts.
/// Cycle advancement for replicas that actually finished before the crash
/// (§9 open question 1) is layered on top of this by `asre-engine`, which
/// has access to the cycle artifact layer this crate does not.
pub fn restart_reset(checkpoint: Checkpoint) -> Vec<Replica> {
    checkpoint
        .replicas
        .into_iter()
        .map(|mut r| {
            r.running_status = asre_core::RunningStatus::Waiting;
            r.last_handle = None;
            r
        })
        .collect()
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
