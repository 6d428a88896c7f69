// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle Artifact Layer (C2, §4.2): names, locates, and introspects
//! per-cycle per-replica files produced by the MD engine.

use asre_core::ReplicaId;
use std::path::{Path, PathBuf};

/// `hasCompleted(replica, cycle) -> bool` plus the input/output path naming
/// convention (§4.2, §6 working-directory layout).
///
/// During normal operation completion is observed directly from the
/// Subjob Adapter's poll outcome (§4.3); this layer exists for the case the
/// adapter cannot answer — most importantly post-restart reconciliation
/// (§4.5 "Restart reset"), when no handle survives the crash and the only
/// evidence of a finished cycle is the output file itself.
pub trait CycleArtifactLayer: Send + Sync {
    fn input_path(&self, replica: ReplicaId, cycle: u64) -> PathBuf;
    fn output_path(&self, replica: ReplicaId, cycle: u64) -> PathBuf;
    fn has_completed(&self, replica: ReplicaId, cycle: u64) -> bool;
}

/// The engine-specific override §4.2 calls "essential": a cycle is complete
/// iff its output file exists and is non-empty.
///
/// Input/output basenames follow `{basename}_{cycle}.{ext}` under the
/// replica's own `r{i}` directory (§6).
pub struct FileArtifactLayer {
    root: PathBuf,
    basename: String,
    input_ext: String,
    output_ext: String,
}

impl FileArtifactLayer {
    pub fn new(root: impl Into<PathBuf>, basename: impl Into<String>, input_ext: impl Into<String>, output_ext: impl Into<String>) -> Self {
        Self { root: root.into(), basename: basename.into(), input_ext: input_ext.into(), output_ext: output_ext.into() }
    }

    fn replica_dir(&self, replica: ReplicaId) -> PathBuf {
        self.root.join(replica.dir_name())
    }

    fn named(&self, replica: ReplicaId, cycle: u64, ext: &str) -> PathBuf {
        self.replica_dir(replica).join(format!("{}_{}.{}", self.basename, cycle, ext))
    }
}

impl CycleArtifactLayer for FileArtifactLayer {
    fn input_path(&self, replica: ReplicaId, cycle: u64) -> PathBuf {
        self.named(replica, cycle, &self.input_ext)
    }

    fn output_path(&self, replica: ReplicaId, cycle: u64) -> PathBuf {
        self.named(replica, cycle, &self.output_ext)
    }

    fn has_completed(&self, replica: ReplicaId, cycle: u64) -> bool {
        let path = self.output_path(replica, cycle);
        is_non_empty_file(&path)
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
