// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subjob descriptor: the pilot boundary contract (§6 "Pilot boundary").

use asre_core::{ReplicaId, StateId};
use std::path::PathBuf;

/// How a subjob's processes are laid out (§6 `SPMD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpmdMode {
    /// One engine process for the whole subjob.
    Single,
    /// The engine itself splits into `processes` SPMD ranks.
    Spmd,
}

/// Everything the pilot needs to launch one (replica, cycle) subjob.
#[derive(Debug, Clone)]
pub struct SubjobDescriptor {
    pub replica: ReplicaId,
    pub state: StateId,
    pub cycle: u64,
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub processes: u32,
    pub spmd_mode: SpmdMode,
}
