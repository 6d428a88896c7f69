// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RE_SETUP` handling (§6): create each replica's private directory and
//! stage `ENGINE_INPUT_EXTFILES` into it, then build the initial replica
//! table as the identity permutation (§3 Lifecycle: `stateid_current =
//! i_initial`).

use asre_core::{Config, Replica, ReplicaId, StateId};
use std::fs;
use std::io;
use std::path::Path;

/// Creates `r{i}/` for every replica and copies each configured extfile
/// from `root` into it. Idempotent: re-running setup on an existing root
/// just overwrites the staged copies.
pub fn stage_replica_directories(root: &Path, config: &Config) -> io::Result<()> {
    fs::create_dir_all(root)?;
    for i in 0..config.nreplicas {
        let replica_dir = root.join(ReplicaId::new(i).dir_name());
        fs::create_dir_all(&replica_dir)?;
        for file in &config.engine_input_extfiles {
            let src = root.join(file);
            let dst = replica_dir.join(file);
            fs::copy(&src, &dst)?;
        }
    }
    Ok(())
}

/// The setup-time replica table: `M` replicas at `(stateid_current = i,
/// running_status = W, cycle_current = 1)`.
pub fn initial_replicas(config: &Config) -> Vec<Replica> {
    (0..config.nreplicas).map(|i| Replica::new(ReplicaId::new(i), StateId::new(i))).collect()
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
