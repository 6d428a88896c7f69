// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps a (replica, state, cycle) to the subjob descriptor the pilot needs
//! to launch it (§6 "Pilot boundary").
//!
//! The engine family (`ENGINE`) is routed straight to an executable on
//! `PATH`; its input file is whatever the exchange plug-in's `build_input`
//! wrote at [`asre_engine::CycleArtifactLayer::input_path`].

use asre_adapters::{SpmdMode, SubjobDescriptor};
use asre_core::{ReplicaId, StateId};
use asre_engine::{CycleArtifactLayer, DescriptorBuilder};
use std::path::PathBuf;
use std::sync::Arc;

pub struct EngineDescriptorBuilder {
    artifacts: Arc<dyn CycleArtifactLayer>,
    root: PathBuf,
    engine: String,
    basename: String,
    subjob_cores: u32,
    spmd_mode: SpmdMode,
}

impl EngineDescriptorBuilder {
    pub fn new(
        artifacts: Arc<dyn CycleArtifactLayer>,
        root: impl Into<PathBuf>,
        engine: impl Into<String>,
        basename: impl Into<String>,
        subjob_cores: u32,
        spmd_mode: SpmdMode,
    ) -> Self {
        Self { artifacts, root: root.into(), engine: engine.into(), basename: basename.into(), subjob_cores, spmd_mode }
    }
}

impl DescriptorBuilder for EngineDescriptorBuilder {
    fn build(&self, replica: ReplicaId, state: StateId, cycle: u64) -> SubjobDescriptor {
        let working_dir = self.root.join(replica.dir_name());
        let input_path = self.artifacts.input_path(replica, cycle);

        SubjobDescriptor {
            replica,
            state,
            cycle,
            executable: PathBuf::from(&self.engine),
            args: vec![input_path.to_string_lossy().into_owned()],
            stdout_path: working_dir.join(format!("{}_{}.stdout", self.basename, cycle)),
            stderr_path: working_dir.join(format!("{}_{}.stderr", self.basename, cycle)),
            working_dir,
            processes: self.subjob_cores,
            spmd_mode: self.spmd_mode,
        }
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
