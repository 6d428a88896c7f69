// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pilot that runs subjobs as local child processes.
//!
//! This is the reference pilot for single-host campaigns; production pilots
//! (batch schedulers, BigJob-style coordination services per §6
//! `COORDINATION_URL`/`RESOURCE_URL`) implement [`SubjobAdapter`] the same
//! way against their own submission API.

use crate::descriptor::SubjobDescriptor;
use crate::pilot::{Capacity, PilotError, PollOutcome, SubjobAdapter};
use asre_core::SubjobHandle;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU32, Ordering};

struct Slot {
    child: Child,
    cores: u32,
}

/// Launches subjobs with [`std::process::Command`], tracking live children
/// in a table keyed by a handle minted from a monotonic counter.
pub struct LocalProcessPilot {
    total_cores: u32,
    buffer_size: f64,
    next_handle: AtomicU32,
    children: Mutex<HashMap<SubjobHandle, Slot>>,
}

impl LocalProcessPilot {
    pub fn new(total_cores: u32, buffer_size: f64) -> Self {
        Self { total_cores, buffer_size, next_handle: AtomicU32::new(0), children: Mutex::new(HashMap::new()) }
    }

    fn mint_handle(&self) -> SubjobHandle {
        let n = self.next_handle.fetch_add(1, Ordering::Relaxed);
        SubjobHandle::new(format!("local-{n}"))
    }
}

impl SubjobAdapter for LocalProcessPilot {
    fn submit(&self, descriptor: &SubjobDescriptor) -> Result<SubjobHandle, PilotError> {
        let stdout = File::create(&descriptor.stdout_path)
            .map_err(|e| PilotError::SubmitFailed(format!("stdout file: {e}")))?;
        let stderr = File::create(&descriptor.stderr_path)
            .map_err(|e| PilotError::SubmitFailed(format!("stderr file: {e}")))?;

        let child = Command::new(&descriptor.executable)
            .args(&descriptor.args)
            .current_dir(&descriptor.working_dir)
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|e| PilotError::SubmitFailed(e.to_string()))?;

        let handle = self.mint_handle();
        self.children.lock().insert(handle.clone(), Slot { child, cores: descriptor.processes });
        tracing::info!(%handle, replica = %descriptor.replica, cycle = descriptor.cycle, "submitted subjob");
        Ok(handle)
    }

    fn poll(&self, handle: &SubjobHandle) -> Result<PollOutcome, PilotError> {
        let mut children = self.children.lock();
        let Some(slot) = children.get_mut(handle) else {
            return Ok(PollOutcome::Unknown);
        };
        match slot.child.try_wait() {
            Ok(None) => Ok(PollOutcome::Running),
            Ok(Some(status)) => {
                let outcome = if status.success() { PollOutcome::Done } else { PollOutcome::Failed };
                children.remove(handle);
                Ok(outcome)
            }
            Err(e) => Err(PilotError::PollFailed { handle: handle.clone(), reason: e.to_string() }),
        }
    }

    fn capacity(&self) -> Result<Capacity, PilotError> {
        let in_use: u32 = self.children.lock().values().map(|s| s.cores).sum();
        Ok(Capacity { in_use, total: self.total_cores, buffer_size: self.buffer_size })
    }
}

#[cfg(test)]
#[path = "local_process_tests.rs"]
mod tests;
