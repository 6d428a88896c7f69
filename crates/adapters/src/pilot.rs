// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `SubjobAdapter` trait: a uniform, synchronous interface to an
//! external pilot (§4.3).
//!
//! Synchronous by design, not by omission: §5 mandates a single-threaded
//! cooperative control loop with no internal worker threads, so this trait
//! has no async counterpart — the scheduler loop blocks briefly at each
//! poll, which is itself one of the loop's specified suspension points.

use crate::descriptor::SubjobDescriptor;
use asre_core::SubjobHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PilotError {
    #[error("pilot unavailable: {0}")]
    PilotUnavailable(String),
    #[error("submission failed: {0}")]
    SubmitFailed(String),
    #[error("poll failed for handle {handle}: {reason}")]
    PollFailed { handle: SubjobHandle, reason: String },
}

/// Terminal/non-terminal outcome of polling a handle (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Accepted by the pilot but not yet scheduled.
    Pending,
    /// Executing.
    Running,
    /// Finished without an error the pilot observed.
    Done,
    /// Finished with an error the pilot observed.
    Failed,
    /// The pilot has no record of this handle.
    Unknown,
}

/// Cores currently allocated, total claimed, and configured over-admit
/// ratio (§4.3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub in_use: u32,
    pub total: u32,
    pub buffer_size: f64,
}

impl Capacity {
    /// Admitted core budget per §4.6 step 4: `total * (1 + buffer_size)`.
    pub fn admitted(&self) -> f64 {
        self.total as f64 * (1.0 + self.buffer_size)
    }

    pub fn has_room_for(&self, subjob_cores: u32) -> bool {
        (self.in_use + subjob_cores) as f64 <= self.admitted()
    }
}

/// Abstracts the external pilot that launches and monitors subjobs (§4.3).
///
/// Handles are not required to survive a coordinator restart; callers treat
/// all handles as dead on startup regardless of what a checkpoint says.
pub trait SubjobAdapter: Send + Sync {
    fn submit(&self, descriptor: &SubjobDescriptor) -> Result<SubjobHandle, PilotError>;
    fn poll(&self, handle: &SubjobHandle) -> Result<PollOutcome, PilotError>;
    fn capacity(&self) -> Result<Capacity, PilotError>;
}

#[cfg(test)]
#[path = "pilot_tests.rs"]
mod tests;
