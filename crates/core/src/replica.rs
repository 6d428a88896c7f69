// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replica identity and the mutable per-replica record (§3).

use crate::handle::SubjobHandle;
use crate::ids::{ReplicaId, StateId};
use serde::{Deserialize, Serialize};

/// `running_status` (§3): exactly one of these at any time (invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunningStatus {
    /// Submitted to or executing in the pilot.
    Running,
    /// Eligible for exchange and for future launch.
    Waiting,
}

impl RunningStatus {
    pub fn is_running(self) -> bool {
        matches!(self, RunningStatus::Running)
    }

    pub fn is_waiting(self) -> bool {
        matches!(self, RunningStatus::Waiting)
    }
}

crate::simple_display! {
    RunningStatus {
        Running => "R",
        Waiting => "W",
    }
}

/// The mutable record held per replica (§3).
///
/// Constructed once at setup time via [`Replica::new`] with
/// `(stateid_current = i_initial, running_status = Waiting, cycle_current =
/// 1)` and mutated only through the narrow API here and in
/// `asre-engine`'s state machine, never by directly writing the fields from
/// outside the crate that owns the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replica {
    pub id: ReplicaId,
    pub stateid_current: StateId,
    pub running_status: RunningStatus,
    /// Cycle the replica is currently in or about to start (§3: "cycle *k*
    /// means *k-1* completed and the *k*-th pending or active"). Always >= 1.
    pub cycle_current: u64,
    pub last_handle: Option<SubjobHandle>,
}

impl Replica {
    /// Create a replica at setup time (§3 Lifecycle).
    pub fn new(id: ReplicaId, initial_state: StateId) -> Self {
        Self {
            id,
            stateid_current: initial_state,
            running_status: RunningStatus::Waiting,
            cycle_current: 1,
            last_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_status.is_running()
    }

    pub fn is_waiting(&self) -> bool {
        self.running_status.is_waiting()
    }
}

crate::builder! {
    pub struct ReplicaBuilder => Replica {
        set {
            id: ReplicaId = ReplicaId::new(0),
            stateid_current: StateId = StateId::new(0),
            running_status: RunningStatus = RunningStatus::Waiting,
            cycle_current: u64 = 1,
        }
        option {
            last_handle: SubjobHandle = None,
        }
    }
}

#[cfg(test)]
#[path = "replica_tests.rs"]
mod tests;