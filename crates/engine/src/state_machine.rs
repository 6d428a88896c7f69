// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replica lifecycle transitions (§3 Lifecycle, §4.5 Restart reset, §9 open
//! question 1).
//!
//! The Status Store (`asre-storage`) only knows how to mutate and reindex a
//! replica's record; it has no opinion on when a transition is warranted.
//! This module is that opinion: it is the only code that calls
//! [`StatusStore::update`] and [`StatusStore::advance_cycle`] directly, so
//! every `W -> R -> W` step and the restart reconciliation step go through
//! one place.

use crate::artifact::CycleArtifactLayer;
use asre_core::{ReplicaId, SubjobHandle};
use asre_storage::StatusStore;

/// `W -> R`: a subjob was just submitted for `id` and the pilot returned
/// `handle`.
pub fn launch(store: &StatusStore, id: ReplicaId, handle: SubjobHandle) {
    store.mark_launched(id, handle);
}

/// `R -> W`, cycle successfully completed (§3 invariant 4: `cycle_current`
/// strictly increases on observed completion).
pub fn complete_ok(store: &StatusStore, id: ReplicaId) {
    store.update(id, |r| {
        r.cycle_current += 1;
        r.running_status = asre_core::RunningStatus::Waiting;
        r.last_handle = None;
    });
}

/// `R -> W`, cycle failed: no cycle advance, eligible for relaunch of the
/// same cycle at the next tick.
pub fn complete_fail(store: &StatusStore, id: ReplicaId) {
    store.update(id, |r| {
        r.running_status = asre_core::RunningStatus::Waiting;
        r.last_handle = None;
    });
}

/// Restart reconciliation (§9 open question 1, resolved): `asre_storage`'s
/// [`asre_storage::restart_reset`] has already forced every replica back to
/// `W` and cleared its handle; this finishes the job by consulting the
/// Cycle Artifact Layer for every replica whose `cycle_current` output file
/// is already present and non-empty, and advancing that replica's cycle.
///
/// This is mandatory, not best-effort: a replica whose subjob finished
/// before the crash but whose completion was never checkpointed would
/// otherwise be relaunched on the same cycle it already produced output
/// for, silently duplicating work and corrupting the output the scheme
/// plug-in expects to extract energies from.
pub fn reconcile_restart(store: &StatusStore, artifacts: &dyn CycleArtifactLayer) {
    for replica in store.snapshot_replicas() {
        if artifacts.has_completed(replica.id, replica.cycle_current) {
            store.advance_cycle(replica.id);
        }
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
