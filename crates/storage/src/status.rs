// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory replica table and its R/W indices (§4.1).

use asre_core::{Replica, ReplicaId, RunningStatus, StateId, SubjobHandle};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

/// The replica table plus derived R/W indices, behind a single logical lock.
///
/// §5: "the Status Store is the single source of truth; all mutations funnel
/// through it." One [`parking_lot::Mutex`] backs every read and write so two
/// mutators can never observe or leave an inconsistent partition.
pub struct StatusStore {
    inner: Mutex<Inner>,
}

struct Inner {
    replicas: BTreeMap<ReplicaId, Replica>,
    running: BTreeSet<ReplicaId>,
    waiting: BTreeSet<ReplicaId>,
}

impl Inner {
    fn reindex(replica: &Replica, running: &mut BTreeSet<ReplicaId>, waiting: &mut BTreeSet<ReplicaId>) {
        match replica.running_status {
            RunningStatus::Running => {
                running.insert(replica.id);
                waiting.remove(&replica.id);
            }
            RunningStatus::Waiting => {
                waiting.insert(replica.id);
                running.remove(&replica.id);
            }
        }
    }
}

impl StatusStore {
    /// Build a store from the replicas created at setup time, or restored
    /// from a checkpoint (§4.1).
    pub fn new(replicas: Vec<Replica>) -> Self {
        let mut running = BTreeSet::new();
        let mut waiting = BTreeSet::new();
        let mut table = BTreeMap::new();
        for r in replicas {
            Inner::reindex(&r, &mut running, &mut waiting);
            table.insert(r.id, r);
        }
        Self { inner: Mutex::new(Inner { replicas: table, running, waiting }) }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `get(i)` (§4.1): a consistent clone of one replica's record.
    pub fn get(&self, id: ReplicaId) -> Option<Replica> {
        self.inner.lock().replicas.get(&id).cloned()
    }

    /// `partition() → (R_set, W_set)` (§4.1): a consistent snapshot of ids.
    pub fn partition(&self) -> (Vec<ReplicaId>, Vec<ReplicaId>) {
        let inner = self.inner.lock();
        (inner.running.iter().copied().collect(), inner.waiting.iter().copied().collect())
    }

    /// `update(i, mutator)` (§4.1): mutate one replica's record under the
    /// single logical lock and reindex it afterward.
    pub fn update<F, T>(&self, id: ReplicaId, mutator: F) -> Option<T>
    where
        F: FnOnce(&mut Replica) -> T,
    {
        let mut inner = self.inner.lock();
        let (result, mutated) = {
            let replica = inner.replicas.get_mut(&id)?;
            let result = mutator(replica);
            (result, replica.clone())
        };
        let Inner { running, waiting, .. } = &mut *inner;
        Inner::reindex(&mutated, running, waiting);
        Some(result)
    }

    /// Mark a replica launched: `W -> R`, recording its new handle.
    /// Invariant 2 (§3): `R` implies a non-nil handle.
    pub fn mark_launched(&self, id: ReplicaId, handle: SubjobHandle) {
        self.update(id, |r| {
            r.running_status = RunningStatus::Running;
            r.last_handle = Some(handle);
        });
    }

    /// Mark a replica's subjob terminal (success or failure): `R -> W`.
    pub fn mark_terminal(&self, id: ReplicaId) {
        self.update(id, |r| {
            r.running_status = RunningStatus::Waiting;
        });
    }

    /// Apply an exchange permutation atomically (§3 invariant 5, §4.7).
    ///
    /// Every target replica must currently be `W`; violating that is a
    /// caller bug (the exchange engine only ever proposes over the waiting
    /// set it itself captured under this lock), so it panics rather than
    /// silently dropping a swap.
    pub fn apply_permutation(&self, assignment: &[(ReplicaId, StateId)]) {
        let mut inner = self.inner.lock();
        for (id, new_state) in assignment {
            // Allow expect here: a missing target is an exchange-engine bug, not a
            // reachable runtime condition, and this function's contract is to panic
            // rather than silently drop a swap.
            #[allow(clippy::expect_used)]
            let replica = inner.replicas.get_mut(id).expect("permutation target replica must exist");
            assert!(replica.is_waiting(), "exchange may only mutate stateid_current for waiting replicas");
            replica.stateid_current = *new_state;
        }
    }

    /// Advance `cycle_current` by one. Called on observed completion
    /// (§3 invariant 4: strictly increasing on observed completion) and on
    /// restart reconciliation (§4.1, §9 open question 1).
    pub fn advance_cycle(&self, id: ReplicaId) {
        self.update(id, |r| r.cycle_current += 1);
    }

    /// A consistent clone of the whole table, ordered by id, for
    /// checkpointing (§4.1 `snapshot`).
    pub fn snapshot_replicas(&self) -> Vec<Replica> {
        self.inner.lock().replicas.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
