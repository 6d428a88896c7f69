// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use asre_core::Replica;

fn replicas(n: u32) -> Vec<Replica> {
    (0..n).map(|i| Replica::new(ReplicaId::new(i), StateId::new(i))).collect()
}

#[test]
fn new_store_partitions_all_replicas_as_waiting() {
    let store = StatusStore::new(replicas(3));
    let (running, waiting) = store.partition();
    assert!(running.is_empty());
    assert_eq!(waiting, vec![ReplicaId::new(0), ReplicaId::new(1), ReplicaId::new(2)]);
}

#[test]
fn mark_launched_moves_replica_into_running_partition() {
    let store = StatusStore::new(replicas(2));
    store.mark_launched(ReplicaId::new(0), SubjobHandle::new("job-1"));
    let (running, waiting) = store.partition();
    assert_eq!(running, vec![ReplicaId::new(0)]);
    assert_eq!(waiting, vec![ReplicaId::new(1)]);
    let r = store.get(ReplicaId::new(0)).unwrap();
    assert!(r.is_running());
    assert_eq!(r.last_handle.unwrap().as_str(), "job-1");
}

#[test]
fn mark_terminal_moves_replica_back_to_waiting() {
    let store = StatusStore::new(replicas(1));
    store.mark_launched(ReplicaId::new(0), SubjobHandle::new("job-1"));
    store.mark_terminal(ReplicaId::new(0));
    assert!(store.get(ReplicaId::new(0)).unwrap().is_waiting());
}

#[test]
fn apply_permutation_swaps_states_of_waiting_replicas() {
    let store = StatusStore::new(replicas(2));
    store.apply_permutation(&[(ReplicaId::new(0), StateId::new(1)), (ReplicaId::new(1), StateId::new(0))]);
    assert_eq!(store.get(ReplicaId::new(0)).unwrap().stateid_current, StateId::new(1));
    assert_eq!(store.get(ReplicaId::new(1)).unwrap().stateid_current, StateId::new(0));
}

#[test]
#[should_panic(expected = "waiting")]
fn apply_permutation_on_running_replica_panics() {
    let store = StatusStore::new(replicas(1));
    store.mark_launched(ReplicaId::new(0), SubjobHandle::new("job-1"));
    store.apply_permutation(&[(ReplicaId::new(0), StateId::new(5))]);
}

#[test]
fn advance_cycle_increments_by_one() {
    let store = StatusStore::new(replicas(1));
    store.advance_cycle(ReplicaId::new(0));
    assert_eq!(store.get(ReplicaId::new(0)).unwrap().cycle_current, 2);
}

#[test]
fn snapshot_replicas_is_ordered_by_id() {
    let store = StatusStore::new(replicas(3));
    let snap = store.snapshot_replicas();
    assert_eq!(snap.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ReplicaId::new(0), ReplicaId::new(1), ReplicaId::new(2)]);
}
