// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::artifact::FileArtifactLayer;
use asre_core::{Replica, RunningStatus, StateId};
use std::fs;
use tempfile::tempdir;

fn store_with_one_replica() -> StatusStore {
    StatusStore::new(vec![Replica::new(ReplicaId::new(0), StateId::new(0))])
}

#[test]
fn launch_moves_waiting_to_running_with_handle() {
    let store = store_with_one_replica();
    launch(&store, ReplicaId::new(0), SubjobHandle::new("h1"));

    let r = store.get(ReplicaId::new(0)).unwrap();
    assert!(r.is_running());
    assert_eq!(r.last_handle, Some(SubjobHandle::new("h1")));
}

#[test]
fn complete_ok_advances_cycle_and_clears_handle() {
    let store = store_with_one_replica();
    launch(&store, ReplicaId::new(0), SubjobHandle::new("h1"));

    complete_ok(&store, ReplicaId::new(0));

    let r = store.get(ReplicaId::new(0)).unwrap();
    assert!(r.is_waiting());
    assert_eq!(r.cycle_current, 2);
    assert_eq!(r.last_handle, None);
}

#[test]
fn complete_fail_keeps_cycle_and_clears_handle() {
    let store = store_with_one_replica();
    launch(&store, ReplicaId::new(0), SubjobHandle::new("h1"));

    complete_fail(&store, ReplicaId::new(0));

    let r = store.get(ReplicaId::new(0)).unwrap();
    assert!(r.is_waiting());
    assert_eq!(r.cycle_current, 1);
    assert_eq!(r.last_handle, None);
}

#[test]
fn reconcile_restart_advances_cycle_when_output_already_present() {
    let dir = tempdir().unwrap();
    let artifacts = FileArtifactLayer::new(dir.path(), "impact", "in", "out");
    fs::create_dir_all(dir.path().join("r0")).unwrap();
    fs::write(dir.path().join("r0").join("impact_1.out"), "done").unwrap();

    let store = store_with_one_replica();
    assert_eq!(store.get(ReplicaId::new(0)).unwrap().running_status, RunningStatus::Waiting);

    reconcile_restart(&store, &artifacts);

    assert_eq!(store.get(ReplicaId::new(0)).unwrap().cycle_current, 2);
}

#[test]
fn reconcile_restart_leaves_cycle_when_output_missing() {
    let dir = tempdir().unwrap();
    let artifacts = FileArtifactLayer::new(dir.path(), "impact", "in", "out");

    let store = store_with_one_replica();
    reconcile_restart(&store, &artifacts);

    assert_eq!(store.get(ReplicaId::new(0)).unwrap().cycle_current, 1);
}
