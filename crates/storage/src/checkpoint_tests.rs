// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use asre_core::{Replica, ReplicaId, RunningStatus, StateId, SubjobHandle};
use tempfile::tempdir;

fn sample_replicas() -> Vec<Replica> {
    vec![
        Replica::builder().id(ReplicaId::new(0)).stateid_current(StateId::new(0)).running_status(RunningStatus::Running).cycle_current(3).last_handle(SubjobHandle::new("h0")).build(),
        Replica::builder().id(ReplicaId::new(1)).stateid_current(StateId::new(1)).running_status(RunningStatus::Running).cycle_current(2).last_handle(SubjobHandle::new("h1")).build(),
    ]
}

#[test]
fn write_then_read_round_trips_replicas() {
    let dir = tempdir().unwrap();
    let stat_path = dir.path().join("impact.stat");
    write_checkpoint(&stat_path, &sample_replicas()).unwrap();
    let checkpoint = read_checkpoint(&stat_path).unwrap();
    assert_eq!(checkpoint.version, CURRENT_CHECKPOINT_VERSION);
    assert_eq!(checkpoint.replicas.len(), 2);
    assert_eq!(checkpoint.replicas[0].cycle_current, 3);
}

#[test]
fn write_checkpoint_rotates_previous_into_bak() {
    let dir = tempdir().unwrap();
    let stat_path = dir.path().join("impact.stat");
    write_checkpoint(&stat_path, &sample_replicas()).unwrap();
    write_checkpoint(&stat_path, &sample_replicas()).unwrap();
    assert!(stat_path.with_extension("bak").exists());
}

#[yare::parameterized(
    one_write    = { 1, vec![] },
    two_writes   = { 2, vec!["bak"] },
    three_writes = { 3, vec!["bak", "bak.2"] },
    four_writes  = { 4, vec!["bak", "bak.2", "bak.3"] },
    five_writes  = { 5, vec!["bak", "bak.2", "bak.3"] },
)]
fn write_checkpoint_keeps_at_most_max_bak_generations(writes: u32, expected_extensions: Vec<&str>) {
    let dir = tempdir().unwrap();
    let stat_path = dir.path().join("impact.stat");
    for _ in 0..writes {
        write_checkpoint(&stat_path, &sample_replicas()).unwrap();
    }
    for ext in &expected_extensions {
        assert!(stat_path.with_extension(ext).exists(), "expected {ext} to exist after {writes} writes");
    }
    assert!(!stat_path.with_extension("bak.4").exists());
}

#[test]
fn no_tmp_file_left_behind_after_write() {
    let dir = tempdir().unwrap();
    let stat_path = dir.path().join("impact.stat");
    write_checkpoint(&stat_path, &sample_replicas()).unwrap();
    assert!(!stat_path.with_extension("stat.tmp").exists());
}

#[test]
fn truncated_checkpoint_is_corrupt() {
    let err = Checkpoint::from_bytes(b"{\"v\": 1, \"replicas\": [").unwrap_err();
    assert!(matches!(err, StoreError::CorruptCheckpoint { .. }));
}

#[test]
fn version_mismatch_is_corrupt() {
    let bytes = br#"{"v": 999, "replicas": [], "created_at": "2026-01-01T00:00:00Z"}"#;
    let err = Checkpoint::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, StoreError::CorruptCheckpoint { .. }));
}

#[test]
fn restart_reset_forces_waiting_and_clears_handle() {
    let checkpoint = Checkpoint::from_bytes(&serde_json::to_vec(&Checkpoint::new(sample_replicas())).unwrap()).unwrap();
    let reset = restart_reset(checkpoint);
    for r in &reset {
        assert!(r.is_waiting());
        assert!(r.last_handle.is_none());
    }
    assert_eq!(reset[0].stateid_current, StateId::new(0));
    assert_eq!(reset[0].cycle_current, 3);
}
