// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use asre_core::{Replica, ReplicaId, StateId};
use tempfile::tempdir;

#[test]
fn summary_lists_every_replica_with_a_header() {
    let dir = tempdir().unwrap();
    let txt_path = dir.path().join("impact_stat.txt");
    let replicas = vec![Replica::new(ReplicaId::new(0), StateId::new(0)), Replica::new(ReplicaId::new(1), StateId::new(1))];
    write_summary(&txt_path, &replicas).unwrap();
    let contents = fs::read_to_string(&txt_path).unwrap();
    assert!(contents.starts_with("replica"));
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.contains('-'));
}
