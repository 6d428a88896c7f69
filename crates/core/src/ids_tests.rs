// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn replica_dir_name_matches_convention() {
    assert_eq!(ReplicaId::new(0).dir_name(), "r0");
    assert_eq!(ReplicaId::new(42).dir_name(), "r42");
}

#[test]
fn ids_round_trip_through_json() {
    let id = ReplicaId::new(7);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "7");
    let back: ReplicaId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn ids_order_numerically() {
    assert!(StateId::new(2) < StateId::new(10));
}