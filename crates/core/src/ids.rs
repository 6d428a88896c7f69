// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replica and state identifiers.
//!
//! Both are small dense integers (§3: "Identified by an integer in [0, M)"
//! resp. "[0, N)"), so they are newtypes over `u32` rather than the
//! string/nanoid identifiers used elsewhere in this codebase — there is no
//! need to generate these, only to index with them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the `M` replicas, in `[0, M)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaId(pub u32);

impl ReplicaId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The replica's private working sub-directory name, `r{i}`.
    pub fn dir_name(self) -> String {
        format!("r{}", self.0)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ReplicaId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one of the `N` thermodynamic/potential states, in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl StateId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;