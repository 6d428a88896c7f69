// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque pilot job handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle returned by the subjob adapter (§4.3).
///
/// Handles are comparable but otherwise meaningless to the core; the pilot
/// defines what they contain. They are never assumed to survive a
/// coordinator restart (§4.3, §5): on restart every replica's handle is
/// cleared regardless of what a checkpoint says.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjobHandle(pub String);

impl SubjobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubjobHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}