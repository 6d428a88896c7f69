// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory pilot for deterministic scheduler tests.

use crate::descriptor::SubjobDescriptor;
use crate::pilot::{Capacity, PilotError, PollOutcome, SubjobAdapter};
use asre_core::SubjobHandle;
use parking_lot::Mutex;
use std::collections::HashMap;

struct FakePilotState {
    outcomes: HashMap<SubjobHandle, PollOutcome>,
    submitted: Vec<SubjobDescriptor>,
    next_id: u32,
    total_cores: u32,
    buffer_size: f64,
    in_use: u32,
}

/// Records every submission and lets the test script each handle's poll
/// outcome, mirroring the donor's `FakeNotifyAdapter` recorded-calls shape.
#[derive(Clone)]
pub struct FakePilot {
    inner: std::sync::Arc<Mutex<FakePilotState>>,
}

impl FakePilot {
    pub fn new(total_cores: u32, buffer_size: f64) -> Self {
        Self {
            inner: std::sync::Arc::new(Mutex::new(FakePilotState {
                outcomes: HashMap::new(),
                submitted: Vec::new(),
                next_id: 0,
                total_cores,
                buffer_size,
                in_use: 0,
            })),
        }
    }

    /// Every descriptor submitted so far, in submission order.
    pub fn submitted(&self) -> Vec<SubjobDescriptor> {
        self.inner.lock().submitted.clone()
    }

    /// Script the next `poll` result for `handle`.
    pub fn set_outcome(&self, handle: SubjobHandle, outcome: PollOutcome) {
        let mut inner = self.inner.lock();
        if matches!(outcome, PollOutcome::Done | PollOutcome::Failed) {
            inner.in_use = inner.in_use.saturating_sub(1);
        }
        inner.outcomes.insert(handle, outcome);
    }
}

impl SubjobAdapter for FakePilot {
    fn submit(&self, descriptor: &SubjobDescriptor) -> Result<SubjobHandle, PilotError> {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.in_use += descriptor.processes;
        inner.submitted.push(descriptor.clone());
        let handle = SubjobHandle::new(format!("fake-{id}"));
        inner.outcomes.insert(handle.clone(), PollOutcome::Running);
        Ok(handle)
    }

    fn poll(&self, handle: &SubjobHandle) -> Result<PollOutcome, PilotError> {
        Ok(self.inner.lock().outcomes.get(handle).copied().unwrap_or(PollOutcome::Unknown))
    }

    fn capacity(&self) -> Result<Capacity, PilotError> {
        let inner = self.inner.lock();
        Ok(Capacity { in_use: inner.in_use, total: inner.total_cores, buffer_size: inner.buffer_size })
    }
}
