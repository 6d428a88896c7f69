// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler-level error type, aggregating the lower layers (§7).

use asre_adapters::PilotError;
use asre_core::ReplicaId;
use asre_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("pilot error: {0}")]
    Pilot(#[from] PilotError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("exchange plug-in error for replica {replica}: {reason}")]
    ExchangePlugin { replica: ReplicaId, reason: String },
    #[error("checkpoint write failed {consecutive} times in a row, draining")]
    CheckpointExhausted { consecutive: u32 },
    #[error("pilot unresponsive for {consecutive} consecutive ticks, draining")]
    PilotExhausted { consecutive: u32 },
}
