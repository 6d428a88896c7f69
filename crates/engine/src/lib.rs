// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle Artifact Layer, exchange plug-in interface, replica state machine,
//! exchange engine, and scheduler loop (C2, C4, C5, C6, C7).

pub mod artifact;
pub mod error;
pub mod exchange;
pub mod metropolis;
pub mod plugin;
pub mod scheduler;
pub mod state_machine;

pub use artifact::{CycleArtifactLayer, FileArtifactLayer};
pub use error::SchedulerError;
pub use exchange::ExchangeEngine;
pub use metropolis::PairwiseMetropolisPlugin;
pub use plugin::{ExchangeMode, ExchangePlugin, PluginError};
pub use scheduler::{DescriptorBuilder, DrainReason, SchedulerLoop};
