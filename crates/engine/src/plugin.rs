// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exchange Plug-in Interface (C4, §4.4): the contract a replica-exchange
//! scheme (temperature, umbrella sampling, alchemical, ...) implements.
//! The core holds this by abstraction and never encodes any physics itself.

use asre_core::{ReplicaId, StateId};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("invalid plug-in configuration: {0}")]
    CheckInput(String),
    #[error("could not build input for replica {replica} cycle {cycle}: {reason}")]
    BuildInput { replica: ReplicaId, cycle: u64, reason: String },
    #[error("could not extract energies for replica {replica}: {reason}")]
    ExtractEnergies { replica: ReplicaId, reason: String },
    #[error("permutation proposal failed: {0}")]
    Propose(String),
    #[error("propose_gibbs called on a plug-in that declares pairwise mode")]
    UnsupportedMode,
}

/// Which decision procedure a plug-in implements (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMode {
    /// The core drives the attempts; the plug-in only supplies energies.
    PairwiseMetropolis,
    /// The plug-in samples a whole permutation from the joint posterior.
    Gibbs,
}

/// A scheme plug-in (§4.4). The core guarantees `build_input` and
/// `extract_energies` never run concurrently for the same replica; it makes
/// no such guarantee across replicas.
pub trait ExchangePlugin: Send + Sync {
    /// Which of the two supported decision procedures this plug-in uses.
    fn exchange_mode(&self) -> ExchangeMode;

    /// Validate scheme-specific configuration (the control file's `[scheme]`
    /// table, §6); fail fast on missing keys.
    fn check_input(&self, settings: &toml::Table) -> Result<(), PluginError>;

    /// Materialize `replica`'s next-cycle input files given its current
    /// state. Called exactly once before each launch of that (replica,
    /// cycle); must be idempotent under retry (§5).
    fn build_input(&self, replica: ReplicaId, state: StateId, cycle: u64) -> Result<(), PluginError>;

    /// Reduced energy u(replica, s) for each candidate state, for a waiting
    /// replica. "Reduced" means the quantity that enters the Metropolis
    /// criterion directly.
    fn extract_energies(
        &self,
        replica: ReplicaId,
        candidates: &[StateId],
    ) -> Result<BTreeMap<StateId, f64>, PluginError>;

    /// Sample a whole permutation of state ids over `subset` from the joint
    /// posterior. Only called when [`exchange_mode`](Self::exchange_mode)
    /// returns [`ExchangeMode::Gibbs`]; pairwise plug-ins never need a real
    /// implementation of this (see [`PluginError::UnsupportedMode`]).
    fn propose_gibbs(
        &self,
        subset: &[ReplicaId],
        energies: &BTreeMap<ReplicaId, BTreeMap<StateId, f64>>,
    ) -> Result<BTreeMap<ReplicaId, StateId>, PluginError>;

    /// Optional override of completion detection (§4.2); `None` defers to
    /// the Cycle Artifact Layer.
    fn has_completed(&self, _replica: ReplicaId, _cycle: u64) -> Option<bool> {
        None
    }
}
