// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Exchange Engine (C3, §4.4, §8 scenario 4): proposes and applies one
//! round of state permutations over the waiting set.
//!
//! Energies are extracted with the Status Store unlocked — scheme plug-ins
//! may shell out to read files — and the lock is only retaken to validate
//! and apply the result, so a long-running `extract_energies` call never
//! blocks the control loop's poll/launch work.

use crate::error::SchedulerError;
use crate::plugin::{ExchangeMode, ExchangePlugin};
use asre_core::{ReplicaId, StateId};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

use asre_storage::StatusStore;

/// Runs one exchange round (§4.4, §9 open question 2: pairwise attempt
/// count is configurable, defaulting to `|W|`).
pub struct ExchangeEngine {
    plugin: Arc<dyn ExchangePlugin>,
    attempts_per_round: Option<usize>,
}

impl ExchangeEngine {
    /// `attempts_per_round`: `None` defaults to `|W|` at round time (§9 open
    /// question 2); pairwise mode only. Ignored in Gibbs mode.
    pub fn new(plugin: Arc<dyn ExchangePlugin>, attempts_per_round: Option<usize>) -> Self {
        Self { plugin, attempts_per_round }
    }

    /// Propose and apply one exchange round against `store`. No-op (and no
    /// error) if fewer than two replicas are waiting.
    pub fn run_round(&self, store: &StatusStore, rng: &mut impl Rng) -> Result<(), SchedulerError> {
        let (_, waiting_ids) = store.partition();
        if waiting_ids.len() < 2 {
            return Ok(());
        }

        let snapshot: Vec<(ReplicaId, StateId, u64)> = waiting_ids
            .iter()
            .filter_map(|&id| store.get(id).map(|r| (id, r.stateid_current, r.cycle_current)))
            .collect();

        let proposed = match self.plugin.exchange_mode() {
            ExchangeMode::PairwiseMetropolis => self.propose_pairwise(&snapshot, rng)?,
            ExchangeMode::Gibbs => self.propose_gibbs(&snapshot)?,
        };

        let assignment = self.revalidate(store, &snapshot, &proposed);
        store.apply_permutation(&assignment);
        Ok(())
    }

    fn propose_pairwise(
        &self,
        snapshot: &[(ReplicaId, StateId, u64)],
        rng: &mut impl Rng,
    ) -> Result<BTreeMap<ReplicaId, StateId>, SchedulerError> {
        let ids: Vec<ReplicaId> = snapshot.iter().map(|(id, _, _)| *id).collect();
        let candidates: Vec<StateId> = snapshot.iter().map(|(_, s, _)| *s).collect();

        let mut energies: BTreeMap<ReplicaId, BTreeMap<StateId, f64>> = BTreeMap::new();
        for &id in &ids {
            let e = self
                .plugin
                .extract_energies(id, &candidates)
                .map_err(|e| SchedulerError::ExchangePlugin { replica: id, reason: e.to_string() })?;
            energies.insert(id, e);
        }

        let mut current_state: BTreeMap<ReplicaId, StateId> =
            snapshot.iter().map(|(id, s, _)| (*id, *s)).collect();

        let attempts = self.attempts_per_round.unwrap_or(ids.len());
        for _ in 0..attempts {
            if ids.len() < 2 {
                break;
            }
            let i = rng.gen_range(0..ids.len());
            let mut j = rng.gen_range(0..ids.len());
            while j == i {
                j = rng.gen_range(0..ids.len());
            }
            let (ri, rj) = (ids[i], ids[j]);
            let (si, sj) = (current_state[&ri], current_state[&rj]);
            if si == sj {
                continue;
            }

            let u_i_si = energies[&ri][&si];
            let u_i_sj = energies[&ri][&sj];
            let u_j_si = energies[&rj][&si];
            let u_j_sj = energies[&rj][&sj];

            // Metropolis criterion on the swap: accept with probability
            // min(1, exp(-delta)), delta = (u_i(s_j) + u_j(s_i)) - (u_i(s_i) + u_j(s_j)).
            let delta = (u_i_sj + u_j_si) - (u_i_si + u_j_sj);
            let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta).exp();
            if accept {
                current_state.insert(ri, sj);
                current_state.insert(rj, si);
            }
        }

        Ok(current_state)
    }

    fn propose_gibbs(
        &self,
        snapshot: &[(ReplicaId, StateId, u64)],
    ) -> Result<BTreeMap<ReplicaId, StateId>, SchedulerError> {
        let ids: Vec<ReplicaId> = snapshot.iter().map(|(id, _, _)| *id).collect();
        let candidates: Vec<StateId> = snapshot.iter().map(|(_, s, _)| *s).collect();

        let mut energies: BTreeMap<ReplicaId, BTreeMap<StateId, f64>> = BTreeMap::new();
        for &id in &ids {
            let e = self
                .plugin
                .extract_energies(id, &candidates)
                .map_err(|e| SchedulerError::ExchangePlugin { replica: id, reason: e.to_string() })?;
            energies.insert(id, e);
        }

        self.plugin
            .propose_gibbs(&ids, &energies)
            .map_err(|e| SchedulerError::ExchangePlugin { replica: ids[0], reason: e.to_string() })
    }

    /// Drop any proposed target that is no longer waiting, or whose cycle
    /// advanced since the snapshot was taken — it either launched or
    /// completed a cycle between proposal and apply and the proposal no
    /// longer reflects its current state.
    fn revalidate(
        &self,
        store: &StatusStore,
        snapshot: &[(ReplicaId, StateId, u64)],
        proposed: &BTreeMap<ReplicaId, StateId>,
    ) -> Vec<(ReplicaId, StateId)> {
        let snapshot_cycle: BTreeMap<ReplicaId, u64> = snapshot.iter().map(|(id, _, c)| (*id, *c)).collect();
        proposed
            .iter()
            .filter_map(|(&id, &state)| {
                let current = store.get(id)?;
                let unchanged_cycle = snapshot_cycle.get(&id) == Some(&current.cycle_current);
                (current.is_waiting() && unchanged_cycle).then_some((id, state))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
