// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference pairwise-Metropolis temperature-exchange plug-in.
//!
//! Input files are produced by substituting a declared placeholder set into
//! a template (§9 "string-interpolated template input files" redesign
//! note); an unresolved placeholder is a fatal `build_input` error rather
//! than being silently left in the output.

use crate::plugin::{ExchangeMode, ExchangePlugin, PluginError};
use asre_core::{ReplicaId, StateId};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// A scheme plug-in that exchanges discrete temperatures (or any other
/// single scalar state parameter) between replicas via pairwise Metropolis.
pub struct PairwiseMetropolisPlugin {
    root: PathBuf,
    basename: String,
    template: String,
    temperatures: Vec<f64>,
}

impl PairwiseMetropolisPlugin {
    /// `root` is the working directory root; `basename` names per-replica
    /// files (§6); `template` is the input-file template containing
    /// `{{STATEID}}`, `{{TEMPERATURE}}`, `{{CYCLE}}`, `{{REPLICA}}`
    /// placeholders.
    pub fn new(root: impl Into<PathBuf>, basename: impl Into<String>, template: impl Into<String>, temperatures: Vec<f64>) -> Self {
        Self { root: root.into(), basename: basename.into(), template: template.into(), temperatures }
    }

    fn input_path(&self, replica: ReplicaId, cycle: u64) -> PathBuf {
        self.root.join(replica.dir_name()).join(format!("{}_{}.in", self.basename, cycle))
    }

    fn latest_energy_path(&self, replica: ReplicaId) -> PathBuf {
        self.root.join(replica.dir_name()).join(format!("{}_latest.energy", self.basename))
    }
}

impl ExchangePlugin for PairwiseMetropolisPlugin {
    fn exchange_mode(&self) -> ExchangeMode {
        ExchangeMode::PairwiseMetropolis
    }

    fn check_input(&self, settings: &toml::Table) -> Result<(), PluginError> {
        if self.temperatures.is_empty() {
            return Err(PluginError::CheckInput("TEMPERATURES must list at least one value".to_string()));
        }
        if !settings.contains_key("TEMPERATURES") {
            return Err(PluginError::CheckInput("missing required scheme key: TEMPERATURES".to_string()));
        }
        Ok(())
    }

    fn build_input(&self, replica: ReplicaId, state: StateId, cycle: u64) -> Result<(), PluginError> {
        let temperature = self.temperatures.get(state.index()).ok_or_else(|| PluginError::BuildInput {
            replica,
            cycle,
            reason: format!("state {state} has no configured temperature"),
        })?;

        let rendered = self
            .template
            .replace("{{STATEID}}", &state.to_string())
            .replace("{{TEMPERATURE}}", &temperature.to_string())
            .replace("{{CYCLE}}", &cycle.to_string())
            .replace("{{REPLICA}}", &replica.to_string());

        if rendered.contains("{{") {
            return Err(PluginError::BuildInput {
                replica,
                cycle,
                reason: "unresolved placeholder remains in rendered input".to_string(),
            });
        }

        let path = self.input_path(replica, cycle);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PluginError::BuildInput { replica, cycle, reason: e.to_string() })?;
        }
        fs::write(&path, rendered).map_err(|e| PluginError::BuildInput { replica, cycle, reason: e.to_string() })?;
        Ok(())
    }

    fn extract_energies(
        &self,
        replica: ReplicaId,
        candidates: &[StateId],
    ) -> Result<BTreeMap<StateId, f64>, PluginError> {
        // The reference engine writes "stateid value" lines per candidate
        // state to `{basename}_{cycle}.energy`; cycle is the replica's most
        // recently completed one, so the caller must have already confirmed
        // completion via the Cycle Artifact Layer before calling this.
        let mut result = BTreeMap::new();
        let path = self.latest_energy_path(replica);
        for &state in candidates {
            let contents = fs::read_to_string(&path).map_err(|e| PluginError::ExtractEnergies {
                replica,
                reason: format!("{}: {e}", path.display()),
            })?;
            let value = parse_energy_for_state(&contents, state).ok_or_else(|| PluginError::ExtractEnergies {
                replica,
                reason: format!("no energy entry for state {state} in {}", path.display()),
            })?;
            result.insert(state, value);
        }
        Ok(result)
    }

    fn propose_gibbs(
        &self,
        _subset: &[ReplicaId],
        _energies: &BTreeMap<ReplicaId, BTreeMap<StateId, f64>>,
    ) -> Result<BTreeMap<ReplicaId, StateId>, PluginError> {
        Err(PluginError::UnsupportedMode)
    }
}

fn parse_energy_for_state(contents: &str, state: StateId) -> Option<f64> {
    contents.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let id: u32 = parts.next()?.parse().ok()?;
        let value: f64 = parts.next()?.parse().ok()?;
        (id == state.index() as u32).then_some(value)
    })
}

#[cfg(test)]
#[path = "metropolis_tests.rs"]
mod tests;
