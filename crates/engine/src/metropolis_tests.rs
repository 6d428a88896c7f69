// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;

fn template() -> &'static str {
    "STATE={{STATEID}} TEMP={{TEMPERATURE}} CYCLE={{CYCLE}} REPLICA={{REPLICA}}\n"
}

#[test]
fn build_input_renders_all_placeholders() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0, 310.0, 320.0]);

    plugin.build_input(ReplicaId::new(1), StateId::new(2), 5).unwrap();

    let contents = fs::read_to_string(dir.path().join("r1").join("impact_5.in")).unwrap();
    assert_eq!(contents, "STATE=2 TEMP=320 CYCLE=5 REPLICA=1\n");
}

#[test]
fn build_input_rejects_state_without_temperature() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0]);

    let err = plugin.build_input(ReplicaId::new(0), StateId::new(5), 1).unwrap_err();
    assert!(matches!(err, PluginError::BuildInput { .. }));
}

#[test]
fn build_input_rejects_unresolved_placeholder() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", "{{STATEID}} {{BOGUS}}", vec![300.0]);

    let err = plugin.build_input(ReplicaId::new(0), StateId::new(0), 1).unwrap_err();
    assert!(matches!(err, PluginError::BuildInput { reason, .. } if reason.contains("unresolved")));
}

#[test]
fn extract_energies_reads_matching_states() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0, 310.0]);
    let r_dir = dir.path().join("r0");
    fs::create_dir_all(&r_dir).unwrap();
    fs::write(r_dir.join("impact_latest.energy"), "0 -123.4\n1 -456.7\n").unwrap();

    let energies = plugin
        .extract_energies(ReplicaId::new(0), &[StateId::new(0), StateId::new(1)])
        .unwrap();

    assert_eq!(energies.get(&StateId::new(0)), Some(&-123.4));
    assert_eq!(energies.get(&StateId::new(1)), Some(&-456.7));
}

#[test]
fn extract_energies_errors_on_missing_state() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0]);
    let r_dir = dir.path().join("r0");
    fs::create_dir_all(&r_dir).unwrap();
    fs::write(r_dir.join("impact_latest.energy"), "0 -1.0\n").unwrap();

    let err = plugin.extract_energies(ReplicaId::new(0), &[StateId::new(3)]).unwrap_err();
    assert!(matches!(err, PluginError::ExtractEnergies { .. }));
}

#[test]
fn propose_gibbs_is_unsupported_for_pairwise_plugin() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0]);
    let err = plugin.propose_gibbs(&[], &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, PluginError::UnsupportedMode));
}

#[test]
fn check_input_requires_temperatures_key_and_nonempty_list() {
    let dir = tempdir().unwrap();
    let plugin = PairwiseMetropolisPlugin::new(dir.path(), "impact", template(), vec![300.0]);
    let mut settings = toml::Table::new();
    assert!(plugin.check_input(&settings).is_err());

    settings.insert("TEMPERATURES".to_string(), toml::Value::String("300".to_string()));
    assert!(plugin.check_input(&settings).is_ok());
}
