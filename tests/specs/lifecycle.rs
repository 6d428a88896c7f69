// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A full `RE_SETUP` run against a fake engine script: the binary stages
//! replica directories, drives at least one subjob to completion, and
//! drains cleanly once the (deliberately tiny) wall-time budget is spent,
//! leaving a checkpoint and a human-readable status table behind (§4.1,
//! §6, §8 scenario 5 "wall-time-drain").

use crate::prelude::Workdir;

#[test]
#[cfg(unix)]
fn re_setup_run_drains_on_wall_time_and_leaves_a_checkpoint() {
    let work = Workdir::empty();
    let engine = work.fake_engine();

    let control = work.file(
        "control.toml",
        &format!(
            r#"
ENGINE = "{engine}"
RE_TYPE = "temperature"
ENGINE_INPUT_BASENAME = "impact"
RE_SETUP = true
NREPLICAS = 1
TOTAL_CORES = 1
SUBJOB_CORES = 1
WALL_TIME = 0.02
REPLICA_RUN_TIME = 0.002
CYCLE_TIME = 0

[scheme]
TEMPLATE = "temperature={{{{TEMPERATURE}}}} state={{{{STATEID}}}} cycle={{{{CYCLE}}}} replica={{{{REPLICA}}}}"
TEMPERATURES = [300.0]
"#,
            engine = engine.display(),
        ),
    );

    let output = work
        .asyncre()
        .arg(&control)
        .arg("--root")
        .arg(work.root())
        .output()
        .expect("run asyncre");
    assert_eq!(output.status.code(), Some(0), "stderr was: {}", String::from_utf8_lossy(&output.stderr));

    let checkpoint_path = work.root().join("impact.stat");
    assert!(checkpoint_path.exists(), "expected a checkpoint at {}", checkpoint_path.display());
    let checkpoint: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&checkpoint_path).unwrap()).unwrap();
    let replicas = checkpoint["replicas"].as_array().expect("replicas array");
    assert_eq!(replicas.len(), 1);

    let summary_path = work.root().join("impact_stat.txt");
    let summary = std::fs::read_to_string(&summary_path).expect("read status summary");
    let header = summary.lines().next().expect("summary has a header line");
    similar_asserts::assert_eq!(header, "replica  state  status  cycle  handle");
    assert!(summary.contains("r0"), "summary was: {summary}");
}
