// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The exit-code contract from §6: configuration problems are code 2,
//! a missing checkpoint on restart is code 3.

use crate::prelude::Workdir;

#[test]
fn missing_control_file_exits_with_configuration_error_code() {
    let work = Workdir::empty();
    let output = work.asyncre().arg("does-not-exist.toml").output().expect("run asyncre");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn control_file_with_unknown_key_exits_with_configuration_error_code() {
    let work = Workdir::empty();
    let control = work.file(
        "control.toml",
        r#"
ENGINE = "impact"
RE_TYPE = "temperature"
ENGINE_INPUT_BASENAME = "impact"
NREPLICAS = 1
WALL_TIME = 10.0
TOTALLY_MADE_UP = 1
"#,
    );
    let output = work.asyncre().arg(&control).arg("--root").arg(work.root()).output().expect("run asyncre");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid control file"), "stderr was: {stderr}");
}

#[test]
fn restart_without_an_existing_checkpoint_exits_with_corrupt_checkpoint_code() {
    let work = Workdir::empty();
    let control = work.file(
        "control.toml",
        r#"
ENGINE = "impact"
RE_TYPE = "temperature"
ENGINE_INPUT_BASENAME = "impact"
RE_SETUP = false
NREPLICAS = 1
WALL_TIME = 10.0
"#,
    );
    let output = work.asyncre().arg(&control).arg("--root").arg(work.root()).output().expect("run asyncre");
    assert_eq!(output.status.code(), Some(3));
}
