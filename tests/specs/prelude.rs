// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the binary-level specs: a scratch working
//! directory plus a thin wrapper around `assert_cmd::Command` for the
//! `asyncre` binary.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Workdir {
    dir: TempDir,
}

impl Workdir {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().expect("create tempdir") }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Stages a shell script engine stand-in that, given an input file
    /// path as its sole argument, writes `{stem}.out` and a sibling
    /// `{basename}_latest.energy` next to it. Good enough to drive the
    /// scheduler through a real cycle without a real MD engine.
    #[cfg(unix)]
    pub fn fake_engine(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = r#"#!/bin/sh
set -e
in="$1"
dir=$(dirname "$in")
stem=$(basename "$in" .in)
base=$(echo "$stem" | sed -E 's/_[0-9]+$//')
echo "ok" > "$dir/$stem.out"
printf '0 -100.0\n1 -90.0\n' > "$dir/${base}_latest.energy"
"#;
        let path = self.file("fake_engine.sh", script);
        let mut perms = fs::metadata(&path).expect("stat fake engine").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod fake engine");
        path
    }

    pub fn asyncre(&self) -> Command {
        let mut cmd = Command::cargo_bin("asyncre").expect("locate asyncre binary");
        cmd.current_dir(self.root());
        cmd
    }
}
