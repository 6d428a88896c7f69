// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable `{basename}_stat.txt` summary (§4.1, §6).
//!
//! Written non-atomically alongside every checkpoint; it is operator-facing
//! only and is never read back by the coordinator.

use crate::error::StoreError;
use asre_core::Replica;
use std::fs;
use std::path::Path;

pub fn write_summary(txt_path: &Path, replicas: &[Replica]) -> Result<(), StoreError> {
    let mut out = String::new();
    out.push_str("replica  state  status  cycle  handle\n");
    for r in replicas {
        out.push_str(&format!(
            "{:<7}  {:<5}  {:<6}  {:<5}  {}\n",
            r.id,
            r.stateid_current,
            r.running_status,
            r.cycle_current,
            r.last_handle.as_ref().map(|h| h.as_str()).unwrap_or("-"),
        ));
    }
    fs::write(txt_path, out)?;
    Ok(())
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
