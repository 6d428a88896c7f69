// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes `RE_TYPE` to a concrete exchange plug-in and reads the plug-in's
//! own keys out of the opaque `[scheme]` table (§6: "scheme plug-ins define
//! more").
//!
//! `asyncre` ships one reference plug-in, the pairwise-Metropolis
//! temperature exchange (§4.4, §9 redesign note); other `RE_TYPE` values are
//! a configuration error rather than a silent no-op.

use asre_engine::{ExchangePlugin, PairwiseMetropolisPlugin, PluginError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("unsupported RE_TYPE: {0}")]
    UnsupportedReType(String),
    #[error("missing required [scheme] key: {0}")]
    MissingKey(&'static str),
    #[error("invalid [scheme] key {key}: {reason}")]
    InvalidKey { key: &'static str, reason: String },
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// Build the plug-in named by `re_type`, reading its settings out of
/// `scheme_settings`, and run its own `check_input` before returning it.
pub fn build_plugin(
    root: &Path,
    basename: &str,
    re_type: &str,
    scheme_settings: &toml::Table,
) -> Result<Arc<dyn ExchangePlugin>, SchemeError> {
    let plugin: Arc<dyn ExchangePlugin> = match re_type {
        "temperature" => Arc::new(build_pairwise_metropolis(root, basename, scheme_settings)?),
        other => return Err(SchemeError::UnsupportedReType(other.to_string())),
    };
    plugin.check_input(scheme_settings)?;
    Ok(plugin)
}

fn build_pairwise_metropolis(
    root: &Path,
    basename: &str,
    scheme_settings: &toml::Table,
) -> Result<PairwiseMetropolisPlugin, SchemeError> {
    let template = scheme_settings
        .get("TEMPLATE")
        .ok_or(SchemeError::MissingKey("TEMPLATE"))?
        .as_str()
        .ok_or(SchemeError::InvalidKey { key: "TEMPLATE", reason: "expected a string".to_string() })?
        .to_string();

    let temperatures = scheme_settings
        .get("TEMPERATURES")
        .ok_or(SchemeError::MissingKey("TEMPERATURES"))?
        .as_array()
        .ok_or(SchemeError::InvalidKey { key: "TEMPERATURES", reason: "expected an array".to_string() })?
        .iter()
        .map(|v| {
            v.as_float()
                .or_else(|| v.as_integer().map(|i| i as f64))
                .ok_or(SchemeError::InvalidKey { key: "TEMPERATURES", reason: "expected an array of numbers".to_string() })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(PairwiseMetropolisPlugin::new(root, basename, template, temperatures))
}

#[cfg(test)]
#[path = "scheme_tests.rs"]
mod tests;
