// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated configuration record (§6, §9 "Dynamic keyword-driven
//! configuration" redesign note).
//!
//! Control files are TOML. Every key the core recognizes is enumerated
//! below; anything else in the file is a fatal [`ConfigError::UnknownKey`]
//! rather than being silently ignored.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required config key: {0}")]
    MissingKey(&'static str),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for config key {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("could not parse control file: {0}")]
    Parse(String),
}

/// The fully-validated set of keys the core consumes (§6). Scheme plug-ins
/// may define additional keys, which are read separately by the plug-in and
/// are not part of this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub engine: String,
    pub re_type: String,
    pub engine_input_basename: String,
    pub engine_input_extfiles: Vec<String>,
    pub re_setup: bool,
    pub verbose: bool,
    pub nreplicas: u32,
    pub total_cores: u32,
    pub subjob_cores: u32,
    pub ppn: u32,
    pub spmd: String,
    pub subjobs_buffer_size: f64,
    /// Minutes before drain.
    pub wall_time: f64,
    /// Minutes per cycle, drain safety margin.
    pub replica_run_time: f64,
    /// Seconds per tick.
    pub cycle_time: u64,
    pub queue: Option<String>,
    pub project: Option<String>,
    pub bj_working_dir: Option<String>,
    pub coordination_url: Option<String>,
    pub resource_url: Option<String>,
    /// Scheme-specific settings from the control file's `[scheme]` table
    /// (§6: "scheme plug-ins define more [keys]"). Opaque to the core;
    /// handed to `ExchangePlugin::check_input` unparsed.
    pub scheme_settings: toml::Table,
}

/// The control-file key under which scheme-specific settings live, kept out
/// of [`KNOWN_KEYS`] because it is a table, not a flat value.
const SCHEME_SETTINGS_KEY: &str = "scheme";

/// All recognized keys, used to reject unknown ones.
const KNOWN_KEYS: &[&str] = &[
    "ENGINE",
    "RE_TYPE",
    "ENGINE_INPUT_BASENAME",
    "ENGINE_INPUT_EXTFILES",
    "RE_SETUP",
    "VERBOSE",
    "NREPLICAS",
    "TOTAL_CORES",
    "SUBJOB_CORES",
    "PPN",
    "SPMD",
    "SUBJOBS_BUFFER_SIZE",
    "WALL_TIME",
    "REPLICA_RUN_TIME",
    "CYCLE_TIME",
    "QUEUE",
    "PROJECT",
    "BJ_WORKING_DIR",
    "COORDINATION_URL",
    "RESOURCE_URL",
];

impl Config {
    /// Parse and validate a control file's contents.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        for key in table.keys() {
            if key != SCHEME_SETTINGS_KEY && !KNOWN_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::UnknownKey(key.clone()));
            }
        }

        let scheme_settings = match table.get(SCHEME_SETTINGS_KEY) {
            None => toml::Table::new(),
            Some(toml::Value::Table(t)) => t.clone(),
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "scheme",
                    reason: "expected a [scheme] table".to_string(),
                })
            }
        };

        let get_str = |key: &'static str| -> Option<String> {
            table.get(key).and_then(|v| v.as_str()).map(str::to_string)
        };
        let require_str = |key: &'static str| -> Result<String, ConfigError> {
            get_str(key).ok_or(ConfigError::MissingKey(key))
        };
        let get_bool = |key: &'static str, default: bool| -> Result<bool, ConfigError> {
            match table.get(key) {
                None => Ok(default),
                Some(v) => v.as_bool().ok_or(ConfigError::InvalidValue {
                    key,
                    reason: "expected a boolean".to_string(),
                }),
            }
        };
        let get_u32 = |key: &'static str, default: Option<u32>| -> Result<u32, ConfigError> {
            match table.get(key) {
                None => default.ok_or(ConfigError::MissingKey(key)),
                Some(v) => v
                    .as_integer()
                    .and_then(|i| u32::try_from(i).ok())
                    .ok_or(ConfigError::InvalidValue { key, reason: "expected a non-negative integer".to_string() }),
            }
        };
        let get_f64 = |key: &'static str, default: Option<f64>| -> Result<f64, ConfigError> {
            match table.get(key) {
                None => default.ok_or(ConfigError::MissingKey(key)),
                Some(v) => v
                    .as_float()
                    .or_else(|| v.as_integer().map(|i| i as f64))
                    .ok_or(ConfigError::InvalidValue { key, reason: "expected a number".to_string() }),
            }
        };

        let wall_time = get_f64("WALL_TIME", None)?;
        let replica_run_time = get_f64("REPLICA_RUN_TIME", Some(0.1 * wall_time))?;

        let engine_input_extfiles = match table.get("ENGINE_INPUT_EXTFILES") {
            None => Vec::new(),
            Some(v) => {
                let s = v.as_str().ok_or(ConfigError::InvalidValue {
                    key: "ENGINE_INPUT_EXTFILES",
                    reason: "expected a comma-separated string".to_string(),
                })?;
                s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
            }
        };

        let cfg = Config {
            engine: require_str("ENGINE")?,
            re_type: require_str("RE_TYPE")?,
            engine_input_basename: require_str("ENGINE_INPUT_BASENAME")?,
            engine_input_extfiles,
            re_setup: get_bool("RE_SETUP", false)?,
            verbose: get_bool("VERBOSE", false)?,
            nreplicas: get_u32("NREPLICAS", None)?,
            total_cores: get_u32("TOTAL_CORES", Some(1))?,
            subjob_cores: get_u32("SUBJOB_CORES", Some(1))?,
            ppn: get_u32("PPN", Some(1))?,
            spmd: get_str("SPMD").unwrap_or_else(|| "single".to_string()),
            subjobs_buffer_size: get_f64("SUBJOBS_BUFFER_SIZE", Some(0.5))?,
            wall_time,
            replica_run_time,
            cycle_time: get_u32("CYCLE_TIME", Some(30))? as u64,
            queue: get_str("QUEUE"),
            project: get_str("PROJECT"),
            bj_working_dir: get_str("BJ_WORKING_DIR"),
            coordination_url: get_str("COORDINATION_URL"),
            resource_url: get_str("RESOURCE_URL"),
            scheme_settings,
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.nreplicas == 0 {
            return Err(ConfigError::InvalidValue { key: "NREPLICAS", reason: "must be > 0".to_string() });
        }
        if self.subjob_cores == 0 {
            return Err(ConfigError::InvalidValue { key: "SUBJOB_CORES", reason: "must be > 0".to_string() });
        }
        if self.subjobs_buffer_size < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "SUBJOBS_BUFFER_SIZE",
                reason: "must be >= 0".to_string(),
            });
        }
        Ok(())
    }

    /// Maximum concurrent subjobs per §4.3/§8 scenario 6:
    /// `floor(total_cores * (1 + buffer_size) / subjob_cores)`.
    pub fn max_concurrent_subjobs(&self) -> u32 {
        let admitted = self.total_cores as f64 * (1.0 + self.subjobs_buffer_size);
        (admitted / self.subjob_cores as f64).floor() as u32
    }

    /// Every key name this struct recognizes, for diagnostics/tests.
    pub fn known_keys() -> BTreeSet<&'static str> {
        KNOWN_KEYS.iter().copied().collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;