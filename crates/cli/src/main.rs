// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `asyncre`: loads a control file, bootstraps or restores the replica
//! table, and drives the [`asre_engine::SchedulerLoop`] until it drains.

mod bootstrap;
mod descriptor;
mod exit_error;
mod scheme;

use asre_adapters::{LocalProcessPilot, SpmdMode};
use asre_core::{Config, SystemClock};
use asre_engine::{FileArtifactLayer, SchedulerLoop};
use asre_storage::StatusStore;
use clap::Parser;
use exit_error::ExitError;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// Input/output file extensions for the cycle artifact layer. Not a control
/// file key: every engine family this binary drives is expected to read
/// `{basename}_{cycle}.in` and write `{basename}_{cycle}.out`.
const INPUT_EXT: &str = "in";
const OUTPUT_EXT: &str = "out";

#[derive(Parser, Debug)]
#[command(name = "asyncre")]
#[command(version)]
#[command(about = "Asynchronous replica exchange coordinator")]
struct Cli {
    /// Path to the TOML control file.
    control_file: PathBuf,

    /// Working directory root (defaults to the current directory).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Seed for the pairwise-exchange PRNG (defaults to a time-derived seed).
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Pairwise Metropolis attempts per exchange round (defaults to the
    /// number of waiting replicas, per §9).
    #[arg(long)]
    attempts_per_round: Option<usize>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(error = %e.message, "asyncre exiting");
            std::process::exit(e.code);
        }
    }
}

fn run() -> Result<i32, ExitError> {
    let cli = Cli::parse();

    let contents = std::fs::read_to_string(&cli.control_file)
        .map_err(|e| ExitError::new(2, format!("could not read control file {}: {e}", cli.control_file.display())))?;
    let config = Config::from_toml_str(&contents).map_err(|e| ExitError::new(2, format!("invalid control file: {e}")))?;

    init_tracing(config.verbose);
    tracing::info!(version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")), "asyncre starting");

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| ExitError::new(2, format!("could not resolve current directory: {e}")))?,
    };
    let stat_path = root.join(format!("{}.stat", config.engine_input_basename));
    let stat_txt_path = root.join(format!("{}_stat.txt", config.engine_input_basename));

    let replicas = if config.re_setup {
        tracing::info!(root = %root.display(), nreplicas = config.nreplicas, "RE_SETUP: staging replica directories");
        bootstrap::stage_replica_directories(&root, &config).map_err(|e| ExitError::new(2, format!("setup failed: {e}")))?;
        bootstrap::initial_replicas(&config)
    } else {
        tracing::info!(path = %stat_path.display(), "restoring from checkpoint");
        if !stat_path.exists() {
            return Err(ExitError::new(3, format!("no checkpoint at {} and RE_SETUP is false", stat_path.display())));
        }
        let checkpoint = asre_storage::read_checkpoint(&stat_path).map_err(|e| ExitError::new(3, format!("corrupt checkpoint: {e}")))?;
        asre_storage::restart_reset(checkpoint)
    };

    let store = Arc::new(StatusStore::new(replicas));
    let artifacts: Arc<FileArtifactLayer> =
        Arc::new(FileArtifactLayer::new(root.as_path(), config.engine_input_basename.as_str(), INPUT_EXT, OUTPUT_EXT));

    if !config.re_setup {
        asre_engine::state_machine::reconcile_restart(&store, artifacts.as_ref());
    }

    let plugin = scheme::build_plugin(&root, &config.engine_input_basename, &config.re_type, &config.scheme_settings)
        .map_err(|e| ExitError::new(2, format!("scheme plug-in configuration: {e}")))?;

    let spmd_mode = match config.spmd.as_str() {
        "single" => SpmdMode::Single,
        "spmd" => SpmdMode::Spmd,
        other => return Err(ExitError::new(2, format!("invalid SPMD value: {other}"))),
    };
    let descriptors = Arc::new(descriptor::EngineDescriptorBuilder::new(
        artifacts.clone(),
        root.as_path(),
        config.engine.as_str(),
        config.engine_input_basename.as_str(),
        config.subjob_cores,
        spmd_mode,
    ));

    let pilot = Arc::new(LocalProcessPilot::new(config.total_cores, config.subjobs_buffer_size));
    let rng_seed = cli.rng_seed.unwrap_or_else(default_rng_seed);

    let mut scheduler = SchedulerLoop::new(
        &config,
        store,
        pilot,
        artifacts,
        plugin,
        descriptors,
        SystemClock,
        stat_path,
        stat_txt_path,
        rng_seed,
        cli.attempts_per_round,
    );

    let interrupted = scheduler.interrupted.clone();
    ctrlc::set_handler(move || {
        tracing::info!("interrupt received, draining");
        interrupted.store(true, Ordering::SeqCst);
    })
    .map_err(|e| ExitError::new(1, format!("could not install signal handler: {e}")))?;

    match scheduler.run() {
        Ok(reason) => {
            tracing::info!(?reason, "drained cleanly");
            Ok(0)
        }
        Err(e) => Err(ExitError::new(1, format!("scheduler exited: {e}"))),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_rng_seed() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0)
}
