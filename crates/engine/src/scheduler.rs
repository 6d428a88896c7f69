// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scheduler Loop (C6, §4.6, §5): the top-level periodic controller.
//!
//! Each tick runs poll -> checkpoint -> exchange -> admit -> wall-time gate,
//! strictly in that order and never overlapping with the next tick (§5).
//! `tick` is the unit-testable core; `run` wraps it in the real sleep loop
//! and the interrupt/wall-time drain policy (§5 "Cancellation and
//! timeouts").

use crate::artifact::CycleArtifactLayer;
use crate::error::SchedulerError;
use crate::exchange::ExchangeEngine;
use crate::state_machine;
use asre_adapters::{PollOutcome, SubjobAdapter, SubjobDescriptor};
use asre_core::{Clock, Config, ReplicaId, StateId};
use asre_storage::StatusStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Three consecutive failed checkpoints drain and exit (§7 "IOError on
/// checkpoint").
const MAX_CONSECUTIVE_CHECKPOINT_FAILURES: u32 = 3;

/// Builds the pilot-facing descriptor for one (replica, state, cycle); the
/// engine-specific executable path and argument layout are not the core's
/// concern (§6 "Pilot boundary"), so this is injected.
pub trait DescriptorBuilder: Send + Sync {
    fn build(&self, replica: ReplicaId, state: StateId, cycle: u64) -> SubjobDescriptor;
}

/// Why the loop stopped (§5, §8 scenario 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReason {
    /// A POSIX interrupt was observed.
    Interrupted,
    /// `elapsed + REPLICA_RUN_TIME >= WALL_TIME`.
    WallTimeExhausted,
    /// Drain requested but the bounded wait for R -> W expired anyway.
    DrainTimeout,
}

pub struct SchedulerLoop<C: Clock> {
    store: Arc<StatusStore>,
    pilot: Arc<dyn SubjobAdapter>,
    artifacts: Arc<dyn CycleArtifactLayer>,
    plugin: Arc<dyn crate::plugin::ExchangePlugin>,
    descriptors: Arc<dyn DescriptorBuilder>,
    exchange: ExchangeEngine,
    clock: C,
    rng: StdRng,

    cycle_time: Duration,
    checkpoint_every_ticks: u32,
    subjob_cores: u32,
    wall_time: Duration,
    replica_run_time: Duration,
    drain_timeout: Duration,

    stat_path: PathBuf,
    stat_txt_path: PathBuf,

    start: Instant,
    tick_count: u32,
    consecutive_checkpoint_failures: u32,
    max_consecutive_pilot_failures: u32,
    consecutive_pilot_failures: u32,
    next_admission_cursor: usize,
    draining: bool,
    drain_started: Option<Instant>,

    pub interrupted: Arc<AtomicBool>,
}

impl<C: Clock> SchedulerLoop<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &Config,
        store: Arc<StatusStore>,
        pilot: Arc<dyn SubjobAdapter>,
        artifacts: Arc<dyn CycleArtifactLayer>,
        plugin: Arc<dyn crate::plugin::ExchangePlugin>,
        descriptors: Arc<dyn DescriptorBuilder>,
        clock: C,
        stat_path: PathBuf,
        stat_txt_path: PathBuf,
        rng_seed: u64,
        attempts_per_round: Option<usize>,
    ) -> Self {
        let start = clock.now();
        Self {
            exchange: ExchangeEngine::new(plugin.clone(), attempts_per_round),
            store,
            pilot,
            artifacts,
            plugin,
            descriptors,
            clock,
            rng: StdRng::seed_from_u64(rng_seed),
            cycle_time: Duration::from_secs(config.cycle_time),
            checkpoint_every_ticks: 10,
            subjob_cores: config.subjob_cores,
            wall_time: Duration::from_secs_f64(config.wall_time * 60.0),
            replica_run_time: Duration::from_secs_f64(config.replica_run_time * 60.0),
            drain_timeout: Duration::from_secs(300),
            stat_path,
            stat_txt_path,
            start,
            tick_count: 0,
            consecutive_checkpoint_failures: 0,
            max_consecutive_pilot_failures: 10,
            consecutive_pilot_failures: 0,
            next_admission_cursor: 0,
            draining: false,
            drain_started: None,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    fn elapsed(&self) -> Duration {
        self.clock.now().duration_since(self.start)
    }

    /// One full poll -> checkpoint -> exchange -> admit -> wall-time-gate
    /// cycle (§4.6).
    pub fn tick(&mut self) -> Result<(), SchedulerError> {
        self.tick_count += 1;

        self.poll()?;

        if self.tick_count % self.checkpoint_every_ticks == 0 || self.draining {
            self.checkpoint()?;
        }

        if let Err(e) = self.exchange.run_round(&self.store, &mut self.rng) {
            // §7: ExchangePluginError aborts only this round.
            tracing::warn!(error = %e, "exchange round aborted");
        }

        if !self.draining {
            self.admit();
        }

        self.apply_wall_time_gate();

        Ok(())
    }

    fn poll(&mut self) -> Result<(), SchedulerError> {
        let (running, _) = self.store.partition();
        let mut any_pilot_error = false;

        for id in running {
            let Some(replica) = self.store.get(id) else { continue };
            let Some(handle) = replica.last_handle.clone() else { continue };

            match self.pilot.poll(&handle) {
                Ok(PollOutcome::Pending) | Ok(PollOutcome::Running) => {}
                Ok(PollOutcome::Done) => {
                    if self.artifacts.has_completed(id, replica.cycle_current) {
                        state_machine::complete_ok(&self.store, id);
                    } else {
                        tracing::warn!(replica = %id, "pilot reported done but artifact missing");
                        state_machine::complete_fail(&self.store, id);
                    }
                }
                Ok(PollOutcome::Failed) | Ok(PollOutcome::Unknown) => {
                    state_machine::complete_fail(&self.store, id);
                }
                Err(e) => {
                    tracing::warn!(replica = %id, error = %e, "poll failed");
                    any_pilot_error = true;
                }
            }
        }

        if any_pilot_error {
            self.consecutive_pilot_failures += 1;
            if self.consecutive_pilot_failures >= self.max_consecutive_pilot_failures {
                return Err(SchedulerError::PilotExhausted { consecutive: self.consecutive_pilot_failures });
            }
        } else {
            self.consecutive_pilot_failures = 0;
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<(), SchedulerError> {
        let replicas = self.store.snapshot_replicas();
        match asre_storage::write_checkpoint(&self.stat_path, &replicas) {
            Ok(()) => {
                self.consecutive_checkpoint_failures = 0;
                if let Err(e) = asre_storage::write_summary(&self.stat_txt_path, &replicas) {
                    tracing::warn!(error = %e, "failed to write human-readable status table");
                }
                Ok(())
            }
            Err(e) => {
                self.consecutive_checkpoint_failures += 1;
                tracing::warn!(error = %e, consecutive = self.consecutive_checkpoint_failures, "checkpoint write failed");
                if self.consecutive_checkpoint_failures >= MAX_CONSECUTIVE_CHECKPOINT_FAILURES {
                    return Err(SchedulerError::CheckpointExhausted { consecutive: self.consecutive_checkpoint_failures });
                }
                Ok(())
            }
        }
    }

    fn admit(&mut self) {
        loop {
            let capacity = match self.pilot.capacity() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(error = %e, "capacity query failed, skipping admission this tick");
                    return;
                }
            };
            if !capacity.has_room_for(self.subjob_cores) {
                return;
            }
            if self.elapsed() + self.replica_run_time >= self.wall_time {
                return;
            }

            let (_, mut waiting) = self.store.partition();
            if waiting.is_empty() {
                return;
            }
            waiting.sort();

            // Round-robin by replica id starting from the cursor (§4.6 step 4).
            let start = self.next_admission_cursor % waiting.len();
            let pick = waiting[start];
            self.next_admission_cursor = (start + 1) % waiting.len().max(1);

            let Some(replica) = self.store.get(pick) else { continue };
            let (state, cycle) = (replica.stateid_current, replica.cycle_current);

            if let Err(e) = self.plugin.build_input(pick, state, cycle) {
                tracing::warn!(replica = %pick, error = %e, "build_input failed, skipping launch this tick");
                return;
            }

            let descriptor = self.descriptors.build(pick, state, cycle);
            match self.pilot.submit(&descriptor) {
                Ok(handle) => state_machine::launch(&self.store, pick, handle),
                Err(e) => {
                    tracing::warn!(replica = %pick, error = %e, "submit failed, skipping launch this tick");
                    return;
                }
            }
        }
    }

    fn apply_wall_time_gate(&mut self) {
        if !self.draining && self.elapsed() + self.replica_run_time >= self.wall_time {
            tracing::info!("wall-time budget approaching, entering drain");
            self.draining = true;
            self.drain_started.get_or_insert_with(|| self.clock.now());
        }
    }

    fn request_interrupt_drain(&mut self) {
        if !self.draining {
            tracing::info!("interrupt received, entering drain");
            self.draining = true;
            self.drain_started.get_or_insert_with(|| self.clock.now());
        }
    }

    fn drained(&self) -> bool {
        self.store.partition().0.is_empty()
    }

    fn drain_reason(&self) -> DrainReason {
        if self.interrupted.load(Ordering::SeqCst) {
            DrainReason::Interrupted
        } else if self.drained() {
            DrainReason::WallTimeExhausted
        } else {
            DrainReason::DrainTimeout
        }
    }

    /// Drive the loop until drained or an unrecoverable [`SchedulerError`].
    /// Sleeps for `cycle_time` between ticks; intended for the binary
    /// entrypoint, not for tests (use [`tick`](Self::tick) directly there).
    pub fn run(&mut self) -> Result<DrainReason, SchedulerError> {
        loop {
            if self.interrupted.load(Ordering::SeqCst) {
                self.request_interrupt_drain();
            }

            self.tick()?;

            if self.draining {
                if self.drained() {
                    self.checkpoint()?;
                    return Ok(self.drain_reason());
                }
                if let Some(started) = self.drain_started {
                    if self.clock.now().duration_since(started) >= self.drain_timeout {
                        return Ok(DrainReason::DrainTimeout);
                    }
                }
            }

            std::thread::sleep(self.cycle_time);
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
