//! Simulation driver
//!
//! Owns the trial engine and the accumulator and is the single writer of the
//! published state. Each tick is one complete unit: trial, record, history,
//! publish. Readers hold a [`SnapshotHandle`] and get copies, so a reader on
//! another thread never sees a half-applied tick.

use std::ops::ControlFlow;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::config::SimConfig;
use crate::counter::GroupSizeCounter;
use crate::error::{CoreError, Result};
use crate::history::{RateHistory, RatePoint};
use crate::stats::{Accumulator, StatisticsSnapshot};
use crate::trial::{TrialEngine, TrialOutcome};

#[derive(Debug, Clone)]
struct Published {
    snapshot: StatisticsSnapshot,
    latest_trial: Option<Arc<TrialOutcome>>,
}

/// Read side of the driver's state. Cheap to clone, safe to send.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Published>>,
}

impl SnapshotHandle {
    fn new(snapshot: StatisticsSnapshot) -> Self {
        Self { inner: Arc::new(RwLock::new(Published { snapshot, latest_trial: None })) }
    }

    /// Copy of the most recently published statistics.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).snapshot
    }

    /// Individuals and collision pairs of the last published trial.
    pub fn latest_trial(&self) -> Option<Arc<TrialOutcome>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).latest_trial.clone()
    }

    fn publish(&self, snapshot: StatisticsSnapshot, latest_trial: Option<Arc<TrialOutcome>>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Published { snapshot, latest_trial };
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub outcome: Arc<TrialOutcome>,
    pub snapshot: StatisticsSnapshot,
    pub point: Option<RatePoint>,
}

/// Totals of a finished [`SimulationDriver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub snapshot: StatisticsSnapshot,
    pub theoretical: f64,
}

pub struct SimulationDriver {
    config: SimConfig,
    counter: GroupSizeCounter,
    engine: TrialEngine,
    accumulator: Accumulator,
    history: RateHistory,
    handle: SnapshotHandle,
    running: bool,
}

impl SimulationDriver {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let counter = GroupSizeCounter::new(config.group_size)?;
        let engine = match config.seed {
            Some(seed) => TrialEngine::new(seed),
            None => TrialEngine::from_entropy(),
        };
        let accumulator = Accumulator::new(counter.value());
        let handle = SnapshotHandle::new(accumulator.snapshot());

        Ok(Self {
            config,
            counter,
            engine,
            accumulator,
            history: RateHistory::new(),
            handle,
            running: false,
        })
    }

    pub fn handle(&self) -> SnapshotHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn group_size(&self) -> u32 {
        self.counter.value()
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.engine.seed()
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.accumulator.snapshot()
    }

    pub fn history(&self) -> &RateHistory {
        &self.history
    }

    /// Begin a run. A restart after `stop` begins from zeroed statistics.
    /// Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.reset_statistics();
        self.running = true;
        log::info!(
            "Simulation started: group size {}, interval {:?}, seed {}",
            self.counter.value(),
            self.config.interval(),
            self.engine.seed()
        );
        true
    }

    /// Stop scheduling ticks. Statistics stay readable until the next start.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        log::info!("Simulation stopped after {} trials", self.accumulator.snapshot().trial_count);
        true
    }

    /// Run one trial and publish the result. `None` while stopped.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }

        let outcome = Arc::new(self.engine.run(self.counter.value()));
        let snapshot = self.accumulator.record(&outcome);
        let point = self.history.push(&snapshot);
        self.handle.publish(snapshot, Some(Arc::clone(&outcome)));

        Some(TickReport { outcome, snapshot, point })
    }

    /// Change the group size. Refused while running; clears statistics.
    pub fn set_group_size(&mut self, n: u32) -> Result<()> {
        if self.running {
            return Err(CoreError::GroupSizeLocked);
        }
        let previous = self.counter.value();
        self.counter.set(n)?;
        self.config.group_size = n;
        self.reset_statistics();
        log::info!("Group size changed: {} -> {}", previous, n);
        Ok(())
    }

    pub fn increment_group_size(&mut self) -> Result<u32> {
        let next = self.counter.value().saturating_add(1);
        self.set_group_size(next)?;
        Ok(next)
    }

    pub fn decrement_group_size(&mut self) -> Result<u32> {
        let next = self.counter.value().saturating_sub(1);
        self.set_group_size(next)?;
        Ok(next)
    }

    /// Blocking timer loop.
    ///
    /// Starts the run, ticks once per interval and stops after
    /// `config.max_trials` ticks or when `on_tick` breaks. No sleep follows
    /// the final tick.
    pub fn run<F>(&mut self, mut on_tick: F) -> RunSummary
    where
        F: FnMut(&TickReport) -> ControlFlow<()>,
    {
        self.start();
        let interval = self.config.interval();
        let limit = self.config.max_trials;
        let mut ticks = 0u64;

        while limit.map_or(true, |max| ticks < max) {
            let Some(report) = self.tick() else {
                break;
            };
            ticks += 1;

            if on_tick(&report).is_break() {
                break;
            }
            if limit.map_or(false, |max| ticks >= max) {
                break;
            }
            thread::sleep(interval);
        }

        self.stop();
        RunSummary {
            ticks,
            snapshot: self.accumulator.snapshot(),
            theoretical: crate::probability::shared_birthday_probability(self.counter.value()),
        }
    }

    fn reset_statistics(&mut self) {
        self.accumulator.reset(self.counter.value());
        self.history.clear();
        self.handle.publish(self.accumulator.snapshot(), None);
    }
}
