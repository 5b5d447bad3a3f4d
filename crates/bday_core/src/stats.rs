//! Running Statistics Accumulator
//!
//! The only long-lived mutable state of a run. One writer (the driver's tick),
//! snapshots are `Copy` so readers always hold a consistent value.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::trial::TrialOutcome;

/// Cumulative statistics for the current group size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Trials with at least one shared birthday
    pub successes: u64,
    /// Trials where everyone had a distinct birthday
    pub failures: u64,
    /// Sum of collision pairs over all trials
    pub total_matched_pairs: u64,
    /// Always `successes + failures`
    pub trial_count: u64,
    /// `total_matched_pairs / trial_count`, 0 before the first trial
    pub average_matched_pairs: f64,
    /// `None` until the first trial lands
    pub last_trial_matched: Option<bool>,
    pub group_size: u32,
}

impl StatisticsSnapshot {
    /// Zeroed snapshot for `group_size`.
    pub fn empty(group_size: u32) -> Self {
        Self {
            successes: 0,
            failures: 0,
            total_matched_pairs: 0,
            trial_count: 0,
            average_matched_pairs: 0.0,
            last_trial_matched: None,
            group_size,
        }
    }

    /// Share of trials that matched. `None` before the first trial; guarding
    /// the display is up to the caller.
    pub fn observed_rate(&self) -> Option<f64> {
        (self.trial_count > 0).then(|| self.successes as f64 / self.trial_count as f64)
    }

    pub fn has_trials(&self) -> bool {
        self.trial_count > 0
    }
}

/// Owner of the running [`StatisticsSnapshot`].
#[derive(Debug, Clone)]
pub struct Accumulator {
    snapshot: StatisticsSnapshot,
}

impl Accumulator {
    pub fn new(group_size: u32) -> Self {
        Self { snapshot: StatisticsSnapshot::empty(group_size) }
    }

    /// Zero every counter and adopt `group_size`.
    pub fn reset(&mut self, group_size: u32) {
        log::debug!(
            "Statistics reset (group size {} -> {}, {} trials dropped)",
            self.snapshot.group_size,
            group_size,
            self.snapshot.trial_count
        );
        self.snapshot = StatisticsSnapshot::empty(group_size);
    }

    /// Fold one trial into the totals.
    ///
    /// # Panics
    /// If the outcome was generated for a different group size. Callers must
    /// `reset` before changing the group size.
    pub fn record(&mut self, outcome: &TrialOutcome) -> StatisticsSnapshot {
        assert_eq!(
            outcome.group_size(),
            self.snapshot.group_size,
            "trial outcome group size does not match accumulator; reset before changing group size"
        );
        self.apply(outcome.matched(), outcome.pair_count() as u64)
    }

    /// Non-panicking [`record`](Self::record) for callers at an API boundary.
    pub fn try_record(&mut self, outcome: &TrialOutcome) -> Result<StatisticsSnapshot> {
        if outcome.group_size() != self.snapshot.group_size {
            return Err(CoreError::GroupSizeMismatch {
                expected: self.snapshot.group_size,
                found: outcome.group_size(),
            });
        }
        Ok(self.apply(outcome.matched(), outcome.pair_count() as u64))
    }

    fn apply(&mut self, matched: bool, pairs: u64) -> StatisticsSnapshot {
        let s = &mut self.snapshot;
        if matched {
            s.successes += 1;
        } else {
            s.failures += 1;
        }
        s.total_matched_pairs += pairs;
        s.trial_count += 1;
        s.average_matched_pairs = s.total_matched_pairs as f64 / s.trial_count as f64;
        s.last_trial_matched = Some(matched);

        log::trace!(
            "Trial {} recorded: matched={} pairs={}",
            s.trial_count,
            matched,
            pairs
        );
        *s
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.snapshot
    }

    pub fn group_size(&self) -> u32 {
        self.snapshot.group_size
    }
}
