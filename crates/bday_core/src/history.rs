//! Observed-vs-theoretical series for chart consumers.

use serde::Serialize;

use crate::probability::shared_birthday_probability;
use crate::stats::StatisticsSnapshot;

/// One chart point: observed success rate after `trial` trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePoint {
    pub trial: u64,
    pub success_rate: f64,
    pub theoretical: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RateHistory {
    points: Vec<RatePoint>,
}

impl RateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the point for `snapshot`. Snapshots without trials have no
    /// defined rate and are skipped.
    pub fn push(&mut self, snapshot: &StatisticsSnapshot) -> Option<RatePoint> {
        let success_rate = snapshot.observed_rate()?;
        let point = RatePoint {
            trial: snapshot.trial_count,
            success_rate,
            theoretical: shared_birthday_probability(snapshot.group_size),
        };
        self.points.push(point);
        Some(point)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn latest(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
