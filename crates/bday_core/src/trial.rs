//! Trial Engine
//!
//! One trial = one freshly generated group, an exhaustive pairwise birthday
//! comparison, and an immutable [`TrialOutcome`]. Group sizes in practice are
//! 18..=50, so the O(n²) scan is the whole algorithm.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::birthday::Birthday;

/// One member of a generated group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Individual {
    /// Position in the group (0-based).
    pub index: usize,
    /// Display label, `"Person 1"` onwards.
    pub label: String,
    pub birthday: Birthday,
}

impl Individual {
    pub fn new(index: usize, birthday: Birthday) -> Self {
        Self { index, label: format!("Person {}", index + 1), birthday }
    }
}

/// Two individuals of the same trial sharing a birthday. `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CollisionPair {
    pub first: usize,
    pub second: usize,
    pub birthday: Birthday,
}

/// Result of one trial. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct TrialOutcome {
    group_size: u32,
    individuals: Vec<Individual>,
    collision_pairs: Vec<CollisionPair>,
    matched: bool,
}

impl TrialOutcome {
    /// Compare every pair of an already generated group.
    pub fn from_group(individuals: Vec<Individual>) -> Self {
        let collision_pairs = find_collisions(&individuals);
        let matched = !collision_pairs.is_empty();
        Self { group_size: individuals.len() as u32, individuals, collision_pairs, matched }
    }

    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.collision_pairs
    }

    pub fn pair_count(&self) -> usize {
        self.collision_pairs.len()
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Indices of everyone who appears in at least one collision pair,
    /// ascending and without duplicates.
    pub fn matched_individuals(&self) -> Vec<usize> {
        let mut seen = vec![false; self.individuals.len()];
        for pair in &self.collision_pairs {
            seen[pair.first] = true;
            seen[pair.second] = true;
        }
        seen.iter().enumerate().filter_map(|(i, &hit)| hit.then_some(i)).collect()
    }
}

/// Draw `n` individuals with independent uniform birthdays.
pub fn generate_group(n: u32, rng: &mut impl Rng) -> Vec<Individual> {
    (0..n as usize).map(|i| Individual::new(i, Birthday::random(rng))).collect()
}

/// Every unordered index pair `(i, j)`, `i < j`, with equal birthdays.
pub fn find_collisions(individuals: &[Individual]) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();
    for (i, a) in individuals.iter().enumerate() {
        for (j, b) in individuals.iter().enumerate().skip(i + 1) {
            if a.birthday == b.birthday {
                pairs.push(CollisionPair { first: i, second: j, birthday: a.birthday });
            }
        }
    }
    pairs
}

/// Generate a group of `n` and report its collisions.
pub fn run_trial(n: u32, rng: &mut impl Rng) -> TrialOutcome {
    TrialOutcome::from_group(generate_group(n, rng))
}

/// Seeded trial generator. Same seed, same sequence of outcomes.
#[derive(Debug, Clone)]
pub struct TrialEngine {
    seed: u64,
    rng: ChaCha8Rng,
    trials_run: u64,
}

impl TrialEngine {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: ChaCha8Rng::seed_from_u64(seed), trials_run: 0 }
    }

    /// Engine seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trials_run(&self) -> u64 {
        self.trials_run
    }

    pub fn run(&mut self, n: u32) -> TrialOutcome {
        self.trials_run += 1;
        run_trial(n, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn group(days: &[u16]) -> Vec<Individual> {
        days.iter()
            .enumerate()
            .map(|(i, &d)| Individual::new(i, Birthday::new(d).unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_and_single_never_match() {
        let mut engine = TrialEngine::new(1);
        for n in [0, 1] {
            for _ in 0..50 {
                let outcome = engine.run(n);
                assert!(!outcome.matched());
                assert!(outcome.collision_pairs().is_empty());
                assert_eq!(outcome.group_size(), n);
            }
        }
    }

    #[test]
    fn test_labels_and_size() {
        let outcome = TrialEngine::new(3).run(23);
        assert_eq!(outcome.group_size(), 23);
        assert_eq!(outcome.individuals().len(), 23);
        assert_eq!(outcome.individuals()[0].label, "Person 1");
        assert_eq!(outcome.individuals()[22].label, "Person 23");
    }

    #[test]
    fn test_known_collisions() {
        // three people on day 10 form three pairs, plus one pair on day 200
        let outcome = TrialOutcome::from_group(group(&[10, 5, 10, 200, 10, 200, 7]));
        assert!(outcome.matched());
        let pairs: Vec<(usize, usize)> =
            outcome.collision_pairs().iter().map(|p| (p.first, p.second)).collect();
        assert_eq!(pairs, vec![(0, 2), (0, 4), (2, 4), (3, 5)]);
        assert_eq!(outcome.matched_individuals(), vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_all_distinct() {
        let outcome = TrialOutcome::from_group(group(&[1, 2, 3, 4, 365]));
        assert!(!outcome.matched());
        assert_eq!(outcome.pair_count(), 0);
        assert!(outcome.matched_individuals().is_empty());
    }

    #[test]
    fn test_everyone_same_day() {
        let outcome = TrialOutcome::from_group(group(&[42; 6]));
        assert_eq!(outcome.pair_count(), 15);
        assert_eq!(outcome.matched_individuals().len(), 6);
    }

    #[test]
    fn test_seed_determinism() {
        let mut a = TrialEngine::new(2024);
        let mut b = TrialEngine::new(2024);
        for _ in 0..20 {
            let (x, y) = (a.run(30), b.run(30));
            assert_eq!(x.individuals(), y.individuals());
            assert_eq!(x.collision_pairs(), y.collision_pairs());
        }
        assert_eq!(a.trials_run(), 20);
        assert_eq!(a.seed(), 2024);
    }

    #[test]
    fn test_match_rate_tracks_theory() {
        // 23 people: theoretical 0.507; 4000 trials keep us well inside ±0.05
        let mut engine = TrialEngine::new(99);
        let hits = (0..4000).filter(|_| engine.run(23).matched()).count();
        let rate = hits as f64 / 4000.0;
        assert!((rate - 0.5073).abs() < 0.05, "observed {}", rate);
    }

    proptest! {
        #[test]
        fn prop_pairs_are_exhaustive(days in prop::collection::vec(1u16..=365, 0..60)) {
            let outcome = TrialOutcome::from_group(group(&days));

            let mut expected = 0usize;
            for i in 0..days.len() {
                for j in (i + 1)..days.len() {
                    if days[i] == days[j] {
                        expected += 1;
                    }
                }
            }
            prop_assert_eq!(outcome.pair_count(), expected);
            prop_assert_eq!(outcome.matched(), expected > 0);

            for pair in outcome.collision_pairs() {
                prop_assert!(pair.first < pair.second);
                prop_assert_eq!(days[pair.first], days[pair.second]);
            }
        }

        #[test]
        fn prop_few_days_force_collisions(days in prop::collection::vec(1u16..=3, 4..10)) {
            // pigeonhole: more than 3 people over 3 days must collide
            let outcome = TrialOutcome::from_group(group(&days));
            prop_assert!(outcome.matched());
        }
    }
}
