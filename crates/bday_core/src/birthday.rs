//! Birthday day-domain
//!
//! A birthday is a day-of-year in 1..=365. Equality is the only thing the
//! simulation needs; the calendar label exists for display.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

/// Size of the day-domain. No leap day.
pub const DAYS_IN_YEAR: u16 = 365;

/// Non-leap year used to turn a day number into a month/day label.
const LABEL_YEAR: i32 = 2023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Birthday(u16);

impl Birthday {
    /// Day-of-year, `None` outside 1..=365.
    pub fn new(day: u16) -> Option<Self> {
        (1..=DAYS_IN_YEAR).contains(&day).then_some(Self(day))
    }

    /// Uniform draw over all 365 days.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(1..=DAYS_IN_YEAR))
    }

    pub fn day(self) -> u16 {
        self.0
    }

    /// `"Jan 01"` style label.
    pub fn label(self) -> String {
        match NaiveDate::from_yo_opt(LABEL_YEAR, self.0 as u32) {
            Some(date) => date.format("%b %d").to_string(),
            None => format!("Day {}", self.0),
        }
    }
}

impl std::fmt::Display for Birthday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bounds() {
        assert!(Birthday::new(0).is_none());
        assert!(Birthday::new(366).is_none());
        assert_eq!(Birthday::new(1).map(Birthday::day), Some(1));
        assert_eq!(Birthday::new(365).map(Birthday::day), Some(365));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Birthday::new(1).unwrap().label(), "Jan 01");
        assert_eq!(Birthday::new(32).unwrap().label(), "Feb 01");
        // no Feb 29: day 60 is Mar 01
        assert_eq!(Birthday::new(60).unwrap().label(), "Mar 01");
        assert_eq!(Birthday::new(365).unwrap().label(), "Dec 31");
        assert_eq!(Birthday::new(365).unwrap().to_string(), "Dec 31");
    }

    #[test]
    fn test_random_stays_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen_first = false;
        let mut seen_last = false;
        for _ in 0..20_000 {
            let b = Birthday::random(&mut rng);
            assert!((1..=DAYS_IN_YEAR).contains(&b.day()));
            seen_first |= b.day() == 1;
            seen_last |= b.day() == DAYS_IN_YEAR;
        }
        assert!(seen_first && seen_last, "both ends of the domain should be reachable");
    }

    #[test]
    fn test_serializes_as_day_number() {
        let json = serde_json::to_string(&Birthday::new(42).unwrap()).unwrap();
        assert_eq!(json, "42");
    }
}
