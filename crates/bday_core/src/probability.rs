//! Closed-form birthday probability
//!
//! Everything here is a pure function of the group size. The simulation
//! never feeds back into these numbers; they are the baseline the observed
//! rate is compared against.

use serde::Serialize;

use crate::birthday::DAYS_IN_YEAR;

/// Group size at which the shared-birthday chance first exceeds one half.
pub const CLASSIC_GROUP_SIZE: u32 = 23;

/// Probability that at least two of `n` people share a birthday.
///
/// Assumes 365 equally likely birthdays and no leap day. For `n > 365` the
/// product would contain a zero factor, so the result is exactly 1.
pub fn shared_birthday_probability(n: u32) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    if n > DAYS_IN_YEAR as u32 {
        return 1.0;
    }

    let days = DAYS_IN_YEAR as f64;
    let mut all_distinct = 1.0_f64;
    for i in 0..n {
        all_distinct *= (days - i as f64) / days;
    }

    1.0 - all_distinct
}

/// Number of unordered pairs in a group of `n`: C(n, 2).
pub fn pair_count(n: u32) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// One row of a probability table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub group_size: u32,
    pub pairs: u64,
    pub probability: f64,
}

/// Rows for every group size in `from..=to`.
pub fn probability_table(from: u32, to: u32) -> Vec<ProbabilityRow> {
    (from..=to)
        .map(|n| ProbabilityRow {
            group_size: n,
            pairs: pair_count(n),
            probability: shared_birthday_probability(n),
        })
        .collect()
}

/// Short sentence describing the theoretical chance for a group.
pub fn headline(n: u32) -> String {
    if n == CLASSIC_GROUP_SIZE {
        format!("In a group of {} people, the chance of a shared birthday exceeds 50%!", n)
    } else {
        format!(
            "In a group of {} people, the chance of a shared birthday is nearly {:.0}%!",
            n,
            shared_birthday_probability(n) * 100.0
        )
    }
}
