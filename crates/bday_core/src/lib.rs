//! # bday_core - Birthday Paradox Simulation Engine
//!
//! Repeated random trials of the birthday problem, accumulated into running
//! statistics and compared against the exact theoretical probability.
//!
//! ## Features
//! - Exact shared-birthday probability for any group size
//! - Seeded, reproducible trials (same seed = same sequence)
//! - Running statistics with a copy-on-read snapshot handle
//! - Timer-driven simulation driver and a JSON API for presentation layers

pub mod api;
pub mod birthday;
pub mod config;
pub mod counter;
pub mod driver;
pub mod error;
pub mod history;
pub mod probability;
pub mod stats;
pub mod trial;

pub use api::{simulation_json, SimulationRequest, SimulationResponse};
pub use birthday::{Birthday, DAYS_IN_YEAR};
pub use config::{SimConfig, Speed};
pub use counter::{GroupSizeCounter, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use driver::{RunSummary, SimulationDriver, SnapshotHandle, TickReport};
pub use error::{CoreError, Result};
pub use history::{RateHistory, RatePoint};
pub use probability::{headline, pair_count, probability_table, shared_birthday_probability};
pub use stats::{Accumulator, StatisticsSnapshot};
pub use trial::{CollisionPair, Individual, TrialEngine, TrialOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
