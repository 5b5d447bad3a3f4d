// Simulation JSON API
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::CoreError;
use crate::probability::{
    headline, pair_count, probability_table, shared_birthday_probability, ProbabilityRow,
};
use crate::stats::{Accumulator, StatisticsSnapshot};
use crate::trial::{TrialEngine, TrialOutcome};
use crate::SCHEMA_VERSION;

/// Upper bound on trials per batch request.
pub const MAX_BATCH_TRIALS: u64 = 1_000_000;

/// Upper bound on pairwise birthday comparisons per batch request.
pub const MAX_BATCH_COMPARISONS: u64 = 1_000_000_000;

/// Upper bound on group size accepted over the JSON boundary.
pub const MAX_JSON_GROUP_SIZE: u32 = 1_000;

/// Simulation request - sent by the presentation layer
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub schema_version: u8,
    pub request_type: SimulationRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum SimulationRequestType {
    /// Theoretical chance for one group size
    Probability { group_size: u32 },

    /// Theoretical chance for every size in `from..=to`
    ProbabilityTable { from: u32, to: u32 },

    /// One trial, with individuals and collision pairs for highlighting
    Trial { group_size: u32, seed: u64 },

    /// Many trials folded into one snapshot
    Batch { group_size: u32, trials: u64, seed: u64 },
}

/// Simulation response - returned to the presentation layer
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response_type: Option<SimulationResponseType>,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum SimulationResponseType {
    Probability { group_size: u32, pairs: u64, probability: f64, headline: String },

    ProbabilityTable { rows: Vec<ProbabilityRow> },

    Trial { trial: TrialView },

    Batch { snapshot: StatisticsSnapshot, observed_rate: Option<f64>, theoretical: f64 },
}

/// Trial outcome flattened for display.
#[derive(Debug, Serialize)]
pub struct TrialView {
    pub group_size: u32,
    pub matched: bool,
    pub individuals: Vec<IndividualView>,
    pub pairs: Vec<PairView>,
    pub matched_individuals: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct IndividualView {
    pub index: usize,
    pub label: String,
    pub day: u16,
    pub birthday: String,
}

#[derive(Debug, Serialize)]
pub struct PairView {
    pub first: usize,
    pub second: usize,
    pub birthday: String,
}

impl From<&TrialOutcome> for TrialView {
    fn from(outcome: &TrialOutcome) -> Self {
        Self {
            group_size: outcome.group_size(),
            matched: outcome.matched(),
            individuals: outcome
                .individuals()
                .iter()
                .map(|p| IndividualView {
                    index: p.index,
                    label: p.label.clone(),
                    day: p.birthday.day(),
                    birthday: p.birthday.label(),
                })
                .collect(),
            pairs: outcome
                .collision_pairs()
                .iter()
                .map(|pair| PairView {
                    first: pair.first,
                    second: pair.second,
                    birthday: pair.birthday.label(),
                })
                .collect(),
            matched_individuals: outcome.matched_individuals(),
        }
    }
}

impl SimulationResponse {
    fn ok(response_type: SimulationResponseType) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            success: true,
            response_type: Some(response_type),
            error_message: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            success: false,
            response_type: None,
            error_message: Some(message),
        }
    }
}

/// Handle one JSON request. Always returns a JSON response; failures are
/// reported through `success = false` and `error_message`.
pub fn simulation_json(request_json: &str) -> String {
    let response = match serde_json::from_str::<SimulationRequest>(request_json) {
        Ok(request) => handle_request(request),
        Err(e) => {
            warn!("Rejected simulation request: {}", e);
            SimulationResponse::failure(format!("Invalid request: {}", e))
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        error!("Failed to serialize simulation response: {}", e);
        format!(
            r#"{{"schema_version":{},"success":false,"response_type":null,"error_message":"serialization failed"}}"#,
            SCHEMA_VERSION
        )
    })
}

fn handle_request(request: SimulationRequest) -> SimulationResponse {
    if request.schema_version != SCHEMA_VERSION {
        warn!(
            "Schema version mismatch: expected {}, got {}",
            SCHEMA_VERSION, request.schema_version
        );
        return SimulationResponse::failure(format!(
            "Unsupported schema_version {} (expected {})",
            request.schema_version, SCHEMA_VERSION
        ));
    }

    match request.request_type {
        SimulationRequestType::Probability { group_size } => {
            debug!("Probability request: group_size={}", group_size);
            if group_size > MAX_JSON_GROUP_SIZE {
                return too_large(group_size);
            }
            SimulationResponse::ok(SimulationResponseType::Probability {
                group_size,
                pairs: pair_count(group_size),
                probability: shared_birthday_probability(group_size),
                headline: headline(group_size),
            })
        }

        SimulationRequestType::ProbabilityTable { from, to } => {
            debug!("Probability table request: {}..={}", from, to);
            if from > to || to > MAX_JSON_GROUP_SIZE {
                return SimulationResponse::failure(CoreError::InvalidRange { from, to }.to_string());
            }
            SimulationResponse::ok(SimulationResponseType::ProbabilityTable {
                rows: probability_table(from, to),
            })
        }

        SimulationRequestType::Trial { group_size, seed } => {
            debug!("Trial request: group_size={} seed={}", group_size, seed);
            if group_size > MAX_JSON_GROUP_SIZE {
                return too_large(group_size);
            }
            let outcome = TrialEngine::new(seed).run(group_size);
            SimulationResponse::ok(SimulationResponseType::Trial { trial: (&outcome).into() })
        }

        SimulationRequestType::Batch { group_size, trials, seed } => {
            debug!("Batch request: group_size={} trials={} seed={}", group_size, trials, seed);
            if group_size > MAX_JSON_GROUP_SIZE {
                return too_large(group_size);
            }
            if trials > MAX_BATCH_TRIALS {
                return SimulationResponse::failure(format!(
                    "Too many trials: {} (max {})",
                    trials, MAX_BATCH_TRIALS
                ));
            }
            let comparisons = trials.saturating_mul(pair_count(group_size));
            if comparisons > MAX_BATCH_COMPARISONS {
                return SimulationResponse::failure(format!(
                    "Batch too large: {} comparisons (max {})",
                    comparisons, MAX_BATCH_COMPARISONS
                ));
            }

            let snapshot = run_batch(group_size, trials, seed);
            SimulationResponse::ok(SimulationResponseType::Batch {
                snapshot,
                observed_rate: snapshot.observed_rate(),
                theoretical: shared_birthday_probability(group_size),
            })
        }
    }
}

fn too_large(group_size: u32) -> SimulationResponse {
    SimulationResponse::failure(
        CoreError::InvalidGroupSize { value: group_size, min: 0, max: MAX_JSON_GROUP_SIZE }
            .to_string(),
    )
}

/// Run `trials` back-to-back trials without a timer.
pub fn run_batch(group_size: u32, trials: u64, seed: u64) -> StatisticsSnapshot {
    let mut engine = TrialEngine::new(seed);
    let mut accumulator = Accumulator::new(group_size);
    for _ in 0..trials {
        accumulator.record(&engine.run(group_size));
    }
    accumulator.snapshot()
}
