pub mod simulation_json;

pub use simulation_json::{
    run_batch, simulation_json, SimulationRequest, SimulationRequestType, SimulationResponse,
    SimulationResponseType, TrialView,
};
