//! End-to-end: configure, run, change group size, restart.

use std::ops::ControlFlow;

use bday_core::{
    shared_birthday_probability, simulation_json, SimConfig, SimulationDriver,
    StatisticsSnapshot,
};

fn fast_config(group_size: u32, seed: u64, max_trials: u64) -> SimConfig {
    SimConfig {
        group_size,
        interval_ms: Some(1),
        seed: Some(seed),
        max_trials: Some(max_trials),
        ..SimConfig::default()
    }
}

#[test]
fn run_change_size_and_rerun() {
    let mut driver = SimulationDriver::new(fast_config(23, 17, 40)).unwrap();
    let handle = driver.handle();

    let mut points = Vec::new();
    let summary = driver.run(|report| {
        points.push(report.point.map(|p| p.success_rate));
        ControlFlow::Continue(())
    });

    assert_eq!(summary.ticks, 40);
    assert_eq!(handle.snapshot(), summary.snapshot);
    assert_eq!(driver.history().len(), 40);
    assert!(points.iter().all(Option::is_some));

    let latest = handle.latest_trial().expect("a trial was published");
    assert_eq!(latest.individuals().len(), 23);
    for pair in latest.collision_pairs() {
        assert_ne!(pair.first, pair.second);
        assert_eq!(
            latest.individuals()[pair.first].birthday,
            latest.individuals()[pair.second].birthday
        );
    }

    driver.set_group_size(50).unwrap();
    assert_eq!(handle.snapshot(), StatisticsSnapshot::empty(50));

    let summary = driver.run(|_| ControlFlow::Continue(()));
    assert_eq!(summary.snapshot.group_size, 50);
    assert_eq!(summary.snapshot.trial_count, 40);
    assert_eq!(summary.theoretical, shared_birthday_probability(50));
}

#[test]
fn json_probability_matches_library() {
    let response = simulation_json(
        r#"{"schema_version":1,"request_type":{"type":"Probability","group_size":2}}"#,
    );
    let v: serde_json::Value = serde_json::from_str(&response).unwrap();
    let p = v["response_type"]["probability"].as_f64().unwrap();
    assert!((p - shared_birthday_probability(2)).abs() < 1e-15);
    assert_eq!(v["response_type"]["pairs"], 1);
}
