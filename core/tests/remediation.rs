//! Auto-remediation tests: certain-dispatch behavior, staged recovery,
//! and dispatch gating.

use smartcity_core::{
    config::SimConfig,
    engine::StepEngine,
    store::{SensorRow, SimStore},
    types::{InterventionKind, SensorKind, SensorStatus},
};

fn store_with_sensors(sensors: &[(&str, &str, SensorStatus)]) -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .insert_run("rem-test", 13, "0.1.0-test")
        .expect("insert run");
    for (sensor_id, zone, status) in sensors {
        store
            .insert_sensor(&SensorRow {
                sensor_id: sensor_id.to_string(),
                kind: SensorKind::Energy,
                zone: zone.to_string(),
                status: *status,
                latitude: 35.82,
                longitude: 10.60,
            })
            .expect("insert sensor");
    }
    store
}

fn remediation_only_config(dispatch_probability: f64) -> SimConfig {
    let mut config = SimConfig::default();
    config.profile.flip_probability = 0.0;
    config.profile.trip_probability = 0.0;
    config.profile.dispatch_probability = dispatch_probability;
    config
}

/// One failed sensor, dispatch probability pinned to 1.0: exactly one
/// corrective intervention referencing that sensor, and the sensor ends
/// the step in maintenance.
#[test]
fn certain_dispatch_creates_one_corrective_intervention() {
    let store = store_with_sensors(&[
        ("sensor-000", "Medina", SensorStatus::OutOfService),
        ("sensor-001", "Sahloul", SensorStatus::Active),
        ("sensor-002", "Khezama", SensorStatus::Active),
    ]);
    let mut engine =
        StepEngine::build("rem-test".into(), 13, remediation_only_config(1.0), store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.interventions_dispatched, 1);
    let interventions = engine
        .store()
        .interventions_for_sensor("sensor-000")
        .expect("interventions");
    assert_eq!(interventions.len(), 1);
    assert_eq!(interventions[0].kind, InterventionKind::Corrective);
    assert!((30..=120).contains(&interventions[0].duration_min));
    assert!((100.0..=300.0).contains(&interventions[0].cost));
    assert_eq!(
        engine.store().sensor_status("sensor-000").unwrap(),
        SensorStatus::Maintenance
    );
}

/// Remediation is staged: a failed sensor moves to maintenance, never
/// straight back to active, no matter how many fail at once.
#[test]
fn failed_sensors_never_return_directly_to_active() {
    let ids = ["sensor-000", "sensor-001", "sensor-002", "sensor-003"];
    let sensors: Vec<(&str, &str, SensorStatus)> = ids
        .iter()
        .map(|id| (*id, "Cite Riadh", SensorStatus::OutOfService))
        .collect();
    let store = store_with_sensors(&sensors);

    let mut engine =
        StepEngine::build("rem-test".into(), 13, remediation_only_config(1.0), store);
    engine.run_step(0).expect("step");

    for id in ids {
        assert_eq!(
            engine.store().sensor_status(id).unwrap(),
            SensorStatus::Maintenance,
            "{id} skipped the maintenance stage"
        );
    }
}

#[test]
fn zero_dispatch_probability_leaves_failures_alone() {
    let store = store_with_sensors(&[("sensor-000", "Medina", SensorStatus::OutOfService)]);
    let mut engine =
        StepEngine::build("rem-test".into(), 13, remediation_only_config(0.0), store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.interventions_dispatched, 0);
    assert_eq!(engine.store().intervention_count().unwrap(), 0);
    assert_eq!(
        engine.store().sensor_status("sensor-000").unwrap(),
        SensorStatus::OutOfService
    );
}

/// Healthy and already-maintained sensors are never candidates.
#[test]
fn only_out_of_service_sensors_are_scanned() {
    let store = store_with_sensors(&[
        ("sensor-000", "Medina", SensorStatus::Active),
        ("sensor-001", "Sahloul", SensorStatus::Maintenance),
    ]);
    let mut engine =
        StepEngine::build("rem-test".into(), 13, remediation_only_config(1.0), store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.interventions_dispatched, 0);
    assert_eq!(engine.store().intervention_count().unwrap(), 0);
}
