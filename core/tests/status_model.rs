//! Status transition model tests: flip gating, no-op collapse, and the
//! per-zone volatility tables.

use smartcity_core::{
    config::{SimConfig, StatusWeights},
    engine::StepEngine,
    store::{SensorRow, SimStore},
    types::{SensorKind, SensorStatus},
};

fn store_with_sensors(sensors: &[(&str, &str, SensorStatus)]) -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .insert_run("status-test", 7, "0.1.0-test")
        .expect("insert run");
    for (sensor_id, zone, status) in sensors {
        store
            .insert_sensor(&SensorRow {
                sensor_id: sensor_id.to_string(),
                kind: SensorKind::Traffic,
                zone: zone.to_string(),
                status: *status,
                latitude: 35.83,
                longitude: 10.61,
            })
            .expect("insert sensor");
    }
    store
}

#[test]
fn zero_flip_probability_changes_nothing() {
    let store = store_with_sensors(&[
        ("sensor-000", "Medina", SensorStatus::Active),
        ("sensor-001", "Sahloul", SensorStatus::Maintenance),
    ]);
    let mut config = SimConfig::default();
    config.profile.flip_probability = 0.0;
    config.profile.trip_probability = 0.0;
    config.profile.dispatch_probability = 0.0;

    let mut engine = StepEngine::build("status-test".into(), 7, config, store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.status_changes, 0);
    assert_eq!(
        engine.store().sensor_status("sensor-000").unwrap(),
        SensorStatus::Active
    );
    assert_eq!(
        engine.store().sensor_status("sensor-001").unwrap(),
        SensorStatus::Maintenance
    );
}

/// Drawing the current status is a no-op: no write, no event. With the
/// weight tables pinned to Active and every sensor already Active, a
/// certain flip must still record zero changes.
#[test]
fn redraw_of_current_status_is_not_a_change() {
    let store = store_with_sensors(&[
        ("sensor-000", "Medina", SensorStatus::Active),
        ("sensor-001", "Sahloul", SensorStatus::Active),
        ("sensor-002", "Khezama", SensorStatus::Active),
    ]);
    let mut config = SimConfig::default();
    config.profile.flip_probability = 1.0;
    config.profile.trip_probability = 0.0;
    config.profile.dispatch_probability = 0.0;
    config.volatile_weights = StatusWeights([1.0, 0.0, 0.0]);
    config.peripheral_weights = StatusWeights([1.0, 0.0, 0.0]);

    let mut engine = StepEngine::build("status-test".into(), 7, config, store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.status_changes, 0, "no-op draws must not be logged");
    let events = engine
        .store()
        .events_for_step("status-test", 0)
        .expect("events");
    assert!(
        events
            .iter()
            .all(|e| e.event_type != "sensor_status_changed"),
        "no sensor_status_changed event may be persisted for a no-op draw"
    );
}

/// The urban core uses its own weight table. With the volatile table
/// forced to out_of_service and the peripheral table forced to active,
/// only the Medina sensor may fail.
#[test]
fn volatile_zone_uses_its_own_weight_table() {
    let store = store_with_sensors(&[
        ("sensor-000", "Medina", SensorStatus::Active),
        ("sensor-001", "Sahloul", SensorStatus::Active),
    ]);
    let mut config = SimConfig::default();
    config.profile.flip_probability = 1.0;
    config.profile.trip_probability = 0.0;
    config.profile.dispatch_probability = 0.0; // keep remediation out of the way
    config.volatile_weights = StatusWeights([0.0, 0.0, 1.0]);
    config.peripheral_weights = StatusWeights([1.0, 0.0, 0.0]);

    let mut engine = StepEngine::build("status-test".into(), 7, config, store);
    let summary = engine.run_step(0).expect("step");

    assert_eq!(summary.status_changes, 1);
    assert_eq!(
        engine.store().sensor_status("sensor-000").unwrap(),
        SensorStatus::OutOfService
    );
    assert_eq!(
        engine.store().sensor_status("sensor-001").unwrap(),
        SensorStatus::Active
    );
}

/// Empty sensor set: the phase is a zero-count no-op, not an error.
#[test]
fn empty_sensor_set_is_a_no_op() {
    let store = store_with_sensors(&[]);
    let mut config = SimConfig::default();
    config.profile.trip_probability = 0.0;

    let mut engine = StepEngine::build("status-test".into(), 7, config, store);
    let summary = engine.run_step(0).expect("step");
    assert_eq!(summary.status_changes, 0);
    assert_eq!(summary.interventions_dispatched, 0);
}
