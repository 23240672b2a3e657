//! Configuration override-file tests.

use smartcity_core::config::SimConfig;
use std::path::PathBuf;

fn temp_config_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("smartcity-config-{tag}-{}.json", std::process::id()))
}

#[test]
fn override_file_round_trips() {
    let mut config = SimConfig::default();
    config.profile.flip_probability = 0.5;
    config.profile.trip_batch = (2, 7);
    config.seed_profile.sensors = 12;

    let path = temp_config_path("roundtrip");
    std::fs::write(&path, serde_json::to_string_pretty(&config).expect("serialize"))
        .expect("write config");

    let loaded = SimConfig::load(path.to_str().expect("utf-8 temp path")).expect("load config");
    assert_eq!(loaded.profile.flip_probability, 0.5);
    assert_eq!(loaded.profile.trip_batch, (2, 7));
    assert_eq!(loaded.seed_profile.sensors, 12);
    assert_eq!(loaded.min_trip_minutes, config.min_trip_minutes);

    let _ = std::fs::remove_file(path);
}

#[test]
fn malformed_override_file_is_an_error() {
    let path = temp_config_path("malformed");
    std::fs::write(&path, "{ not json").expect("write config");

    assert!(SimConfig::load(path.to_str().expect("utf-8 temp path")).is_err());
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_override_file_is_an_error() {
    let path = temp_config_path("missing-never-written");
    assert!(SimConfig::load(path.to_str().expect("utf-8 temp path")).is_err());
}
