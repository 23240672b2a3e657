//! Two engines, same seed, same steps: byte-identical event logs.
//! Any divergence means a platform RNG or iteration-order leak crept in.

use smartcity_core::{
    config::SimConfig,
    engine::StepEngine,
    seed::seed_city,
    store::SimStore,
};

const STEPS: u64 = 5;

fn build_engine(run_id: &str, seed: u64) -> StepEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_run(run_id, seed, "0.1.0-test").expect("insert run");
    let config = SimConfig::default();
    seed_city(&store, &config, seed).expect("seed world");
    StepEngine::build(run_id.to_string(), seed, config, store)
}

fn collect_event_log(engine: &StepEngine, run_id: &str) -> Vec<String> {
    (0..STEPS)
        .flat_map(|step| {
            engine
                .store()
                .events_for_step(run_id, step)
                .expect("read events")
                .into_iter()
                .map(|e| e.payload)
        })
        .collect()
}

#[test]
fn same_seed_produces_identical_event_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let run_id = format!("det-test-{SEED}");

    let mut engine_a = build_engine(&run_id, SEED);
    let mut engine_b = build_engine(&run_id, SEED);

    for step in 0..STEPS {
        engine_a.run_step(step).expect("engine_a step");
        engine_b.run_step(step).expect("engine_b step");
    }

    let log_a = collect_event_log(&engine_a, &run_id);
    let log_b = collect_event_log(&engine_b, &run_id);

    assert_eq!(
        log_a.len(),
        log_b.len(),
        "Event log lengths differ: {} vs {}",
        log_a.len(),
        log_b.len()
    );
    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Event log diverged at entry {i}:\n  A: {a}\n  B: {b}");
    }
}

/// Different seeds should not replay the same world.
#[test]
fn different_seeds_diverge() {
    let mut engine_a = build_engine("det-a", 1);
    let mut engine_b = build_engine("det-b", 2);

    for step in 0..STEPS {
        engine_a.run_step(step).expect("engine_a step");
        engine_b.run_step(step).expect("engine_b step");
    }

    let log_a = collect_event_log(&engine_a, "det-a");
    let log_b = collect_event_log(&engine_b, "det-b");
    assert_ne!(log_a, log_b, "distinct seeds replayed identical histories");
}

/// Re-running a step with the same counter replays the same draws: the
/// phase RNG is keyed by (seed, phase, step), not by call count.
#[test]
fn step_rng_is_keyed_by_step_not_call_count() {
    const SEED: u64 = 0xFEED_0001;
    let mut engine_a = build_engine("det-key-a", SEED);
    let mut engine_b = build_engine("det-key-b", SEED);

    let first = engine_a.run_step(4).expect("step");
    // engine_b runs other steps first, then the same counter value.
    engine_b.run_step(0).expect("step");
    engine_b.run_step(1).expect("step");
    let second = engine_b.run_step(4).expect("step");

    // Trip draws depend only on (seed, step) and the fleet, which no
    // phase mutates — identical counter, identical batch.
    assert_eq!(first.trips_created, second.trips_created);
}
