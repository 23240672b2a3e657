//! city-runner: headless runner for the city-state simulation engine.
//!
//! Usage:
//!   city-runner --seed 12345 --db city.db --seed-data --steps 10
//!   city-runner --seed 12345 --db city.db --seed-data --serve-port 9000
//!
//! `--passive` swaps the on-demand intensity profile for the
//! low-frequency background tick (small flip probability, at most one
//! trip per step).
//!
//! Batch mode runs N steps and prints one summary JSON per line.
//! Serve mode accepts line-JSON commands on a TCP socket:
//!   {"type":"step"}  -> run one step, advance the session clock
//!   {"type":"state"} -> current step + derived vehicle positions
//!   {"type":"quit"}
//!
//! The runner owns the session clock: it is reset to 0 at startup and
//! advanced exactly once per successful step. Vehicle positions are
//! computed at response time from (plate, step) and never stored.

use anyhow::Result;
use smartcity_core::{
    clock::SessionClock,
    config::{IntensityProfile, SimConfig},
    engine::StepEngine,
    placement,
    seed::seed_city,
    store::SimStore,
    types::Step,
};
use std::env;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TriggerCommand {
    Step,
    State,
    Quit,
}

#[derive(serde::Serialize)]
struct TriggerResponse {
    status: String,
    log: String,
}

#[derive(serde::Serialize)]
struct VehicleMarker {
    plate: String,
    lat: f64,
    lon: f64,
}

#[derive(serde::Serialize)]
struct StateResponse {
    status: String,
    step: Step,
    vehicles: Vec<VehicleMarker>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let steps = parse_arg(&args, "--steps", 0u64);
    let db = parse_arg(&args, "--db", ":memory:".to_string());
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned());
    let seed_data = args.iter().any(|a| a == "--seed-data");
    let passive = args.iter().any(|a| a == "--passive");
    let serve_port = args
        .iter()
        .position(|a| a == "--serve-port")
        .and_then(|i| args.get(i + 1))
        .and_then(|p| p.parse::<u16>().ok());

    let mut config = match config_path {
        Some(path) => SimConfig::load(&path)?,
        None => SimConfig::default(),
    };
    if passive {
        config.profile = IntensityProfile::passive();
    }

    let store = if db == ":memory:" {
        SimStore::in_memory()?
    } else {
        SimStore::open(&db)?
    };
    store.migrate()?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;

    if seed_data || store.sensor_count()? == 0 {
        let summary = seed_city(&store, &config, seed)?;
        log::info!(
            "seeded {} sensors / {} vehicles / {} citizens",
            summary.sensors,
            summary.vehicles,
            summary.citizens
        );
    }

    let mut engine = StepEngine::build(run_id, seed, config, store);
    let mut clock = SessionClock::new();

    if let Some(port) = serve_port {
        return serve(&mut engine, &mut clock, port);
    }

    for _ in 0..steps {
        let summary = engine.run_step(clock.current_step)?;
        clock.advance();
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

/// Single-operator trigger loop. Concurrent triggers are out of scope:
/// one connection at a time, commands handled strictly in order.
fn serve(engine: &mut StepEngine, clock: &mut SessionClock, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    log::info!("listening on 127.0.0.1:{port}");

    for stream in listener.incoming() {
        let stream = stream?;
        let mut writer = stream.try_clone()?;
        let reader = BufReader::new(stream);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let command: TriggerCommand = match serde_json::from_str(&line) {
                Ok(c) => c,
                Err(e) => {
                    respond(&mut writer, &TriggerResponse {
                        status: "error".into(),
                        log: format!("bad command: {e}"),
                    })?;
                    continue;
                }
            };

            match command {
                TriggerCommand::Step => match engine.run_step(clock.current_step) {
                    Ok(summary) => {
                        clock.advance();
                        respond(&mut writer, &TriggerResponse {
                            status: "ok".into(),
                            log: summary.log,
                        })?;
                    }
                    // Failed steps do not advance the clock; the caller
                    // re-triggers.
                    Err(e) => respond(&mut writer, &TriggerResponse {
                        status: "error".into(),
                        log: e.to_string(),
                    })?,
                },
                TriggerCommand::State => {
                    let vehicles = engine
                        .store()
                        .list_vehicles()?
                        .into_iter()
                        .map(|v| {
                            let (lat, lon) =
                                placement::vehicle_position(&v.plate, clock.current_step);
                            VehicleMarker {
                                plate: v.plate,
                                lat,
                                lon,
                            }
                        })
                        .collect();
                    respond(&mut writer, &StateResponse {
                        status: "ok".into(),
                        step: clock.current_step,
                        vehicles,
                    })?;
                }
                TriggerCommand::Quit => return Ok(()),
            }
        }
    }
    Ok(())
}

fn respond<T: serde::Serialize>(writer: &mut impl Write, response: &T) -> Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes())?;
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Clone>(args: &[String], flag: &str, default: T) -> T {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
