//! Deterministic world seeding — the initial Sousse data set.
//!
//! Same master seed, same world: sensors near their zone anchors,
//! a vehicle fleet with unique Tunisian plates, and a citizen roster
//! from curated name lists. All generation flows through the seeding
//! phase RNG; nothing here touches a platform RNG.

use crate::{
    config::SimConfig,
    error::SimResult,
    rng::{PhaseRng, PhaseSlot, RngBank},
    store::{CitizenRow, SensorRow, SimStore, VehicleRow},
    types::{SensorKind, SensorStatus},
    zones,
};

/// Initial sensor coordinates stay within ±0.004° of the zone anchor
/// (~450 m) — tighter than the vehicle placement bound, always on land.
const SENSOR_OFFSET_DEG: f64 = 0.004;

/// Initial status distribution at install time (active-heavy; the
/// status model takes over from step 1).
const INITIAL_STATUS_WEIGHTS: [(SensorStatus, f64); 3] = [
    (SensorStatus::Active, 80.0),
    (SensorStatus::Maintenance, 15.0),
    (SensorStatus::OutOfService, 5.0),
];

const FIRST_NAMES: &[&str] = &[
    "Mohamed", "Ahmed", "Youssef", "Aziz", "Amine", "Omar", "Karim", "Sami", "Nizar", "Walid",
    "Fatma", "Myriam", "Amel", "Sarra", "Yasmine", "Hela", "Nour", "Rym", "Leila", "Safa",
];

const LAST_NAMES: &[&str] = &[
    "Trabelsi", "Gharbi", "Ben Ali", "Hammamy", "Jaziri", "Mabrouk", "Zarrouk", "Driss",
    "Ben Amor", "Sassi", "Bouazizi", "Khemiri", "Mejri", "Chahed", "Ghanem", "Rezgui",
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.fr", "topnet.tn", "gnet.tn"];

const MOBILITY_PREFERENCES: &[&str] = &[
    "velo",
    "marche",
    "transports_en_commun",
    "vehicule_electrique",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    pub sensors: u32,
    pub vehicles: u32,
    pub citizens: u32,
}

/// Populate an empty database with the initial world.
pub fn seed_city(store: &SimStore, config: &SimConfig, master_seed: u64) -> SimResult<SeedSummary> {
    let bank = RngBank::new(master_seed);
    let mut rng = bank.for_phase(PhaseSlot::Seeding, 0);

    let profile = &config.seed_profile;
    seed_sensors(store, profile.sensors, &mut rng)?;
    seed_vehicles(store, profile.vehicles, &mut rng)?;
    seed_citizens(store, profile.citizens, &mut rng)?;

    log::info!(
        "seeded world: {} sensors, {} vehicles, {} citizens",
        profile.sensors,
        profile.vehicles,
        profile.citizens
    );
    Ok(SeedSummary {
        sensors: profile.sensors,
        vehicles: profile.vehicles,
        citizens: profile.citizens,
    })
}

fn seed_sensors(store: &SimStore, count: u32, rng: &mut PhaseRng) -> SimResult<()> {
    let zone_table = zones::zones();
    for i in 0..count {
        let zone = rng.pick(zone_table);
        let latitude = zone.anchor.0 + rng.uniform(-SENSOR_OFFSET_DEG, SENSOR_OFFSET_DEG);
        let longitude = zone.anchor.1 + rng.uniform(-SENSOR_OFFSET_DEG, SENSOR_OFFSET_DEG);
        let kind = *rng.pick(&SensorKind::ALL);
        let status = *rng.pick_weighted(&INITIAL_STATUS_WEIGHTS);

        store.insert_sensor(&SensorRow {
            sensor_id: format!("sensor-{i:03}"),
            kind,
            zone: zone.name.to_string(),
            status,
            latitude,
            longitude,
        })?;
    }
    Ok(())
}

/// Tunisian plate format: "NNN TU serial", regional code 240..=259.
fn seed_vehicles(store: &SimStore, count: u32, rng: &mut PhaseRng) -> SimResult<()> {
    let mut used_plates = std::collections::HashSet::new();
    let mut created = 0u32;
    while created < count {
        let region = rng.next_in(240, 259);
        let serial = rng.next_in(1, 9999);
        let plate = format!("{region} TU {serial}");
        if !used_plates.insert(plate.clone()) {
            continue;
        }

        store.insert_vehicle(&VehicleRow {
            vehicle_id: format!("vehicle-{created:02}"),
            plate,
        })?;
        created += 1;
    }
    Ok(())
}

fn seed_citizens(store: &SimStore, count: u32, rng: &mut PhaseRng) -> SimResult<()> {
    for i in 0..count {
        let first = *rng.pick(FIRST_NAMES);
        let last = *rng.pick(LAST_NAMES);
        let name = format!("{first} {last}");
        // Index suffix keeps emails unique across duplicate names.
        let email = format!(
            "{}.{}.{i}@{}",
            first.to_lowercase(),
            last.to_lowercase().replace(' ', "."),
            rng.pick(EMAIL_DOMAINS)
        );

        store.insert_citizen(&CitizenRow {
            citizen_id: format!("citizen-{i:03}"),
            name,
            email,
            eco_score: rng.next_in(0, 100) as i64,
            mobility_preference: rng.pick(MOBILITY_PREFERENCES).to_string(),
        })?;
    }
    Ok(())
}
