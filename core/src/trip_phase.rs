//! Trip generator — synthetic autonomous-vehicle movement records.
//!
//! Batch size is drawn from the intensity profile; each trip picks a
//! vehicle and an independent zone pair (same-zone hops are legitimate
//! short local trips). Duration comes from the planar distance between
//! the zone anchors and a sampled urban speed, floored so degenerate
//! near-zero durations never persist.
//!
//! Execution: second phase of every step.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    phase::StepPhase,
    rng::PhaseRng,
    store::{SimStore, TripRow},
    types::Step,
    zones,
};

/// Kilometres per degree of latitude (planar approximation, fine at
/// city scale).
const KM_PER_DEGREE: f64 = 111.0;

pub struct TripGenerator {
    config: SimConfig,
}

impl TripGenerator {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Planar-distance duration in minutes, floored.
    fn duration_minutes(&self, origin: &str, destination: &str, rng: &mut PhaseRng) -> i64 {
        let (lat1, lon1) = zones::anchor_of(origin);
        let (lat2, lon2) = zones::anchor_of(destination);
        let dist_km = ((lat2 - lat1).powi(2) + (lon2 - lon1).powi(2)).sqrt() * KM_PER_DEGREE;

        let (lo, hi) = self.config.speed_range_kmh;
        let speed_kmh = rng.uniform(lo, hi);

        let minutes = (dist_km / speed_kmh * 60.0) as i64;
        minutes.max(self.config.min_trip_minutes)
    }
}

impl StepPhase for TripGenerator {
    fn name(&self) -> &'static str {
        "trips"
    }

    fn run(
        &mut self,
        run_id: &str,
        step: Step,
        store: &SimStore,
        rng: &mut PhaseRng,
    ) -> SimResult<Vec<SimEvent>> {
        let vehicles = store.list_vehicles()?;
        if vehicles.is_empty() {
            // Empty fleet is a no-op phase, not an error.
            return Ok(vec![]);
        }

        let batch = if rng.chance(self.config.profile.trip_probability) {
            let (lo, hi) = self.config.profile.trip_batch;
            rng.next_in(lo as u64, hi as u64)
        } else {
            0
        };

        let zone_table = zones::zones();
        let mut events = Vec::new();
        for i in 0..batch {
            let vehicle = rng.pick(&vehicles);
            let origin = rng.pick(zone_table).name.to_string();
            let destination = rng.pick(zone_table).name.to_string();

            let duration_min = self.duration_minutes(&origin, &destination, rng);
            let (co2_lo, co2_hi) = self.config.trip_co2_range_kg;
            let co2_saved_kg = rng.uniform(co2_lo, co2_hi);

            // Ids carry the run id: the step counter restarts at 0 every
            // session, and a reopened database already holds earlier runs.
            let trip = TripRow {
                trip_id: format!("trip-{run_id}-{step}-{i:03}"),
                vehicle_id: vehicle.vehicle_id.clone(),
                origin_zone: origin.clone(),
                destination_zone: destination.clone(),
                duration_min,
                co2_saved_kg,
                step,
            };
            if let Err(e) = store.create_trip(&trip) {
                log::warn!("trip insert failed for {}: {e}", trip.trip_id);
                continue;
            }

            events.push(SimEvent::TripCreated {
                step,
                trip_id: trip.trip_id,
                vehicle_id: trip.vehicle_id,
                plate: vehicle.plate.clone(),
                origin_zone: origin,
                destination_zone: destination,
                duration_min,
                co2_saved_kg,
            });
        }
        Ok(events)
    }
}
