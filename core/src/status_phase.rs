//! Status transition model — per-sensor stochastic status changes.
//!
//! For each sensor independently: with the profile's flip probability,
//! draw a fresh status from the zone's weight table. If the draw equals
//! the current status the sensor is untouched — no write, no event.
//!
//! This is deliberately memoryless: the draw does not condition on the
//! current status beyond the no-op collapse. It models heterogeneous
//! infrastructure load per zone, not a Markov chain over lifecycles.
//!
//! Execution: first phase of every step.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    phase::StepPhase,
    rng::PhaseRng,
    store::SimStore,
    types::Step,
    zones,
};

pub struct StatusModel {
    config: SimConfig,
}

impl StatusModel {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl StepPhase for StatusModel {
    fn name(&self) -> &'static str {
        "status"
    }

    fn run(
        &mut self,
        _run_id: &str,
        step: Step,
        store: &SimStore,
        rng: &mut PhaseRng,
    ) -> SimResult<Vec<SimEvent>> {
        let sensors = store.list_sensors()?;
        let volatile_table = self.config.volatile_weights.table();
        let peripheral_table = self.config.peripheral_weights.table();

        let mut events = Vec::new();
        for sensor in &sensors {
            if !rng.chance(self.config.profile.flip_probability) {
                continue;
            }

            let table = if zones::is_volatile(&sensor.zone) {
                &volatile_table
            } else {
                &peripheral_table
            };
            let drawn = *rng.pick_weighted(table);
            if drawn == sensor.status {
                continue;
            }

            // A failed row write only affects this sensor; the scan
            // continues (accepted failure granularity).
            if let Err(e) = store.update_sensor_status(&sensor.sensor_id, drawn) {
                log::warn!("status update failed for {}: {e}", sensor.sensor_id);
                continue;
            }

            events.push(SimEvent::SensorStatusChanged {
                step,
                sensor_id: sensor.sensor_id.clone(),
                zone: sensor.zone.clone(),
                from: sensor.status,
                to: drawn,
            });
        }
        Ok(events)
    }
}
