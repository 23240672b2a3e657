//! Auto-remediation policy — closes the failure loop.
//!
//! Scans sensors that are out_of_service and, with the configured
//! dispatch probability, creates a corrective intervention and moves the
//! sensor to maintenance. Remediation is staged: a failed sensor never
//! jumps straight back to active — the return to active happens through
//! the ordinary status model on a later step
//! (active -> out_of_service -> maintenance -> active).
//!
//! Execution: last phase of every step, strictly after the status model,
//! so sensors that failed this step are eligible for same-step dispatch.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    phase::StepPhase,
    rng::PhaseRng,
    store::{InterventionRow, SimStore},
    types::{InterventionKind, SensorStatus, Step},
};

pub struct RemediationPolicy {
    config: SimConfig,
}

impl RemediationPolicy {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl StepPhase for RemediationPolicy {
    fn name(&self) -> &'static str {
        "remediation"
    }

    fn run(
        &mut self,
        run_id: &str,
        step: Step,
        store: &SimStore,
        rng: &mut PhaseRng,
    ) -> SimResult<Vec<SimEvent>> {
        let sensors = store.list_sensors()?;

        let mut events = Vec::new();
        let mut dispatched = 0u32;
        for sensor in sensors
            .iter()
            .filter(|s| s.status == SensorStatus::OutOfService)
        {
            if !rng.chance(self.config.profile.dispatch_probability) {
                continue;
            }

            let (min_lo, min_hi) = self.config.intervention_minutes;
            let (cost_lo, cost_hi) = self.config.intervention_cost;
            let (co2_lo, co2_hi) = self.config.intervention_co2_kg;

            // Run-scoped id: step counters restart at 0 every session.
            let intervention = InterventionRow {
                intervention_id: format!("int-{run_id}-{step}-{dispatched:03}"),
                sensor_id: sensor.sensor_id.clone(),
                kind: InterventionKind::Corrective,
                duration_min: rng.next_in(min_lo as u64, min_hi as u64) as i64,
                cost: rng.uniform(cost_lo, cost_hi),
                co2_impact_kg: rng.uniform(co2_lo, co2_hi),
                step,
            };

            if let Err(e) = store.create_intervention(&intervention) {
                log::warn!(
                    "intervention insert failed for {}: {e}",
                    sensor.sensor_id
                );
                continue;
            }
            // The id counter advances once the row exists, even if the
            // status write below fails — ids stay unique.
            dispatched += 1;
            if let Err(e) = store.update_sensor_status(&sensor.sensor_id, SensorStatus::Maintenance)
            {
                log::warn!(
                    "remediation status update failed for {}: {e}",
                    sensor.sensor_id
                );
                continue;
            }

            events.push(SimEvent::InterventionDispatched {
                step,
                intervention_id: intervention.intervention_id,
                sensor_id: sensor.sensor_id.clone(),
                kind: intervention.kind,
                duration_min: intervention.duration_min,
                cost: intervention.cost,
                co2_impact_kg: intervention.co2_impact_kg,
            });
        }
        Ok(events)
    }
}
