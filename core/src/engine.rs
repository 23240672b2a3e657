//! The step controller — the heart of the city-state simulation.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Status transition model
//!   2. Trip generator
//!   3. Auto-remediation policy
//!
//! RULES:
//!   - Phases execute in registration order, every step.
//!   - All randomness flows through the RngBank, keyed by (phase, step).
//!   - All state changes are recorded in the event log.
//!   - The engine never advances the session clock; the caller owns the
//!     step counter and increments it only after a successful step.
//!
//! A step is atomic from the caller's point of view: either all three
//! phases run and a summary is returned, or the call fails. Individual
//! per-row writes commit independently (see store.rs), so a mid-scan
//! failure only affects rows not yet reached.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    phase::StepPhase,
    remediation_phase::RemediationPolicy,
    rng::{PhaseSlot, RngBank},
    status_phase::StatusModel,
    store::SimStore,
    trip_phase::TripGenerator,
    types::{RunId, Step},
};
use serde::{Deserialize, Serialize};

/// What one step did, for the trigger caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSummary {
    pub step: Step,
    pub status_changes: u64,
    pub trips_created: u64,
    pub interventions_dispatched: u64,
    /// Human-readable line log, one line per mutation.
    pub log: String,
}

pub struct StepEngine {
    pub run_id: RunId,
    rng_bank: RngBank,
    phases: Vec<(PhaseSlot, Box<dyn StepPhase>)>,
    store: SimStore,
}

impl StepEngine {
    pub fn new(run_id: RunId, seed: u64, store: SimStore) -> Self {
        Self {
            run_id,
            rng_bank: RngBank::new(seed),
            phases: Vec::new(),
            store,
        }
    }

    /// Build a fully wired engine with all phases registered in the
    /// documented execution order. Call this instead of new() + manual
    /// register() calls.
    pub fn build(run_id: RunId, seed: u64, config: SimConfig, store: SimStore) -> Self {
        let mut engine = StepEngine::new(run_id, seed, store);
        engine.register(PhaseSlot::Status, Box::new(StatusModel::new(config.clone())));
        engine.register(PhaseSlot::Trips, Box::new(TripGenerator::new(config.clone())));
        engine.register(
            PhaseSlot::Remediation,
            Box::new(RemediationPolicy::new(config)),
        );
        engine
    }

    /// Register a phase. Call in the documented execution order.
    pub fn register(&mut self, slot: PhaseSlot, phase: Box<dyn StepPhase>) {
        self.phases.push((slot, phase));
    }

    /// The storage collaborator. Read-only access for callers and tests.
    pub fn store(&self) -> &SimStore {
        &self.store
    }

    /// Consume the engine and hand the store back, so a caller can start
    /// a new session (fresh run id, clock reset to 0) over the same
    /// database.
    pub fn into_store(self) -> SimStore {
        self.store
    }

    /// Execute one step at the given step counter value.
    ///
    /// The caller passes its session clock's current value and advances
    /// the clock only when this returns Ok.
    pub fn run_step(&mut self, step: Step) -> SimResult<StepSummary> {
        self.persist_event("engine", step, &SimEvent::StepStarted { step })?;

        let mut events: Vec<SimEvent> = Vec::new();
        for (slot, phase) in &mut self.phases {
            let mut rng = self.rng_bank.for_phase(*slot, step);
            let new_events = phase.run(&self.run_id, step, &self.store, &mut rng)?;

            for event in &new_events {
                let entry = EventLogEntry {
                    id: None,
                    run_id: self.run_id.clone(),
                    step,
                    phase: phase.name().to_string(),
                    event_type: event.type_name().to_string(),
                    payload: serde_json::to_string(event)?,
                };
                self.store.append_event(&entry)?;
            }
            events.extend(new_events);
        }

        let summary = summarize(step, &events);
        self.persist_event(
            "engine",
            step,
            &SimEvent::StepCompleted {
                step,
                status_changes: summary.status_changes,
                trips_created: summary.trips_created,
                interventions_dispatched: summary.interventions_dispatched,
            },
        )?;
        log::info!(
            "step {step}: {} status changes, {} trips, {} interventions",
            summary.status_changes,
            summary.trips_created,
            summary.interventions_dispatched
        );
        Ok(summary)
    }

    fn persist_event(&self, phase: &str, step: Step, event: &SimEvent) -> SimResult<()> {
        let entry = EventLogEntry {
            id: None,
            run_id: self.run_id.clone(),
            step,
            phase: phase.to_string(),
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
        };
        self.store.append_event(&entry)
    }
}

fn summarize(step: Step, events: &[SimEvent]) -> StepSummary {
    let mut summary = StepSummary {
        step,
        status_changes: 0,
        trips_created: 0,
        interventions_dispatched: 0,
        log: String::new(),
    };
    for event in events {
        match event {
            SimEvent::SensorStatusChanged { .. } => summary.status_changes += 1,
            SimEvent::TripCreated { .. } => summary.trips_created += 1,
            SimEvent::InterventionDispatched { .. } => summary.interventions_dispatched += 1,
            _ => {}
        }
        if let Some(line) = event.log_line() {
            summary.log.push_str(&line);
            summary.log.push('\n');
        }
    }
    summary
}
