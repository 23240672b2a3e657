//! The event log — every state change a step makes, as data.
//!
//! RULE: Phases communicate with the outside world ONLY through events.
//! The engine persists each event to the event_log table and folds them
//! into the step summary; nothing downstream re-reads phase internals.

use crate::types::{EntityId, InterventionKind, RunId, SensorStatus, Step};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are appended over time — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    StepStarted {
        step: Step,
    },
    SensorStatusChanged {
        step: Step,
        sensor_id: EntityId,
        zone: String,
        from: SensorStatus,
        to: SensorStatus,
    },
    TripCreated {
        step: Step,
        trip_id: EntityId,
        vehicle_id: EntityId,
        plate: String,
        origin_zone: String,
        destination_zone: String,
        duration_min: i64,
        co2_saved_kg: f64,
    },
    InterventionDispatched {
        step: Step,
        intervention_id: EntityId,
        sensor_id: EntityId,
        kind: InterventionKind,
        duration_min: i64,
        cost: f64,
        co2_impact_kg: f64,
    },
    StepCompleted {
        step: Step,
        status_changes: u64,
        trips_created: u64,
        interventions_dispatched: u64,
    },
}

impl SimEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::StepStarted { .. } => "step_started",
            Self::SensorStatusChanged { .. } => "sensor_status_changed",
            Self::TripCreated { .. } => "trip_created",
            Self::InterventionDispatched { .. } => "intervention_dispatched",
            Self::StepCompleted { .. } => "step_completed",
        }
    }

    /// One human-readable line for the step log, or None for the
    /// engine's own bracketing events.
    pub fn log_line(&self) -> Option<String> {
        match self {
            Self::SensorStatusChanged {
                sensor_id, zone, to, ..
            } => Some(format!("[sensor] {sensor_id} ({zone}) changed to {}", to.as_str())),
            Self::TripCreated {
                plate,
                origin_zone,
                destination_zone,
                duration_min,
                ..
            } => Some(format!(
                "[trip] {plate} {origin_zone} -> {destination_zone} ({duration_min} min)"
            )),
            Self::InterventionDispatched {
                sensor_id,
                kind,
                duration_min,
                cost,
                ..
            } => Some(format!(
                "[intervention] {} dispatched for {sensor_id} ({duration_min} min, {cost:.2} TND)",
                kind.as_str()
            )),
            Self::StepStarted { .. } | Self::StepCompleted { .. } => None,
        }
    }
}

/// A persisted event_log row.
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub step: Step,
    pub phase: String,
    pub event_type: String,
    pub payload: String,
}
