//! Simulation configuration.
//!
//! All stochastic-model constants live here, table-driven, so the
//! per-zone volatility policy and the intensity profile are testable in
//! isolation instead of being scattered through phase code.

use crate::types::SensorStatus;
use serde::{Deserialize, Serialize};

/// How hard one step mutates the world.
///
/// The on-demand profile models an operator pressing the trigger; the
/// passive profile models a low-frequency background tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityProfile {
    /// Per-sensor probability that a step re-draws its status.
    pub flip_probability: f64,
    /// Probability that the step generates a trip batch at all.
    pub trip_probability: f64,
    /// Inclusive batch size range when a batch is generated.
    pub trip_batch: (u32, u32),
    /// Per-failed-sensor probability of dispatching a corrective
    /// intervention.
    pub dispatch_probability: f64,
}

impl IntensityProfile {
    pub fn on_demand() -> Self {
        Self {
            flip_probability: 0.20,
            trip_probability: 1.0,
            trip_batch: (10, 25),
            dispatch_probability: 0.40,
        }
    }

    pub fn passive() -> Self {
        Self {
            flip_probability: 0.02,
            trip_probability: 0.20,
            trip_batch: (1, 1),
            dispatch_probability: 0.40,
        }
    }
}

/// A three-way status weight table, in the fixed order of
/// [`SensorStatus::ALL`]. Weights need not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusWeights(pub [f64; 3]);

impl StatusWeights {
    /// Pair each weight with its status for weighted drawing.
    pub fn table(&self) -> [(SensorStatus, f64); 3] {
        [
            (SensorStatus::Active, self.0[0]),
            (SensorStatus::Maintenance, self.0[1]),
            (SensorStatus::OutOfService, self.0[2]),
        ]
    }
}

/// Initial world size used by seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProfile {
    pub sensors: u32,
    pub vehicles: u32,
    pub citizens: u32,
}

impl Default for SeedProfile {
    fn default() -> Self {
        Self {
            sensors: 120,
            vehicles: 20,
            citizens: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub profile: IntensityProfile,
    /// Status weights for the volatile urban-core zone.
    pub volatile_weights: StatusWeights,
    /// Status weights for peripheral zones.
    pub peripheral_weights: StatusWeights,
    /// Urban vehicle speed range in km/h, sampled per trip.
    pub speed_range_kmh: (f64, f64),
    /// Floor on trip duration, minutes.
    pub min_trip_minutes: i64,
    /// CO2 saved per trip, kg, independent of duration.
    pub trip_co2_range_kg: (f64, f64),
    /// Corrective intervention duration range, minutes.
    pub intervention_minutes: (i64, i64),
    /// Corrective intervention cost range, TND.
    pub intervention_cost: (f64, f64),
    /// Corrective intervention CO2 impact range, kg.
    pub intervention_co2_kg: (f64, f64),
    pub seed_profile: SeedProfile,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            profile: IntensityProfile::on_demand(),
            volatile_weights: StatusWeights([60.0, 25.0, 15.0]),
            peripheral_weights: StatusWeights([80.0, 15.0, 5.0]),
            speed_range_kmh: (20.0, 60.0),
            min_trip_minutes: 5,
            trip_co2_range_kg: (0.5, 5.0),
            intervention_minutes: (30, 120),
            intervention_cost: (100.0, 300.0),
            intervention_co2_kg: (1.0, 10.0),
            seed_profile: SeedProfile::default(),
        }
    }
}

impl SimConfig {
    /// Load a JSON override file. Missing file is an error; callers that
    /// want defaults use `SimConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
