//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulation step. One step = one externally triggered advance of
/// simulated time.
pub type Step = u64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Sensor kinds deployed across the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    AirQuality,
    Traffic,
    Energy,
    Waste,
    Lighting,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::AirQuality,
        SensorKind::Traffic,
        SensorKind::Energy,
        SensorKind::Waste,
        SensorKind::Lighting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirQuality => "air_quality",
            Self::Traffic => "traffic",
            Self::Energy => "energy",
            Self::Waste => "waste",
            Self::Lighting => "lighting",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

/// Operational status of a sensor. The only sensor field the engine
/// ever mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Active,
    Maintenance,
    OutOfService,
}

impl SensorStatus {
    pub const ALL: [SensorStatus; 3] = [
        SensorStatus::Active,
        SensorStatus::Maintenance,
        SensorStatus::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::OutOfService => "out_of_service",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|st| st.as_str() == s)
    }
}

/// Kind of maintenance intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    Predictive,
    Corrective,
    Curative,
}

impl InterventionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predictive => "predictive",
            Self::Corrective => "corrective",
            Self::Curative => "curative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [Self::Predictive, Self::Corrective, Self::Curative]
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
    }
}
