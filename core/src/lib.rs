//! City-state simulation engine for the Sousse smart-city platform.
//!
//! The engine advances a fixed world of sensors, vehicles, and citizens
//! through discrete, externally triggered steps: status transitions,
//! synthetic trips, and auto-remediation of failed sensors. Vehicle map
//! positions are never persisted — they are a pure function of
//! (plate, step), see [`placement`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod phase;
pub mod placement;
pub mod remediation_phase;
pub mod rng;
pub mod seed;
pub mod status_phase;
pub mod store;
pub mod trip_phase;
pub mod types;
pub mod zones;
