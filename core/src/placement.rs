//! Deterministic vehicle placement.
//!
//! Vehicles have no persisted coordinate. Their map position is a pure
//! function of (stable identity key, step counter): the presentation
//! layer may re-render any number of times within one step and sees the
//! same position each time, yet a different one after the step advances.
//!
//! The hash must be stable across processes and restarts, so this uses
//! xxh64 (keyed by the step) rather than the std hasher, whose output is
//! unspecified across releases.

use crate::types::Step;
use crate::zones::{self, Zone};
use xxhash_rust::xxh64::xxh64;

/// Maximum offset from a zone anchor, in degrees (~650 m).
pub const MAX_OFFSET_DEG: f64 = 0.006;

/// Derive a reproducible coordinate near a zone anchor for an entity.
///
/// Zone selection and the two offsets come from disjoint bit ranges of a
/// single xxh64 hash seeded with the step. Empty keys hash like any
/// other string — this never fails.
pub fn vehicle_position(entity_key: &str, step: Step) -> (f64, f64) {
    let hash = xxh64(entity_key.as_bytes(), step);

    let zone_table = zones::zones();
    let zone: &Zone = &zone_table[(hash % zone_table.len() as u64) as usize];

    let lat_offset = offset_from_bits(hash >> 8);
    let lon_offset = offset_from_bits(hash >> 36);

    (zone.anchor.0 + lat_offset, zone.anchor.1 + lon_offset)
}

/// Map the low 20 bits of `bits` onto [-MAX_OFFSET_DEG, +MAX_OFFSET_DEG].
fn offset_from_bits(bits: u64) -> f64 {
    const MASK: u64 = (1 << 20) - 1;
    let unit = (bits & MASK) as f64 / MASK as f64; // [0, 1]
    (unit * 2.0 - 1.0) * MAX_OFFSET_DEG
}
