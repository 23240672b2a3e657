//! Static zone registry for the Sousse region.
//!
//! Zones anchor both static sensor placement (at seeding time) and
//! dynamic vehicle placement (at render time). Anchors are inland
//! reference points — offsets bounded by the placement module keep every
//! derived coordinate on land.

/// A named district with a reference coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub name: &'static str,
    pub anchor: (f64, f64), // (lat, lon)
}

/// The fixed district table, in registry order. Order is significant:
/// deterministic placement indexes into this slice.
const ZONES: &[Zone] = &[
    Zone { name: "Medina",        anchor: (35.8245, 10.6345) },
    Zone { name: "Sahloul",       anchor: (35.8360, 10.5900) },
    Zone { name: "Khezama",       anchor: (35.8450, 10.6200) },
    Zone { name: "Kalaa Sghira",  anchor: (35.8180, 10.5500) },
    Zone { name: "Hammam Sousse", anchor: (35.8550, 10.6050) },
    Zone { name: "Cite Riadh",    anchor: (35.8050, 10.6100) },
];

/// Fallback for unrecognized zone names.
pub const DEFAULT_ZONE: &str = "Medina";

/// The urban core carries older, heavier-loaded infrastructure and uses
/// a more failure-prone status weight table.
pub const VOLATILE_ZONE: &str = "Medina";

/// The full zone table, fixed order, loaded once.
pub fn zones() -> &'static [Zone] {
    ZONES
}

/// Look up a zone's anchor coordinate. Unrecognized names fall back to
/// the default zone — this never fails.
pub fn anchor_of(name: &str) -> (f64, f64) {
    ZONES
        .iter()
        .find(|z| z.name == name)
        .or_else(|| ZONES.iter().find(|z| z.name == DEFAULT_ZONE))
        .expect("default zone is always present")
        .anchor
}

/// Whether a zone uses the volatile status weight table.
pub fn is_volatile(name: &str) -> bool {
    name == VOLATILE_ZONE
}
