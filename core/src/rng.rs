//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through PhaseRng instances derived from the
//! single master seed stored on the Run record.
//!
//! Each phase gets its own RNG stream per step, seeded deterministically
//! from (master_seed, phase slot, step). This means:
//!   - Adding a new phase never changes existing phases' streams.
//!   - Any single (phase, step) draw sequence is reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// 64-bit fractional golden-ratio constant, spreads phase slots across
/// the seed space.
const SLOT_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
/// Second mixing constant (xxh64 prime) so the step stream is
/// independent of the slot stream.
const STEP_MIX: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// A named, deterministic RNG for a single phase of a single step.
pub struct PhaseRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl PhaseRng {
    /// Create a phase RNG from the master seed, a stable phase slot, and
    /// the step number. Slots must never change once assigned.
    pub fn new(master_seed: u64, slot: u64, step: u64) -> Self {
        let derived = master_seed
            ^ slot.wrapping_mul(SLOT_MIX)
            ^ step.wrapping_mul(STEP_MIX);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a u64 in [lo, hi] inclusive.
    pub fn next_in(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(lo <= hi, "empty range");
        lo + self.next_u64_below(hi - lo + 1)
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick an entry from a weighted table. Weights need not sum to 1.
    /// The table must be non-empty; order is significant for determinism.
    pub fn pick_weighted<'a, T>(&mut self, table: &'a [(T, f64)]) -> &'a T {
        assert!(!table.is_empty(), "weighted table must be non-empty");
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (item, weight) in table {
            cumulative += weight;
            if roll < cumulative {
                return item;
            }
        }
        // Float rounding on the final bucket.
        &table[table.len() - 1].0
    }

    /// Pick an element uniformly from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// All phase RNGs for a single run, derived from a stable master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_phase(&self, slot: PhaseSlot, step: u64) -> PhaseRng {
        PhaseRng::new(self.master_seed, slot as u64, step).with_name(slot.name())
    }
}

/// Stable phase slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every phase's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum PhaseSlot {
    Status = 0,
    Trips = 1,
    Remediation = 2,
    Seeding = 3,
    // Add new phases here — append only.
}

impl PhaseSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Trips => "trips",
            Self::Remediation => "remediation",
            Self::Seeding => "seeding",
        }
    }
}
