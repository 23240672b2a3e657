//! Phase trait and registry.
//!
//! RULE: Every step phase implements StepPhase.
//! The engine calls run() on each registered phase in registration
//! order, once per step. Execution order is fixed and documented in
//! engine.rs.

use crate::{error::SimResult, event::SimEvent, rng::PhaseRng, store::SimStore, types::Step};

/// The contract every phase must fulfill.
pub trait StepPhase: Send {
    /// Unique stable name for this phase.
    fn name(&self) -> &'static str;

    /// Called once per step by the engine.
    ///
    /// - `run_id`: the current run; rows minted by a phase scope their
    ///   ids by it, since step counters restart at 0 every session
    /// - `step`:   the current step counter value
    /// - `store`:  the storage collaborator (sole owner of persisted rows)
    /// - `rng`:    this phase's deterministic RNG for this step
    ///
    /// Returns the events describing every mutation the phase made.
    fn run(
        &mut self,
        run_id: &str,
        step: Step,
        store: &SimStore,
        rng: &mut PhaseRng,
    ) -> SimResult<Vec<SimEvent>>;
}
