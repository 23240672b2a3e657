//! Session clock — the caller-owned step counter.
//!
//! The engine never advances this. The presentation/runner layer owns
//! it, resets it to 0 at session start, and increments it exactly once
//! per successful trigger. It has no persisted form.

use crate::types::Step;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClock {
    pub current_step: Step,
}

impl SessionClock {
    pub fn new() -> Self {
        Self { current_step: 0 }
    }

    /// Advance one step. Call only after a step ran successfully.
    /// Returns the new step number.
    pub fn advance(&mut self) -> Step {
        self.current_step += 1;
        self.current_step
    }
}
