//! Frame-time accumulator driving fixed simulation ticks

use super::state::EncounterState;
use super::tick::{TickInput, TickReport, tick};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame deltas into a whole number of fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStepper {
    /// Seconds per tick
    pub step: f64,
    pub max_substeps: u32,
    accumulator: f64,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStepper {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            max_substeps: MAX_SUBSTEPS,
            accumulator: 0.0,
        }
    }

    /// Unconsumed time carried into the next frame
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Run as many ticks as `frame_dt` allows.
    ///
    /// One-shot triggers in `input` are cleared after the first tick that
    /// consumes them, so a press is never applied twice.
    pub fn advance(
        &mut self,
        state: &mut EncounterState,
        input: &mut TickInput,
        frame_dt: f64,
    ) -> TickReport {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut report = TickReport {
            score: state.score,
            ..Default::default()
        };
        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            report.merge(tick(state, input, self.step));
            self.accumulator -= self.step;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.clear_triggers();
        }

        // Too far behind: drop the backlog instead of spiralling
        if substeps == self.max_substeps && self.accumulator >= self.step {
            log::warn!(
                "Dropping {:.3}s of simulation backlog",
                self.accumulator - self.step
            );
            self.accumulator = self.accumulator.min(self.step);
        }

        report
    }
}
