//! Power-law current(speed) curve: `I(n) = Ia * (ns / (ns - n))^k`.
//!
//! `I(0) = Ia` by construction; `k` follows in closed form from `I(n_N) = I_N`.

use asm_machine::MachineState;
use tracing::debug;

use crate::error::{CurveError, CurveResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentCurve {
    sync_speed_rpm: f64,
    starting_current_a: f64,
    exponent: f64,
}

impl CurrentCurve {
    /// Line current of the whole machine.
    pub fn total(state: &MachineState) -> CurveResult<Self> {
        Self::fit(
            state.synchronous_speed().speed_rpm,
            state.starting_current_a(),
            state.speed_rpm,
            state.nominal_current_a(),
        )
    }

    /// Current in a single parallel branch of one stator phase.
    ///
    /// Pinned to the branch nominal current, with the starting current scaled
    /// by the same starting-current ratio as the machine.
    pub fn branch(state: &MachineState) -> CurveResult<Self> {
        let branch_nominal = state.branch_values().current_a;
        Self::fit(
            state.synchronous_speed().speed_rpm,
            branch_nominal * state.starting_current_pct / 100.0,
            state.speed_rpm,
            branch_nominal,
        )
    }

    /// Solve for the exponent `k = ln(I_N/Ia) / ln(ns/(ns - n_N))`.
    ///
    /// # Errors
    /// [`CurveError::DegenerateCurrentFit`] when the nominal speed is not
    /// below synchronous speed or a current is not positive.
    pub fn fit(
        sync_speed_rpm: f64,
        starting_current_a: f64,
        nominal_speed_rpm: f64,
        nominal_current_a: f64,
    ) -> CurveResult<Self> {
        if !(starting_current_a > 0.0 && nominal_current_a > 0.0) {
            return Err(CurveError::DegenerateCurrentFit {
                what: "starting and nominal current must be positive",
            });
        }
        if !(nominal_speed_rpm < sync_speed_rpm && nominal_speed_rpm > 0.0) {
            return Err(CurveError::DegenerateCurrentFit {
                what: "nominal speed must lie strictly between 0 and synchronous speed",
            });
        }

        let speed_ratio = sync_speed_rpm / (sync_speed_rpm - nominal_speed_rpm);
        let exponent = (nominal_current_a / starting_current_a).ln() / speed_ratio.ln();
        if !exponent.is_finite() {
            return Err(CurveError::DegenerateCurrentFit {
                what: "exponent is not finite",
            });
        }

        debug!(sync_speed_rpm, exponent, "current curve fitted");

        Ok(Self {
            sync_speed_rpm,
            starting_current_a,
            exponent,
        })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Current at `speed_rpm` (A). Only defined below synchronous speed.
    pub fn current_a(&self, speed_rpm: f64) -> f64 {
        self.starting_current_a
            * (self.sync_speed_rpm / (self.sync_speed_rpm - speed_rpm)).powf(self.exponent)
    }
}
