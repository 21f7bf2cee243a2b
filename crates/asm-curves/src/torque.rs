//! Kloss-type torque(speed) curve.
//!
//! ```text
//! M(n) = 2 Mk / ( a/(ns - n) + (ns - n)/a ),   a = ns * s_k
//! ```
//!
//! `s_k` is the slip at maximum torque. Forcing `M(0.1 rpm) = Ma` gives
//! `u + 1/u = 2 Mk / Ma` with `u = a / (ns - 0.1)`, a quadratic in `u` whose
//! two roots are reciprocal. Only the smaller slip below 1 describes motoring.

use asm_machine::MachineState;
use tracing::debug;

use crate::error::{CurveError, CurveResult};

/// Speed at which the curve is pinned to the starting torque (rpm).
pub const STARTING_SPEED_RPM: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueCurve {
    sync_speed_rpm: f64,
    max_torque_nm: f64,
    slip_at_max_torque: f64,
}

impl TorqueCurve {
    /// Fit the curve of a machine state.
    pub fn for_state(state: &MachineState) -> CurveResult<Self> {
        Self::fit(
            state.synchronous_speed().speed_rpm,
            state.starting_torque_nm(),
            state.max_torque_nm(),
        )
    }

    /// Solve for the slip at maximum torque.
    ///
    /// # Errors
    /// [`CurveError::NoValidSlipSolution`] when the starting torque exceeds
    /// the maximum torque (no real root) or no root has `0 < s_k < 1`.
    pub fn fit(sync_speed_rpm: f64, starting_torque_nm: f64, max_torque_nm: f64) -> CurveResult<Self> {
        let no_solution = || CurveError::NoValidSlipSolution {
            starting_torque_nm,
            max_torque_nm,
        };

        let inputs_valid = [sync_speed_rpm, starting_torque_nm, max_torque_nm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
            && sync_speed_rpm > STARTING_SPEED_RPM;
        if !inputs_valid {
            return Err(no_solution());
        }

        let c = 2.0 * max_torque_nm / starting_torque_nm;
        let discriminant = c * c - 4.0;
        if discriminant < 0.0 {
            return Err(no_solution());
        }
        let root = discriminant.sqrt();
        let pinned_gap = sync_speed_rpm - STARTING_SPEED_RPM;

        let slip_at_max_torque = [(c - root) / 2.0, (c + root) / 2.0]
            .into_iter()
            .map(|u| u * pinned_gap / sync_speed_rpm)
            .filter(|s| *s > 0.0 && *s < 1.0)
            .min_by(f64::total_cmp)
            .ok_or_else(no_solution)?;

        debug!(sync_speed_rpm, slip_at_max_torque, "torque curve fitted");

        Ok(Self {
            sync_speed_rpm,
            max_torque_nm,
            slip_at_max_torque,
        })
    }

    pub fn slip_at_max_torque(&self) -> f64 {
        self.slip_at_max_torque
    }

    /// Speed at which the maximum torque is reached (rpm).
    pub fn speed_at_max_torque_rpm(&self) -> f64 {
        self.sync_speed_rpm * (1.0 - self.slip_at_max_torque)
    }

    /// Torque at `speed_rpm` (N·m). Zero at synchronous speed.
    pub fn torque_nm(&self, speed_rpm: f64) -> f64 {
        let a = self.sync_speed_rpm * self.slip_at_max_torque;
        let gap = self.sync_speed_rpm - speed_rpm;
        if gap == 0.0 {
            return 0.0;
        }
        2.0 * self.max_torque_nm / (a / gap + gap / a)
    }
}
