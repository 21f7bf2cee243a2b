//! All curves of one machine state.

use asm_core::{Tolerances, nearly_equal};
use asm_machine::MachineState;

use crate::current::CurrentCurve;
use crate::error::CurveResult;
use crate::sampling::{CurveSample, SpeedGrid};
use crate::torque::TorqueCurve;

/// Nominal values percentages are expressed against.
///
/// Curves of the initial and the operating machine are plotted on one
/// axis, so both use the initial machine as the base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentBase {
    pub torque_nm: f64,
    pub current_a: f64,
    pub branch_current_a: f64,
}

impl PercentBase {
    pub fn from_state(state: &MachineState) -> Self {
        Self {
            torque_nm: state.nominal_torque_nm(),
            current_a: state.nominal_current_a(),
            branch_current_a: state.branch_values().current_a,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MachineCurves {
    pub label: String,
    pub torque: TorqueCurve,
    pub current: CurrentCurve,
    pub branch_current: CurrentCurve,
    sync_speed_rpm: f64,
    nominal_speed_rpm: f64,
    nominal_torque_nm: f64,
    nominal_current_a: f64,
    branch_nominal_current_a: f64,
}

impl MachineCurves {
    /// Fit torque, total current and branch current for `state`.
    ///
    /// # Errors
    /// Any failing fit aborts the curves of this state only.
    pub fn fit(state: &MachineState) -> CurveResult<Self> {
        Ok(Self {
            label: state.label.clone(),
            torque: TorqueCurve::for_state(state)?,
            current: CurrentCurve::total(state)?,
            branch_current: CurrentCurve::branch(state)?,
            sync_speed_rpm: state.synchronous_speed().speed_rpm,
            nominal_speed_rpm: state.speed_rpm,
            nominal_torque_nm: state.nominal_torque_nm(),
            nominal_current_a: state.nominal_current_a(),
            branch_nominal_current_a: state.branch_values().current_a,
        })
    }

    pub fn sync_speed_rpm(&self) -> f64 {
        self.sync_speed_rpm
    }

    /// Whether the branch current differs from the line current, i.e. whether
    /// the branch curve is worth plotting.
    pub fn has_distinct_branch_curve(&self) -> bool {
        !nearly_equal(
            self.nominal_current_a,
            self.branch_nominal_current_a,
            Tolerances::default(),
        )
    }

    /// Default grid for this machine.
    pub fn grid(&self) -> SpeedGrid {
        SpeedGrid::for_sync_speed(self.sync_speed_rpm)
    }

    pub fn evaluate(&self, speed_rpm: f64, base: &PercentBase) -> CurveSample {
        let torque_nm = self.torque.torque_nm(speed_rpm);
        let current_a = self.current.current_a(speed_rpm);
        let branch_current_a = self.branch_current.current_a(speed_rpm);
        CurveSample {
            speed_rpm,
            torque_nm,
            torque_pct: torque_nm / base.torque_nm * 100.0,
            current_a,
            current_pct: current_a / base.current_a * 100.0,
            branch_current_a,
            branch_current_pct: branch_current_a / base.branch_current_a * 100.0,
        }
    }

    pub fn sample(&self, grid: &SpeedGrid, base: &PercentBase) -> Vec<CurveSample> {
        grid.points()
            .into_iter()
            .map(|speed| self.evaluate(speed, base))
            .collect()
    }

    /// The nominal operating point as a plot marker.
    pub fn nominal_point(&self, base: &PercentBase) -> CurveSample {
        CurveSample {
            speed_rpm: self.nominal_speed_rpm,
            torque_nm: self.nominal_torque_nm,
            torque_pct: self.nominal_torque_nm / base.torque_nm * 100.0,
            current_a: self.nominal_current_a,
            current_pct: self.nominal_current_a / base.current_a * 100.0,
            branch_current_a: self.branch_nominal_current_a,
            branch_current_pct: self.branch_nominal_current_a / base.branch_current_a * 100.0,
        }
    }
}
