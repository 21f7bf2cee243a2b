//! Winding temperature-rise tracking.
//!
//! The rise is tracked under two scaling assumptions at once: proportional to
//! the current (`Linear`) and proportional to the current squared
//! (`Quadratic`). Both start from the nameplate rise and drift apart as
//! corrections are applied. Every correction is a single function applied
//! uniformly to both trackers, parameterized only by the model exponent.

use crate::error::{MachineError, MachineResult};

/// Highest altitude covered by the altitude correction (m).
pub const MAX_CORRECTED_ALTITUDE_M: f64 = 4000.0;

/// Reference altitude below which no correction applies (m).
pub const REFERENCE_ALTITUDE_M: f64 = 1000.0;

/// Scaling assumption for a temperature-rise tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiseModel {
    /// ΔT ∝ I
    Linear,
    /// ΔT ∝ I²
    Quadratic,
}

impl RiseModel {
    pub fn exponent(self) -> i32 {
        match self {
            RiseModel::Linear => 1,
            RiseModel::Quadratic => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RiseModel::Linear => "dT_linear",
            RiseModel::Quadratic => "dT_quadratic",
        }
    }
}

/// Which ambient correction won for a tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmbientMethod {
    /// `ΔT + (T_new - T_old)`
    Additive,
    /// `ΔT * (1 + (T_new - T_old)/100)`
    Factor(f64),
}

/// A single temperature-rise value under one scaling assumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRise {
    pub model: RiseModel,
    /// Temperature rise (K)
    pub kelvin: f64,
}

impl TemperatureRise {
    pub fn new(model: RiseModel, kelvin: f64) -> Self {
        Self { model, kelvin }
    }

    /// Scale for a change of current: `ΔT * (I_new/I_old)^exponent`.
    pub fn scale_by_current(&mut self, current_ratio: f64) {
        self.kelvin *= current_ratio.powi(self.model.exponent());
    }

    /// Keep the larger of the additive and multiplicative ambient corrections.
    pub fn correct_ambient(&mut self, delta_c: f64) -> AmbientMethod {
        let additive = self.kelvin + delta_c;
        let factor = 1.0 + delta_c / 100.0;
        let multiplied = self.kelvin * factor;
        if additive > multiplied {
            self.kelvin = additive;
            AmbientMethod::Additive
        } else {
            self.kelvin = multiplied;
            AmbientMethod::Factor(factor)
        }
    }

    pub fn divide(&mut self, divisor: f64) {
        self.kelvin /= divisor;
    }
}

/// Both temperature-rise trackers of a machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalState {
    pub linear: TemperatureRise,
    pub quadratic: TemperatureRise,
}

impl ThermalState {
    /// Both trackers start from the same nameplate value.
    pub fn from_nameplate(temperature_rise_k: f64) -> Self {
        Self {
            linear: TemperatureRise::new(RiseModel::Linear, temperature_rise_k),
            quadratic: TemperatureRise::new(RiseModel::Quadratic, temperature_rise_k),
        }
    }

    pub fn trackers(&self) -> [&TemperatureRise; 2] {
        [&self.linear, &self.quadratic]
    }

    pub fn trackers_mut(&mut self) -> [&mut TemperatureRise; 2] {
        [&mut self.linear, &mut self.quadratic]
    }
}

/// Divisor of the altitude correction (IEC 60034-1 style).
#[derive(Debug, Clone, PartialEq)]
pub struct AltitudeCorrection {
    pub divisor: f64,
    /// Divisor written out for the audit trail
    pub formula: String,
}

/// Piecewise altitude correction of the temperature rise.
///
/// - tested ≤1000 m, operated >1000 m: `ΔT / (1 - (H_new - 1000)/10000)`
/// - tested ≤1000 m, operated ≤1000 m: none
/// - tested >1000 m, operated <1000 m: `ΔT / (1 + (H_old - 1000)/10000)`
/// - tested >1000 m, operated ≥1000 m: `ΔT / (1 + (H_old - H_new)/10000)`
///
/// Returns `Ok(None)` when no correction applies.
///
/// # Errors
/// Altitudes above 4000 m or below 0 m are rejected with
/// [`MachineError::AltitudeOutOfRange`].
pub fn altitude_correction(old_m: f64, new_m: f64) -> MachineResult<Option<AltitudeCorrection>> {
    for altitude_m in [old_m, new_m] {
        if !altitude_m.is_finite() || !(0.0..=MAX_CORRECTED_ALTITUDE_M).contains(&altitude_m) {
            return Err(MachineError::AltitudeOutOfRange { altitude_m });
        }
    }

    let correction = if old_m <= REFERENCE_ALTITUDE_M {
        if new_m > REFERENCE_ALTITUDE_M {
            Some(AltitudeCorrection {
                divisor: 1.0 - (new_m - REFERENCE_ALTITUDE_M) / 10_000.0,
                formula: format!("( 1 - ( {} m - 1000 m ) / 10000 m )", new_m.round()),
            })
        } else {
            None
        }
    } else if new_m < REFERENCE_ALTITUDE_M {
        Some(AltitudeCorrection {
            divisor: 1.0 + (old_m - REFERENCE_ALTITUDE_M) / 10_000.0,
            formula: format!("( 1 + ( {} m - 1000 m ) / 10000 m )", old_m.round()),
        })
    } else {
        Some(AltitudeCorrection {
            divisor: 1.0 + (old_m - new_m) / 10_000.0,
            formula: format!(
                "( 1 + ( {} m - {} m ) / 10000 m )",
                old_m.round(),
                new_m.round()
            ),
        })
    };

    Ok(correction)
}
