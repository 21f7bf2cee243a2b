//! Re-rating rules.
//!
//! Each rule reads the current state, mutates it in place and returns an
//! audit fragment describing inputs, formula and result. A target equal to
//! the current value (whole-number comparison for continuous quantities,
//! exact for connection and branch count) returns an empty fragment and
//! leaves the state untouched.

use asm_core::{SQRT_3, same_rounded};
use tracing::debug;

use crate::connection::{Connection, RotorReconnection};
use crate::error::{MachineError, MachineResult};
use crate::rotor::rotor_current;
use crate::state::{MachineState, nominal_current};
use crate::thermal::{AmbientMethod, altitude_correction};

fn ensure_target_positive(value: f64, what: &'static str) -> MachineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MachineError::NonPhysical { what })
    }
}

impl MachineState {
    /// Reconnect the stator winding.
    ///
    /// D → Y multiplies the voltage by √3 and divides the current by √3;
    /// Y → D does the inverse.
    pub fn change_connection(&mut self, target: Connection) -> MachineResult<String> {
        if target == self.connection {
            return Ok(String::new());
        }

        let current_old = self.nominal_current_a();
        let voltage_old = self.voltage_v;
        let from = self.connection;

        let (voltage_op, current_op) = match target {
            Connection::Star => {
                self.voltage_v = voltage_old * SQRT_3;
                ("*", "/")
            }
            Connection::Delta => {
                self.voltage_v = voltage_old / SQRT_3;
                ("/", "*")
            }
        };
        self.connection = target;
        self.recompute_derived();

        debug!(
            from = from.code(),
            to = target.code(),
            voltage_v = self.voltage_v,
            current_a = self.nominal_current_a(),
            "stator reconnected"
        );

        Ok(format!(
            "\n\nConnection {from} --> {target}:\n   \
             In_new = {current_old:.1} A {current_op} sqrt{{3}} = {:.1} A\n   \
             Un_new = {voltage_old:.0} V {voltage_op} sqrt{{3}} = {:.0} V",
            self.nominal_current_a(),
            self.voltage_v,
        ))
    }

    /// Regroup the stator into a different number of parallel branches.
    ///
    /// Voltage scales by `old/new`, current by `new/old`.
    pub fn change_parallel_branches(&mut self, target: u32) -> MachineResult<String> {
        if target == 0 {
            return Err(MachineError::NonPhysical {
                what: "parallel branch count must be at least 1",
            });
        }
        if target == self.parallel_branches {
            return Ok(String::new());
        }

        let old = self.parallel_branches;
        let voltage_old = self.voltage_v;
        let current_old = self.nominal_current_a();

        self.voltage_v = voltage_old * (f64::from(old) / f64::from(target));
        self.parallel_branches = target;
        self.recompute_derived();

        debug!(old, new = target, voltage_v = self.voltage_v, "parallel branches changed");

        Ok(format!(
            "\n\nChange Number of Parallel Branches on the Stator: {old} --> {target} : \n   \
             Un = {voltage_old:.0} V * ( {old} / {target} ) = {:.0} V \n   \
             In = {current_old:.1} A * ( {target} / {old} ) = {:.1} A",
            self.voltage_v,
            self.nominal_current_a(),
        ))
    }

    /// Correct both temperature rises for a different ambient temperature,
    /// keeping the more conservative of the additive and factor methods.
    pub fn change_ambient_temperature(&mut self, target_c: f64) -> MachineResult<String> {
        if !target_c.is_finite() {
            return Err(MachineError::NonPhysical {
                what: "ambient temperature must be finite",
            });
        }
        if same_rounded(target_c, self.ambient_temp_c) {
            return Ok(String::new());
        }

        let old_c = self.ambient_temp_c;
        let delta_c = target_c - old_c;
        self.ambient_temp_c = target_c;

        let mut text = format!(
            "\n\nDifferent ambient temperature: {old_c:.0} °C --> {target_c:.0} °C"
        );
        for tracker in self.thermal.trackers_mut() {
            let before = tracker.kelvin;
            let line = match tracker.correct_ambient(delta_c) {
                AmbientMethod::Additive => format!(
                    "{before:.1} K + ( {target_c} °C - {old_c} °C ) = {:.1} K",
                    tracker.kelvin
                ),
                AmbientMethod::Factor(factor) => {
                    format!("{before:.1} K * {factor} = {:.1} K", tracker.kelvin)
                }
            };
            text.push_str(&format!("\n   {} = {line}", tracker.model.name()));
        }

        debug!(
            old_c,
            new_c = target_c,
            linear_k = self.thermal.linear.kelvin,
            quadratic_k = self.thermal.quadratic.kelvin,
            "ambient temperature corrected"
        );

        Ok(text)
    }

    /// Change frequency and voltage by the same factor (constant U/f, constant flux).
    ///
    /// Power, speed and voltage scale with `f_new/f_old`; currents, torques
    /// and efficiency are unchanged.
    pub fn change_frequency(&mut self, target_hz: f64) -> MachineResult<String> {
        ensure_target_positive(target_hz, "frequency must be positive")?;
        if same_rounded(target_hz, self.frequency_hz) {
            return Ok(String::new());
        }

        let freq_old = self.frequency_hz;
        let power_old = self.power_kw;
        let voltage_old = self.voltage_v;
        let speed_old = self.speed_rpm;
        let factor = target_hz / freq_old;

        self.power_kw = factor * power_old;
        self.speed_rpm = factor * speed_old;
        self.voltage_v = factor * voltage_old;
        self.frequency_hz = target_hz;
        self.recompute_derived();

        debug!(factor, power_kw = self.power_kw, speed_rpm = self.speed_rpm, "U/f rescaled");

        Ok(format!(
            "\n\nDifferent Frequency & Voltage with const. U/f: \n\
             {freq_old:.0} Hz, {voltage_old:.0} V --> {:.0} Hz, {:.0} V: \n   \
             factor = {:.0} Hz / {freq_old:.0} Hz = {factor:.2} \n   \
             Pn_new = {factor:.2} * {power_old:.0} kW = {:.0} kW\n   \
             n_new = {factor:.2} * {speed_old:.0} RPM = {:.0} RPM",
            self.frequency_hz, self.voltage_v, self.frequency_hz, self.power_kw, self.speed_rpm,
        ))
    }

    /// Change the supply voltage at constant power and frequency.
    ///
    /// Starting and maximum torque ratios scale with `(U_new/U_old)²`, the
    /// absolute starting current with `U_new/U_old`; the nominal current
    /// follows from power, cos φ, efficiency and the new voltage.
    pub fn change_voltage(&mut self, target_v: f64) -> MachineResult<String> {
        ensure_target_positive(target_v, "voltage must be positive")?;
        if same_rounded(target_v, self.voltage_v) {
            return Ok(String::new());
        }

        let voltage_old = self.voltage_v;
        let current_old = self.nominal_current_a();
        let starting_current_old = self.starting_current_a();
        let starting_torque_pct_old = self.starting_torque_pct;
        let max_torque_pct_old = self.max_torque_pct;
        let factor = target_v / voltage_old;

        self.voltage_v = target_v;
        self.starting_torque_pct = factor.powi(2) * starting_torque_pct_old;
        self.max_torque_pct = factor.powi(2) * max_torque_pct_old;

        let current_new = nominal_current(
            self.power_kw,
            self.power_factor,
            self.efficiency_pct,
            self.voltage_v,
        );
        let starting_current_new = factor * starting_current_old;
        self.starting_current_pct = starting_current_new / current_new * 100.0;
        self.recompute_derived();

        let thermal_text = self.scale_temperature_rise(current_old, self.nominal_current_a());

        debug!(
            voltage_old,
            voltage_new = target_v,
            current_a = self.nominal_current_a(),
            "supply voltage changed"
        );

        Ok(format!(
            "\n\nDifferent Voltage: {voltage_old:.0} V --> {target_v:.0} V \n   \
             In_new = {:.0} kW * 1000 / ( sqrt{{3}} * {:.2} * {:.4} * {target_v:.0} V ) = {:.1} A \n   \
             Ia_abs_new = {target_v:.0} V / {voltage_old:.0} V * {starting_current_old:.0} A = {:.0} A \n   \
             Ia_new = {:.0} A / {:.2} A = {:.0} % \n   \
             Ma_new = ( {target_v:.0} V / {voltage_old:.0} V )^2 * {starting_torque_pct_old:.0} % = {:.0} % \n   \
             Mk_new = ( {target_v:.0} V / {voltage_old:.0} V )^2 * {max_torque_pct_old:.0} % = {:.0} % \n\
             {thermal_text}",
            self.power_kw,
            self.power_factor,
            self.efficiency_pct / 100.0,
            self.nominal_current_a(),
            self.starting_current_a(),
            self.starting_current_a(),
            self.nominal_current_a(),
            self.starting_current_pct,
            self.starting_torque_pct,
            self.max_torque_pct,
        ))
    }

    /// Scale both temperature rises for a change of nominal current:
    /// linear with `I_new/I_old`, quadratic with `(I_new/I_old)²`.
    pub fn scale_temperature_rise(&mut self, current_old_a: f64, current_new_a: f64) -> String {
        let ratio = current_new_a / current_old_a;
        let mut lines = Vec::with_capacity(2);
        for tracker in self.thermal.trackers_mut() {
            let before = tracker.kelvin;
            tracker.scale_by_current(ratio);
            let formula = match tracker.model.exponent() {
                1 => format!("{current_new_a:.1} A / {current_old_a:.1} A"),
                exp => format!("( {current_new_a:.1} A / {current_old_a:.1} A )^{exp}"),
            };
            lines.push(format!(
                "   {} = {formula} * {before:.0} K = {:.0} K",
                tracker.model.name(),
                tracker.kelvin
            ));
        }
        lines.join(" \n")
    }

    /// Re-rate to a different power at constant voltage and frequency.
    ///
    /// Absolute starting current, starting torque and maximum torque are
    /// kept, so the percentage ratios shrink as the nominal values grow.
    pub fn change_power(&mut self, target_kw: f64) -> MachineResult<String> {
        ensure_target_positive(target_kw, "power must be positive")?;
        if same_rounded(target_kw, self.power_kw) {
            return Ok(String::new());
        }

        let power_old = self.power_kw;
        let current_old = self.nominal_current_a();
        let torque_old = self.nominal_torque_nm();
        let ratios_old = [
            self.starting_current_pct,
            self.starting_torque_pct,
            self.max_torque_pct,
        ];

        self.power_kw = target_kw;
        let current_new = nominal_current(
            self.power_kw,
            self.power_factor,
            self.efficiency_pct,
            self.voltage_v,
        );
        let torque_new = torque_old * target_kw / power_old;

        self.starting_current_pct = ratios_old[0] * current_old / current_new;
        self.starting_torque_pct = ratios_old[1] * torque_old / torque_new;
        self.max_torque_pct = ratios_old[2] * torque_old / torque_new;
        self.recompute_derived();

        let thermal_text = self.scale_temperature_rise(current_old, self.nominal_current_a());

        debug!(power_old, power_new = target_kw, "power re-rated");

        Ok(format!(
            "\n\nDifferent Power {power_old:.0} kW --> {target_kw:.0} kW \n   \
             In_new = {target_kw:.0} kW * 1000 / ( sqrt{{3}} * {:.2} * {:.4} * {:.0} V ) = {:.1} A \n   \
             Mn_new = {target_kw:.0} kW * 1000 / ( 2 * pi * {:.0} RPM / 60 ) = {:.0} Nm \n   \
             Ia_new = {power_old:.0} kW / {target_kw:.0} kW * {:.0} % = {:.0} % \n   \
             Ma_new = {power_old:.0} kW / {target_kw:.0} kW * {:.0} % = {:.0} % \n   \
             Mk_new = {power_old:.0} kW / {target_kw:.0} kW * {:.0} % = {:.0} % \n\
             {thermal_text}",
            self.power_factor,
            self.efficiency_pct / 100.0,
            self.voltage_v,
            self.nominal_current_a(),
            self.speed_rpm,
            self.nominal_torque_nm(),
            ratios_old[0],
            self.starting_current_pct,
            ratios_old[1],
            self.starting_torque_pct,
            ratios_old[2],
            self.max_torque_pct,
        ))
    }

    /// Correct both temperature rises for a different installation altitude.
    ///
    /// # Errors
    /// Altitudes outside 0..=4000 m are rejected.
    pub fn change_altitude(&mut self, target_m: f64) -> MachineResult<String> {
        let correction = altitude_correction(self.altitude_m, target_m)?;
        if same_rounded(target_m, self.altitude_m) {
            return Ok(String::new());
        }

        let old_m = self.altitude_m;
        self.altitude_m = target_m;

        let Some(correction) = correction else {
            return Ok(String::new());
        };

        let mut text = format!(
            "\n\nDifferent height above sea level: {old_m:.0} m --> {target_m:.0} m"
        );
        for tracker in self.thermal.trackers_mut() {
            let before = tracker.kelvin;
            tracker.divide(correction.divisor);
            text.push_str(&format!(
                "\n   {} = {before:.0} K / {} = {:.1} K",
                tracker.model.name(),
                correction.formula,
                tracker.kelvin
            ));
        }

        debug!(old_m, new_m = target_m, divisor = correction.divisor, "altitude corrected");

        Ok(text)
    }

    /// Reconnect the rotor winding of a slip-ring machine.
    ///
    /// `Keep` clears the rotor connection label. Without a rotor circuit this
    /// does nothing.
    pub fn reconnect_rotor(&mut self, reconnection: RotorReconnection) -> String {
        let Some(rotor) = self.rotor.as_mut() else {
            return String::new();
        };
        let voltage_old = rotor.voltage_v;

        match reconnection {
            RotorReconnection::Keep => {
                rotor.connection = None;
                String::new()
            }
            RotorReconnection::StarToDelta => {
                rotor.voltage_v = (voltage_old / SQRT_3).round();
                rotor.connection = Some(Connection::Delta);
                format!(
                    "\n\nChange Rotor Connection: Y --> D\n   \
                     Un Rotor = {voltage_old:.0} V / sqrt{{3}} = {} V",
                    rotor.voltage_v
                )
            }
            RotorReconnection::DeltaToStar => {
                rotor.voltage_v = (voltage_old * SQRT_3).round();
                rotor.connection = Some(Connection::Star);
                format!(
                    "\n\nChange Rotor Connection: D --> Y\n   \
                     Un Rotor = {voltage_old:.0} V * sqrt{{3}} = {} V",
                    rotor.voltage_v
                )
            }
        }
    }

    /// Rotor voltage follows the stator voltage: `U_rotor * U_stator / U_stator_initial`.
    pub fn rescale_rotor_voltage(&mut self, initial_stator_voltage_v: f64) -> String {
        let stator_voltage = self.voltage_v;
        let Some(rotor) = self.rotor.as_mut() else {
            return String::new();
        };
        if same_rounded(initial_stator_voltage_v, stator_voltage) {
            return String::new();
        }

        let voltage_old = rotor.voltage_v;
        rotor.voltage_v = (voltage_old * stator_voltage / initial_stator_voltage_v).round();
        format!(
            "\n\nUpdate Rotor Voltage: U_Rotor ~ U_Stator\n   \
             Un Rotor = {voltage_old:.0} V * {stator_voltage:.0} V / {initial_stator_voltage_v:.0} V = {} V",
            rotor.voltage_v
        )
    }

    /// Rotor current from power and rotor voltage, with the 1.1 design margin.
    pub fn update_rotor_current(&mut self) -> String {
        let power_kw = self.power_kw;
        let Some(rotor) = self.rotor.as_mut() else {
            return String::new();
        };

        rotor.current_a = rotor_current(power_kw, rotor.voltage_v);
        format!(
            "\n\nCalculate Rotor Current:\n   \
             In Rotor = ( {power_kw:.1} kW * 1000 * 1.1 ) / ( {:.0} V * sqrt{{3}} ) = {} A",
            rotor.voltage_v, rotor.current_a
        )
    }
}
