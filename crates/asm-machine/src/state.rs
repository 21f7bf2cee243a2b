//! Machine state: nameplate values, topology, environment and derived absolutes.

use asm_core::units::{AngularVelocity, Power, Torque, kw, rpm, torque_from_power};
use asm_core::{AsmError, AsmResult, SQRT_3, Tolerances, ensure_positive, nearly_equal};
use serde::{Deserialize, Serialize};
use uom::si::torque::newton_meter;

use crate::connection::Connection;
use crate::error::{MachineError, MachineResult};
use crate::poles::{SynchronousSpeed, resolve_synchronous_speed};
use crate::rotor::RotorCircuit;
use crate::thermal::ThermalState;

/// The 14 nameplate-like values a machine is described by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nameplate {
    /// Nominal power (kW)
    pub power_kw: f64,
    /// Nominal line voltage (V)
    pub voltage_v: f64,
    /// Nominal frequency (Hz)
    pub frequency_hz: f64,
    /// Nominal speed (rpm)
    pub speed_rpm: f64,
    /// Efficiency (%)
    pub efficiency_pct: f64,
    /// cos φ
    pub power_factor: f64,
    /// Ia/In (%)
    pub starting_current_pct: f64,
    /// Ma/Mn (%)
    pub starting_torque_pct: f64,
    /// Mk/Mn (%)
    pub max_torque_pct: f64,
    pub connection: Connection,
    /// Parallel circuits per stator phase
    pub parallel_branches: u32,
    /// Winding temperature rise (K)
    pub temperature_rise_k: f64,
    /// Ambient temperature (°C)
    pub ambient_temp_c: f64,
    /// Installation altitude (m above sea level)
    pub altitude_m: f64,
}

/// Voltage and current seen by one parallel branch of one stator phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchValues {
    pub voltage_v: f64,
    pub current_a: f64,
}

/// Electrical, thermal and mechanical state of an induction machine.
///
/// Nameplate, topology and environment fields are public. The nominal
/// current/torque and the absolute starting current, starting torque and
/// maximum torque are derived and only change through
/// [`MachineState::recompute_derived`], which keeps
/// `absolute = ratio / 100 * nominal` true after every transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// Display label, no physical meaning
    pub label: String,
    pub power_kw: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub speed_rpm: f64,
    pub efficiency_pct: f64,
    pub power_factor: f64,
    pub starting_current_pct: f64,
    pub starting_torque_pct: f64,
    pub max_torque_pct: f64,
    pub connection: Connection,
    pub parallel_branches: u32,
    pub ambient_temp_c: f64,
    pub altitude_m: f64,
    pub thermal: ThermalState,
    pub rotor: Option<RotorCircuit>,
    poles: u32,
    nominal_current_a: f64,
    nominal_torque_nm: f64,
    starting_current_a: f64,
    starting_torque_nm: f64,
    max_torque_nm: f64,
}

impl MachineState {
    /// Build a state from nameplate values.
    ///
    /// A rotor voltage of 0 means the machine has no accessible rotor circuit.
    ///
    /// # Errors
    /// Fails with [`MachineError::NoPlausiblePoleCount`] when the speed and
    /// frequency do not match any pole count, or with a numeric error when
    /// a value the formulas divide by is not positive.
    pub fn new(
        nameplate: &Nameplate,
        rotor_voltage_v: f64,
        label: impl Into<String>,
    ) -> MachineResult<Self> {
        let sync = resolve_synchronous_speed(nameplate.speed_rpm, nameplate.frequency_hz)?;

        ensure_positive(nameplate.power_kw, "power")?;
        ensure_positive(nameplate.voltage_v, "voltage")?;
        ensure_positive(nameplate.efficiency_pct, "efficiency")?;
        ensure_positive(nameplate.power_factor, "power factor")?;
        if nameplate.parallel_branches == 0 {
            return Err(MachineError::NonPhysical {
                what: "parallel branch count must be at least 1",
            });
        }

        let mut state = Self {
            label: label.into(),
            power_kw: nameplate.power_kw,
            voltage_v: nameplate.voltage_v,
            frequency_hz: nameplate.frequency_hz,
            speed_rpm: nameplate.speed_rpm,
            efficiency_pct: nameplate.efficiency_pct,
            power_factor: nameplate.power_factor,
            starting_current_pct: nameplate.starting_current_pct,
            starting_torque_pct: nameplate.starting_torque_pct,
            max_torque_pct: nameplate.max_torque_pct,
            connection: nameplate.connection,
            parallel_branches: nameplate.parallel_branches,
            ambient_temp_c: nameplate.ambient_temp_c,
            altitude_m: nameplate.altitude_m,
            thermal: ThermalState::from_nameplate(nameplate.temperature_rise_k),
            rotor: RotorCircuit::new(rotor_voltage_v, nameplate.power_kw),
            poles: sync.poles,
            nominal_current_a: 0.0,
            nominal_torque_nm: 0.0,
            starting_current_a: 0.0,
            starting_torque_nm: 0.0,
            max_torque_nm: 0.0,
        };
        state.recompute_derived();
        Ok(state)
    }

    /// Deep copy under a different display label.
    pub fn relabeled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Recompute nominal current and torque from the nameplate fields, then
    /// the absolute starting current, starting torque and maximum torque.
    pub fn recompute_derived(&mut self) {
        self.nominal_current_a = nominal_current(
            self.power_kw,
            self.power_factor,
            self.efficiency_pct,
            self.voltage_v,
        );
        self.nominal_torque_nm = nominal_torque(self.power(), self.speed()).get::<newton_meter>();
        self.refresh_absolutes();
    }

    /// Absolute values from the percentage ratios and current nominal values.
    pub(crate) fn refresh_absolutes(&mut self) {
        self.starting_current_a = self.starting_current_pct / 100.0 * self.nominal_current_a;
        self.starting_torque_nm = self.starting_torque_pct / 100.0 * self.nominal_torque_nm;
        self.max_torque_nm = self.max_torque_pct / 100.0 * self.nominal_torque_nm;
    }

    pub fn power(&self) -> Power {
        kw(self.power_kw)
    }

    pub fn speed(&self) -> AngularVelocity {
        rpm(self.speed_rpm)
    }

    /// Nominal current (A)
    pub fn nominal_current_a(&self) -> f64 {
        self.nominal_current_a
    }

    /// Nominal torque (N·m)
    pub fn nominal_torque_nm(&self) -> f64 {
        self.nominal_torque_nm
    }

    /// Absolute starting current (A)
    pub fn starting_current_a(&self) -> f64 {
        self.starting_current_a
    }

    /// Absolute starting torque (N·m)
    pub fn starting_torque_nm(&self) -> f64 {
        self.starting_torque_nm
    }

    /// Absolute maximum (breakdown) torque (N·m)
    pub fn max_torque_nm(&self) -> f64 {
        self.max_torque_nm
    }

    pub fn poles(&self) -> u32 {
        self.poles
    }

    /// Synchronous speed for the current frequency and the resolved pole count.
    ///
    /// Frequency and speed only ever change together, so the pole count found
    /// at construction stays valid.
    pub fn synchronous_speed(&self) -> SynchronousSpeed {
        SynchronousSpeed::from_poles(self.poles, self.frequency_hz)
    }

    /// Voltage and current of a single branch of a single stator phase.
    pub fn branch_values(&self) -> BranchValues {
        let (phase_voltage, phase_current) = match self.connection {
            Connection::Star => (self.voltage_v / SQRT_3, self.nominal_current_a),
            Connection::Delta => (self.voltage_v, self.nominal_current_a / SQRT_3),
        };
        BranchValues {
            voltage_v: phase_voltage,
            current_a: phase_current / f64::from(self.parallel_branches),
        }
    }

    /// Check the derived-value invariants.
    pub fn check_invariants(&self, tol: Tolerances) -> AsmResult<()> {
        let expected_current = nominal_current(
            self.power_kw,
            self.power_factor,
            self.efficiency_pct,
            self.voltage_v,
        );
        if !nearly_equal(self.nominal_current_a, expected_current, tol) {
            return Err(AsmError::Invariant {
                what: "nominal current does not match power/voltage/pf/efficiency",
            });
        }
        let expected_torque = nominal_torque(self.power(), self.speed()).get::<newton_meter>();
        if !nearly_equal(self.nominal_torque_nm, expected_torque, tol) {
            return Err(AsmError::Invariant {
                what: "nominal torque does not match power/speed",
            });
        }

        let pairs = [
            (
                self.starting_current_a,
                self.starting_current_pct,
                self.nominal_current_a,
                "starting current absolute != ratio x nominal",
            ),
            (
                self.starting_torque_nm,
                self.starting_torque_pct,
                self.nominal_torque_nm,
                "starting torque absolute != ratio x nominal",
            ),
            (
                self.max_torque_nm,
                self.max_torque_pct,
                self.nominal_torque_nm,
                "maximum torque absolute != ratio x nominal",
            ),
        ];
        for (absolute, pct, nominal, what) in pairs {
            if !nearly_equal(absolute, pct / 100.0 * nominal, tol) {
                return Err(AsmError::Invariant { what });
            }
        }
        Ok(())
    }
}

/// `I_n = P * 1000 / (√3 * cos φ * η/100 * U)`
pub fn nominal_current(power_kw: f64, power_factor: f64, efficiency_pct: f64, voltage_v: f64) -> f64 {
    power_kw * 1000.0 / (SQRT_3 * power_factor * efficiency_pct / 100.0 * voltage_v)
}

/// `M_n = P * 1000 / (2π n / 60)`
pub fn nominal_torque(power: Power, speed: AngularVelocity) -> Torque {
    torque_from_power(power, speed)
}
