//! Rotor circuit of slip-ring machines.

use asm_core::{SQRT_3, round_to};

use crate::connection::Connection;

/// Design margin applied when estimating the rotor current from power.
pub const ROTOR_CURRENT_MARGIN: f64 = 1.1;

/// Rotor winding data, present only when a rotor voltage is known.
#[derive(Debug, Clone, PartialEq)]
pub struct RotorCircuit {
    /// Rotor standstill voltage (V)
    pub voltage_v: f64,
    /// Rotor current (A), rounded to 0.1 A
    pub current_a: f64,
    /// Set only after an explicit reconnection
    pub connection: Option<Connection>,
}

impl RotorCircuit {
    /// Rotor circuit for a positive rotor voltage; `None` means no rotor circuit.
    pub fn new(voltage_v: f64, power_kw: f64) -> Option<Self> {
        (voltage_v > 0.0).then(|| Self {
            voltage_v,
            current_a: rotor_current(power_kw, voltage_v),
            connection: None,
        })
    }
}

/// `I_rotor = P * 1000 * 1.1 / (U_rotor * √3)`, rounded to 0.1 A.
pub fn rotor_current(power_kw: f64, rotor_voltage_v: f64) -> f64 {
    round_to(
        power_kw * 1000.0 * ROTOR_CURRENT_MARGIN / (rotor_voltage_v * SQRT_3),
        1,
    )
}
