//! Result records of a calculation.

use asm_core::round_to;
use asm_machine::MachineState;
use serde::Serialize;

/// A record value with its display precision.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number { value: f64, decimals: u32 },
    Text(String),
}

impl FieldValue {
    /// Value rounded to its precision; never shows `-0`.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Number { value, decimals } => {
                format!("{:.*}", *decimals as usize, round_to(*value, *decimals) + 0.0)
            }
            FieldValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: &'static str,
    pub value: FieldValue,
}

impl RecordField {
    fn number(name: &'static str, value: f64, decimals: u32) -> Self {
        Self {
            name,
            value: FieldValue::Number { value, decimals },
        }
    }

    fn text(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            value: FieldValue::Text(text.into()),
        }
    }
}

/// Operating state in the shape of the machine input, plus both
/// temperature rises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub power_kw: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub ambient_temp_c: f64,
    pub altitude_m: f64,
    pub connection: String,
    pub parallel_branches: u32,
    pub starting_current_pct: f64,
    pub starting_torque_pct: f64,
    pub max_torque_pct: f64,
    pub efficiency_pct: f64,
    pub power_factor: f64,
    pub speed_rpm: f64,
    pub temperature_rise_quadratic_k: f64,
    pub temperature_rise_linear_k: f64,
}

impl ResultRecord {
    pub fn from_state(state: &MachineState) -> Self {
        Self {
            power_kw: state.power_kw,
            voltage_v: state.voltage_v,
            frequency_hz: state.frequency_hz,
            ambient_temp_c: state.ambient_temp_c,
            altitude_m: state.altitude_m,
            connection: state.connection.to_string(),
            parallel_branches: state.parallel_branches,
            starting_current_pct: state.starting_current_pct,
            starting_torque_pct: state.starting_torque_pct,
            max_torque_pct: state.max_torque_pct,
            efficiency_pct: state.efficiency_pct,
            power_factor: state.power_factor,
            speed_rpm: state.speed_rpm,
            temperature_rise_quadratic_k: state.thermal.quadratic.kelvin,
            temperature_rise_linear_k: state.thermal.linear.kelvin,
        }
    }

    /// Fields in display order with their display precision.
    pub fn display_fields(&self) -> Vec<RecordField> {
        vec![
            RecordField::number("Pn [kW]", self.power_kw, 1),
            RecordField::number("Un [V]", self.voltage_v, 0),
            RecordField::number("Freq [Hz]", self.frequency_hz, 0),
            RecordField::number("Ambient Temp. [°C]", self.ambient_temp_c, 0),
            RecordField::number("Height (m.a.s.l.) [m]", self.altitude_m, 0),
            RecordField::text("Connection Y/D", self.connection.as_str()),
            RecordField::number(
                "Parallel Branches (Stator)",
                f64::from(self.parallel_branches),
                0,
            ),
            RecordField::number("Ia/In [%]", self.starting_current_pct, 1),
            RecordField::number("Ma/Mn [%]", self.starting_torque_pct, 0),
            RecordField::number("Mk/Mn [%]", self.max_torque_pct, 0),
            RecordField::number("η [%]", self.efficiency_pct, 2),
            RecordField::number("cos(φ)", self.power_factor, 2),
            RecordField::number("Nominal Speed [RPM]", self.speed_rpm, 0),
            RecordField::number("Temp. Rise (~I^2) [K]", self.temperature_rise_quadratic_k, 0),
            RecordField::number("Temp. Rise (~I) [K]", self.temperature_rise_linear_k, 0),
        ]
    }
}

/// Rotor voltage, current and connection label after the calculation.
///
/// Without a rotor circuit voltage and current are 0 and the label is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotorRecord {
    pub voltage_v: f64,
    pub current_a: f64,
    pub connection: String,
}

impl RotorRecord {
    pub fn from_state(state: &MachineState) -> Self {
        match &state.rotor {
            Some(rotor) => Self {
                voltage_v: rotor.voltage_v,
                current_a: rotor.current_a,
                connection: rotor.connection.map(|c| c.to_string()).unwrap_or_default(),
            },
            None => Self {
                voltage_v: 0.0,
                current_a: 0.0,
                connection: String::new(),
            },
        }
    }

    pub fn display_fields(&self) -> Vec<RecordField> {
        vec![
            RecordField::number("Un Rotor [V]", self.voltage_v, 0),
            RecordField::number("In Rotor [A]", self.current_a, 1),
            RecordField::text("Rotor Connection", self.connection.as_str()),
        ]
    }
}
