//! Case file schema definitions.

use asm_machine::{Connection, Nameplate, OperatingTarget, RotorReconnection};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

/// One re-rating case: a machine, the requested operating point and the
/// optional rotor circuit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    #[serde(default = "latest_version")]
    pub version: u32,
    pub machine: MachineDef,
    pub operating: OperatingDef,
    #[serde(default)]
    pub rotor: RotorDef,
    #[serde(default)]
    pub labels: LabelsDef,
}

fn latest_version() -> u32 {
    LATEST_VERSION
}

/// Nameplate values of the machine as built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineDef {
    pub power_kw: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub ambient_temp_c: f64,
    pub altitude_m: f64,
    pub connection: Connection,
    pub parallel_branches: u32,
    pub starting_current_pct: f64,
    pub starting_torque_pct: f64,
    pub max_torque_pct: f64,
    pub efficiency_pct: f64,
    pub power_factor: f64,
    pub speed_rpm: f64,
    pub temperature_rise_k: f64,
}

/// Requested operating conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatingDef {
    pub power_kw: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub ambient_temp_c: f64,
    pub altitude_m: f64,
    pub connection: Connection,
    pub parallel_branches: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RotorDef {
    /// 0 means no accessible rotor circuit
    #[serde(default)]
    pub voltage_v: f64,
    #[serde(default)]
    pub reconnection: RotorReconnection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelsDef {
    #[serde(default = "default_machine_label")]
    pub machine: String,
    #[serde(default = "default_operating_label")]
    pub operating: String,
}

fn default_machine_label() -> String {
    "Machine".to_string()
}

fn default_operating_label() -> String {
    "Operating".to_string()
}

impl Default for LabelsDef {
    fn default() -> Self {
        Self {
            machine: default_machine_label(),
            operating: default_operating_label(),
        }
    }
}

impl OperatingDef {
    /// Operating point equal to the machine's own rating.
    pub fn from_machine(machine: &MachineDef) -> Self {
        Self {
            power_kw: machine.power_kw,
            voltage_v: machine.voltage_v,
            frequency_hz: machine.frequency_hz,
            ambient_temp_c: machine.ambient_temp_c,
            altitude_m: machine.altitude_m,
            connection: machine.connection,
            parallel_branches: machine.parallel_branches,
        }
    }

    pub fn to_target(&self, rotor: &RotorDef) -> OperatingTarget {
        OperatingTarget {
            power_kw: self.power_kw,
            voltage_v: self.voltage_v,
            frequency_hz: self.frequency_hz,
            ambient_temp_c: self.ambient_temp_c,
            altitude_m: self.altitude_m,
            connection: self.connection,
            parallel_branches: self.parallel_branches,
            rotor_reconnection: rotor.reconnection,
        }
    }
}

impl From<&MachineDef> for Nameplate {
    fn from(def: &MachineDef) -> Self {
        Nameplate {
            power_kw: def.power_kw,
            voltage_v: def.voltage_v,
            frequency_hz: def.frequency_hz,
            speed_rpm: def.speed_rpm,
            efficiency_pct: def.efficiency_pct,
            power_factor: def.power_factor,
            starting_current_pct: def.starting_current_pct,
            starting_torque_pct: def.starting_torque_pct,
            max_torque_pct: def.max_torque_pct,
            connection: def.connection,
            parallel_branches: def.parallel_branches,
            temperature_rise_k: def.temperature_rise_k,
            ambient_temp_c: def.ambient_temp_c,
            altitude_m: def.altitude_m,
        }
    }
}

impl CaseFile {
    /// Starter case: a 4-pole 100 kW machine operated at its own rating.
    pub fn template() -> Self {
        let machine = MachineDef {
            power_kw: 100.0,
            voltage_v: 400.0,
            frequency_hz: 50.0,
            ambient_temp_c: 40.0,
            altitude_m: 1000.0,
            connection: Connection::Delta,
            parallel_branches: 1,
            starting_current_pct: 650.0,
            starting_torque_pct: 200.0,
            max_torque_pct: 250.0,
            efficiency_pct: 95.0,
            power_factor: 0.85,
            speed_rpm: 1480.0,
            temperature_rise_k: 80.0,
        };
        Self {
            version: LATEST_VERSION,
            operating: OperatingDef::from_machine(&machine),
            machine,
            rotor: RotorDef::default(),
            labels: LabelsDef::default(),
        }
    }

    pub fn nameplate(&self) -> Nameplate {
        Nameplate::from(&self.machine)
    }

    pub fn target(&self) -> OperatingTarget {
        self.operating.to_target(&self.rotor)
    }
}
