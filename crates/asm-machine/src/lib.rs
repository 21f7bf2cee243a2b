//! Electrical state model and re-rating rules for three-phase induction machines.
//!
//! A [`MachineState`] is built once from nameplate values and then driven
//! through an ordered [`Pipeline`] of transformation rules:
//!
//! ```text
//! connection → parallel branches → ambient temperature → frequency/voltage
//!   → voltage → power → altitude → (refresh) → rotor connection
//!   → rotor voltage → rotor current
//! ```
//!
//! Every rule mutates the state in place and returns a human-readable audit
//! fragment. Requesting a target equal to the current value is silent and
//! leaves the state untouched.
//!
//! # Example
//!
//! ```
//! use asm_machine::{Connection, MachineState, Nameplate, OperatingTarget, Pipeline};
//!
//! let nameplate = Nameplate {
//!     power_kw: 100.0,
//!     voltage_v: 400.0,
//!     frequency_hz: 50.0,
//!     speed_rpm: 1480.0,
//!     efficiency_pct: 95.0,
//!     power_factor: 0.85,
//!     starting_current_pct: 650.0,
//!     starting_torque_pct: 200.0,
//!     max_torque_pct: 250.0,
//!     connection: Connection::Delta,
//!     parallel_branches: 1,
//!     temperature_rise_k: 80.0,
//!     ambient_temp_c: 40.0,
//!     altitude_m: 1000.0,
//! };
//!
//! let initial = MachineState::new(&nameplate, 0.0, "Machine").unwrap();
//! let mut target = OperatingTarget::from_state(&initial);
//! target.connection = Connection::Star;
//!
//! let pipeline = Pipeline::for_target(&initial, &target);
//! let out = pipeline.apply(initial.relabeled("Operating")).unwrap();
//! assert!(out.audit.text().contains("Connection D --> Y"));
//! ```

pub mod connection;
pub mod error;
pub mod pipeline;
pub mod poles;
pub mod rotor;
pub mod state;
pub mod thermal;
pub mod transform;

// Re-exports
pub use connection::{Connection, RotorReconnection};
pub use error::{MachineError, MachineResult};
pub use pipeline::{AuditFragment, AuditTrail, OperatingTarget, Pipeline, Step, Transformed};
pub use poles::{SynchronousSpeed, resolve_synchronous_speed};
pub use rotor::RotorCircuit;
pub use state::{BranchValues, MachineState, Nameplate};
pub use thermal::{RiseModel, TemperatureRise, ThermalState};
