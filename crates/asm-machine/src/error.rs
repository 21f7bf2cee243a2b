//! Error types for machine state construction and transformation.

use asm_core::AsmError;
use thiserror::Error;

/// Errors raised while building or transforming a machine state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    #[error(
        "No plausible pole count for nominal speed {speed_rpm} rpm at {frequency_hz} Hz \
         (slip must lie within 0..10 % of a synchronous speed for 2..14 poles)"
    )]
    NoPlausiblePoleCount { speed_rpm: f64, frequency_hz: f64 },

    #[error("Invalid connection target '{value}' (expected 'Y' or 'D')")]
    InvalidConnectionTarget { value: String },

    #[error("Invalid rotor reconnection '{value}' (expected 'Do not change', 'Y --> D' or 'D --> Y')")]
    InvalidRotorReconnection { value: String },

    #[error("Altitude {altitude_m} m is outside the corrected range 0..4000 m")]
    AltitudeOutOfRange { altitude_m: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Numeric error: {0}")]
    Numeric(#[from] AsmError),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<MachineError>,
    },
}

pub type MachineResult<T> = Result<T, MachineError>;

impl MachineError {
    /// Attach the name of the pipeline step that produced this error.
    pub fn in_step(self, step: &'static str) -> Self {
        MachineError::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The innermost error, without step context.
    pub fn root(&self) -> &MachineError {
        match self {
            MachineError::Step { source, .. } => source.root(),
            other => other,
        }
    }
}
