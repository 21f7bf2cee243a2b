//! Pole count and synchronous speed from nominal speed and supply frequency.

use crate::error::{MachineError, MachineResult};

/// Largest nominal slip accepted when matching a pole count.
pub const MAX_NOMINAL_SLIP: f64 = 0.1;

/// Pole counts scanned, in order.
pub const POLE_COUNTS: [u32; 7] = [2, 4, 6, 8, 10, 12, 14];

/// Resolved rotating-field speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynchronousSpeed {
    /// Number of poles (not pole pairs)
    pub poles: u32,
    /// Synchronous speed (rpm)
    pub speed_rpm: f64,
}

impl SynchronousSpeed {
    /// Synchronous speed for a pole count at the given frequency: `120 f / p`.
    pub fn from_poles(poles: u32, frequency_hz: f64) -> Self {
        Self {
            poles,
            speed_rpm: 120.0 * frequency_hz / f64::from(poles),
        }
    }

    /// Slip of a rotor turning at `speed_rpm`.
    pub fn slip(&self, speed_rpm: f64) -> f64 {
        (self.speed_rpm - speed_rpm) / self.speed_rpm
    }
}

/// Finds the first even pole count whose slip band `[0.9 n_sync, n_sync]`
/// contains the nominal speed.
///
/// # Errors
/// Returns [`MachineError::NoPlausiblePoleCount`] when no pole count in
/// 2..=14 matches.
pub fn resolve_synchronous_speed(speed_rpm: f64, frequency_hz: f64) -> MachineResult<SynchronousSpeed> {
    let no_match = || MachineError::NoPlausiblePoleCount {
        speed_rpm,
        frequency_hz,
    };

    if !speed_rpm.is_finite() || !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(no_match());
    }

    POLE_COUNTS
        .iter()
        .map(|&poles| SynchronousSpeed::from_poles(poles, frequency_hz))
        .find(|sync| {
            let n_min = sync.speed_rpm * (1.0 - MAX_NOMINAL_SLIP);
            let n_max = sync.speed_rpm;
            n_min <= speed_rpm && speed_rpm <= n_max
        })
        .ok_or_else(no_match)
}
