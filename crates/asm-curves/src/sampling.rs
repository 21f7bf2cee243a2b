//! Speed grid and sampled curve points for plotting and export.

use serde::Serialize;

/// Default number of points per curve.
pub const DEFAULT_POINTS: usize = 100;

/// First grid speed (rpm); avoids the exact standstill point.
pub const GRID_START_RPM: f64 = 0.1;

/// Last grid speed as a fraction of synchronous speed; avoids the singular point.
pub const GRID_END_FRACTION: f64 = 0.9999;

/// Uniformly spaced speeds between two bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedGrid {
    pub start_rpm: f64,
    pub end_rpm: f64,
    pub num_points: usize,
}

impl SpeedGrid {
    /// Grid from 0.1 rpm to just below synchronous speed.
    pub fn for_sync_speed(sync_speed_rpm: f64) -> Self {
        Self {
            start_rpm: GRID_START_RPM,
            end_rpm: sync_speed_rpm * GRID_END_FRACTION,
            num_points: DEFAULT_POINTS,
        }
    }

    pub fn points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start_rpm];
        }

        let mut points = Vec::with_capacity(self.num_points);
        let delta = (self.end_rpm - self.start_rpm) / (self.num_points - 1) as f64;
        for i in 0..self.num_points {
            points.push(self.start_rpm + i as f64 * delta);
        }

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end_rpm;
        points
    }
}

/// One evaluated speed point, in absolute units and in percent of the
/// reference machine's nominal values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub speed_rpm: f64,
    pub torque_nm: f64,
    pub torque_pct: f64,
    pub current_a: f64,
    pub current_pct: f64,
    pub branch_current_a: f64,
    pub branch_current_pct: f64,
}

pub fn csv_header() -> &'static str {
    "label,speed_rpm,torque_nm,torque_pct,current_a,current_pct,branch_current_a,branch_current_pct"
}

impl CurveSample {
    pub fn csv_row(&self, label: &str) -> String {
        format!(
            "{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
            label,
            self.speed_rpm,
            self.torque_nm,
            self.torque_pct,
            self.current_a,
            self.current_pct,
            self.branch_current_a,
            self.branch_current_pct,
        )
    }
}
