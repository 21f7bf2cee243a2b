//! Speed-domain curves fitted from nameplate points.
//!
//! - [`TorqueCurve`]: Kloss-type torque(speed) through the starting and
//!   maximum torque
//! - [`CurrentCurve`]: power-law current(speed) through the starting and
//!   nominal current, for the whole machine or a single stator branch
//! - [`SpeedGrid`] and [`CurveSample`] for plotting and export

pub mod current;
pub mod error;
pub mod machine;
pub mod sampling;
pub mod torque;

pub use current::CurrentCurve;
pub use error::{CurveError, CurveResult};
pub use machine::{MachineCurves, PercentBase};
pub use sampling::{CurveSample, SpeedGrid, csv_header};
pub use torque::TorqueCurve;
