use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error(
        "No valid slip at maximum torque: starting torque {starting_torque_nm:.1} Nm \
         and maximum torque {max_torque_nm:.1} Nm admit no root with slip below 1"
    )]
    NoValidSlipSolution {
        starting_torque_nm: f64,
        max_torque_nm: f64,
    },

    #[error("Current curve cannot be fitted: {what}")]
    DegenerateCurrentFit { what: &'static str },
}

pub type CurveResult<T> = Result<T, CurveError>;
