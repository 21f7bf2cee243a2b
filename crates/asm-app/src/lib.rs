//! Application service layer for the re-rating engine.
//!
//! Loads and validates case files, runs one calculation (both machine
//! states, the pipeline, the curves and the report) and packages the
//! result records the CLI prints or exports.

pub mod calculate;
pub mod case_service;
pub mod curves;
pub mod error;
pub mod records;

// Re-export key types for convenience
pub use calculate::{Calculation, calculate, calculate_case};
pub use case_service::{load_case, save_case, validate_case, write_template};
pub use curves::CurveSet;
pub use error::{AppError, AppResult};
pub use records::{FieldValue, RecordField, ResultRecord, RotorRecord};
