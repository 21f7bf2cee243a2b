//! asm-core: shared foundation for the asynchronous machine re-rating engine.
//!
//! Contains:
//! - units (uom SI types + constructors for nameplate quantities)
//! - numeric (Real + tolerances + rounding helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AsmError, AsmResult};
pub use numeric::*;
pub use units::*;
