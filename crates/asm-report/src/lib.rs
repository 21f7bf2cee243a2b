//! Change table and calculation report for a re-rated machine.

pub mod changes;
pub mod report;
pub mod table;

pub use changes::{ChangeRow, PercentChanges};
pub use report::{Report, machine_table, rotor_table};
pub use table::{Table, TableStyle, section_rule};
