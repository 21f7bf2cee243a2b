//! Percentage changes between the initial and the operating machine.

use asm_core::{AsmResult, percent_change};
use asm_machine::MachineState;
use serde::Serialize;

use crate::table::{Table, TableStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRow {
    pub variable: &'static str,
    /// `(result/initial - 1) * 100`, one decimal
    pub change_pct: f64,
}

/// The six change rows, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentChanges {
    pub rows: Vec<ChangeRow>,
}

impl PercentChanges {
    pub const POWER: &'static str = "Pn";
    pub const FLUX: &'static str = "B (~U/f)";
    pub const BRANCH_VOLTAGE: &'static str = "Un (per branch)";
    pub const BRANCH_CURRENT: &'static str = "In (per branch)";
    pub const RISE_QUADRATIC: &'static str = "Temp. Rise (~I^2)";
    pub const RISE_LINEAR: &'static str = "Temp. Rise (~I)";

    /// # Errors
    /// Fails when an initial value is zero or a change is not finite.
    pub fn compute(initial: &MachineState, result: &MachineState) -> AsmResult<Self> {
        let branch_ini = initial.branch_values();
        let branch_res = result.branch_values();
        let flux_ini = branch_ini.voltage_v / initial.frequency_hz;
        let flux_res = branch_res.voltage_v / result.frequency_hz;

        let rows = vec![
            ChangeRow {
                variable: Self::POWER,
                change_pct: percent_change(initial.power_kw, result.power_kw)?,
            },
            ChangeRow {
                variable: Self::FLUX,
                change_pct: percent_change(flux_ini, flux_res)?,
            },
            ChangeRow {
                variable: Self::BRANCH_VOLTAGE,
                change_pct: percent_change(branch_ini.voltage_v, branch_res.voltage_v)?,
            },
            ChangeRow {
                variable: Self::BRANCH_CURRENT,
                change_pct: percent_change(branch_ini.current_a, branch_res.current_a)?,
            },
            ChangeRow {
                variable: Self::RISE_QUADRATIC,
                change_pct: percent_change(
                    initial.thermal.quadratic.kelvin,
                    result.thermal.quadratic.kelvin,
                )?,
            },
            ChangeRow {
                variable: Self::RISE_LINEAR,
                change_pct: percent_change(
                    initial.thermal.linear.kelvin,
                    result.thermal.linear.kelvin,
                )?,
            },
        ];
        Ok(Self { rows })
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.variable == variable)
            .map(|row| row.change_pct)
    }

    pub fn render(&self) -> String {
        let mut table = Table::new(["Parameter", "Percentual Change [%]"]);
        for row in &self.rows {
            table.row([row.variable.to_string(), format!("{:.1}", row.change_pct + 0.0)]);
        }
        table.render(TableStyle::Grid)
    }
}
