//! Full and abbreviated calculation reports.

use asm_core::AsmResult;
use asm_machine::{MachineState, Transformed};

use crate::changes::PercentChanges;
use crate::table::{Table, TableStyle, section_rule};

/// Value table of one machine state, rounded for display.
pub fn machine_table(state: &MachineState) -> Table {
    let branch = state.branch_values();
    let rotor_voltage = state.rotor.as_ref().map_or(0.0, |r| r.voltage_v);

    let mut table = Table::new(["Variable", "Value"]);
    table
        .row(["Nominal Power [kW]".to_string(), format!("{:.0}", state.power_kw)])
        .row(["Nominal Voltage [V]".to_string(), format!("{:.0}", state.voltage_v)])
        .row(["Nominal Frequency [Hz]".to_string(), format!("{:.0}", state.frequency_hz)])
        .row(["Nominal Speed [min-1]".to_string(), format!("{:.0}", state.speed_rpm)])
        .row(["Efficiency [%]".to_string(), format!("{:.2}", state.efficiency_pct)])
        .row(["Cosinus Phi".to_string(), format!("{:.2}", state.power_factor)])
        .row([
            "Temperature Rise (dT~I) [K]".to_string(),
            format!("{:.0}", state.thermal.linear.kelvin),
        ])
        .row([
            "Temperature Rise (dT~I^2) [K]".to_string(),
            format!("{:.0}", state.thermal.quadratic.kelvin),
        ])
        .spacer()
        .row(["Connection (Y, D)".to_string(), state.connection.to_string()])
        .row([
            "Number of Parallel Circuits (Stator)".to_string(),
            state.parallel_branches.to_string(),
        ])
        .spacer()
        .row(["Nominal Current [A]".to_string(), format!("{:.1}", state.nominal_current_a())])
        .row(["Starting Current [%]".to_string(), format!("{:.0}", state.starting_current_pct)])
        .row(["Starting Current [A]".to_string(), format!("{:.0}", state.starting_current_a())])
        .spacer()
        .row(["Nominal Torque [Nm]".to_string(), format!("{:.0}", state.nominal_torque_nm())])
        .row(["Starting Torque [%]".to_string(), format!("{:.0}", state.starting_torque_pct)])
        .row(["Starting Torque [Nm]".to_string(), format!("{:.0}", state.starting_torque_nm())])
        .row(["Maximum Torque [%]".to_string(), format!("{:.0}", state.max_torque_pct)])
        .row(["Maximum Torque [Nm]".to_string(), format!("{:.0}", state.max_torque_nm())])
        .spacer()
        .row([
            "Current in a Single Stator Branch [A]".to_string(),
            format!("{:.1}", branch.current_a),
        ])
        .row([
            "Voltage in a Single Stator Branch [V]".to_string(),
            format!("{:.0}", branch.voltage_v),
        ])
        .spacer()
        .row(["Ambient Temperature [°C]".to_string(), state.ambient_temp_c.to_string()])
        .row(["Operation Height [m]".to_string(), state.altitude_m.to_string()])
        .spacer()
        .row(["Rotor Voltage [V]".to_string(), format!("{rotor_voltage:.0}")]);
    table
}

/// Rotor voltage, current and connection label of a state.
pub fn rotor_table(state: &MachineState) -> Table {
    let (voltage, current, connection) = match &state.rotor {
        Some(rotor) => (
            rotor.voltage_v,
            rotor.current_a,
            rotor.connection.map(|c| c.to_string()).unwrap_or_default(),
        ),
        None => (0.0, 0.0, String::new()),
    };

    let mut table = Table::new(["Parameter", "Value"]);
    table
        .row(["Un Rotor [V]".to_string(), voltage.to_string()])
        .row(["In Rotor [A]".to_string(), current.to_string()])
        .row(["Rotor Connection".to_string(), connection]);
    table
}

/// Assembled report of one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Initial values, calculations, results, rotor parameters and changes
    pub full: String,
    /// Calculation steps only, for on-screen display
    pub abbreviated: String,
    pub changes: PercentChanges,
}

impl Report {
    /// # Errors
    /// Propagates a failing percentage change (zero initial value).
    pub fn assemble(initial: &MachineState, transformed: &Transformed) -> AsmResult<Self> {
        let result = &transformed.state;
        let changes = PercentChanges::compute(initial, result)?;
        let abbreviated = transformed.audit.text();

        let mut full = section_rule("Initial Values");
        full.push_str(&machine_table(initial).render(TableStyle::Outline));

        full.push_str("\n\n");
        full.push_str(&section_rule("Calculations"));
        full.push_str(&abbreviated);

        full.push_str("\n\n");
        full.push_str(&section_rule("Results"));
        full.push_str(&machine_table(result).render(TableStyle::Outline));

        if let Some(rotor) = &initial.rotor {
            full.push_str("\n\n");
            full.push_str(&section_rule("Rotor Parameters"));
            full.push_str(&format!("\nInitial Rotor Voltage: {} V\n\n", rotor.voltage_v));
            full.push_str(&rotor_table(result).render(TableStyle::Grid));
        }

        full.push_str("\n\n");
        full.push_str(&section_rule("Percentual Changes"));
        full.push_str(&changes.render());

        Ok(Self {
            full,
            abbreviated,
            changes,
        })
    }
}
