//! Report assembly over full pipeline runs.

use asm_machine::{
    Connection, MachineState, Nameplate, OperatingTarget, Pipeline, RotorReconnection,
    Transformed,
};
use asm_report::{PercentChanges, Report, TableStyle, machine_table};

fn nameplate() -> Nameplate {
    Nameplate {
        power_kw: 100.0,
        voltage_v: 400.0,
        frequency_hz: 50.0,
        speed_rpm: 1480.0,
        efficiency_pct: 95.0,
        power_factor: 0.85,
        starting_current_pct: 650.0,
        starting_torque_pct: 200.0,
        max_torque_pct: 250.0,
        connection: Connection::Delta,
        parallel_branches: 1,
        temperature_rise_k: 80.0,
        ambient_temp_c: 40.0,
        altitude_m: 1000.0,
    }
}

fn run(initial: &MachineState, target: &OperatingTarget) -> Transformed {
    Pipeline::for_target(initial, target)
        .apply(initial.relabeled("Operating"))
        .unwrap()
}

#[test]
fn star_reconnection_changes() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.connection = Connection::Star;
    let out = run(&initial, &target);

    let changes = PercentChanges::compute(&initial, &out.state).unwrap();
    let names: Vec<_> = changes.rows.iter().map(|r| r.variable).collect();
    assert_eq!(
        names,
        [
            "Pn",
            "B (~U/f)",
            "Un (per branch)",
            "In (per branch)",
            "Temp. Rise (~I^2)",
            "Temp. Rise (~I)",
        ]
    );
    assert_eq!(changes.get(PercentChanges::POWER), Some(0.0));
    assert_eq!(changes.get(PercentChanges::FLUX), Some(-42.3));
    assert_eq!(changes.get(PercentChanges::BRANCH_VOLTAGE), Some(-42.3));
    assert_eq!(changes.get(PercentChanges::BRANCH_CURRENT), Some(73.2));
    assert_eq!(changes.get(PercentChanges::RISE_QUADRATIC), Some(200.0));
    assert_eq!(changes.get(PercentChanges::RISE_LINEAR), Some(73.2));
}

#[test]
fn constant_flux_frequency_change() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.frequency_hz = 60.0;
    target.voltage_v = 480.0;
    target.power_kw = 120.0;
    let out = run(&initial, &target);

    let changes = PercentChanges::compute(&initial, &out.state).unwrap();
    assert_eq!(changes.get(PercentChanges::POWER), Some(20.0));
    assert_eq!(changes.get(PercentChanges::FLUX), Some(0.0));
    assert_eq!(changes.get(PercentChanges::BRANCH_VOLTAGE), Some(20.0));
    assert_eq!(changes.get(PercentChanges::BRANCH_CURRENT), Some(0.0));
    assert_eq!(changes.get(PercentChanges::RISE_LINEAR), Some(0.0));
}

#[test]
fn full_report_sections_in_order() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.connection = Connection::Star;
    let out = run(&initial, &target);
    let report = Report::assemble(&initial, &out).unwrap();

    let position = |needle: &str| report.full.find(needle).unwrap();
    assert!(position("Initial Values") < position("Calculations"));
    assert!(position("Calculations") < position("Connection D --> Y"));
    assert!(position("Connection D --> Y") < position("Results"));
    assert!(position("Results") < position("Percentual Changes"));
    assert!(!report.full.contains("Rotor Parameters"));

    assert!(report.abbreviated.contains("Connection D --> Y"));
    assert!(!report.abbreviated.contains("Initial Values"));
}

#[test]
fn rotor_section_lists_initial_voltage() {
    let initial = MachineState::new(&nameplate(), 500.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.rotor_reconnection = RotorReconnection::StarToDelta;
    let out = run(&initial, &target);
    let report = Report::assemble(&initial, &out).unwrap();

    assert!(report.full.contains("Rotor Parameters"));
    assert!(report.full.contains("Initial Rotor Voltage: 500 V"));
    assert!(report.full.contains("| Rotor Connection | D "));
    assert!(report.full.contains("| Un Rotor [V]     | 289 "));
}

#[test]
fn value_table_rounding() {
    let state = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let text = machine_table(&state).render(TableStyle::Outline);
    assert!(text.contains("| Nominal Current [A]"));
    assert!(text.contains("178.7"));
    assert!(text.contains("| Cosinus Phi"));
    assert!(text.contains("0.85"));
    assert!(text.contains("| Ambient Temperature [°C]"));
}

#[test]
fn changes_serialize_as_rows() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let changes = PercentChanges::compute(&initial, &initial).unwrap();
    let json = serde_json::to_value(&changes).unwrap();
    assert_eq!(json["rows"][0]["variable"], "Pn");
    assert_eq!(json["rows"][0]["change_pct"], 0.0);
}
