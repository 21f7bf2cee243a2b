//! Integration tests for the re-rating pipeline.

use asm_core::{SQRT_3, Tolerances};
use asm_machine::{
    Connection, MachineState, Nameplate, OperatingTarget, Pipeline, RotorReconnection,
};

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

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-6,
        rel: 1e-9,
    }
}

#[test]
fn star_reconnection_on_same_supply() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.connection = Connection::Star;

    let out = Pipeline::for_target(&initial, &target)
        .apply(initial.relabeled("Operating"))
        .unwrap();

    // Reconnection lifts the rated voltage to 400·√3 ≈ 692.8 V
    let steps: Vec<_> = out.audit.steps().collect();
    assert_eq!(steps, ["connection", "voltage"]);
    let connection_text = &out.audit.fragments[0].text;
    assert!(connection_text.contains("Connection D --> Y"));
    assert!(connection_text.contains("400 V * sqrt{3} = 693 V"));

    // The supply stays at 400 V, so the voltage step brings it back down
    let state = &out.state;
    assert_eq!(state.voltage_v, 400.0);
    assert_eq!(state.connection, Connection::Star);
    assert_eq!(state.power_kw, 100.0);
    assert!((state.starting_torque_pct - 200.0 / 3.0).abs() < 1e-9);
    assert!((state.max_torque_pct - 250.0 / 3.0).abs() < 1e-9);

    // Current ratio back to 400 V is √3
    assert!((state.thermal.linear.kelvin - 80.0 * SQRT_3).abs() < 1e-9);
    assert!((state.thermal.quadratic.kelvin - 240.0).abs() < 1e-9);
    state.check_invariants(tol()).unwrap();
}

#[test]
fn star_reconnection_at_raised_voltage_keeps_ratios() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let mut target = OperatingTarget::from_state(&initial);
    target.connection = Connection::Star;
    target.voltage_v = 400.0 * SQRT_3;

    let out = Pipeline::for_target(&initial, &target)
        .apply(initial.relabeled("Operating"))
        .unwrap();

    let state = &out.state;
    assert_eq!(out.audit.steps().collect::<Vec<_>>(), ["connection"]);
    assert!((state.voltage_v - 692.82).abs() < 0.01);
    assert!((state.nominal_current_a() - initial.nominal_current_a() / SQRT_3).abs() < 1e-9);
    assert_eq!(state.starting_torque_pct, 200.0);
    assert_eq!(state.max_torque_pct, 250.0);
    assert_eq!(state.thermal, initial.thermal);
}

#[test]
fn two_pole_machine_near_synchronous_speed() {
    let mut plate = nameplate();
    plate.speed_rpm = 2990.0;
    let state = MachineState::new(&plate, 0.0, "Machine").unwrap();
    assert_eq!(state.poles(), 2);
    assert_eq!(state.synchronous_speed().speed_rpm, 3000.0);
}

#[test]
fn full_rerating_with_rotor() {
    let initial = MachineState::new(&nameplate(), 500.0, "Machine").unwrap();
    let target = OperatingTarget {
        power_kw: 110.0,
        voltage_v: 460.0,
        frequency_hz: 60.0,
        ambient_temp_c: 45.0,
        altitude_m: 2000.0,
        connection: Connection::Delta,
        parallel_branches: 1,
        rotor_reconnection: RotorReconnection::StarToDelta,
    };

    let out = Pipeline::for_target(&initial, &target)
        .apply(initial.relabeled("Operating"))
        .unwrap();

    let steps: Vec<_> = out.audit.steps().collect();
    assert_eq!(
        steps,
        [
            "ambient temperature",
            "frequency/voltage",
            "voltage",
            "power",
            "altitude",
            "rotor connection",
            "rotor voltage",
            "rotor current",
        ]
    );

    let state = &out.state;
    assert_eq!(state.frequency_hz, 60.0);
    assert_eq!(state.voltage_v, 460.0);
    assert_eq!(state.power_kw, 110.0);
    assert_eq!(state.synchronous_speed().speed_rpm, 1800.0);

    let rotor = state.rotor.as_ref().unwrap();
    // 500 V / √3 = 289 V, then 289 · 460 / 400 = 332 V
    assert_eq!(rotor.voltage_v, 332.0);
    assert_eq!(rotor.connection, Some(Connection::Delta));
    // 121000 / (332 · √3) = 210.4 A
    assert_eq!(rotor.current_a, 210.4);
    state.check_invariants(tol()).unwrap();
}

#[test]
fn initial_state_is_untouched_by_pipeline() {
    let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
    let snapshot = initial.clone();
    let mut target = OperatingTarget::from_state(&initial);
    target.power_kw = 150.0;
    target.voltage_v = 690.0;

    let out = Pipeline::for_target(&initial, &target)
        .apply(initial.relabeled("Operating"))
        .unwrap();
    assert_eq!(initial, snapshot);
    assert_ne!(out.state.power_kw, initial.power_kw);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn connection() -> impl Strategy<Value = Connection> {
        prop_oneof![Just(Connection::Star), Just(Connection::Delta)]
    }

    fn rotor_reconnection() -> impl Strategy<Value = RotorReconnection> {
        prop_oneof![
            Just(RotorReconnection::Keep),
            Just(RotorReconnection::StarToDelta),
            Just(RotorReconnection::DeltaToStar),
        ]
    }

    proptest! {
        #[test]
        fn derived_values_stay_consistent(
            power in 20.0_f64..500.0,
            voltage in 200.0_f64..1000.0,
            frequency in 40.0_f64..70.0,
            ambient in 10.0_f64..60.0,
            altitude in 0.0_f64..4000.0,
            branches in 1_u32..5,
            conn in connection(),
        ) {
            let initial = MachineState::new(&nameplate(), 400.0, "Machine").unwrap();
            let target = OperatingTarget {
                power_kw: power,
                voltage_v: voltage,
                frequency_hz: frequency,
                ambient_temp_c: ambient,
                altitude_m: altitude,
                connection: conn,
                parallel_branches: branches,
                rotor_reconnection: RotorReconnection::Keep,
            };
            let out = Pipeline::for_target(&initial, &target)
                .apply(initial.relabeled("Operating"))
                .unwrap();
            prop_assert!(out.state.check_invariants(tol()).is_ok());
            prop_assert_eq!(out.state.connection, conn);
            prop_assert_eq!(out.state.parallel_branches, branches);
        }

        #[test]
        fn derived_values_consistent_after_every_step(
            power in 20.0_f64..500.0,
            voltage in 200.0_f64..1000.0,
            frequency in 40.0_f64..70.0,
            ambient in 10.0_f64..60.0,
            altitude in 0.0_f64..4000.0,
            branches in 1_u32..5,
            conn in connection(),
            rotor_reconnection in rotor_reconnection(),
        ) {
            let initial = MachineState::new(&nameplate(), 520.0, "Machine").unwrap();
            let target = OperatingTarget {
                power_kw: power,
                voltage_v: voltage,
                frequency_hz: frequency,
                ambient_temp_c: ambient,
                altitude_m: altitude,
                connection: conn,
                parallel_branches: branches,
                rotor_reconnection,
            };

            let pipeline = Pipeline::for_target(&initial, &target);
            let mut state = initial.relabeled("Operating");
            for step in pipeline.steps() {
                step.apply(&mut state).unwrap();
                prop_assert!(
                    state.check_invariants(tol()).is_ok(),
                    "stale derived values after step {}",
                    step.name()
                );
            }
        }

        #[test]
        fn connection_round_trip_is_identity(
            voltage in 100.0_f64..1000.0,
            conn in connection(),
        ) {
            let mut plate = nameplate();
            plate.voltage_v = voltage;
            plate.connection = conn;
            let before = MachineState::new(&plate, 0.0, "Machine").unwrap();

            let other = match conn {
                Connection::Star => Connection::Delta,
                Connection::Delta => Connection::Star,
            };
            let mut state = before.clone();
            state.change_connection(other).unwrap();
            state.change_connection(conn).unwrap();

            let t = Tolerances { abs: 1e-9, rel: 1e-9 };
            prop_assert!(asm_core::nearly_equal(state.voltage_v, before.voltage_v, t));
            prop_assert!(asm_core::nearly_equal(
                state.nominal_current_a(),
                before.nominal_current_a(),
                t
            ));
        }

        #[test]
        fn same_value_targets_are_silent(
            ambient_offset in -0.4_f64..0.4,
            voltage_offset in -0.4_f64..0.4,
        ) {
            let initial = MachineState::new(&nameplate(), 0.0, "Machine").unwrap();
            let mut target = OperatingTarget::from_state(&initial);
            target.ambient_temp_c += ambient_offset;
            target.voltage_v += voltage_offset;
            let out = Pipeline::for_target(&initial, &target)
                .apply(initial.clone())
                .unwrap();
            prop_assert!(out.audit.is_empty());
            prop_assert_eq!(out.state, initial);
        }
    }
}
