//! Ordered re-rating pipeline.
//!
//! The step order is fixed: connection, parallel branches, ambient
//! temperature, frequency/voltage, voltage, power, altitude, a refresh of
//! the derived values, then the rotor steps. Later steps see the output of
//! earlier ones, so the voltage target is reached from whatever voltage the
//! reconnection and frequency steps left behind.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::connection::{Connection, RotorReconnection};
use crate::error::MachineResult;
use crate::state::MachineState;

/// Requested operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingTarget {
    pub power_kw: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub ambient_temp_c: f64,
    pub altitude_m: f64,
    pub connection: Connection,
    pub parallel_branches: u32,
    #[serde(default)]
    pub rotor_reconnection: RotorReconnection,
}

impl OperatingTarget {
    /// Target that reproduces the given state; every step is a no-op.
    pub fn from_state(state: &MachineState) -> Self {
        Self {
            power_kw: state.power_kw,
            voltage_v: state.voltage_v,
            frequency_hz: state.frequency_hz,
            ambient_temp_c: state.ambient_temp_c,
            altitude_m: state.altitude_m,
            connection: state.connection,
            parallel_branches: state.parallel_branches,
            rotor_reconnection: RotorReconnection::Keep,
        }
    }
}

/// One transformation rule together with its target.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Connection(Connection),
    ParallelBranches(u32),
    AmbientTemperature(f64),
    FrequencyVoltage(f64),
    Voltage(f64),
    Power(f64),
    Altitude(f64),
    /// Recompute nominal values and absolutes after all stator changes
    RefreshDerived,
    RotorConnection(RotorReconnection),
    RotorVoltage { initial_stator_voltage_v: f64 },
    RotorCurrent,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Connection(_) => "connection",
            Step::ParallelBranches(_) => "parallel branches",
            Step::AmbientTemperature(_) => "ambient temperature",
            Step::FrequencyVoltage(_) => "frequency/voltage",
            Step::Voltage(_) => "voltage",
            Step::Power(_) => "power",
            Step::Altitude(_) => "altitude",
            Step::RefreshDerived => "refresh",
            Step::RotorConnection(_) => "rotor connection",
            Step::RotorVoltage { .. } => "rotor voltage",
            Step::RotorCurrent => "rotor current",
        }
    }

    /// Apply the rule to `state` and return its audit fragment.
    pub fn apply(&self, state: &mut MachineState) -> MachineResult<String> {
        match *self {
            Step::Connection(target) => state.change_connection(target),
            Step::ParallelBranches(target) => state.change_parallel_branches(target),
            Step::AmbientTemperature(target) => state.change_ambient_temperature(target),
            Step::FrequencyVoltage(target) => state.change_frequency(target),
            Step::Voltage(target) => state.change_voltage(target),
            Step::Power(target) => state.change_power(target),
            Step::Altitude(target) => state.change_altitude(target),
            Step::RefreshDerived => {
                state.recompute_derived();
                Ok(String::new())
            }
            Step::RotorConnection(reconnection) => Ok(state.reconnect_rotor(reconnection)),
            Step::RotorVoltage {
                initial_stator_voltage_v,
            } => Ok(state.rescale_rotor_voltage(initial_stator_voltage_v)),
            Step::RotorCurrent => Ok(state.update_rotor_current()),
        }
    }
}

/// Audit text produced by one step.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditFragment {
    pub step: &'static str,
    pub text: String,
}

/// Ordered audit fragments of a pipeline run. Silent steps leave no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditTrail {
    pub fragments: Vec<AuditFragment>,
}

impl AuditTrail {
    pub fn push(&mut self, step: &'static str, text: String) {
        if !text.is_empty() {
            self.fragments.push(AuditFragment { step, text });
        }
    }

    /// Concatenated text of all fragments, in step order.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fragments.iter().map(|f| f.step)
    }
}

/// Final state and the audit trail that produced it.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub state: MachineState,
    pub audit: AuditTrail,
}

/// Fixed sequence of steps for one operating target.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn for_target(initial: &MachineState, target: &OperatingTarget) -> Self {
        let steps = vec![
            Step::Connection(target.connection),
            Step::ParallelBranches(target.parallel_branches),
            Step::AmbientTemperature(target.ambient_temp_c),
            Step::FrequencyVoltage(target.frequency_hz),
            Step::Voltage(target.voltage_v),
            Step::Power(target.power_kw),
            Step::Altitude(target.altitude_m),
            Step::RefreshDerived,
            Step::RotorConnection(target.rotor_reconnection),
            Step::RotorVoltage {
                initial_stator_voltage_v: initial.voltage_v,
            },
            Step::RotorCurrent,
        ];
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order on `state`.
    ///
    /// # Errors
    /// The first failing step aborts the run; the error carries the step name.
    pub fn apply(&self, mut state: MachineState) -> MachineResult<Transformed> {
        let mut audit = AuditTrail::default();
        for step in &self.steps {
            let text = step.apply(&mut state).map_err(|e| e.in_step(step.name()))?;
            debug!(step = step.name(), changed = !text.is_empty(), "pipeline step applied");
            audit.push(step.name(), text);
        }
        info!(
            label = %state.label,
            fragments = audit.fragments.len(),
            "operating point calculated"
        );
        Ok(Transformed { state, audit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MachineError;
    use crate::state::test_support::{reference_nameplate, reference_state};

    #[test]
    fn step_order_is_fixed() {
        let initial = reference_state();
        let pipeline = Pipeline::for_target(&initial, &OperatingTarget::from_state(&initial));
        let names: Vec<_> = pipeline.steps().iter().map(Step::name).collect();
        assert_eq!(
            names,
            [
                "connection",
                "parallel branches",
                "ambient temperature",
                "frequency/voltage",
                "voltage",
                "power",
                "altitude",
                "refresh",
                "rotor connection",
                "rotor voltage",
                "rotor current",
            ]
        );
    }

    #[test]
    fn identity_target_changes_nothing() {
        let initial = reference_state();
        let target = OperatingTarget::from_state(&initial);
        let out = Pipeline::for_target(&initial, &target)
            .apply(initial.clone())
            .unwrap();
        assert!(out.audit.is_empty());
        assert_eq!(out.state, initial);
    }

    #[test]
    fn rotor_current_is_reported_when_rotor_present() {
        let initial = MachineState::new(&reference_nameplate(), 500.0, "m").unwrap();
        let target = OperatingTarget::from_state(&initial);
        let out = Pipeline::for_target(&initial, &target)
            .apply(initial.clone())
            .unwrap();
        assert_eq!(out.audit.steps().collect::<Vec<_>>(), ["rotor current"]);
    }

    #[test]
    fn errors_carry_step_name() {
        let initial = reference_state();
        let mut target = OperatingTarget::from_state(&initial);
        target.altitude_m = 5000.0;
        let err = Pipeline::for_target(&initial, &target)
            .apply(initial.clone())
            .unwrap_err();
        match &err {
            MachineError::Step { step, .. } => assert_eq!(*step, "altitude"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(err.root(), MachineError::AltitudeOutOfRange { .. }));
    }

    #[test]
    fn target_deserializes_without_rotor_reconnection() {
        let yaml = r#"{"power_kw": 100, "voltage_v": 400, "frequency_hz": 50,
            "ambient_temp_c": 40, "altitude_m": 1000, "connection": "D",
            "parallel_branches": 1}"#;
        let target: OperatingTarget = serde_json::from_str(yaml).unwrap();
        assert_eq!(target.rotor_reconnection, RotorReconnection::Keep);
    }
}
