//! Case validation logic.

use asm_machine::resolve_synchronous_speed;
use asm_machine::thermal::MAX_CORRECTED_ALTITUDE_M;

use crate::schema::{CaseFile, LATEST_VERSION, MachineDef, OperatingDef, RotorDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No plausible pole count in {context}: {speed_rpm} rpm at {frequency_hz} Hz")]
    NoPlausiblePoleCount {
        context: String,
        speed_rpm: f64,
        frequency_hz: f64,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Check a case and return the first violation.
pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    match collect_violations(case).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every violation in the case, in field order.
pub fn collect_violations(case: &CaseFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if case.version > LATEST_VERSION {
        errors.push(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    check_machine(&case.machine, &mut errors);
    check_operating(&case.operating, &mut errors);
    check_rotor(&case.rotor, &mut errors);

    // The operating speed follows the frequency at constant slip
    let machine = &case.machine;
    let operating = &case.operating;
    if positive(machine.speed_rpm) && positive(machine.frequency_hz) && positive(operating.frequency_hz) {
        let speed = machine.speed_rpm * operating.frequency_hz / machine.frequency_hz;
        if resolve_synchronous_speed(speed, operating.frequency_hz).is_err() {
            errors.push(ValidationError::NoPlausiblePoleCount {
                context: "operating".to_string(),
                speed_rpm: speed,
                frequency_hz: operating.frequency_hz,
            });
        }
    }
    errors
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, v: f64, errors: &mut Vec<ValidationError>) {
    if !positive(v) {
        errors.push(invalid(field, v, "must be positive and finite"));
    }
}

fn require_finite(field: &str, v: f64, errors: &mut Vec<ValidationError>) {
    if !v.is_finite() {
        errors.push(invalid(field, v, "must be finite"));
    }
}

fn require_altitude(field: &str, v: f64, errors: &mut Vec<ValidationError>) {
    if !(v.is_finite() && (0.0..=MAX_CORRECTED_ALTITUDE_M).contains(&v)) {
        errors.push(invalid(field, v, "must lie within 0..=4000 m"));
    }
}

fn require_branches(field: &str, v: u32, errors: &mut Vec<ValidationError>) {
    if v == 0 {
        errors.push(invalid(field, v, "must be at least 1"));
    }
}

fn check_machine(machine: &MachineDef, errors: &mut Vec<ValidationError>) {
    require_positive("machine.power_kw", machine.power_kw, errors);
    require_positive("machine.voltage_v", machine.voltage_v, errors);
    require_positive("machine.frequency_hz", machine.frequency_hz, errors);
    require_finite("machine.ambient_temp_c", machine.ambient_temp_c, errors);
    require_altitude("machine.altitude_m", machine.altitude_m, errors);
    require_branches("machine.parallel_branches", machine.parallel_branches, errors);
    require_positive("machine.starting_current_pct", machine.starting_current_pct, errors);
    require_positive("machine.starting_torque_pct", machine.starting_torque_pct, errors);
    require_positive("machine.max_torque_pct", machine.max_torque_pct, errors);

    if !(machine.efficiency_pct.is_finite() && (1.0..100.0).contains(&machine.efficiency_pct)) {
        errors.push(invalid(
            "machine.efficiency_pct",
            machine.efficiency_pct,
            "must lie within [1, 100)",
        ));
    }
    if !(machine.power_factor.is_finite() && (0.1..0.99).contains(&machine.power_factor)) {
        errors.push(invalid(
            "machine.power_factor",
            machine.power_factor,
            "must lie within [0.1, 0.99)",
        ));
    }

    require_positive("machine.speed_rpm", machine.speed_rpm, errors);
    require_positive("machine.temperature_rise_k", machine.temperature_rise_k, errors);

    if positive(machine.speed_rpm)
        && positive(machine.frequency_hz)
        && resolve_synchronous_speed(machine.speed_rpm, machine.frequency_hz).is_err()
    {
        errors.push(ValidationError::NoPlausiblePoleCount {
            context: "machine".to_string(),
            speed_rpm: machine.speed_rpm,
            frequency_hz: machine.frequency_hz,
        });
    }
}

fn check_operating(operating: &OperatingDef, errors: &mut Vec<ValidationError>) {
    require_positive("operating.power_kw", operating.power_kw, errors);
    require_positive("operating.voltage_v", operating.voltage_v, errors);
    require_positive("operating.frequency_hz", operating.frequency_hz, errors);
    require_finite("operating.ambient_temp_c", operating.ambient_temp_c, errors);
    require_altitude("operating.altitude_m", operating.altitude_m, errors);
    require_branches("operating.parallel_branches", operating.parallel_branches, errors);
}

fn check_rotor(rotor: &RotorDef, errors: &mut Vec<ValidationError>) {
    if !(rotor.voltage_v.is_finite() && rotor.voltage_v >= 0.0) {
        errors.push(invalid(
            "rotor.voltage_v",
            rotor.voltage_v,
            "must be non-negative and finite",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_valid() {
        validate_case(&CaseFile::template()).unwrap();
    }

    #[test]
    fn efficiency_upper_bound_is_open() {
        let mut case = CaseFile::template();
        case.machine.efficiency_pct = 100.0;
        let err = validate_case(&case).unwrap_err();
        assert!(err.to_string().contains("machine.efficiency_pct"));

        case.machine.efficiency_pct = 1.0;
        validate_case(&case).unwrap();
    }

    #[test]
    fn power_factor_range() {
        let mut case = CaseFile::template();
        case.machine.power_factor = 0.99;
        assert!(validate_case(&case).is_err());
        case.machine.power_factor = 0.1;
        assert!(validate_case(&case).is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let mut case = CaseFile::template();
        case.machine.voltage_v = 0.0;
        case.operating.parallel_branches = 0;
        case.rotor.voltage_v = -5.0;
        let errors = collect_violations(&case);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn implausible_speed_is_reported() {
        let mut case = CaseFile::template();
        case.machine.speed_rpm = 2000.0;
        let err = validate_case(&case).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NoPlausiblePoleCount { ref context, .. } if context == "machine"
        ));
    }

    #[test]
    fn altitude_above_4000_is_rejected() {
        let mut case = CaseFile::template();
        case.operating.altitude_m = 4500.0;
        assert!(validate_case(&case).is_err());
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut case = CaseFile::template();
        case.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_case(&case),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}
