//! The calculate service: one full re-rating of a machine.

use asm_machine::{AuditTrail, MachineState, Nameplate, OperatingTarget, Pipeline};
use asm_project::{CaseFile, LabelsDef};
use asm_report::Report;
use serde::Serialize;
use tracing::info;

use crate::curves::CurveSet;
use crate::error::AppResult;
use crate::records::{ResultRecord, RotorRecord};

/// Everything one calculation produces.
#[derive(Debug, Clone)]
pub struct Calculation {
    /// The machine as built; never mutated
    pub initial: MachineState,
    /// The machine at the requested operating point
    pub operating: MachineState,
    pub audit: AuditTrail,
    pub result: ResultRecord,
    pub rotor: RotorRecord,
    pub report: Report,
    pub curves: CurveSet,
}

#[derive(Serialize)]
struct RecordsExport<'a> {
    machine: &'a str,
    operating: &'a str,
    result: &'a ResultRecord,
    rotor: &'a RotorRecord,
}

impl Calculation {
    /// Result and rotor records as pretty JSON.
    pub fn records_json(&self) -> AppResult<String> {
        let export = RecordsExport {
            machine: &self.initial.label,
            operating: &self.operating.label,
            result: &self.result,
            rotor: &self.rotor,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

/// Re-rate a machine to `target`.
///
/// Builds the initial state from `nameplate`, drives a copy of it through
/// the pipeline, assembles the report and fits the curves of both states.
///
/// # Errors
/// A construction or transformation error aborts the whole calculation. A
/// curve fit failure does not; it is kept in [`CurveSet`].
pub fn calculate(
    nameplate: &Nameplate,
    rotor_voltage_v: f64,
    target: &OperatingTarget,
    labels: &LabelsDef,
) -> AppResult<Calculation> {
    info!(
        power_kw = nameplate.power_kw,
        voltage_v = nameplate.voltage_v,
        frequency_hz = nameplate.frequency_hz,
        "calculation started"
    );

    let initial = MachineState::new(nameplate, rotor_voltage_v, labels.machine.as_str())?;
    let pipeline = Pipeline::for_target(&initial, target);
    let transformed = pipeline.apply(initial.relabeled(labels.operating.as_str()))?;

    let report = Report::assemble(&initial, &transformed)?;
    let curves = CurveSet::fit(&initial, &transformed.state);

    let operating = transformed.state;
    let result = ResultRecord::from_state(&operating);
    let rotor = RotorRecord::from_state(&operating);

    info!(
        steps = transformed.audit.fragments.len(),
        power_kw = operating.power_kw,
        voltage_v = operating.voltage_v,
        curve_failures = curves.failures().len(),
        "calculation finished"
    );

    Ok(Calculation {
        initial,
        operating,
        audit: transformed.audit,
        result,
        rotor,
        report,
        curves,
    })
}

pub fn calculate_case(case: &CaseFile) -> AppResult<Calculation> {
    calculate(&case.nameplate(), case.rotor.voltage_v, &case.target(), &case.labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm_machine::Connection;

    #[test]
    fn unchanged_operating_point_is_silent() {
        let case = CaseFile::template();
        let calc = calculate_case(&case).unwrap();

        assert!(calc.audit.is_empty());
        assert_eq!(calc.operating.label, "Operating");
        assert_eq!(calc.initial.label, "Machine");
        assert_eq!(calc.result.power_kw, case.machine.power_kw);
        assert!(calc.report.changes.rows.iter().all(|row| row.change_pct == 0.0));
    }

    #[test]
    fn star_reconnection_reported() {
        let mut case = CaseFile::template();
        case.operating.connection = Connection::Star;
        let calc = calculate_case(&case).unwrap();

        assert!(calc.report.abbreviated.contains("Connection D --> Y"));
        assert_eq!(calc.result.connection, "Y");
        assert_eq!(calc.rotor.connection, "");
        assert!(calc.curves.failures().is_empty());
    }

    #[test]
    fn records_export_as_json() {
        let calc = calculate_case(&CaseFile::template()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&calc.records_json().unwrap()).unwrap();
        assert_eq!(json["operating"], "Operating");
        assert_eq!(json["result"]["parallel_branches"], 1);
        assert_eq!(json["rotor"]["voltage_v"], 0.0);
    }
}
