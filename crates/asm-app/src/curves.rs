//! Curves of both machine states, with fit failures kept per state.

use asm_curves::{CurveError, CurveSample, MachineCurves, PercentBase, csv_header};
use asm_machine::MachineState;
use tracing::warn;

/// Torque and current curves of the initial and the operating machine.
///
/// A failing fit only drops the curves of that state; the other state and
/// the rest of the calculation are unaffected.
#[derive(Debug, Clone)]
pub struct CurveSet {
    /// Percent values of both states are relative to the initial machine
    pub base: PercentBase,
    pub initial: Result<MachineCurves, CurveError>,
    pub operating: Result<MachineCurves, CurveError>,
}

impl CurveSet {
    pub fn fit(initial: &MachineState, operating: &MachineState) -> Self {
        Self {
            base: PercentBase::from_state(initial),
            initial: fit_logged(initial),
            operating: fit_logged(operating),
        }
    }

    /// Curves that could be fitted, initial first.
    pub fn fitted(&self) -> impl Iterator<Item = &MachineCurves> {
        [&self.initial, &self.operating]
            .into_iter()
            .filter_map(|curves| curves.as_ref().ok())
    }

    /// Messages of the fits that failed.
    pub fn failures(&self) -> Vec<String> {
        [&self.initial, &self.operating]
            .into_iter()
            .filter_map(|curves| curves.as_ref().err())
            .map(|e| e.to_string())
            .collect()
    }

    /// Sampled grid of every fitted state, labelled.
    pub fn samples(&self) -> Vec<(String, Vec<CurveSample>)> {
        self.fitted()
            .map(|curves| (curves.label.clone(), curves.sample(&curves.grid(), &self.base)))
            .collect()
    }

    /// CSV of all samples followed by the nominal point of each state,
    /// labelled `<label> nominal`.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(csv_header());
        csv.push('\n');
        for (label, samples) in self.samples() {
            for sample in &samples {
                csv.push_str(&sample.csv_row(&label));
                csv.push('\n');
            }
        }
        for curves in self.fitted() {
            let label = format!("{} nominal", curves.label);
            csv.push_str(&curves.nominal_point(&self.base).csv_row(&label));
            csv.push('\n');
        }
        csv
    }
}

fn fit_logged(state: &MachineState) -> Result<MachineCurves, CurveError> {
    MachineCurves::fit(state).inspect_err(|e| {
        warn!(label = %state.label, error = %e, "curve fit failed");
    })
}
