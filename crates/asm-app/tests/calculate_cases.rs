use std::path::{Path, PathBuf};

use asm_app::{AppError, calculate_case, load_case, validate_case};
use asm_project::CaseFile;

fn case_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../cases")
        .join(name)
}

#[test]
fn bundled_cases_calculate() {
    for name in [
        "01_star_reconnection.yaml",
        "02_sixty_hertz_uprate.yaml",
        "03_slip_ring_rotor.yaml",
    ] {
        let case = load_case(&case_path(name)).unwrap_or_else(|e| panic!("{name}: {e}"));
        let calc = calculate_case(&case).unwrap_or_else(|e| panic!("{name}: {e}"));

        assert!(!calc.audit.is_empty(), "{name}: nothing changed");
        assert_eq!(calc.report.changes.rows.len(), 6);
        assert!(calc.report.full.contains("Percentual Changes"));
        assert!(calc.curves.failures().is_empty(), "{name}: {:?}", calc.curves.failures());
    }
}

#[test]
fn slip_ring_rotor_values() {
    let case = load_case(&case_path("03_slip_ring_rotor.yaml")).unwrap();
    let calc = calculate_case(&case).unwrap();

    // 520 V / √3 → 300 V, then scaled with the stator 400 → 440 V
    assert_eq!(calc.rotor.voltage_v, 330.0);
    assert_eq!(calc.rotor.connection, "D");
    assert_eq!(calc.rotor.current_a, 288.7);

    assert!(calc.report.full.contains("Rotor Parameters"));
    assert!(calc.report.full.contains("Initial Rotor Voltage: 520 V"));
    assert_eq!(calc.initial.label, "Slip-ring motor");
}

#[test]
fn sixty_hertz_keeps_pole_count() {
    let case = load_case(&case_path("02_sixty_hertz_uprate.yaml")).unwrap();
    let calc = calculate_case(&case).unwrap();

    assert_eq!(calc.initial.poles(), 6);
    assert_eq!(calc.operating.poles(), 6);
    assert_eq!(calc.operating.frequency_hz, 60.0);
    assert_eq!(calc.operating.power_kw, 290.0);
    assert_eq!(calc.operating.parallel_branches, 2);

    let curves = calc.curves.operating.as_ref().unwrap();
    assert!(curves.has_distinct_branch_curve());
    assert!((curves.sync_speed_rpm() - 1200.0).abs() < 1e-9);
}

#[test]
fn result_record_display_precision() {
    let case = load_case(&case_path("01_star_reconnection.yaml")).unwrap();
    let calc = calculate_case(&case).unwrap();

    let fields = calc.result.display_fields();
    assert_eq!(fields.len(), 15);
    let shown: Vec<_> = fields
        .iter()
        .map(|f| (f.name, f.value.display()))
        .collect();
    assert_eq!(shown[5], ("Connection Y/D", "Y".to_string()));
    assert!(shown[10].1.split('.').nth(1).is_some_and(|d| d.len() == 2));
    assert!(!shown[12].1.contains('.'));
}

#[test]
fn curve_failure_does_not_abort() {
    let mut case = CaseFile::template();
    // Mk below Ma has no slip solution; the pipeline itself is fine
    case.machine.max_torque_pct = 150.0;
    case.operating.voltage_v = 420.0;

    let calc = calculate_case(&case).unwrap();
    assert!(calc.curves.initial.is_err());
    assert!(calc.curves.operating.is_err());
    assert_eq!(calc.curves.failures().len(), 2);
    assert!(!calc.report.abbreviated.is_empty());
}

#[test]
fn invalid_case_is_rejected_before_calculation() {
    let mut case = CaseFile::template();
    case.operating.altitude_m = 4500.0;
    let path = std::env::temp_dir().join("asm_app_invalid_altitude.json");
    std::fs::write(&path, serde_json::to_string(&case).unwrap()).unwrap();

    let problems = validate_case(&path).unwrap();
    assert!(problems.iter().any(|p| p.contains("altitude")));
    assert!(matches!(load_case(&path), Err(AppError::Validation(_))));
}

#[test]
fn missing_case_file() {
    let err = load_case(Path::new("does/not/exist.yaml")).unwrap_err();
    assert!(matches!(err, AppError::CaseFileRead { .. }));
}
