use chrono::Utc;
use ld_core::RunId;
use ld_results::{
    AssessmentReport, CapabilityDegradation, DamageLevel, DamageMetrics, DomainBreakdown, Grid,
    PerformanceDegradation, ResultsError, RunStore, SimulationResult, SimulationStatus,
};

fn completed_result() -> SimulationResult {
    let grid = Grid::new_2d(5, 5, [0.0, 4.0], [0.0, 4.0]).unwrap();
    let temperature = grid.sample(|x, y, _| 300.0 + x * 10.0 + y);

    let mut result = SimulationResult::new(RunId::new());
    result.mark_running(Utc::now()).unwrap();
    result.set_temperature_field(temperature);
    result.set_grid(grid);
    result.finish(SimulationStatus::Completed, Utc::now()).unwrap();
    result
}

#[test]
fn save_list_load_roundtrip() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = RunStore::new(dir.path().join("runs")).expect("failed to create run store");

    let result = completed_result();
    let id = result.id();
    store.save_result(&result).expect("failed to save result");

    assert!(store.has_run(&id));
    let runs = store.list_runs().expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, id);
    assert_eq!(runs[0].max_temperature, Some(344.0));

    let loaded = store.load_result(&id).expect("failed to load result");
    assert_eq!(loaded, result);
    loaded.check_invariants().unwrap();

    store.delete_run(&id).unwrap();
    assert!(!store.has_run(&id));
}

#[test]
fn missing_run_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().to_path_buf()).unwrap();
    assert!(matches!(
        store.load_result(&RunId::new()),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn assessment_is_stored_next_to_its_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().to_path_buf()).unwrap();
    let result = completed_result();
    store.save_result(&result).unwrap();

    let report = AssessmentReport {
        report_id: uuid::Uuid::new_v4(),
        run_id: result.id(),
        timestamp: Utc::now(),
        damage_level: DamageLevel::Moderate,
        composite_score: 0.3,
        surface_damage_ratio: 0.06,
        metrics: DamageMetrics::default(),
        performance: PerformanceDegradation::default(),
        domains: DomainBreakdown::default(),
        capability: CapabilityDegradation::default(),
        mission_impact: 0.0,
        recovery_possibility: 100.0,
        assessment_confidence: 100.0,
        executive_summary: "minor discoloration".to_string(),
        recommendations: vec![],
        charts: vec![],
        data_files: vec![],
    };

    let path = store.save_assessment(&report).unwrap();
    assert!(path.starts_with(store.run_dir(&result.id())));
    assert_eq!(store.load_assessment(&result.id()).unwrap(), report);
}

#[test]
fn assessment_without_run_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().to_path_buf()).unwrap();
    let report = AssessmentReport {
        report_id: uuid::Uuid::new_v4(),
        run_id: RunId::new(),
        timestamp: Utc::now(),
        damage_level: DamageLevel::Minimal,
        composite_score: 0.0,
        surface_damage_ratio: 0.0,
        metrics: DamageMetrics::default(),
        performance: PerformanceDegradation::default(),
        domains: DomainBreakdown::default(),
        capability: CapabilityDegradation::default(),
        mission_impact: 0.0,
        recovery_possibility: 100.0,
        assessment_confidence: 100.0,
        executive_summary: String::new(),
        recommendations: vec![],
        charts: vec![],
        data_files: vec![],
    };
    assert!(store.save_assessment(&report).is_err());
}
