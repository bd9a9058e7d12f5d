use chrono::Utc;
use ld_assess::{
    AssessmentInput, AssessmentPolicy, assess, calculate_effectiveness, compare_effectiveness,
    derive_damage_metrics,
};
use ld_config::{EnvironmentConfiguration, LaserConfiguration, MaterialConfiguration, catalog};
use ld_core::RunId;
use ld_results::{DamageLevel, DomainSeverity, Grid, SimulationResult, SimulationStatus};
use proptest::prelude::*;

fn gaussian_result(peak_rise: f64) -> SimulationResult {
    let grid = Grid::new_2d(51, 51, [0.0, 10.0], [0.0, 10.0]).unwrap();
    let field = grid.sample(|x, y, _| {
        let r2 = (x - 5.0).powi(2) + (y - 5.0).powi(2);
        293.15 + peak_rise * (-r2 / 6.25).exp()
    });
    let mut r = SimulationResult::new(RunId::new());
    r.mark_running(Utc::now()).unwrap();
    r.set_temperature_field(field);
    r.set_grid(grid);
    r
}

fn aluminum() -> MaterialConfiguration {
    catalog::lookup("aluminum_6061").unwrap()
}

#[test]
fn completed_reference_run_is_moderate() {
    let mut result = gaussian_result(800.0);
    let stress = result
        .temperature_field()
        .unwrap()
        .map(|t| 70e9 * 23e-6 * (t - 293.15) / 0.67);
    result.set_stress_fields(stress.clone(), stress.map(f64::abs));
    result.finish(SimulationStatus::Completed, Utc::now()).unwrap();

    let input = AssessmentInput::from_result(
        &result,
        &aluminum(),
        &EnvironmentConfiguration::default(),
        "fuselage",
    )
    .unwrap();
    assert!(input.metrics.thermal_damage_area > 0.0);
    assert_eq!(input.metrics.affected_components, vec!["fuselage".to_string()]);

    let report = assess(&input, &AssessmentPolicy::default()).unwrap();
    assert_eq!(report.run_id, result.id());
    assert_eq!(report.damage_level, DamageLevel::Moderate);
    assert_eq!(report.metrics.structural_integrity, 0.0);
    assert_eq!(report.surface_damage_ratio, 1.0);

    let dict = report.to_dict().unwrap();
    assert_eq!(dict["damage_level"], "MODERATE");

    // 10 mm x 10 mm patch at the nominal melt depth
    assert!((input.target_volume_mm3.unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(report.domains.thermal.severity, DomainSeverity::Critical);
    assert_eq!(report.domains.mechanical.severity, DomainSeverity::Critical);
    assert_eq!(report.assessment_confidence, 100.0);
    assert!(report.recovery_possibility < 100.0);
}

#[test]
fn unstressed_result_is_assessed_with_lower_confidence() {
    // 50 K rise stays below 0.4 of the melting point
    let mut result = gaussian_result(50.0);
    result.finish(SimulationStatus::Completed, Utc::now()).unwrap();
    let input = AssessmentInput::from_result(
        &result,
        &aluminum(),
        &EnvironmentConfiguration::default(),
        "wing",
    )
    .unwrap();
    assert_eq!(input.max_stress, None);

    let report = assess(&input, &AssessmentPolicy::default()).unwrap();
    assert_eq!(report.assessment_confidence, 70.0);
    assert!(report.domains.damage_types().is_empty());
    assert_eq!(report.recovery_possibility, 100.0);
}

#[test]
fn more_power_is_more_effective() {
    let material = aluminum();
    let policy = AssessmentPolicy::default();
    let metrics: Vec<_> = [(300.0, 500.0), (900.0, 2000.0)]
        .into_iter()
        .map(|(rise, power)| {
            let mut result = gaussian_result(rise);
            result.finish(SimulationStatus::Completed, Utc::now()).unwrap();
            let input = AssessmentInput::from_result(
                &result,
                &material,
                &EnvironmentConfiguration::default(),
                "fuselage",
            )
            .unwrap();
            let laser = LaserConfiguration::new(power, 1064.0, 5.0);
            calculate_effectiveness(&laser, &material, &input, &policy.effectiveness).unwrap()
        })
        .collect();

    assert!(metrics[1].overall_effectiveness > metrics[0].overall_effectiveness);
    assert!(metrics[1].target_vulnerability > metrics[0].target_vulnerability);

    let spread = compare_effectiveness(&metrics).unwrap();
    assert_eq!(spread.count, 2);
    assert_eq!(
        spread.overall_effectiveness.best,
        metrics[1].overall_effectiveness
    );
    assert!(spread.overall_effectiveness.variance > 0.0);
}

#[test]
fn stricter_policy_raises_the_level() {
    let mut result = gaussian_result(800.0);
    result.finish(SimulationStatus::Completed, Utc::now()).unwrap();
    let input = AssessmentInput::from_result(
        &result,
        &aluminum(),
        &EnvironmentConfiguration::default(),
        "fuselage",
    )
    .unwrap();

    let lenient = assess(&input, &AssessmentPolicy::default()).unwrap();
    let strict = AssessmentPolicy {
        thresholds: [0.01, 0.02, 0.03],
        ..Default::default()
    };
    let harsh = assess(&input, &strict).unwrap();
    assert!(harsh.damage_level > lenient.damage_level);
    assert_eq!(harsh.composite_score, lenient.composite_score);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn deriving_metrics_twice_is_identical(rise in 0.0f64..3000.0) {
        let result = gaussian_result(rise);
        let a = derive_damage_metrics(&result, &aluminum(), "fuselage").unwrap();
        let b = derive_damage_metrics(&result, &aluminum(), "fuselage").unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn damage_area_is_zero_iff_peak_at_or_below_melting(rise in 0.0f64..1500.0) {
        let result = gaussian_result(rise);
        let material = aluminum();
        let m = derive_damage_metrics(&result, &material, "fuselage").unwrap();
        let peak = result.max_temperature().unwrap();
        if peak <= material.melting_point {
            prop_assert_eq!(m.thermal_damage_area, 0.0);
        } else {
            prop_assert!(m.thermal_damage_area > 0.0);
        }
    }
}
