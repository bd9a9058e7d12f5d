//! Categorical damage assessment over computed metrics.

use std::path::PathBuf;

use chrono::Utc;
use ld_config::{EnvironmentConfiguration, MaterialConfiguration};
use ld_core::RunId;
use ld_results::{
    AssessmentReport, DamageLevel, DamageMetrics, Grid, PerformanceDegradation, SimulationResult,
    SimulationStatus,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domains::{
    assessment_confidence, capability_degradation, classify_domains, mission_impact,
    recovery_possibility,
};
use crate::{
    AssessError, AssessResult, AssessmentPolicy, NOMINAL_MELT_DEPTH_MM, derive_damage_metrics,
};

/// Everything the classifier looks at. Built from a completed result, or
/// filled in directly from externally supplied scalars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentInput {
    pub run_id: RunId,
    pub max_temperature: f64,
    pub ambient_temperature: f64,
    /// `None` when the run produced no stress result.
    pub max_stress: Option<f64>,
    pub yield_strength: f64,
    pub melting_point: f64,
    /// Volume of the sampled patch, mm^3; `None` without a grid.
    #[serde(default)]
    pub target_volume_mm3: Option<f64>,
    pub metrics: DamageMetrics,
    /// Loss of component function, 0..=1; zero unless a caller knows better.
    #[serde(default)]
    pub functional_loss: f64,
    /// Artifacts of the run, carried into the report.
    #[serde(default)]
    pub data_files: Vec<PathBuf>,
}

/// Patch footprint times the sampled depth, or the nominal melt depth for
/// surface-only grids.
fn patch_volume_mm3(grid: &Grid) -> f64 {
    let width = grid.x_range_mm[1] - grid.x_range_mm[0];
    let height = grid.y_range_mm[1] - grid.y_range_mm[0];
    let thickness = if grid.is_3d() {
        grid.depth_mm
    } else {
        NOMINAL_MELT_DEPTH_MM
    };
    width * height * thickness
}

impl AssessmentInput {
    pub fn from_result(
        result: &SimulationResult,
        material: &MaterialConfiguration,
        environment: &EnvironmentConfiguration,
        component: &str,
    ) -> AssessResult<Self> {
        if result.status() != SimulationStatus::Completed {
            return Err(AssessError::NotCompleted {
                status: result.status(),
            });
        }
        let max_temperature = result.max_temperature().ok_or(AssessError::MissingField {
            what: "max temperature",
        })?;
        let metrics = derive_damage_metrics(result, material, component)?;

        Ok(Self {
            run_id: result.id(),
            max_temperature,
            ambient_temperature: environment.ambient_temperature_k,
            max_stress: result.max_stress(),
            yield_strength: material.effective_yield_strength(),
            melting_point: material.melting_point,
            target_volume_mm3: result.grid().map(patch_volume_mm3),
            metrics,
            functional_loss: 0.0,
            data_files: result.result_files.clone(),
        })
    }
}

/// Normalized indicators, each clamped to `[0, 1]`, in weight order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Indicators {
    pub thermal_area: f64,
    pub melt_volume: f64,
    pub stress_concentration: f64,
    pub structural_loss: f64,
    pub aerodynamic_impact: f64,
    pub functional_loss: f64,
}

impl Indicators {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.thermal_area,
            self.melt_volume,
            self.stress_concentration,
            self.structural_loss,
            self.aerodynamic_impact,
            self.functional_loss,
        ]
    }

    pub fn composite(&self, policy: &AssessmentPolicy) -> f64 {
        self.as_array()
            .iter()
            .zip(policy.weights.iter())
            .map(|(n, w)| n * w)
            .sum()
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Classifies `input` under `policy`. Never touches a solver.
pub fn assess(input: &AssessmentInput, policy: &AssessmentPolicy) -> AssessResult<AssessmentReport> {
    policy.validate()?;

    let surface_damage_ratio =
        unit((input.max_temperature - input.ambient_temperature) / policy.surface_damage_span_k);
    let aerodynamic_impact = surface_damage_ratio * policy.aerodynamic_factor;
    let stress_ratio = input.max_stress.unwrap_or(0.0) / input.yield_strength;
    let structural_integrity = (1.0 - stress_ratio * policy.integrity_loss_factor).max(0.0);

    let mut metrics = input.metrics.clone();
    metrics.aerodynamic_impact = aerodynamic_impact;
    metrics.structural_integrity = structural_integrity;

    let indicators = Indicators {
        thermal_area: unit(metrics.thermal_damage_area / policy.area_scale),
        melt_volume: unit(metrics.melting_volume / policy.melt_volume_scale),
        stress_concentration: unit(
            metrics.stress_concentration / policy.stress_concentration_scale,
        ),
        structural_loss: unit(1.0 - structural_integrity),
        aerodynamic_impact: unit(aerodynamic_impact),
        functional_loss: unit(input.functional_loss),
    };
    let composite_score = indicators.composite(policy);
    let damage_level = policy.classify(composite_score);
    let performance = PerformanceDegradation::from_aerodynamic_impact(aerodynamic_impact);

    let domains = classify_domains(input, &performance, &policy.domains);
    let capability = capability_degradation(structural_integrity, &performance, &domains);
    let recovery_possibility = recovery_possibility(&domains);
    let assessment_confidence = assessment_confidence(input);

    info!(
        run_id = %input.run_id,
        composite_score,
        level = %damage_level,
        domain_score = domains.overall_score,
        recovery_possibility,
        "damage assessed"
    );

    let executive_summary = format!(
        "Damage level {damage_level} (composite score {composite_score:.3}). Peak temperature \
         {:.1} K, peak stress {:.2} of yield, structural integrity {:.2}. Recovery possibility \
         {recovery_possibility:.0}%, confidence {assessment_confidence:.0}%.",
        input.max_temperature, stress_ratio, structural_integrity,
    );

    Ok(AssessmentReport {
        report_id: Uuid::new_v4(),
        run_id: input.run_id,
        timestamp: Utc::now(),
        damage_level,
        composite_score,
        surface_damage_ratio,
        recommendations: recommendations(damage_level, &metrics, recovery_possibility),
        metrics,
        performance,
        mission_impact: mission_impact(&capability),
        domains,
        capability,
        recovery_possibility,
        assessment_confidence,
        executive_summary,
        charts: Vec::new(),
        data_files: input.data_files.clone(),
    })
}

fn recommendations(level: DamageLevel, metrics: &DamageMetrics, recovery: f64) -> Vec<String> {
    let mut out = Vec::new();
    match level {
        DamageLevel::Minimal => {
            out.push("No structural action required; log the exposure.".to_string())
        }
        DamageLevel::Moderate => {
            out.push("Schedule a visual and thermographic inspection.".to_string())
        }
        DamageLevel::Severe => {
            out.push("Restrict the component from service pending inspection.".to_string())
        }
        DamageLevel::Critical => {
            out.push("Replace or repair the component before further use.".to_string())
        }
    }
    if metrics.has_melt_damage() {
        out.push(format!(
            "Inspect {:.2} mm^2 of melted surface for ablation and recast.",
            metrics.thermal_damage_area
        ));
    }
    if metrics.stress_concentration > 1.0 {
        out.push("Peak thermal stress exceeds yield; check for plastic deformation.".to_string());
    }
    if metrics.aerodynamic_impact > 0.1 {
        out.push("Evaluate aerodynamic performance of the affected surface.".to_string());
    }
    if level >= DamageLevel::Severe {
        out.push("Consider optimizing laser exposure parameters.".to_string());
    }
    if recovery < 30.0 {
        out.push("Recovery is unlikely; plan for component replacement.".to_string());
    }
    out.push("Validate these results experimentally.".to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_results::DomainSeverity;

    fn input(max_temperature: f64, max_stress: f64, metrics: DamageMetrics) -> AssessmentInput {
        AssessmentInput {
            run_id: RunId::new(),
            max_temperature,
            ambient_temperature: 293.15,
            max_stress: Some(max_stress),
            yield_strength: 250e6,
            melting_point: 933.0,
            target_volume_mm3: Some(10.0),
            metrics,
            functional_loss: 0.0,
            data_files: Vec::new(),
        }
    }

    #[test]
    fn cold_unstressed_part_is_minimal() {
        let report = assess(
            &input(293.15, 0.0, DamageMetrics::default()),
            &AssessmentPolicy::default(),
        )
        .unwrap();
        assert_eq!(report.damage_level, DamageLevel::Minimal);
        assert_eq!(report.composite_score, 0.0);
        assert_eq!(report.metrics.structural_integrity, 1.0);
        assert_eq!(report.surface_damage_ratio, 0.0);
    }

    #[test]
    fn derived_quantities_follow_their_formulas() {
        // 350 K rise -> ratio 0.5, stress at yield -> integrity 0.5
        let report = assess(
            &input(643.15, 250e6, DamageMetrics::default()),
            &AssessmentPolicy::default(),
        )
        .unwrap();
        assert!((report.surface_damage_ratio - 0.5).abs() < 1e-12);
        assert!((report.metrics.aerodynamic_impact - 0.1).abs() < 1e-12);
        assert!((report.metrics.structural_integrity - 0.5).abs() < 1e-12);
        assert!((report.performance.drag_change - 0.015).abs() < 1e-12);
    }

    #[test]
    fn integrity_never_goes_negative() {
        let report = assess(
            &input(293.15, 10.0 * 250e6, DamageMetrics::default()),
            &AssessmentPolicy::default(),
        )
        .unwrap();
        assert_eq!(report.metrics.structural_integrity, 0.0);
    }

    #[test]
    fn saturated_indicators_are_critical() {
        let metrics = DamageMetrics {
            thermal_damage_area: 500.0,
            melting_volume: 50.0,
            stress_concentration: 10.0,
            ..Default::default()
        };
        let mut i = input(2000.0, 2500e6, metrics);
        i.functional_loss = 1.0;
        let report = assess(&i, &AssessmentPolicy::default()).unwrap();
        // aerodynamic indicator tops out at the 0.2 factor
        assert!((report.composite_score - 0.92).abs() < 1e-9);
        assert_eq!(report.damage_level, DamageLevel::Critical);
        assert!(report.recommendations.len() >= 4);
    }

    #[test]
    fn report_carries_domain_view_and_data_files() {
        let metrics = DamageMetrics {
            thermal_damage_area: 20.0,
            melting_volume: 2.0,
            stress_concentration: 1.2,
            ..Default::default()
        };
        let mut i = input(1093.15, 320e6, metrics);
        i.data_files = vec![PathBuf::from("runs/a/temperature_a.csv")];
        let report = assess(&i, &AssessmentPolicy::default()).unwrap();

        // above 0.95 of melting and 1.2 of yield, a fifth of the patch melted
        assert_eq!(report.domains.thermal.severity, DomainSeverity::Critical);
        assert_eq!(report.domains.mechanical.severity, DomainSeverity::Critical);
        assert_eq!(report.domains.structural.severity, DomainSeverity::Moderate);
        assert_eq!(report.domains.functional.severity, DomainSeverity::None);
        assert!((report.domains.overall_score - 57.5).abs() < 1e-12);
        assert_eq!(report.domains.overall_severity, DomainSeverity::Moderate);

        // 100 - 86.25, then structural, thermal and mechanical penalties
        assert_eq!(report.recovery_possibility, 0.0);
        assert_eq!(report.assessment_confidence, 100.0);
        assert!(report.capability.structural_integrity > 0.0);
        assert!(report.mission_impact >= 0.0);
        assert_eq!(report.data_files, i.data_files);
        assert!(report.recommendations.iter().any(|r| r.contains("replacement")));
    }

    #[test]
    fn missing_stress_lowers_confidence_only() {
        let mut i = input(400.0, 0.0, DamageMetrics::default());
        i.max_stress = None;
        i.target_volume_mm3 = None;
        let report = assess(&i, &AssessmentPolicy::default()).unwrap();
        assert_eq!(report.assessment_confidence, 40.0);
        assert_eq!(report.metrics.structural_integrity, 1.0);
        assert_eq!(report.domains.mechanical.severity, DomainSeverity::None);
        // 400 K is 0.43 of melting
        assert_eq!(report.domains.thermal.severity, DomainSeverity::Light);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let policy = AssessmentPolicy {
            area_scale: 0.0,
            ..Default::default()
        };
        assert!(assess(&input(300.0, 0.0, DamageMetrics::default()), &policy).is_err());
    }

    #[test]
    fn pending_result_cannot_be_assessed() {
        let result = SimulationResult::new(RunId::new());
        let material = ld_config::catalog::lookup("aluminum_6061").unwrap();
        let err = AssessmentInput::from_result(
            &result,
            &material,
            &EnvironmentConfiguration::default(),
            "fuselage",
        )
        .unwrap_err();
        assert!(matches!(err, AssessError::NotCompleted { .. }));
    }
}
