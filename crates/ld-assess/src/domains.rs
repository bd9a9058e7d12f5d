//! Per-domain damage bands and the quantities derived from them.
//!
//! Each domain compares one physical quantity against four material-relative
//! thresholds opening LIGHT, MODERATE, SEVERE and CRITICAL, and maps the band
//! to a fixed score on a 0..=100 scale.

use ld_results::{
    CapabilityDegradation, DamageDomain, DomainBreakdown, DomainScore, DomainSeverity,
    PerformanceDegradation,
};
use serde::{Deserialize, Serialize};

use crate::{AssessError, AssessResult, AssessmentInput};

const THERMAL_SCORES: [f64; 4] = [25.0, 50.0, 70.0, 90.0];
const MECHANICAL_SCORES: [f64; 4] = [20.0, 45.0, 65.0, 85.0];
const STRUCTURAL_SCORES: [f64; 4] = [30.0, 55.0, 75.0, 95.0];
const FUNCTIONAL_SCORES: [f64; 4] = [15.0, 40.0, 60.0, 80.0];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DomainCriteria {
    /// Fractions of the melting point.
    pub temperature_fractions: [f64; 4],
    /// Fractions of the yield strength.
    pub stress_fractions: [f64; 4],
    /// Melted volume over sampled patch volume.
    pub volume_ratios: [f64; 4],
    /// Functional loss ratio.
    pub functional_ratios: [f64; 4],
    /// Bands of the mean domain score.
    pub overall_bands: [f64; 4],
}

impl Default for DomainCriteria {
    fn default() -> Self {
        Self {
            temperature_fractions: [0.4, 0.6, 0.8, 0.95],
            stress_fractions: [0.3, 0.6, 0.9, 1.2],
            volume_ratios: [0.05, 0.15, 0.35, 0.60],
            functional_ratios: [0.10, 0.30, 0.60, 0.85],
            overall_bands: [10.0, 35.0, 60.0, 80.0],
        }
    }
}

impl DomainCriteria {
    pub fn validate(&self) -> AssessResult<()> {
        for (name, bounds) in [
            ("temperature_fractions", self.temperature_fractions),
            ("stress_fractions", self.stress_fractions),
            ("volume_ratios", self.volume_ratios),
            ("functional_ratios", self.functional_ratios),
            ("overall_bands", self.overall_bands),
        ] {
            let positive = bounds.iter().all(|b| b.is_finite() && *b > 0.0);
            let increasing = bounds.windows(2).all(|w| w[0] < w[1]);
            if !positive || !increasing {
                return Err(AssessError::InvalidPolicy {
                    what: format!("{name} {bounds:?} must be positive and strictly increasing"),
                });
            }
        }
        Ok(())
    }
}

/// Inclusive lower bounds; NaN lands in `None`.
fn band(value: f64, bounds: [f64; 4]) -> DomainSeverity {
    if !(value >= bounds[0]) {
        DomainSeverity::None
    } else if value < bounds[1] {
        DomainSeverity::Light
    } else if value < bounds[2] {
        DomainSeverity::Moderate
    } else if value < bounds[3] {
        DomainSeverity::Severe
    } else {
        DomainSeverity::Critical
    }
}

fn scored(severity: DomainSeverity, scores: [f64; 4]) -> DomainScore {
    let score = match severity {
        DomainSeverity::None => 0.0,
        DomainSeverity::Light => scores[0],
        DomainSeverity::Moderate => scores[1],
        DomainSeverity::Severe => scores[2],
        DomainSeverity::Critical => scores[3],
    };
    DomainScore { score, severity }
}

fn scaled(fractions: [f64; 4], by: f64) -> [f64; 4] {
    fractions.map(|f| f * by)
}

/// Loss of function as a ratio: the larger of the caller-supplied loss and
/// the strongest aerodynamic change.
pub fn functional_loss_ratio(input: &AssessmentInput, performance: &PerformanceDegradation) -> f64 {
    input.functional_loss.max(performance.magnitude())
}

pub fn classify_domains(
    input: &AssessmentInput,
    performance: &PerformanceDegradation,
    criteria: &DomainCriteria,
) -> DomainBreakdown {
    let thermal = band(
        input.max_temperature,
        scaled(criteria.temperature_fractions, input.melting_point),
    );
    let mechanical = band(
        input.max_stress.unwrap_or(0.0),
        scaled(criteria.stress_fractions, input.yield_strength),
    );
    let structural = match input.target_volume_mm3 {
        Some(volume) if volume > 0.0 => {
            band(input.metrics.melting_volume / volume, criteria.volume_ratios)
        }
        _ => DomainSeverity::None,
    };
    let functional = band(
        functional_loss_ratio(input, performance),
        criteria.functional_ratios,
    );

    let thermal = scored(thermal, THERMAL_SCORES);
    let mechanical = scored(mechanical, MECHANICAL_SCORES);
    let structural = scored(structural, STRUCTURAL_SCORES);
    let functional = scored(functional, FUNCTIONAL_SCORES);
    let overall_score =
        (thermal.score + mechanical.score + structural.score + functional.score) / 4.0;

    DomainBreakdown {
        thermal,
        mechanical,
        structural,
        functional,
        overall_score,
        overall_severity: band(overall_score, criteria.overall_bands),
    }
}

fn percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

pub fn capability_degradation(
    structural_integrity: f64,
    performance: &PerformanceDegradation,
    domains: &DomainBreakdown,
) -> CapabilityDegradation {
    let flight_performance = percent(performance.magnitude() * 100.0);
    let structural_integrity = percent((1.0 - structural_integrity) * 100.0);
    let functional_capability = percent(domains.functional.score);
    CapabilityDegradation {
        flight_performance,
        structural_integrity,
        functional_capability,
        mission_systems: functional_capability,
        maneuverability: flight_performance,
        survivability: 0.4 * structural_integrity
            + 0.3 * flight_performance
            + 0.3 * functional_capability,
    }
}

pub fn mission_impact(capability: &CapabilityDegradation) -> f64 {
    percent(capability.flight_performance * 1.2)
}

/// Falls with the mean domain score; structural, thermal and mechanical
/// damage each subtract a further fixed penalty.
pub fn recovery_possibility(domains: &DomainBreakdown) -> f64 {
    let base = (100.0 - domains.overall_score * 1.5).max(0.0);
    let penalty: f64 = domains
        .damage_types()
        .into_iter()
        .map(|d| match d {
            DamageDomain::Structural => 20.0,
            DamageDomain::Thermal => 15.0,
            DamageDomain::Mechanical => 10.0,
            DamageDomain::Functional => 0.0,
        })
        .sum();
    (base - penalty).max(0.0)
}

/// 40 for the thermal result every assessment has, 30 each for a stress
/// result and for patch geometry.
pub fn assessment_confidence(input: &AssessmentInput) -> f64 {
    let mut confidence = 40.0;
    if input.max_stress.is_some() {
        confidence += 30.0;
    }
    if input.target_volume_mm3.is_some() {
        confidence += 30.0;
    }
    confidence
}
