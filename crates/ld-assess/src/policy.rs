//! Weights, normalizers and thresholds of the damage classification.
//!
//! The defaults are engineering conventions with no cited derivation, so
//! they are kept as data and can be replaced per study.

use std::path::Path;

use ld_results::DamageLevel;
use serde::{Deserialize, Serialize};

use crate::{AssessError, AssessResult, DomainCriteria, EffectivenessParams};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessmentPolicy {
    /// Weights of thermal area, melt volume, stress concentration,
    /// structural loss, aerodynamic impact and functional loss.
    pub weights: [f64; 6],
    /// Lower bounds of MODERATE, SEVERE and CRITICAL.
    pub thresholds: [f64; 3],
    /// Area (mm^2) that saturates the thermal area indicator.
    pub area_scale: f64,
    /// Volume (mm^3) that saturates the melt volume indicator.
    pub melt_volume_scale: f64,
    /// Stress concentration that saturates its indicator.
    pub stress_concentration_scale: f64,
    /// Temperature rise (K) at which the surface counts as fully damaged.
    pub surface_damage_span_k: f64,
    pub aerodynamic_factor: f64,
    pub integrity_loss_factor: f64,
    /// Per-domain bands reported next to the composite.
    pub domains: DomainCriteria,
    pub effectiveness: EffectivenessParams,
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self {
            weights: [0.25, 0.20, 0.15, 0.20, 0.10, 0.10],
            thresholds: [0.25, 0.50, 0.75],
            area_scale: 50.0,
            melt_volume_scale: 25.0,
            stress_concentration_scale: 5.0,
            surface_damage_span_k: 700.0,
            aerodynamic_factor: 0.2,
            integrity_loss_factor: 0.5,
            domains: DomainCriteria::default(),
            effectiveness: EffectivenessParams::default(),
        }
    }
}

fn invalid(what: impl Into<String>) -> AssessError {
    AssessError::InvalidPolicy { what: what.into() }
}

impl AssessmentPolicy {
    pub fn load_yaml(path: &Path) -> AssessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let policy: AssessmentPolicy = serde_yaml::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> AssessResult<()> {
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("weights must be finite and non-negative"));
        }
        let total: f64 = self.weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(invalid(format!("weights sum to {total}, expected 1")));
        }
        let [a, b, c] = self.thresholds;
        if !(0.0 < a && a < b && b < c && c <= 1.0) {
            return Err(invalid(format!(
                "thresholds {:?} must increase strictly within (0, 1]",
                self.thresholds
            )));
        }
        for (name, v) in [
            ("area_scale", self.area_scale),
            ("melt_volume_scale", self.melt_volume_scale),
            ("stress_concentration_scale", self.stress_concentration_scale),
            ("surface_damage_span_k", self.surface_damage_span_k),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(format!("{name} must be > 0, got {v}")));
            }
        }
        for (name, v) in [
            ("aerodynamic_factor", self.aerodynamic_factor),
            ("integrity_loss_factor", self.integrity_loss_factor),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{name} must be >= 0, got {v}")));
            }
        }
        self.domains.validate()?;
        self.effectiveness.validate()
    }

    /// Band lookup; each threshold is the inclusive lower bound of the next
    /// band, so a score of exactly 0.25 is MODERATE.
    pub fn classify(&self, score: f64) -> DamageLevel {
        let [moderate, severe, critical] = self.thresholds;
        if score < moderate {
            DamageLevel::Minimal
        } else if score < severe {
            DamageLevel::Moderate
        } else if score < critical {
            DamageLevel::Severe
        } else {
            DamageLevel::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        AssessmentPolicy::default().validate().unwrap();
    }

    #[test]
    fn threshold_scores_fall_into_upper_band() {
        let p = AssessmentPolicy::default();
        assert_eq!(p.classify(0.0), DamageLevel::Minimal);
        assert_eq!(p.classify(0.2499), DamageLevel::Minimal);
        assert_eq!(p.classify(0.25), DamageLevel::Moderate);
        assert_eq!(p.classify(0.50), DamageLevel::Severe);
        assert_eq!(p.classify(0.75), DamageLevel::Critical);
        assert_eq!(p.classify(1.0), DamageLevel::Critical);
    }

    #[test]
    fn weights_must_sum_to_one() {
        let p = AssessmentPolicy {
            weights: [0.5, 0.5, 0.5, 0.0, 0.0, 0.0],
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn thresholds_must_increase() {
        let p = AssessmentPolicy {
            thresholds: [0.5, 0.25, 0.75],
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "thresholds: [0.2, 0.4, 0.6]\n").unwrap();
        let p = AssessmentPolicy::load_yaml(&path).unwrap();
        assert_eq!(p.thresholds, [0.2, 0.4, 0.6]);
        assert_eq!(p.weights, AssessmentPolicy::default().weights);
        assert_eq!(p.classify(0.45), DamageLevel::Severe);
        assert_eq!(p.domains, DomainCriteria::default());
    }

    #[test]
    fn nested_sections_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(
            &path,
            "domains:\n  overall_bands: [10.0, 5.0, 60.0, 80.0]\n",
        )
        .unwrap();
        assert!(AssessmentPolicy::load_yaml(&path).is_err());

        std::fs::write(&path, "effectiveness:\n  stress_scale: 5.0e8\n").unwrap();
        let p = AssessmentPolicy::load_yaml(&path).unwrap();
        assert_eq!(p.effectiveness.stress_scale, 5e8);
        assert_eq!(p.effectiveness.weights, [0.3, 0.2, 0.2, 0.3]);
    }
}
