//! Assessment report data.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ld_core::RunId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::{DamageMetrics, PerformanceDegradation};

/// Ordered severity: `Minimal < Moderate < Severe < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageLevel {
    Minimal,
    Moderate,
    Severe,
    Critical,
}

impl DamageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DamageLevel::Minimal => "MINIMAL",
            DamageLevel::Moderate => "MODERATE",
            DamageLevel::Severe => "SEVERE",
            DamageLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for DamageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five-step severity of a single damage domain. `None` means the domain
/// shows no damage at all.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainSeverity {
    #[default]
    None,
    Light,
    Moderate,
    Severe,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DamageDomain {
    Thermal,
    Mechanical,
    Structural,
    Functional,
}

/// Score on a 0..=100 scale and the band it came from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainScore {
    pub score: f64,
    pub severity: DomainSeverity,
}

/// Per-domain view of the damage, next to the weighted composite.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainBreakdown {
    pub thermal: DomainScore,
    pub mechanical: DomainScore,
    pub structural: DomainScore,
    pub functional: DomainScore,
    /// Mean of the four domain scores.
    pub overall_score: f64,
    pub overall_severity: DomainSeverity,
}

impl DomainBreakdown {
    pub fn domains(&self) -> [(DamageDomain, DomainScore); 4] {
        [
            (DamageDomain::Thermal, self.thermal),
            (DamageDomain::Mechanical, self.mechanical),
            (DamageDomain::Structural, self.structural),
            (DamageDomain::Functional, self.functional),
        ]
    }

    /// Domains with any damage, in fixed domain order.
    pub fn damage_types(&self) -> Vec<DamageDomain> {
        self.domains()
            .into_iter()
            .filter(|(_, s)| s.severity != DomainSeverity::None)
            .map(|(d, _)| d)
            .collect()
    }
}

/// Capability losses in percent, 0 = unaffected.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CapabilityDegradation {
    pub flight_performance: f64,
    pub structural_integrity: f64,
    pub functional_capability: f64,
    pub mission_systems: f64,
    pub maneuverability: f64,
    pub survivability: f64,
}

/// Created once per completed run; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentReport {
    pub report_id: Uuid,
    pub run_id: RunId,
    pub timestamp: DateTime<Utc>,
    pub damage_level: DamageLevel,
    pub composite_score: f64,
    pub surface_damage_ratio: f64,
    pub metrics: DamageMetrics,
    pub performance: PerformanceDegradation,
    #[serde(default)]
    pub domains: DomainBreakdown,
    #[serde(default)]
    pub capability: CapabilityDegradation,
    /// Percent, grows with flight performance loss.
    #[serde(default)]
    pub mission_impact: f64,
    /// Percent chance the component can be restored to service.
    #[serde(default)]
    pub recovery_possibility: f64,
    /// Percent, reflects which kinds of data backed the assessment.
    #[serde(default)]
    pub assessment_confidence: f64,
    pub executive_summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub charts: Vec<PathBuf>,
    #[serde(default)]
    pub data_files: Vec<PathBuf>,
}

impl AssessmentReport {
    /// Dict projection consumed by presentation and reporting layers.
    pub fn to_dict(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
