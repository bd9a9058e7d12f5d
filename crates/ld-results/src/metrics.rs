use serde::{Deserialize, Serialize};

/// Scalar damage indicators reduced from a completed run.
///
/// The deriver fills the raw metrics; `structural_integrity` and
/// `aerodynamic_impact` stay at their defaults until an assessment computes
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DamageMetrics {
    /// mm^2 of surface above the melting point.
    pub thermal_damage_area: f64,
    /// mm^3, area times the nominal melt depth.
    pub melting_volume: f64,
    /// Peak stress over yield strength.
    pub stress_concentration: f64,
    /// 1 = undamaged, 0 = no remaining load capacity.
    pub structural_integrity: f64,
    pub aerodynamic_impact: f64,
    /// mm
    pub damage_depth: f64,
    #[serde(default)]
    pub affected_components: Vec<String>,
}

impl Default for DamageMetrics {
    fn default() -> Self {
        Self {
            thermal_damage_area: 0.0,
            melting_volume: 0.0,
            stress_concentration: 0.0,
            structural_integrity: 1.0,
            aerodynamic_impact: 0.0,
            damage_depth: 0.0,
            affected_components: Vec::new(),
        }
    }
}

impl DamageMetrics {
    pub fn has_melt_damage(&self) -> bool {
        self.thermal_damage_area > 0.0
    }
}

/// Relative change of flight characteristics caused by surface damage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PerformanceDegradation {
    pub lift_change: f64,
    pub drag_change: f64,
    pub stability_change: f64,
}

impl PerformanceDegradation {
    pub fn from_aerodynamic_impact(impact: f64) -> Self {
        Self {
            lift_change: -impact * 0.1,
            drag_change: impact * 0.15,
            stability_change: -impact * 0.2,
        }
    }

    /// Largest relative change of the three, as a non-negative ratio.
    pub fn magnitude(&self) -> f64 {
        self.lift_change
            .abs()
            .max(self.drag_change.abs())
            .max(self.stability_change.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_describe_an_intact_part() {
        let m = DamageMetrics::default();
        assert_eq!(m.structural_integrity, 1.0);
        assert!(!m.has_melt_damage());
    }

    #[test]
    fn degradation_scales_with_impact() {
        let d = PerformanceDegradation::from_aerodynamic_impact(0.2);
        assert!((d.lift_change + 0.02).abs() < 1e-12);
        assert!((d.drag_change - 0.03).abs() < 1e-12);
        assert!((d.stability_change + 0.04).abs() < 1e-12);
        assert!((d.magnitude() - 0.04).abs() < 1e-12);
    }
}
