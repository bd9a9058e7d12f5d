//! Engagement effectiveness of a laser exposure, in percent.
//!
//! Four indicators, each clamped to 0..=100, and their weighted sum:
//! - damage efficiency: melted volume (cm^3) per joule delivered, times 100
//! - energy utilization: absorptivity times the saturating temperature rise
//! - target vulnerability: peak over melting temperature, reduced for good
//!   conductors
//! - weapon lethality: mean of saturating power density and peak stress

use std::fmt;

use ld_config::{LaserConfiguration, MaterialConfiguration};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AssessError, AssessResult, AssessmentInput};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectivenessParams {
    /// Weights of damage efficiency, energy utilization, target
    /// vulnerability and weapon lethality.
    pub weights: [f64; 4],
    /// Temperature rise (K) that saturates energy utilization.
    pub utilization_span_k: f64,
    /// Conductivity (W/m/K) at which the vulnerability factor bottoms out.
    pub conductivity_scale: f64,
    pub min_conductivity_factor: f64,
    /// Power density (W/m^2) that saturates lethality.
    pub power_density_scale: f64,
    /// Stress (Pa) that saturates lethality.
    pub stress_scale: f64,
}

impl Default for EffectivenessParams {
    fn default() -> Self {
        Self {
            weights: [0.3, 0.2, 0.2, 0.3],
            utilization_span_k: 1000.0,
            conductivity_scale: 200.0,
            min_conductivity_factor: 0.1,
            power_density_scale: 1e8,
            stress_scale: 1e9,
        }
    }
}

impl EffectivenessParams {
    pub fn validate(&self) -> AssessResult<()> {
        let invalid = |what: String| AssessError::InvalidPolicy { what };
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(
                "effectiveness weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = self.weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(invalid(format!(
                "effectiveness weights sum to {total}, expected 1"
            )));
        }
        for (name, v) in [
            ("utilization_span_k", self.utilization_span_k),
            ("conductivity_scale", self.conductivity_scale),
            ("power_density_scale", self.power_density_scale),
            ("stress_scale", self.stress_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(format!("{name} must be > 0, got {v}")));
            }
        }
        if !(0.0..=1.0).contains(&self.min_conductivity_factor) {
            return Err(invalid(format!(
                "min_conductivity_factor must be within [0, 1], got {}",
                self.min_conductivity_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessRating {
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl EffectivenessRating {
    pub fn from_percent(overall: f64) -> Self {
        if overall >= 80.0 {
            EffectivenessRating::Excellent
        } else if overall >= 60.0 {
            EffectivenessRating::Good
        } else if overall >= 40.0 {
            EffectivenessRating::Fair
        } else if overall >= 20.0 {
            EffectivenessRating::Poor
        } else {
            EffectivenessRating::VeryPoor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectivenessRating::VeryPoor => "very poor",
            EffectivenessRating::Poor => "poor",
            EffectivenessRating::Fair => "fair",
            EffectivenessRating::Good => "good",
            EffectivenessRating::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EffectivenessMetrics {
    pub damage_efficiency: f64,
    pub energy_utilization: f64,
    pub target_vulnerability: f64,
    pub weapon_lethality: f64,
    pub overall_effectiveness: f64,
}

impl EffectivenessMetrics {
    pub fn rating(&self) -> EffectivenessRating {
        EffectivenessRating::from_percent(self.overall_effectiveness)
    }

    /// Improvement hints for indicators below 50 %.
    pub fn suggestions(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.damage_efficiency < 50.0 {
            out.push("Tune laser power and beam parameters to raise damage efficiency.");
        }
        if self.energy_utilization < 50.0 {
            out.push("Treat the target surface to raise absorbed energy.");
        }
        if self.weapon_lethality < 50.0 {
            out.push("Raise the power density on target.");
        }
        out
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.damage_efficiency,
            self.energy_utilization,
            self.target_vulnerability,
            self.weapon_lethality,
            self.overall_effectiveness,
        ]
    }
}

impl fmt::Display for EffectivenessMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Overall effectiveness: {:.1}% ({})",
            self.overall_effectiveness,
            self.rating().as_str()
        )?;
        writeln!(f, "  damage efficiency:    {:.1}%", self.damage_efficiency)?;
        writeln!(f, "  energy utilization:   {:.1}%", self.energy_utilization)?;
        writeln!(f, "  target vulnerability: {:.1}%", self.target_vulnerability)?;
        write!(f, "  weapon lethality:     {:.1}%", self.weapon_lethality)?;
        for s in self.suggestions() {
            write!(f, "\n  - {s}")?;
        }
        Ok(())
    }
}

fn percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Exposure window: the pulse duration capped at one second, so
/// continuous-wave sources count one second of output.
pub fn exposure_time_s(laser: &LaserConfiguration) -> f64 {
    laser.pulse_duration_s.min(1.0)
}

pub fn calculate_effectiveness(
    laser: &LaserConfiguration,
    material: &MaterialConfiguration,
    input: &AssessmentInput,
    params: &EffectivenessParams,
) -> AssessResult<EffectivenessMetrics> {
    params.validate()?;

    let energy_j = laser.power_w * exposure_time_s(laser);
    let melted_cm3 = input.metrics.melting_volume * 1e-3;
    let damage_efficiency = if energy_j > 0.0 {
        percent(melted_cm3 / energy_j * 100.0)
    } else {
        0.0
    };

    let rise = input.max_temperature - input.ambient_temperature;
    let energy_utilization = if rise > 0.0 {
        let temp_factor = (rise / params.utilization_span_k).min(1.0);
        percent(material.absorption_coefficient * temp_factor * 100.0)
    } else {
        0.0
    };

    let conductivity_factor = (1.0 - material.thermal_conductivity / params.conductivity_scale)
        .max(params.min_conductivity_factor);
    let temperature_vulnerability = percent(input.max_temperature / material.melting_point * 100.0);
    let target_vulnerability = percent(temperature_vulnerability * conductivity_factor);

    let power_factor = (laser.power_density_w_per_m2() / params.power_density_scale).min(1.0);
    let stress_factor = (input.max_stress.unwrap_or(0.0) / params.stress_scale).min(1.0);
    let weapon_lethality = percent((power_factor + stress_factor) / 2.0 * 100.0);

    let [w_eff, w_util, w_vuln, w_leth] = params.weights;
    let overall_effectiveness = percent(
        damage_efficiency * w_eff
            + energy_utilization * w_util
            + target_vulnerability * w_vuln
            + weapon_lethality * w_leth,
    );

    debug!(
        run_id = %input.run_id,
        overall_effectiveness,
        "effectiveness calculated"
    );

    Ok(EffectivenessMetrics {
        damage_efficiency,
        energy_utilization,
        target_vulnerability,
        weapon_lethality,
        overall_effectiveness,
    })
}

/// Mean, best, worst and population variance of one indicator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub best: f64,
    pub worst: f64,
    pub variance: f64,
}

impl Spread {
    fn of(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        Self {
            mean,
            best: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            worst: values.iter().copied().fold(f64::INFINITY, f64::min),
            variance: values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectivenessComparison {
    pub count: usize,
    pub damage_efficiency: Spread,
    pub energy_utilization: Spread,
    pub target_vulnerability: Spread,
    pub weapon_lethality: Spread,
    pub overall_effectiveness: Spread,
}

/// Statistics across runs; `None` for an empty slice.
pub fn compare_effectiveness(metrics: &[EffectivenessMetrics]) -> Option<EffectivenessComparison> {
    if metrics.is_empty() {
        return None;
    }
    let column = |i: usize| -> Vec<f64> { metrics.iter().map(|m| m.as_array()[i]).collect() };
    Some(EffectivenessComparison {
        count: metrics.len(),
        damage_efficiency: Spread::of(&column(0)),
        energy_utilization: Spread::of(&column(1)),
        target_vulnerability: Spread::of(&column(2)),
        weapon_lethality: Spread::of(&column(3)),
        overall_effectiveness: Spread::of(&column(4)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_core::RunId;
    use ld_results::DamageMetrics;

    fn material() -> MaterialConfiguration {
        MaterialConfiguration {
            name: "alloy".to_string(),
            thermal_conductivity: 100.0,
            specific_heat: 900.0,
            density: 2700.0,
            melting_point: 1000.0,
            absorption_coefficient: 0.2,
            youngs_modulus: None,
            poissons_ratio: None,
            thermal_expansion: None,
            yield_strength: Some(200e6),
        }
    }

    fn input(max_temperature: f64, max_stress: f64, melting_volume: f64) -> AssessmentInput {
        AssessmentInput {
            run_id: RunId::new(),
            max_temperature,
            ambient_temperature: 300.0,
            max_stress: Some(max_stress),
            yield_strength: 200e6,
            melting_point: 1000.0,
            target_volume_mm3: None,
            metrics: DamageMetrics {
                melting_volume,
                ..Default::default()
            },
            functional_loss: 0.0,
            data_files: Vec::new(),
        }
    }

    #[test]
    fn indicators_follow_their_formulas() {
        // 1 kW for 1 ms -> 1 J
        let laser = LaserConfiguration::new(1000.0, 1064.0, 5.0);
        let m = calculate_effectiveness(
            &laser,
            &material(),
            &input(800.0, 5e8, 2.0),
            &EffectivenessParams::default(),
        )
        .unwrap();

        // 2 mm^3 = 0.002 cm^3 per joule
        assert!((m.damage_efficiency - 0.2).abs() < 1e-9);
        // 0.2 absorptivity * 500 K / 1000 K
        assert!((m.energy_utilization - 10.0).abs() < 1e-9);
        // 80 % of melting, halved for 100 W/m/K
        assert!((m.target_vulnerability - 40.0).abs() < 1e-9);
        // 5 mm spot gives ~5.1e7 W/m^2, 0.5 GPa stress
        let power_factor = laser.power_density_w_per_m2() / 1e8;
        assert!((m.weapon_lethality - (power_factor + 0.5) * 50.0).abs() < 1e-9);

        let expected = 0.3 * m.damage_efficiency
            + 0.2 * m.energy_utilization
            + 0.2 * m.target_vulnerability
            + 0.3 * m.weapon_lethality;
        assert!((m.overall_effectiveness - expected).abs() < 1e-9);
    }

    #[test]
    fn cold_target_has_no_energy_utilization() {
        let laser = LaserConfiguration::new(1000.0, 1064.0, 5.0);
        let m = calculate_effectiveness(
            &laser,
            &material(),
            &input(300.0, 0.0, 0.0),
            &EffectivenessParams::default(),
        )
        .unwrap();
        assert_eq!(m.energy_utilization, 0.0);
        assert_eq!(m.damage_efficiency, 0.0);
    }

    #[test]
    fn indicators_saturate_at_one_hundred() {
        let mut laser = LaserConfiguration::new(1e6, 1064.0, 0.5);
        laser.pulse_duration_s = 1e-9;
        let mut mat = material();
        mat.absorption_coefficient = 1.0;
        mat.thermal_conductivity = 1.0;
        let m = calculate_effectiveness(
            &laser,
            &mat,
            &input(5000.0, 5e9, 1e6),
            &EffectivenessParams::default(),
        )
        .unwrap();
        for v in m.as_array() {
            assert!((0.0..=100.0).contains(&v));
        }
        assert_eq!(m.weapon_lethality, 100.0);
        assert_eq!(m.rating(), EffectivenessRating::Excellent);
    }

    #[test]
    fn continuous_wave_counts_one_second() {
        let laser = LaserConfiguration::new(1000.0, 1064.0, 5.0).continuous_wave();
        assert_eq!(exposure_time_s(&laser), 1.0);
    }

    #[test]
    fn rating_bands_and_suggestions() {
        assert_eq!(EffectivenessRating::from_percent(19.9), EffectivenessRating::VeryPoor);
        assert_eq!(EffectivenessRating::from_percent(20.0), EffectivenessRating::Poor);
        assert_eq!(EffectivenessRating::from_percent(60.0), EffectivenessRating::Good);

        let m = EffectivenessMetrics {
            damage_efficiency: 10.0,
            energy_utilization: 70.0,
            target_vulnerability: 50.0,
            weapon_lethality: 55.0,
            overall_effectiveness: 43.0,
        };
        assert_eq!(m.suggestions().len(), 1);
        let text = m.to_string();
        assert!(text.contains("43.0% (fair)"));
        assert!(text.contains("damage efficiency"));
    }

    #[test]
    fn comparison_reports_spread() {
        let a = EffectivenessMetrics {
            overall_effectiveness: 20.0,
            ..Default::default()
        };
        let b = EffectivenessMetrics {
            overall_effectiveness: 60.0,
            ..Default::default()
        };
        let c = compare_effectiveness(&[a, b]).unwrap();
        assert_eq!(c.count, 2);
        assert_eq!(c.overall_effectiveness.mean, 40.0);
        assert_eq!(c.overall_effectiveness.best, 60.0);
        assert_eq!(c.overall_effectiveness.worst, 20.0);
        assert_eq!(c.overall_effectiveness.variance, 400.0);
        assert!(compare_effectiveness(&[]).is_none());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = EffectivenessParams {
            weights: [0.5, 0.5, 0.5, 0.0],
            ..Default::default()
        };
        let laser = LaserConfiguration::new(1000.0, 1064.0, 5.0);
        assert!(
            calculate_effectiveness(&laser, &material(), &input(800.0, 0.0, 0.0), &params)
                .is_err()
        );
    }
}
