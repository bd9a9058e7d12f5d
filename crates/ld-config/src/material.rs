//! Target material properties.

use ld_core::units::{Pressure, Temperature, k, pa};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, require_positive};

pub const DEFAULT_YOUNGS_MODULUS_PA: f64 = 70e9;
pub const DEFAULT_POISSONS_RATIO: f64 = 0.33;
pub const DEFAULT_THERMAL_EXPANSION_PER_K: f64 = 23e-6;
pub const DEFAULT_YIELD_STRENGTH_PA: f64 = 250e6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialConfiguration {
    pub name: String,
    /// W/(m K)
    pub thermal_conductivity: f64,
    /// J/(kg K)
    pub specific_heat: f64,
    /// kg/m^3
    pub density: f64,
    /// K
    pub melting_point: f64,
    /// Fraction of incident power absorbed, 0..=1.
    pub absorption_coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youngs_modulus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poissons_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_expansion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_strength: Option<f64>,
}

impl MaterialConfiguration {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "material.name",
                "\"\"",
                "must not be empty",
            ));
        }
        require_positive("material.thermal_conductivity", self.thermal_conductivity)?;
        require_positive("material.specific_heat", self.specific_heat)?;
        require_positive("material.density", self.density)?;
        require_positive("material.melting_point", self.melting_point)?;

        let a = self.absorption_coefficient;
        if !a.is_finite() || !(0.0..=1.0).contains(&a) {
            return Err(ConfigError::invalid(
                "material.absorption_coefficient",
                a,
                "must be within [0, 1]",
            ));
        }

        if let Some(e) = self.youngs_modulus {
            require_positive("material.youngs_modulus", e)?;
        }
        if let Some(alpha) = self.thermal_expansion {
            require_positive("material.thermal_expansion", alpha)?;
        }
        if let Some(y) = self.yield_strength {
            require_positive("material.yield_strength", y)?;
        }
        if let Some(nu) = self.poissons_ratio {
            // 1 - nu appears as a divisor in the thermoelastic estimate
            if !nu.is_finite() || nu <= -1.0 || nu >= 0.5 {
                return Err(ConfigError::invalid(
                    "material.poissons_ratio",
                    nu,
                    "must be within (-1, 0.5)",
                ));
            }
        }
        Ok(())
    }

    pub fn effective_youngs_modulus(&self) -> f64 {
        self.youngs_modulus.unwrap_or(DEFAULT_YOUNGS_MODULUS_PA)
    }

    pub fn effective_poissons_ratio(&self) -> f64 {
        self.poissons_ratio.unwrap_or(DEFAULT_POISSONS_RATIO)
    }

    pub fn effective_thermal_expansion(&self) -> f64 {
        self.thermal_expansion
            .unwrap_or(DEFAULT_THERMAL_EXPANSION_PER_K)
    }

    pub fn effective_yield_strength(&self) -> f64 {
        self.yield_strength.unwrap_or(DEFAULT_YIELD_STRENGTH_PA)
    }

    pub fn melting_temperature(&self) -> Temperature {
        k(self.melting_point)
    }

    pub fn yield_stress(&self) -> Pressure {
        pa(self.effective_yield_strength())
    }

    /// Thermal diffusivity k / (rho cp) in m^2/s.
    pub fn thermal_diffusivity(&self) -> f64 {
        self.thermal_conductivity / (self.density * self.specific_heat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> MaterialConfiguration {
        MaterialConfiguration {
            name: "test alloy".to_string(),
            thermal_conductivity: 167.0,
            specific_heat: 896.0,
            density: 2700.0,
            melting_point: 933.0,
            absorption_coefficient: 0.1,
            youngs_modulus: None,
            poissons_ratio: None,
            thermal_expansion: None,
            yield_strength: None,
        }
    }

    #[test]
    fn omitted_elastic_properties_use_defaults() {
        let m = bare();
        m.validate().unwrap();
        assert_eq!(m.effective_youngs_modulus(), 70e9);
        assert_eq!(m.effective_poissons_ratio(), 0.33);
        assert_eq!(m.effective_thermal_expansion(), 23e-6);
        assert_eq!(m.effective_yield_strength(), 250e6);
    }

    #[test]
    fn explicit_elastic_properties_win() {
        let mut m = bare();
        m.yield_strength = Some(324e6);
        assert_eq!(m.effective_yield_strength(), 324e6);
    }

    #[test]
    fn non_positive_thermal_properties_fail() {
        let mut m = bare();
        m.density = 0.0;
        assert!(m.validate().is_err());

        let mut m = bare();
        m.specific_heat = -1.0;
        assert!(m.validate().is_err());
    }

    #[test]
    fn poisson_ratio_of_one_half_fails() {
        let mut m = bare();
        m.poissons_ratio = Some(0.5);
        assert!(m.validate().is_err());
    }

    #[test]
    fn absorption_outside_unit_interval_fails() {
        let mut m = bare();
        m.absorption_coefficient = 1.5;
        assert!(m.validate().is_err());
    }
}
