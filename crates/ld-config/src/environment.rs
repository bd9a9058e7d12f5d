use ld_core::units::{Pressure, Temperature, Velocity, constants, k, mps, pa};
use serde::{Deserialize, Serialize};

/// Ambient conditions around the target. Purely descriptive: every field has
/// a default and there is nothing to validate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfiguration {
    pub ambient_temperature_k: f64,
    pub pressure_pa: f64,
    pub humidity: f64,
    pub wind_speed_mps: f64,
    pub atmospheric_transmission: f64,
}

impl Default for EnvironmentConfiguration {
    fn default() -> Self {
        Self {
            ambient_temperature_k: constants::STANDARD_AMBIENT_K,
            pressure_pa: constants::STANDARD_PRESSURE_PA,
            humidity: 0.5,
            wind_speed_mps: 0.0,
            atmospheric_transmission: 0.8,
        }
    }
}

impl EnvironmentConfiguration {
    pub fn ambient_temperature(&self) -> Temperature {
        k(self.ambient_temperature_k)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.pressure_pa)
    }

    pub fn wind_speed(&self) -> Velocity {
        mps(self.wind_speed_mps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_takes_defaults() {
        let env: EnvironmentConfiguration = serde_json::from_str("{}").unwrap();
        assert_eq!(env, EnvironmentConfiguration::default());
        assert_eq!(env.ambient_temperature_k, 293.15);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let env: EnvironmentConfiguration =
            serde_json::from_str(r#"{"ambient_temperature_k": 250.0}"#).unwrap();
        assert_eq!(env.ambient_temperature_k, 250.0);
        assert_eq!(env.atmospheric_transmission, 0.8);
    }
}
