//! Raw configuration bundle and its validated form.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ConfigResult, EnvironmentConfiguration, LaserConfiguration,
    MaterialConfiguration, ModelReference, TargetConfiguration, catalog,
};

/// Material given inline or by catalog preset name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MaterialSpec {
    Preset { preset: String },
    Inline(MaterialConfiguration),
}

impl MaterialSpec {
    pub fn resolve(&self) -> ConfigResult<MaterialConfiguration> {
        match self {
            MaterialSpec::Preset { preset } => catalog::lookup(preset),
            MaterialSpec::Inline(m) => Ok(m.clone()),
        }
    }
}

impl From<MaterialConfiguration> for MaterialSpec {
    fn from(m: MaterialConfiguration) -> Self {
        MaterialSpec::Inline(m)
    }
}

/// What a caller supplies for one run. Sections may be missing here; they are
/// required by [`ConfigBundle::build`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laser_parameters: Option<LaserConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_parameters: Option<MaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_parameters: Option<EnvironmentConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_parameters: Option<TargetConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

/// Fully validated inputs of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub laser: LaserConfiguration,
    pub material: MaterialConfiguration,
    pub environment: EnvironmentConfiguration,
    pub target: TargetConfiguration,
    pub model: ModelReference,
}

impl ConfigBundle {
    /// Constructs and validates every sub-configuration. Nothing downstream
    /// of this needs to re-check parameter ranges.
    pub fn build(&self) -> ConfigResult<SimulationConfig> {
        let laser = self
            .laser_parameters
            .clone()
            .ok_or(ConfigError::MissingSection {
                section: "laser_parameters",
            })?;
        laser.validate()?;

        let material = self
            .material_parameters
            .as_ref()
            .ok_or(ConfigError::MissingSection {
                section: "material_parameters",
            })?
            .resolve()?;
        material.validate()?;

        let environment = self.environment_parameters.clone().unwrap_or_default();

        let target = self.target_parameters.clone().unwrap_or_default();
        target.validate()?;

        let model_path = self.model_path.clone().ok_or(ConfigError::MissingSection {
            section: "model_path",
        })?;
        let model = ModelReference::new(model_path)?;

        Ok(SimulationConfig {
            laser,
            material,
            environment,
            target,
            model,
        })
    }
}
