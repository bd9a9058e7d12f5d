use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, require_positive};

/// Sampled patch of the target surface that the solvers discretize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TargetConfiguration {
    /// Identifier of the structural component under the beam.
    pub component: String,
    /// Beam centre in patch coordinates, mm.
    pub hot_spot_mm: [f64; 2],
    /// Patch size along x and y, mm.
    pub extent_mm: [f64; 2],
    /// Sample points along x and y.
    pub resolution: [usize; 2],
    /// Through-thickness sample layers; 1 samples the surface only.
    pub layers: usize,
    /// Sampled depth below the surface when `layers > 1`, mm.
    pub depth_mm: f64,
}

impl Default for TargetConfiguration {
    fn default() -> Self {
        Self {
            component: "fuselage".to_string(),
            hot_spot_mm: [5.0, 5.0],
            extent_mm: [10.0, 10.0],
            // odd count puts a sample exactly on the default hot spot
            resolution: [51, 51],
            layers: 1,
            depth_mm: 1.0,
        }
    }
}

impl TargetConfiguration {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.component.trim().is_empty() {
            return Err(ConfigError::invalid(
                "target.component",
                "\"\"",
                "must not be empty",
            ));
        }
        require_positive("target.extent_mm[0]", self.extent_mm[0])?;
        require_positive("target.extent_mm[1]", self.extent_mm[1])?;
        for (axis, n) in self.resolution.iter().enumerate() {
            if *n < 2 {
                return Err(ConfigError::invalid(
                    &format!("target.resolution[{axis}]"),
                    n,
                    "need at least 2 samples per axis",
                ));
            }
        }
        if self.layers == 0 {
            return Err(ConfigError::invalid(
                "target.layers",
                self.layers,
                "need at least 1 layer",
            ));
        }
        if self.layers > 1 {
            require_positive("target.depth_mm", self.depth_mm)?;
        }
        for axis in 0..2 {
            let c = self.hot_spot_mm[axis];
            if !c.is_finite() || c < 0.0 || c > self.extent_mm[axis] {
                return Err(ConfigError::invalid(
                    &format!("target.hot_spot_mm[{axis}]"),
                    c,
                    "must lie inside the target extent",
                ));
            }
        }
        Ok(())
    }
}
