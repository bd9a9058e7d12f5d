//! Backend-agnostic stage output.

use ld_results::{Grid, Provenance, ScalarField};
use serde::{Deserialize, Serialize};

use crate::{SolverError, SolverResult};

/// Arrays produced by one stage plus the grid they are sampled on.
///
/// Any field may be absent; consumers ask for what they need through the
/// `require_*` accessors and get a [`SolverError::MissingInput`] otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub von_mises: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Grid>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl FieldResult {
    pub fn require_temperature(&self) -> SolverResult<&ScalarField> {
        self.temperature
            .as_ref()
            .ok_or_else(|| SolverError::MissingInput {
                what: "temperature field".to_string(),
            })
    }

    pub fn require_coordinates(&self) -> SolverResult<&Grid> {
        self.coordinates
            .as_ref()
            .ok_or_else(|| SolverError::MissingInput {
                what: "coordinates".to_string(),
            })
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(ScalarField::max)
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(ScalarField::min)
    }

    pub fn max_stress(&self) -> Option<f64> {
        self.von_mises.as_ref().and_then(ScalarField::max)
    }

    pub fn max_displacement(&self) -> Option<f64> {
        self.displacement.as_ref().and_then(ScalarField::max_abs)
    }

    pub fn with_provenance(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.provenance.insert(key.to_string(), value.into());
        self
    }
}

/// Static description of a solver instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverInfo {
    pub name: String,
    pub version: String,
    pub initialized: bool,
}
