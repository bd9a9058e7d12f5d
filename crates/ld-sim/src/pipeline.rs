//! Thermal -> stress -> damage metrics under the staged lifecycle.

use std::fs;
use std::sync::Arc;

use ld_assess::{derive_damage_metrics, persist_damage_metrics};
use ld_config::{ConfigBundle, SimulationConfig};
use ld_results::{DamageMetrics, Provenance, SimulationResult, compute_config_hash};
use ld_solvers::{
    AnalyticBackend, BackendLease, SolverBackend, StressSolver, ThermalSolver,
};
use tracing::{debug, info, warn};

use crate::artifacts::write_field_csv;
use crate::context::RunContext;
use crate::error::{PostProcessIssue, StageError};
use crate::lifecycle::{SimulationLifecycle, StageOutcome};
use crate::progress::RunStage;
use crate::scope::WorkingScope;

struct PreparedSolvers {
    backend: String,
    backend_version: String,
    degraded: bool,
    thermal: Box<dyn ThermalSolver>,
    stress: Box<dyn StressSolver>,
    _lease: BackendLease,
}

/// Concrete laser damage pipeline.
///
/// A preferred backend (e.g. a licensed FEM engine) is probed during
/// `prepare`; when it is absent or its probe fails the pipeline falls back to
/// the analytic reference backend.
pub struct LaserDamagePipeline {
    preferred: Option<Arc<dyn SolverBackend>>,
    fallback: Arc<dyn SolverBackend>,
    config: Option<SimulationConfig>,
    prepared: Option<PreparedSolvers>,
    metrics: Option<DamageMetrics>,
}

impl Default for LaserDamagePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl LaserDamagePipeline {
    pub fn new() -> Self {
        Self {
            preferred: None,
            fallback: Arc::new(AnalyticBackend::new()),
            config: None,
            prepared: None,
            metrics: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn SolverBackend>) -> Self {
        self.preferred = Some(backend);
        self
    }

    /// Validated configuration of the current or last run.
    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    /// Metrics derived by the last successful post-processing.
    pub fn last_metrics(&self) -> Option<&DamageMetrics> {
        self.metrics.as_ref()
    }

    fn select_backend(&self) -> (Arc<dyn SolverBackend>, bool) {
        match &self.preferred {
            Some(backend) if backend.test_connection() => (Arc::clone(backend), false),
            Some(backend) => {
                warn!(
                    backend = backend.name(),
                    fallback = self.fallback.name(),
                    "backend probe failed, degrading to fallback"
                );
                (Arc::clone(&self.fallback), true)
            }
            None => (Arc::clone(&self.fallback), false),
        }
    }

    fn post_step(
        issues: &mut Vec<PostProcessIssue>,
        step: &'static str,
        f: impl FnOnce() -> Result<(), StageError>,
    ) {
        match f() {
            Ok(()) => debug!(step, "post-processing step done"),
            Err(e) => issues.push(PostProcessIssue::new(step, e)),
        }
    }
}

impl SimulationLifecycle for LaserDamagePipeline {
    type Config = ConfigBundle;

    fn name(&self) -> &str {
        "laser_damage"
    }

    fn validate_configuration(
        &mut self,
        config: &ConfigBundle,
        _ctx: &RunContext,
    ) -> Result<(), StageError> {
        self.config = None;
        self.prepared = None;
        self.metrics = None;

        let built = config.build()?;
        info!(
            power_w = built.laser.power_w,
            beam_diameter_mm = built.laser.beam_diameter_mm,
            material = %built.material.name,
            model = %built.model.path().display(),
            "configuration validated"
        );
        self.config = Some(built);
        Ok(())
    }

    fn prepare(&mut self, _ctx: &RunContext, _scope: &mut WorkingScope) -> Result<(), StageError> {
        let config = self.config.as_ref().ok_or(StageError::OutOfOrder {
            what: "prepare before validate_configuration",
        })?;

        let (backend, degraded) = self.select_backend();
        let lease = backend.checkout()?;

        let mut thermal = backend.thermal_solver();
        thermal.initialize(
            &config.laser,
            &config.material,
            &config.environment,
            &config.target,
        )?;
        let mut stress = backend.stress_solver();
        stress.initialize(&config.material, &config.environment)?;

        info!(
            backend = backend.name(),
            thermal_solver = thermal.name(),
            stress_solver = stress.name(),
            degraded,
            "solvers prepared"
        );
        self.prepared = Some(PreparedSolvers {
            backend: backend.name().to_string(),
            backend_version: backend.version(),
            degraded,
            thermal,
            stress,
            _lease: lease,
        });
        Ok(())
    }

    fn execute(
        &mut self,
        ctx: &RunContext,
        scope: &mut WorkingScope,
        result: &mut SimulationResult,
    ) -> Result<StageOutcome, StageError> {
        let config = self.config.as_ref().ok_or(StageError::OutOfOrder {
            what: "execute before validate_configuration",
        })?;
        let prepared = self.prepared.as_ref().ok_or(StageError::OutOfOrder {
            what: "execute before prepare",
        })?;

        let mut run_info = Provenance::new();
        run_info.insert("backend".into(), prepared.backend.clone().into());
        run_info.insert("backend_version".into(), prepared.backend_version.clone().into());
        run_info.insert("degraded".into(), prepared.degraded.into());
        run_info.insert(
            "config_hash".into(),
            compute_config_hash(config, &prepared.backend_version).into(),
        );
        result.record_provenance("run", run_info);

        ctx.emit(RunStage::ThermalSolve, None);
        let thermal = prepared.thermal.solve(&config.model)?;
        let temperature = thermal.require_temperature()?.clone();
        if let Some(grid) = &thermal.coordinates {
            result.set_grid(grid.clone());
        }
        result.set_temperature_field(temperature);
        result.record_provenance("thermal", thermal.provenance.clone());
        info!(max_temperature_k = ?result.max_temperature(), "thermal stage done");

        // solver checkpoint, scratch only
        let checkpoint = scope.temp_path(&format!("thermal_{}.json", ctx.run_id().short()));
        fs::write(&checkpoint, serde_json::to_vec(&thermal)?)?;

        if ctx.is_cancelled() {
            return Ok(StageOutcome::Cancelled);
        }

        ctx.emit(RunStage::StressSolve, None);
        let stress = prepared.stress.solve(&config.model, &thermal)?;
        match (stress.stress.clone(), stress.von_mises.clone()) {
            (Some(s), Some(vm)) => result.set_stress_fields(s, vm),
            _ => {
                return Err(ld_solvers::SolverError::MissingInput {
                    what: "stress stage returned no stress field".to_string(),
                }
                .into());
            }
        }
        if let Some(d) = stress.displacement.clone() {
            result.set_displacement_field(d);
        }
        result.record_provenance("stress", stress.provenance.clone());
        info!(max_stress_pa = ?result.max_stress(), "stress stage done");

        Ok(StageOutcome::Completed)
    }

    fn post_process(
        &mut self,
        ctx: &RunContext,
        result: &mut SimulationResult,
    ) -> Vec<PostProcessIssue> {
        let mut issues = Vec::new();
        let Some(config) = self.config.as_ref() else {
            issues.push(PostProcessIssue::new(
                "setup",
                "post_process before validate_configuration",
            ));
            return issues;
        };
        let out_dir = ctx.output_dir().to_path_buf();
        let short = ctx.run_id().short();

        Self::post_step(&mut issues, "output_dir", || {
            fs::create_dir_all(&out_dir)?;
            Ok(())
        });

        Self::post_step(&mut issues, "temperature_export", || {
            let field = result.temperature_field().ok_or(StageError::OutOfOrder {
                what: "no temperature field to export",
            })?;
            let path = out_dir.join(format!("temperature_{short}.csv"));
            write_field_csv(&path, "temperature_k", field, result.grid())?;
            result.add_result_file(path);
            Ok(())
        });

        Self::post_step(&mut issues, "stress_export", || {
            let field = result.von_mises_field().ok_or(StageError::OutOfOrder {
                what: "no stress field to export",
            })?;
            let path = out_dir.join(format!("von_mises_{short}.csv"));
            write_field_csv(&path, "von_mises_pa", field, result.grid())?;
            result.add_result_file(path);
            Ok(())
        });

        let mut derived = None;
        Self::post_step(&mut issues, "damage_metrics", || {
            let metrics =
                derive_damage_metrics(result, &config.material, &config.target.component)?;
            let path = persist_damage_metrics(&metrics, &out_dir, &ctx.run_id())?;
            result.add_result_file(path);
            info!(
                thermal_damage_area_mm2 = metrics.thermal_damage_area,
                stress_concentration = metrics.stress_concentration,
                "damage metrics derived"
            );
            derived = Some(metrics);
            Ok(())
        });
        self.metrics = derived;

        issues
    }

    fn release(&mut self) {
        self.prepared = None;
    }
}
