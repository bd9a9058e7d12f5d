//! Store-backed entry points.

use ld_assess::{
    AssessError, AssessmentInput, AssessmentPolicy, EffectivenessMetrics, assess,
    calculate_effectiveness,
};
use ld_config::{ConfigBundle, SimulationConfig};
use ld_core::RunId;
use ld_results::{AssessmentReport, ResultsError, RunStore, SimulationResult};
use std::path::Path;
use tracing::warn;

use crate::error::SimulationError;
use crate::orchestrator::{Orchestrator, OrchestratorOptions};
use crate::pipeline::LaserDamagePipeline;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("Assessment error: {0}")]
    Assess(#[from] AssessError),
}

/// Runs `bundle` and stores the result, artifacts included, in `store`.
///
/// Failed runs are stored too: their FAILED status is the record of what
/// happened.
pub fn simulate_and_store(
    bundle: &ConfigBundle,
    store: &RunStore,
    work_root: &Path,
) -> Result<SimulationResult, RunError> {
    let options = OrchestratorOptions {
        work_root: work_root.to_path_buf(),
        output_root: store.root().to_path_buf(),
    };
    let mut orchestrator = Orchestrator::new(LaserDamagePipeline::new(), options);

    match orchestrator.run(bundle) {
        Ok(result) => {
            store.save_result(&result)?;
            Ok(result)
        }
        Err(err) => {
            if let Err(e) = store.save_result(err.result()) {
                warn!(run_id = %err.run_id, error = %e, "could not store failed run");
            }
            Err(err.into())
        }
    }
}

/// Assesses a stored COMPLETED run and stores the report next to it.
pub fn assess_stored(
    store: &RunStore,
    run_id: &RunId,
    config: &SimulationConfig,
    policy: &AssessmentPolicy,
) -> Result<AssessmentReport, RunError> {
    let input = stored_input(store, run_id, config)?;
    let report = assess(&input, policy)?;
    store.save_assessment(&report)?;
    Ok(report)
}

/// Effectiveness of the exposure that produced a stored COMPLETED run.
pub fn stored_effectiveness(
    store: &RunStore,
    run_id: &RunId,
    config: &SimulationConfig,
    policy: &AssessmentPolicy,
) -> Result<EffectivenessMetrics, RunError> {
    let input = stored_input(store, run_id, config)?;
    let metrics = calculate_effectiveness(
        &config.laser,
        &config.material,
        &input,
        &policy.effectiveness,
    )?;
    Ok(metrics)
}

fn stored_input(
    store: &RunStore,
    run_id: &RunId,
    config: &SimulationConfig,
) -> Result<AssessmentInput, RunError> {
    let result = store.load_result(run_id)?;
    let input = AssessmentInput::from_result(
        &result,
        &config.material,
        &config.environment,
        &config.target.component,
    )?;
    Ok(input)
}
