//! Independent runs in parallel.

use ld_config::ConfigBundle;
use ld_results::SimulationResult;
use rayon::prelude::*;
use tracing::info;

use crate::error::SimulationError;
use crate::orchestrator::{Orchestrator, OrchestratorOptions};
use crate::pipeline::LaserDamagePipeline;

/// Runs every bundle on the rayon pool, one pipeline and one analytic
/// backend per run. Results come back in input order.
pub fn run_batch(
    bundles: &[ConfigBundle],
    options: &OrchestratorOptions,
) -> Vec<Result<SimulationResult, SimulationError>> {
    info!(runs = bundles.len(), "starting batch");
    bundles
        .par_iter()
        .map(|bundle| {
            let mut orchestrator = Orchestrator::new(LaserDamagePipeline::new(), options.clone());
            orchestrator.run(bundle)
        })
        .collect()
}
