//! The four-phase contract every pipeline implements.

use ld_results::SimulationResult;

use crate::context::RunContext;
use crate::error::{PostProcessIssue, StageError};
use crate::scope::WorkingScope;

/// How `execute` ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// Cancellation was observed at a stage boundary; later stages were
    /// skipped.
    Cancelled,
}

/// Staged execution contract driven by [`crate::Orchestrator`].
///
/// Phases are called in order, once per run. A phase that returns an error
/// ends the run as FAILED; `post_process` cannot fail the run and reports
/// problems as data instead.
pub trait SimulationLifecycle {
    type Config;

    fn name(&self) -> &str;

    /// Fully constructs and validates every sub-configuration. Must not
    /// touch any solver.
    fn validate_configuration(
        &mut self,
        config: &Self::Config,
        ctx: &RunContext,
    ) -> Result<(), StageError>;

    /// Acquires backends and initializes solver instances.
    fn prepare(&mut self, ctx: &RunContext, scope: &mut WorkingScope) -> Result<(), StageError>;

    /// Runs the numerical stages, filling `result`.
    fn execute(
        &mut self,
        ctx: &RunContext,
        scope: &mut WorkingScope,
        result: &mut SimulationResult,
    ) -> Result<StageOutcome, StageError>;

    /// Best-effort derived artifacts. Each failing sub-step is returned and
    /// the remaining steps still run.
    fn post_process(
        &mut self,
        ctx: &RunContext,
        result: &mut SimulationResult,
    ) -> Vec<PostProcessIssue>;

    /// Releases whatever `prepare` acquired. Called on every exit path.
    fn release(&mut self) {}
}
