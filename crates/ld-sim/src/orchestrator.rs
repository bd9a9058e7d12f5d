//! Drives a lifecycle through the run state machine.

use std::path::PathBuf;

use chrono::Utc;
use ld_core::RunId;
use ld_results::{Provenance, SimulationResult, SimulationStatus};
use tracing::{error, info, info_span, warn};

use crate::context::{CancelToken, RunContext};
use crate::error::{Phase, PostProcessIssue, SimulationError, StageError};
use crate::lifecycle::{SimulationLifecycle, StageOutcome};
use crate::progress::{ProgressSink, RunStage};
use crate::scope::WorkingScope;

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Parent of per-run scratch directories.
    pub work_root: PathBuf,
    /// Parent of per-run artifact directories.
    pub output_root: PathBuf,
}

impl OrchestratorOptions {
    /// `<root>/work` for scratch and `<root>/runs` for artifacts.
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            work_root: root.join("work"),
            output_root: root.join("runs"),
        }
    }
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::in_dir(std::env::temp_dir().join("laser-damage"))
    }
}

pub struct Orchestrator<L: SimulationLifecycle> {
    lifecycle: L,
    options: OrchestratorOptions,
    cancel: CancelToken,
    progress: Option<ProgressSink>,
    status: SimulationStatus,
}

type Failure = (Phase, StageError);

impl<L: SimulationLifecycle> Orchestrator<L> {
    pub fn new(lifecycle: L, options: OrchestratorOptions) -> Self {
        Self {
            lifecycle,
            options,
            cancel: CancelToken::new(),
            progress: None,
            status: SimulationStatus::Pending,
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Installs the token the next run observes.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token of the next run. Every run consumes its token and leaves a fresh
    /// one behind, so a cancellation never outlives the run it was aimed at.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Status of the most recent run; PENDING before the first.
    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Runs validate, prepare, execute and post-process in order.
    ///
    /// COMPLETED and CANCELLED runs come back as `Ok`; check the status.
    /// Any phase error ends the run FAILED and is returned wrapped with its
    /// phase and the partial result.
    pub fn run(&mut self, config: &L::Config) -> Result<SimulationResult, SimulationError> {
        let run_id = RunId::new();
        let span = info_span!("simulation_run", %run_id, pipeline = self.lifecycle.name());
        let _entered = span.enter();

        let cancel = std::mem::take(&mut self.cancel);
        let mut result = SimulationResult::new(run_id);
        let ctx = RunContext::new(
            run_id,
            span.clone(),
            self.options.work_root.join(run_id.to_string()),
            self.options.output_root.join(run_id.to_string()),
            cancel,
            self.progress.clone(),
        );

        if let Err(e) = result.mark_running(Utc::now()) {
            return Err(SimulationError::new(Phase::Validate, e.into(), result));
        }
        self.status = SimulationStatus::Running;
        info!("run started");

        let failure = match WorkingScope::create(ctx.work_dir()) {
            Ok(mut scope) => {
                let failure = self.drive_phases(config, &ctx, &mut scope, &mut result);
                self.lifecycle.release();
                drop(scope);
                failure
            }
            Err(e) => Some((Phase::Prepare, StageError::Io(e))),
        };

        match failure {
            None => {
                self.status = result.status();
                let stage = if self.status == SimulationStatus::Cancelled {
                    RunStage::Cancelled
                } else {
                    RunStage::Completed
                };
                ctx.emit(stage, None);
                info!(
                    status = %self.status,
                    computation_time_s = ?result.computation_time_s,
                    "run finished"
                );
                Ok(result)
            }
            Some((phase, source)) => {
                if let Err(e) = result.finish(SimulationStatus::Failed, Utc::now()) {
                    warn!(error = %e, "could not mark result as failed");
                }
                self.status = result.status();
                error!(%phase, error = %source, "run failed");
                ctx.emit(RunStage::Failed, Some(source.to_string()));
                Err(SimulationError::new(phase, source, result))
            }
        }
    }

    fn drive_phases(
        &mut self,
        config: &L::Config,
        ctx: &RunContext,
        scope: &mut WorkingScope,
        result: &mut SimulationResult,
    ) -> Option<Failure> {
        let outcome = match self.run_stages(config, ctx, scope, result) {
            Ok(outcome) => outcome,
            Err(failure) => return Some(failure),
        };

        let terminal = match outcome {
            StageOutcome::Completed => {
                ctx.emit(RunStage::PostProcessing, None);
                let issues = self.lifecycle.post_process(ctx, result);
                record_issues(result, &issues);
                SimulationStatus::Completed
            }
            StageOutcome::Cancelled => {
                info!("cancellation observed at stage boundary");
                SimulationStatus::Cancelled
            }
        };

        result
            .finish(terminal, Utc::now())
            .err()
            .map(|e| (Phase::Finalize, StageError::Invariant(e)))
    }

    fn run_stages(
        &mut self,
        config: &L::Config,
        ctx: &RunContext,
        scope: &mut WorkingScope,
        result: &mut SimulationResult,
    ) -> Result<StageOutcome, Failure> {
        ctx.emit(RunStage::Validating, None);
        self.lifecycle
            .validate_configuration(config, ctx)
            .map_err(|e| (Phase::Validate, e))?;
        if ctx.is_cancelled() {
            return Ok(StageOutcome::Cancelled);
        }

        ctx.emit(RunStage::Preparing, None);
        self.lifecycle
            .prepare(ctx, scope)
            .map_err(|e| (Phase::Prepare, e))?;
        if ctx.is_cancelled() {
            return Ok(StageOutcome::Cancelled);
        }

        self.lifecycle
            .execute(ctx, scope, result)
            .map_err(|e| (Phase::Execute, e))
    }
}

fn record_issues(result: &mut SimulationResult, issues: &[PostProcessIssue]) {
    if issues.is_empty() {
        return;
    }
    for issue in issues {
        warn!(step = issue.step, error = %issue.message, "post-processing step failed");
    }
    let mut info = Provenance::new();
    for issue in issues {
        info.insert(issue.step.to_string(), issue.message.clone().into());
    }
    result.record_provenance("post_process_issues", info);
}
