//! Error types for staged runs.

use std::fmt;

use ld_assess::AssessError;
use ld_config::ConfigError;
use ld_core::{LdError, RunId};
use ld_results::{ResultsError, SimulationResult};
use ld_solvers::SolverError;
use thiserror::Error;

/// Lifecycle phase in which a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validate,
    Prepare,
    Execute,
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Validate => "validate",
            Phase::Prepare => "prepare",
            Phase::Execute => "execute",
            Phase::Finalize => "finalize",
        };
        f.write_str(s)
    }
}

/// Failure raised by one lifecycle phase.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("Assessment error: {0}")]
    Assess(#[from] AssessError),

    #[error("Invariant error: {0}")]
    Invariant(#[from] LdError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Phase called out of order: {what}")]
    OutOfOrder { what: &'static str },
}

/// A run that ended FAILED. Carries the phase, the original cause and the
/// partial result, whose status is FAILED.
#[derive(Error, Debug)]
#[error("simulation {run_id} failed during {phase}: {source}")]
pub struct SimulationError {
    pub run_id: RunId,
    pub phase: Phase,
    #[source]
    pub source: StageError,
    result: Box<SimulationResult>,
}

impl SimulationError {
    pub(crate) fn new(phase: Phase, source: StageError, result: SimulationResult) -> Self {
        Self {
            run_id: result.id(),
            phase,
            source,
            result: Box::new(result),
        }
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn into_result(self) -> SimulationResult {
        *self.result
    }

    /// Bad or missing input parameters; never worth retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.source,
            StageError::Configuration(_) | StageError::Solver(SolverError::Config(_))
        )
    }

    /// Backend unavailable, busy or timed out.
    pub fn is_retryable(&self) -> bool {
        matches!(&self.source, StageError::Solver(e) if e.is_retryable())
    }
}

/// A post-processing sub-step that failed without failing the run.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessIssue {
    pub step: &'static str,
    pub message: String,
}

impl PostProcessIssue {
    pub fn new(step: &'static str, err: impl fmt::Display) -> Self {
        Self {
            step,
            message: err.to_string(),
        }
    }
}
