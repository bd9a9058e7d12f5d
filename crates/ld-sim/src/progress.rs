use std::sync::Arc;

use ld_core::RunId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Validating,
    Preparing,
    ThermalSolve,
    StressSolve,
    PostProcessing,
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub run_id: RunId,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

/// Receives progress events; may be called from a worker thread.
pub type ProgressSink = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;
