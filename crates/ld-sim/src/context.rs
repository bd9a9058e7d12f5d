//! Per-run context handed to every lifecycle phase.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ld_core::RunId;
use tracing::Span;

use crate::progress::{ProgressEvent, ProgressSink, RunStage};

/// Cooperative cancellation flag, observed only between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Run-scoped identity, logging span, directories and cancellation.
///
/// Everything a stage needs to know about "its" run lives here, so
/// concurrent runs never share mutable state.
pub struct RunContext {
    run_id: RunId,
    span: Span,
    work_dir: PathBuf,
    output_dir: PathBuf,
    cancel: CancelToken,
    progress: Option<ProgressSink>,
    started: Instant,
}

impl RunContext {
    pub fn new(
        run_id: RunId,
        span: Span,
        work_dir: PathBuf,
        output_dir: PathBuf,
        cancel: CancelToken,
        progress: Option<ProgressSink>,
    ) -> Self {
        Self {
            run_id,
            span,
            work_dir,
            output_dir,
            cancel,
            progress,
            started: Instant::now(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Scratch directory, removed when the run ends.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Where kept artifacts go.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn elapsed_s(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn emit(&self, stage: RunStage, message: Option<String>) {
        if let Some(sink) = &self.progress {
            sink(&ProgressEvent {
                run_id: self.run_id,
                stage,
                elapsed_wall_s: self.elapsed_s(),
                message,
            });
        }
    }
}
