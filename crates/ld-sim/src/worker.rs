//! Background execution behind a channel.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread::{self, JoinHandle};

use ld_config::ConfigBundle;
use ld_results::SimulationResult;

use crate::context::CancelToken;
use crate::error::SimulationError;
use crate::orchestrator::{Orchestrator, OrchestratorOptions};
use crate::pipeline::LaserDamagePipeline;
use crate::progress::{ProgressEvent, ProgressSink};

#[derive(Debug)]
pub enum WorkerMessage {
    Progress(ProgressEvent),
    Finished(Box<Result<SimulationResult, SimulationError>>),
}

/// One pipeline run on its own thread.
///
/// The caller polls `progress_rx` or blocks in [`RunWorker::wait`].
/// Cancellation is cooperative: a stage already computing finishes, the next
/// one is skipped and the run ends CANCELLED.
pub struct RunWorker {
    pub progress_rx: Receiver<WorkerMessage>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl RunWorker {
    pub fn start(bundle: ConfigBundle, options: OrchestratorOptions) -> Self {
        Self::start_with_cancel(bundle, options, CancelToken::new())
    }

    pub fn start_with_cancel(
        bundle: ConfigBundle,
        options: OrchestratorOptions,
        cancel: CancelToken,
    ) -> Self {
        let (tx, rx) = channel();
        let token = cancel.clone();

        let handle = thread::spawn(move || {
            let progress_tx = tx.clone();
            let sink: ProgressSink = Arc::new(move |event: &ProgressEvent| {
                let _ = progress_tx.send(WorkerMessage::Progress(event.clone()));
            });

            let mut orchestrator = Orchestrator::new(LaserDamagePipeline::new(), options)
                .with_cancel_token(token)
                .with_progress(sink);
            let outcome = orchestrator.run(&bundle);
            let _ = tx.send(WorkerMessage::Finished(Box::new(outcome)));
        });

        Self {
            progress_rx: rx,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Blocks until the run ends, discarding remaining progress events.
    /// `None` if the worker thread died without reporting.
    pub fn wait(mut self) -> Option<Result<SimulationResult, SimulationError>> {
        let mut outcome = None;
        while let Ok(message) = self.progress_rx.recv() {
            if let WorkerMessage::Finished(result) = message {
                outcome = Some(*result);
                break;
            }
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        outcome
    }
}
