//! ld-sim: staged execution of laser damage simulations.
//!
//! A [`SimulationLifecycle`] implementation supplies the four phases
//! (validate, prepare, execute, post-process); the [`Orchestrator`] drives it
//! through the PENDING -> RUNNING -> terminal state machine, owns timing and
//! error translation, and guarantees scratch-file cleanup. The concrete
//! [`LaserDamagePipeline`] chains the thermal stage, the stress stage and
//! damage-metric derivation.

pub mod artifacts;
pub mod batch;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod scope;
pub mod service;
pub mod worker;

pub use batch::run_batch;
pub use context::{CancelToken, RunContext};
pub use error::{Phase, PostProcessIssue, SimulationError, StageError};
pub use lifecycle::{SimulationLifecycle, StageOutcome};
pub use orchestrator::{Orchestrator, OrchestratorOptions};
pub use pipeline::LaserDamagePipeline;
pub use progress::{ProgressEvent, ProgressSink, RunStage};
pub use scope::WorkingScope;
pub use service::{RunError, assess_stored, simulate_and_store, stored_effectiveness};
pub use worker::{RunWorker, WorkerMessage};
