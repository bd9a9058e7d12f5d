//! ld-results: field containers, run results, damage artifacts and storage.

pub mod field;
pub mod hash;
pub mod metrics;
pub mod report;
pub mod result;
pub mod store;

pub use field::{Grid, ScalarField};
pub use hash::compute_config_hash;
pub use metrics::{DamageMetrics, PerformanceDegradation};
pub use report::{
    AssessmentReport, CapabilityDegradation, DamageDomain, DamageLevel, DomainBreakdown,
    DomainScore, DomainSeverity,
};
pub use result::{Provenance, ResultSummary, SimulationResult, SimulationStatus};
pub use store::RunStore;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Assessment not found for run {run_id}")]
    AssessmentNotFound { run_id: String },
}
