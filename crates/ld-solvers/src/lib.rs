//! ld-solvers: numerical stages of the laser damage pipeline.
//!
//! Each stage is a trait so a real FEM backend can replace the analytic
//! reference implementations without touching the orchestrator. Stages
//! exchange [`FieldResult`] values: field arrays, the sampling grid and
//! provenance.

pub mod backend;
pub mod error;
pub mod field_result;
pub mod stress;
pub mod thermal;

pub use backend::{AnalyticBackend, BackendLease, LeaseGate, SolverBackend};
pub use error::{SolverError, SolverResult};
pub use field_result::{FieldResult, SolverInfo};
pub use stress::{AnalyticStressSolver, StressSolver};
pub use thermal::{AnalyticThermalSolver, ThermalSolver};
