//! Error types for solver stages and backends.

use ld_config::ConfigError;
use ld_core::LdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("{solver} used before initialize succeeded")]
    NotInitialized { solver: &'static str },

    #[error("Missing input: {what}")]
    MissingInput { what: String },

    #[error("Invalid geometry reference: {what}")]
    InvalidGeometry { what: String },

    #[error("Non-physical {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("Backend {backend} is checked out by another run")]
    BackendBusy { backend: String },

    #[error("Backend {backend} timed out after {seconds} s")]
    Timeout { backend: String, seconds: f64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Numeric error: {0}")]
    Core(#[from] LdError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Backend faults that a caller may retry later. Everything else is a
    /// defect in the inputs or the stage itself.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SolverError::BackendUnavailable { .. }
                | SolverError::BackendBusy { .. }
                | SolverError::Timeout { .. }
        )
    }

    pub fn is_backend_error(&self) -> bool {
        self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_faults_are_retryable() {
        assert!(
            SolverError::BackendBusy {
                backend: "fem".into()
            }
            .is_retryable()
        );
        assert!(
            SolverError::Timeout {
                backend: "fem".into(),
                seconds: 30.0
            }
            .is_retryable()
        );
        assert!(
            !SolverError::MissingInput {
                what: "coordinates".into()
            }
            .is_retryable()
        );
    }
}
