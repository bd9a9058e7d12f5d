use ld_results::SimulationStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Result is {status}, only COMPLETED results can be assessed")]
    NotCompleted { status: SimulationStatus },

    #[error("Result has no {what}")]
    MissingField { what: &'static str },

    #[error("Invalid assessment policy: {what}")]
    InvalidPolicy { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type AssessResult<T> = Result<T, AssessError>;
