use thiserror::Error;

pub type LdResult<T> = Result<T, LdError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Out of range: {what} = {value} (must be {bound})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        bound: &'static str,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Shape mismatch for {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
