//! ld-config: configuration model for laser damage runs.
//!
//! Every sub-configuration validates its own physical constraints. A
//! [`ConfigBundle`] is the raw input a caller hands to a run; building it
//! yields a fully validated [`SimulationConfig`].

pub mod bundle;
pub mod catalog;
pub mod environment;
pub mod laser;
pub mod material;
pub mod model;
pub mod target;

pub use bundle::{ConfigBundle, MaterialSpec, SimulationConfig};
pub use environment::EnvironmentConfiguration;
pub use laser::{BeamProfile, CONTINUOUS_WAVE, LaserConfiguration};
pub use material::MaterialConfiguration;
pub use model::{ModelReference, SUPPORTED_MODEL_EXTENSIONS};
pub use target::TargetConfiguration;

use ld_core::{LdError, ensure_non_negative, ensure_positive};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration section: {section}")]
    MissingSection { section: &'static str },

    #[error("Unsupported model format '{extension}' for {path}")]
    UnsupportedModelFormat { path: String, extension: String },

    #[error("Model file not found: {path}")]
    ModelNotFound { path: String },

    #[error("Unknown material preset: {name}")]
    UnknownMaterial { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<LdError> for ConfigError {
    fn from(err: LdError) -> Self {
        match err {
            LdError::NonFinite { what, value } => ConfigError::invalid(what, value, "must be finite"),
            LdError::OutOfRange { what, value, bound } => {
                ConfigError::invalid(what, value, &format!("must be {bound}"))
            }
            other => ConfigError::InvalidValue {
                field: String::new(),
                value: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

/// Rejects non-finite and non-positive values.
pub(crate) fn require_positive(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_positive(value, field)?;
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_non_negative(value, field)?;
    Ok(())
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<ConfigBundle> {
    let content = std::fs::read_to_string(path)?;
    let bundle: ConfigBundle = serde_yaml::from_str(&content)?;
    Ok(bundle)
}

pub fn save_yaml(path: &std::path::Path, bundle: &ConfigBundle) -> ConfigResult<()> {
    let content = serde_yaml::to_string(bundle)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ConfigResult<ConfigBundle> {
    let content = std::fs::read_to_string(path)?;
    let bundle: ConfigBundle = serde_json::from_str(&content)?;
    Ok(bundle)
}

pub fn save_json(path: &std::path::Path, bundle: &ConfigBundle) -> ConfigResult<()> {
    let content = serde_json::to_string_pretty(bundle)?;
    std::fs::write(path, content)?;
    Ok(())
}
