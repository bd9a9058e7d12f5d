//! Reference to the target geometry file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Recognized CAD exchange formats, lowercase and without the dot.
pub const SUPPORTED_MODEL_EXTENSIONS: &[&str] = &["step", "stp", "iges", "igs", "sat", "x_t"];

/// Decoding goes through [`ModelReference::new`], so a deserialized
/// reference always carries an allowed extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct ModelReference {
    path: PathBuf,
}

impl TryFrom<PathBuf> for ModelReference {
    type Error = ConfigError;

    fn try_from(path: PathBuf) -> ConfigResult<Self> {
        Self::new(path)
    }
}

impl From<ModelReference> for PathBuf {
    fn from(model: ModelReference) -> Self {
        model.path
    }
}

impl ModelReference {
    /// Checks the extension against the allow-list. Existence is not checked
    /// here; see [`ModelReference::ensure_exists`].
    pub fn new(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !SUPPORTED_MODEL_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConfigError::UnsupportedModelFormat {
                path: path.display().to_string(),
                extension,
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn ensure_exists(&self) -> ConfigResult<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(ConfigError::ModelNotFound {
                path: self.path.display().to_string(),
            })
        }
    }
}
