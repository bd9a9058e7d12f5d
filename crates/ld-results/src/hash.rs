//! Content hashing of run inputs for provenance and cache lookups.

use ld_config::SimulationConfig;
use sha2::{Digest, Sha256};

pub fn compute_config_hash(config: &SimulationConfig, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
