//! Reduction of field results to scalar damage metrics.

use std::fs;
use std::path::{Path, PathBuf};

use ld_config::MaterialConfiguration;
use ld_core::RunId;
use ld_results::{DamageMetrics, SimulationResult};

use crate::{AssessError, AssessResult};

/// Assumed melt depth for surface-only fields, mm.
pub const NOMINAL_MELT_DEPTH_MM: f64 = 0.1;

/// Derives the raw damage metrics of `result` for `material`.
///
/// - area: surface cells above the melting point times the cell area
///   (unit cells when the result carries no grid)
/// - melting volume: area times [`NOMINAL_MELT_DEPTH_MM`]
/// - stress concentration: peak stress over yield strength
/// - damage depth: deepest melted layer for layered fields, the nominal
///   depth otherwise
///
/// Structural integrity and aerodynamic impact are left at their defaults.
/// Deterministic: the same inputs give bit-identical output.
pub fn derive_damage_metrics(
    result: &SimulationResult,
    material: &MaterialConfiguration,
    component: &str,
) -> AssessResult<DamageMetrics> {
    let temperature = result
        .temperature_field()
        .ok_or(AssessError::MissingField {
            what: "temperature field",
        })?;
    let melting_point = material.melting_point;

    let surface_melted = temperature
        .layers()
        .next()
        .map(|layer| layer.iter().filter(|t| **t > melting_point).count())
        .unwrap_or(0);

    let cell_area = result.grid().map(|g| g.cell_area_mm2()).unwrap_or(1.0);
    let thermal_damage_area = surface_melted as f64 * cell_area;
    let melting_volume = thermal_damage_area * NOMINAL_MELT_DEPTH_MM;

    let deepest_layer = temperature
        .layers()
        .enumerate()
        .filter(|(_, layer)| layer.iter().any(|t| *t > melting_point))
        .map(|(k, _)| k)
        .last();
    let damage_depth = match (deepest_layer, result.grid()) {
        (None, _) => 0.0,
        (Some(k), Some(grid)) if grid.is_3d() => grid.z(k).max(NOMINAL_MELT_DEPTH_MM),
        (Some(_), _) => NOMINAL_MELT_DEPTH_MM,
    };

    let stress_concentration =
        result.max_stress().unwrap_or(0.0) / material.effective_yield_strength();

    let affected_components = if thermal_damage_area > 0.0 {
        vec![component.to_string()]
    } else {
        Vec::new()
    };

    Ok(DamageMetrics {
        thermal_damage_area,
        melting_volume,
        stress_concentration,
        damage_depth,
        affected_components,
        ..Default::default()
    })
}

/// Writes `damage_metrics_<run>.json` into `dir` and returns its path.
pub fn persist_damage_metrics(
    metrics: &DamageMetrics,
    dir: &Path,
    run_id: &RunId,
) -> AssessResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("damage_metrics_{}.json", run_id.short()));
    let json = serde_json::to_string_pretty(metrics)?;
    fs::write(&path, json)?;
    Ok(path)
}
