//! The artifact threaded through and returned by a run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ld_core::{LdError, LdResult, RunId};
use serde::{Deserialize, Serialize};

use crate::field::{Grid, ScalarField};

/// Free-form per-stage bookkeeping (solver name, convergence flag, ...).
pub type Provenance = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl SimulationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SimulationStatus::Completed | SimulationStatus::Failed | SimulationStatus::Cancelled
        )
    }

    /// Forward-only: PENDING -> RUNNING -> one terminal state.
    pub fn can_transition_to(self, next: SimulationStatus) -> bool {
        matches!(
            (self, next),
            (SimulationStatus::Pending, SimulationStatus::Running)
                | (SimulationStatus::Running, SimulationStatus::Completed)
                | (SimulationStatus::Running, SimulationStatus::Failed)
                | (SimulationStatus::Running, SimulationStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimulationStatus::Pending => "PENDING",
            SimulationStatus::Running => "RUNNING",
            SimulationStatus::Completed => "COMPLETED",
            SimulationStatus::Failed => "FAILED",
            SimulationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar projection read by presentation and reporting layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSummary {
    pub id: RunId,
    pub status: SimulationStatus,
    pub max_temperature: Option<f64>,
    pub max_stress: Option<f64>,
    pub max_displacement: Option<f64>,
    pub computation_time_s: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Fields and their extrema are only set together through the setters, so a
/// populated extremum always agrees with its field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    id: RunId,
    timestamp: DateTime<Utc>,
    status: SimulationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature_field: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stress_field: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    von_mises_field: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    displacement_field: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    velocity_field: Option<ScalarField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pressure_field: Option<ScalarField>,

    max_temperature: Option<f64>,
    min_temperature: Option<f64>,
    max_stress: Option<f64>,
    max_displacement: Option<f64>,

    #[serde(default)]
    pub solver_info: BTreeMap<String, Provenance>,
    pub computation_time_s: Option<f64>,
    #[serde(default)]
    pub result_files: Vec<PathBuf>,
}

impl SimulationResult {
    pub fn new(id: RunId) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            status: SimulationStatus::Pending,
            started_at: None,
            finished_at: None,
            grid: None,
            temperature_field: None,
            stress_field: None,
            von_mises_field: None,
            displacement_field: None,
            velocity_field: None,
            pressure_field: None,
            max_temperature: None,
            min_temperature: None,
            max_stress: None,
            max_displacement: None,
            solver_info: BTreeMap::new(),
            computation_time_s: None,
            result_files: Vec::new(),
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// PENDING -> RUNNING, stamping the start time.
    pub fn mark_running(&mut self, now: DateTime<Utc>) -> LdResult<()> {
        self.transition(SimulationStatus::Running)?;
        self.started_at = Some(now);
        Ok(())
    }

    /// RUNNING -> terminal, stamping the end time. COMPLETED also records the
    /// elapsed wall time and requires a temperature field.
    pub fn finish(&mut self, status: SimulationStatus, now: DateTime<Utc>) -> LdResult<()> {
        if !status.is_terminal() {
            return Err(LdError::InvalidArg {
                what: "finish requires a terminal status",
            });
        }
        if status == SimulationStatus::Completed && self.temperature_field.is_none() {
            return Err(LdError::Invariant {
                what: "completed result without temperature field",
            });
        }
        self.transition(status)?;
        self.finished_at = Some(now);
        if status == SimulationStatus::Completed
            && let Some(start) = self.started_at
        {
            let elapsed = (now - start).to_std().unwrap_or_default();
            self.computation_time_s = Some(elapsed.as_secs_f64());
        }
        Ok(())
    }

    fn transition(&mut self, next: SimulationStatus) -> LdResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(LdError::Invariant {
                what: "status transitions are forward-only",
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = Some(grid);
    }

    pub fn temperature_field(&self) -> Option<&ScalarField> {
        self.temperature_field.as_ref()
    }

    pub fn set_temperature_field(&mut self, field: ScalarField) {
        self.max_temperature = field.max();
        self.min_temperature = field.min();
        self.temperature_field = Some(field);
    }

    pub fn stress_field(&self) -> Option<&ScalarField> {
        self.stress_field.as_ref()
    }

    pub fn von_mises_field(&self) -> Option<&ScalarField> {
        self.von_mises_field.as_ref()
    }

    /// Peak stress is taken from the von Mises field.
    pub fn set_stress_fields(&mut self, stress: ScalarField, von_mises: ScalarField) {
        self.max_stress = von_mises.max();
        self.stress_field = Some(stress);
        self.von_mises_field = Some(von_mises);
    }

    pub fn displacement_field(&self) -> Option<&ScalarField> {
        self.displacement_field.as_ref()
    }

    pub fn set_displacement_field(&mut self, field: ScalarField) {
        self.max_displacement = field.max_abs();
        self.displacement_field = Some(field);
    }

    pub fn velocity_field(&self) -> Option<&ScalarField> {
        self.velocity_field.as_ref()
    }

    pub fn set_velocity_field(&mut self, field: ScalarField) {
        self.velocity_field = Some(field);
    }

    pub fn pressure_field(&self) -> Option<&ScalarField> {
        self.pressure_field.as_ref()
    }

    pub fn set_pressure_field(&mut self, field: ScalarField) {
        self.pressure_field = Some(field);
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.max_temperature
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.min_temperature
    }

    pub fn max_stress(&self) -> Option<f64> {
        self.max_stress
    }

    pub fn max_displacement(&self) -> Option<f64> {
        self.max_displacement
    }

    pub fn record_provenance(&mut self, stage: impl Into<String>, info: Provenance) {
        self.solver_info.entry(stage.into()).or_default().extend(info);
    }

    pub fn add_result_file(&mut self, path: PathBuf) {
        if !self.result_files.contains(&path) {
            self.result_files.push(path);
        }
    }

    /// Re-checks the grid, the field/extremum pairing and the
    /// completed-has-temperature rule. Useful after deserializing a result
    /// from an untrusted store.
    pub fn check_invariants(&self) -> LdResult<()> {
        fn paired(
            field: Option<&ScalarField>,
            stored: Option<f64>,
            derive: fn(&ScalarField) -> Option<f64>,
            what: &'static str,
        ) -> LdResult<()> {
            match (field, stored) {
                (Some(f), Some(v)) if derive(f) != Some(v) => Err(LdError::Invariant { what }),
                (None, Some(_)) => Err(LdError::Invariant { what }),
                _ => Ok(()),
            }
        }

        if let Some(grid) = &self.grid {
            grid.validate()?;
        }

        paired(
            self.temperature_field.as_ref(),
            self.max_temperature,
            ScalarField::max,
            "max_temperature disagrees with temperature field",
        )?;
        paired(
            self.temperature_field.as_ref(),
            self.min_temperature,
            ScalarField::min,
            "min_temperature disagrees with temperature field",
        )?;
        paired(
            self.von_mises_field.as_ref(),
            self.max_stress,
            ScalarField::max,
            "max_stress disagrees with von Mises field",
        )?;
        paired(
            self.displacement_field.as_ref(),
            self.max_displacement,
            ScalarField::max_abs,
            "max_displacement disagrees with displacement field",
        )?;

        if self.status == SimulationStatus::Completed && self.temperature_field.is_none() {
            return Err(LdError::Invariant {
                what: "completed result without temperature field",
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            id: self.id,
            status: self.status,
            max_temperature: self.max_temperature,
            max_stress: self.max_stress,
            max_displacement: self.max_displacement,
            computation_time_s: self.computation_time_s,
            timestamp: self.timestamp,
        }
    }
}
