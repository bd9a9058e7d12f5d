//! Run storage API.
//!
//! Layout: `<root>/<run_id>/result.json`, optional `assessment.json`, and
//! whatever artifacts post-processing writes into the same directory.

use crate::report::AssessmentReport;
use crate::result::{ResultSummary, SimulationResult};
use crate::{ResultsError, ResultsResult};
use ld_core::RunId;
use std::fs;
use std::path::{Path, PathBuf};

const RESULT_FILE: &str = "result.json";
const ASSESSMENT_FILE: &str = "assessment.json";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &RunId) -> PathBuf {
        self.root_dir.join(run_id.to_string())
    }

    /// Run directory, created on demand, for side artifacts.
    pub fn artifact_dir(&self, run_id: &RunId) -> ResultsResult<PathBuf> {
        let dir = self.run_dir(run_id);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn has_run(&self, run_id: &RunId) -> bool {
        self.run_dir(run_id).join(RESULT_FILE).exists()
    }

    pub fn save_result(&self, result: &SimulationResult) -> ResultsResult<PathBuf> {
        let run_dir = self.artifact_dir(&result.id())?;
        let path = run_dir.join(RESULT_FILE);
        let json = serde_json::to_string_pretty(result)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load_result(&self, run_id: &RunId) -> ResultsResult<SimulationResult> {
        let path = self.run_dir(run_id).join(RESULT_FILE);

        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let result = serde_json::from_str(&content)?;
        Ok(result)
    }

    pub fn save_assessment(&self, report: &AssessmentReport) -> ResultsResult<PathBuf> {
        if !self.has_run(&report.run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: report.run_id.to_string(),
            });
        }
        let path = self.run_dir(&report.run_id).join(ASSESSMENT_FILE);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load_assessment(&self, run_id: &RunId) -> ResultsResult<AssessmentReport> {
        let path = self.run_dir(run_id).join(ASSESSMENT_FILE);

        if !path.exists() {
            return Err(ResultsError::AssessmentNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let report = serde_json::from_str(&content)?;
        Ok(report)
    }

    /// Summaries of every stored run, oldest first. Unreadable run
    /// directories are skipped.
    pub fn list_runs(&self) -> ResultsResult<Vec<ResultSummary>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Ok(run_id) = name.parse::<RunId>()
                && let Ok(result) = self.load_result(&run_id)
            {
                runs.push(result.summary());
            }
        }

        runs.sort_by_key(|s| s.timestamp);
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &RunId) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
