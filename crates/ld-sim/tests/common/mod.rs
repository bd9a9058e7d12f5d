#![allow(dead_code)]

use std::path::Path;

use ld_config::{
    ConfigBundle, EnvironmentConfiguration, LaserConfiguration, MaterialConfiguration,
    MaterialSpec, ModelReference, TargetConfiguration,
};
use ld_solvers::{
    AnalyticStressSolver, AnalyticThermalSolver, BackendLease, FieldResult, LeaseGate,
    SolverBackend, SolverError, SolverInfo, SolverResult, StressSolver, ThermalSolver,
};

pub fn aluminum_6061_like() -> MaterialConfiguration {
    MaterialConfiguration {
        name: "aluminum-6061-like".to_string(),
        thermal_conductivity: 167.0,
        specific_heat: 896.0,
        density: 2700.0,
        melting_point: 933.0,
        absorption_coefficient: 0.15,
        youngs_modulus: None,
        poissons_ratio: None,
        thermal_expansion: None,
        yield_strength: None,
    }
}

/// Reference bundle with a real (dummy) model file under `dir`.
pub fn reference_bundle(dir: &Path, power_w: f64) -> ConfigBundle {
    let model = dir.join("panel.step");
    if !model.exists() {
        std::fs::write(&model, "ISO-10303-21;\nEND-ISO-10303-21;\n").unwrap();
    }
    ConfigBundle {
        laser_parameters: Some(LaserConfiguration::new(power_w, 1064.0, 5.0)),
        material_parameters: Some(MaterialSpec::Inline(aluminum_6061_like())),
        environment_parameters: Some(EnvironmentConfiguration::default()),
        target_parameters: Some(TargetConfiguration::default()),
        model_path: Some(model),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ThermalFault {
    DropCoordinates,
    Timeout,
}

/// Stand-in for an external FEM engine.
pub struct StubBackend {
    pub online: bool,
    pub fault: Option<ThermalFault>,
    pub gate: LeaseGate,
}

impl StubBackend {
    pub fn new(online: bool, fault: Option<ThermalFault>) -> Self {
        Self {
            online,
            fault,
            gate: LeaseGate::new(),
        }
    }
}

impl SolverBackend for StubBackend {
    fn name(&self) -> &str {
        "stub-fem"
    }

    fn version(&self) -> String {
        "9.9".to_string()
    }

    fn test_connection(&self) -> bool {
        self.online
    }

    fn checkout(&self) -> SolverResult<BackendLease> {
        self.gate.try_acquire(self.name())
    }

    fn thermal_solver(&self) -> Box<dyn ThermalSolver> {
        Box::new(StubThermal {
            inner: AnalyticThermalSolver::new(),
            fault: self.fault,
        })
    }

    fn stress_solver(&self) -> Box<dyn StressSolver> {
        Box::new(AnalyticStressSolver::new())
    }
}

struct StubThermal {
    inner: AnalyticThermalSolver,
    fault: Option<ThermalFault>,
}

impl ThermalSolver for StubThermal {
    fn name(&self) -> &str {
        "StubThermal"
    }

    fn initialize(
        &mut self,
        laser: &LaserConfiguration,
        material: &MaterialConfiguration,
        environment: &EnvironmentConfiguration,
        target: &TargetConfiguration,
    ) -> SolverResult<()> {
        self.inner.initialize(laser, material, environment, target)
    }

    fn solve(&self, model: &ModelReference) -> SolverResult<FieldResult> {
        match self.fault {
            None => self.inner.solve(model),
            Some(ThermalFault::DropCoordinates) => {
                let mut out = self.inner.solve(model)?;
                out.coordinates = None;
                Ok(out)
            }
            Some(ThermalFault::Timeout) => Err(SolverError::Timeout {
                backend: "stub-fem".to_string(),
                seconds: 30.0,
            }),
        }
    }

    fn info(&self) -> SolverInfo {
        self.inner.info()
    }
}
