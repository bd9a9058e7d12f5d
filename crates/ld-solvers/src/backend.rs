//! Solver backends and exclusive checkout.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::{
    AnalyticStressSolver, AnalyticThermalSolver, SolverError, SolverResult, StressSolver,
    ThermalSolver,
};

/// A numerical engine able to hand out thermal and stress solvers.
///
/// A licensed engine is a single resource per run: callers `checkout` it
/// during preparation and hold the lease until the run ends.
pub trait SolverBackend: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> String;

    /// Cheap availability probe, consulted during preparation only.
    fn test_connection(&self) -> bool;

    fn checkout(&self) -> SolverResult<BackendLease>;

    fn thermal_solver(&self) -> Box<dyn ThermalSolver>;

    fn stress_solver(&self) -> Box<dyn StressSolver>;
}

/// Single-holder flag shared between a backend and its leases.
#[derive(Debug, Clone, Default)]
pub struct LeaseGate {
    held: Arc<AtomicBool>,
}

impl LeaseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, backend: &str) -> SolverResult<BackendLease> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(backend, "backend checkout refused, already leased");
            return Err(SolverError::BackendBusy {
                backend: backend.to_string(),
            });
        }
        debug!(backend, "backend checked out");
        Ok(BackendLease {
            backend: backend.to_string(),
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Exclusive use of a backend; released on drop.
#[derive(Debug)]
pub struct BackendLease {
    backend: String,
    held: Arc<AtomicBool>,
}

impl BackendLease {
    pub fn backend(&self) -> &str {
        &self.backend
    }
}

impl Drop for BackendLease {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        debug!(backend = %self.backend, "backend released");
    }
}

/// Closed-form reference backend. Always reachable.
#[derive(Debug, Clone, Default)]
pub struct AnalyticBackend {
    gate: LeaseGate,
}

impl AnalyticBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolverBackend for AnalyticBackend {
    fn name(&self) -> &str {
        "analytic"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn test_connection(&self) -> bool {
        true
    }

    fn checkout(&self) -> SolverResult<BackendLease> {
        self.gate.try_acquire(self.name())
    }

    fn thermal_solver(&self) -> Box<dyn ThermalSolver> {
        Box::new(AnalyticThermalSolver::new())
    }

    fn stress_solver(&self) -> Box<dyn StressSolver> {
        Box::new(AnalyticStressSolver::new())
    }
}
