//! PyO3 wrapper for the SessionCoordinator
//!
//! This module provides the Python interface to the Rust rule engine.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::ingest::{DemoBatchConfig, ExternalClaim};
use crate::models::record::IncomeTier;
use crate::models::state::SystemStatus;
use crate::session::{FundRequest, SessionConfig, SessionCoordinator, SessionMode, SessionSnapshot};
use chrono::Utc;

/// Python wrapper for the Rust session coordinator
///
/// # Example (from Python)
///
/// ```python
/// from welfare_ledger_core_rs import Session
///
/// session = Session(42)
/// session.set_mode("demo")
/// print(session.metrics_json())
/// report = session.simulate_attack()
/// session.recover_system()
/// ```
#[pyclass(name = "Session")]
pub struct PySession {
    inner: SessionCoordinator,
}

#[pymethods]
impl PySession {
    /// Create a new session with the given RNG seed
    #[new]
    fn new(seed: u64) -> Self {
        PySession {
            inner: SessionCoordinator::new(SessionConfig::new(seed)),
        }
    }

    /// Record the login outcome of the backend's auth endpoint
    fn set_authenticated(&mut self, authenticated: bool) {
        self.inner.set_authenticated(authenticated);
    }

    /// Select the data source mode ("demo" or "live")
    fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        let mode = match mode {
            "demo" => SessionMode::Demo,
            "live" => SessionMode::Live,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown mode: {other} (expected 'demo' or 'live')"
                )))
            }
        };
        self.inner.set_mode(mode);
        Ok(())
    }

    /// Install a batch of external claim rows (JSON array of objects)
    ///
    /// Returns the number of installed records.
    fn load_claims_json(&mut self, claims_json: &str) -> PyResult<usize> {
        let claims: Vec<ExternalClaim> = serde_json::from_str(claims_json)
            .map_err(|e| PyValueError::new_err(format!("invalid claims payload: {e}")))?;
        self.inner.load_claims(&claims, Utc::now());
        Ok(self.inner.records().len())
    }

    /// Submit a citizen fund request; returns the new record ID
    fn submit_request(
        &mut self,
        citizen_id: &str,
        scheme: &str,
        region_code: &str,
        income_tier: &str,
        amount: i64,
    ) -> PyResult<String> {
        let income_tier = IncomeTier::parse(income_tier).ok_or_else(|| {
            PyValueError::new_err(format!("unknown income tier: {income_tier}"))
        })?;

        let request = FundRequest {
            citizen_id: citizen_id.to_string(),
            scheme: scheme.to_string(),
            region_code: region_code.to_string(),
            income_tier,
            amount,
            requested_at: Utc::now(),
        };
        self.inner
            .submit_request(&request)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Run the global budget pass; returns the allocation summary as JSON
    fn apply_budget(&mut self, budget: i64) -> PyResult<String> {
        let summary = self.inner.apply_budget(budget);
        serde_json::to_string(&summary).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Re-run eligibility for one citizen; returns the summary as JSON
    fn recalculate_citizen_eligibility(&mut self, citizen_hash: &str) -> PyResult<String> {
        let summary = self
            .inner
            .recalculate_citizen_eligibility(citizen_hash)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        serde_json::to_string(&summary).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Freeze all claims of the last-known cluster set; returns the number
    /// of affected records
    fn freeze_cluster_claims(&mut self) -> usize {
        self.inner.freeze_cluster_claims()
    }

    /// Fire the attack simulation; returns the threat report as JSON
    fn simulate_attack(&mut self) -> PyResult<String> {
        let report = self.inner.simulate_attack();
        serde_json::to_string(&report).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Recover from the attack simulation
    fn recover_system(&mut self) {
        self.inner.recover_system();
    }

    /// Manually override the operating status ("ACTIVE"/"PAUSED"/"FROZEN")
    fn set_system_status(&mut self, status: &str) -> PyResult<()> {
        let status = match status {
            "ACTIVE" => SystemStatus::Active,
            "PAUSED" => SystemStatus::Paused,
            "FROZEN" => SystemStatus::Frozen,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown system status: {other}"
                )))
            }
        };
        self.inner.set_system_status(status);
        Ok(())
    }

    /// Clear the session back to its initial state
    fn logout(&mut self) {
        self.inner.logout();
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    /// Current record collection as a JSON array
    fn records_json(&self) -> PyResult<String> {
        serde_json::to_string(self.inner.records())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Current fraud cluster list as a JSON array
    fn clusters_json(&self) -> PyResult<String> {
        serde_json::to_string(self.inner.clusters())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Dashboard metrics as a JSON object
    fn metrics_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.metrics())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Current operating status
    fn system_status(&self) -> String {
        self.inner.system().status().to_string()
    }

    /// Current ledger integrity percentage
    fn ledger_integrity(&self) -> f64 {
        self.inner.system().ledger_integrity()
    }

    /// Current attack flag
    fn is_under_attack(&self) -> bool {
        self.inner.system().under_attack()
    }

    /// Leftover budget of the most recent allocation run
    fn remaining_budget(&self) -> i64 {
        self.inner.system().remaining_budget()
    }

    /// Whether a batch is installed
    fn dataset_loaded(&self) -> bool {
        self.inner.dataset_loaded()
    }

    // ========================================================================
    // Persisted session surface
    // ========================================================================

    /// Capture the flat persisted session state as JSON
    fn snapshot_json(&self) -> PyResult<String> {
        let snapshot = self
            .inner
            .snapshot()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        serde_json::to_string(&snapshot).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Rebuild a session from a persisted snapshot
    #[staticmethod]
    fn restore_json(snapshot_json: &str) -> PyResult<PySession> {
        let snapshot: SessionSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| PyValueError::new_err(format!("invalid snapshot payload: {e}")))?;
        let inner = SessionCoordinator::restore(&snapshot, DemoBatchConfig::new(Utc::now()))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(PySession { inner })
    }
}
