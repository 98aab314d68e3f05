//! JAN-DHANRAKSHA Ledger Core - Rust Engine
//!
//! Transaction ledger state machine and rule engine for the welfare-fraud
//! monitoring console. Ingests batches of claim transactions, detects
//! cross-region duplicate-identity fraud clusters, applies a deterministic
//! tier-prioritized budget allocation, and simulates/recovers from ledger
//! integrity attacks.
//!
//! # Architecture
//!
//! - **models**: Domain types (LedgerRecord, FraudCluster, LedgerState, events)
//! - **ingest**: Batch producers (synthetic demo data, external claim mapping)
//! - **rules**: Cluster Detector and Budget Allocator
//! - **integrity**: Chain-link bookkeeping and the attack/recovery state machine
//! - **metrics**: Read-only dashboard aggregates
//! - **session**: SessionCoordinator - the sole mutation entry point
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (whole rupees)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Record status is only ever written by the rule components
//! 4. Chain linkage holds except while an attack simulation is active
//! 5. Every mutation computes a new collection and replaces it wholesale

// Module declarations
pub mod ingest;
pub mod integrity;
pub mod metrics;
pub mod models;
pub mod rng;
pub mod rules;
pub mod session;

// Re-exports for convenience
pub use ingest::{generate_demo_batch, map_claims, DemoBatchConfig, ExternalClaim};
pub use integrity::{
    chain_intact, verify_chain, ThreatReport, ThreatSeverity, GENESIS_TOKEN, NOMINAL_INTEGRITY,
};
pub use metrics::{DashboardMetrics, RiskBand};
pub use models::{
    cluster::FraudCluster,
    event::{EventLog, SessionEvent},
    record::{AuditEntry, IncomeTier, LedgerRecord, RecordStatus},
    state::{LedgerState, SystemState, SystemStatus},
};
pub use rng::DeterministicRng;
pub use rules::{allocate, apply_cross_region_rule, detect_clusters, AllocationOutcome};
pub use session::{
    AllocationSummary, FundRequest, SessionConfig, SessionCoordinator, SessionError, SessionMode,
    SessionSnapshot, SnapshotError,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn welfare_ledger_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::session::PySession>()?;
    Ok(())
}
