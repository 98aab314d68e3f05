//! Session Coordinator
//!
//! All mutation funnels through this type. Each operation reads the current
//! collection, computes a new collection, and replaces it wholesale - a
//! failed operation leaves the last-known-good batch untouched.
//!
//! # Operation Flow
//!
//! ```text
//! set_mode / load_dataset / load_claims
//!     └─ ingest → cross-region rule → pause on any cluster
//! submit_request
//!     └─ validate → append chained record → cross-region rule (no pause)
//! apply_budget / recalculate_citizen_eligibility
//!     └─ budget allocator (global / citizen-scoped)
//! freeze_cluster_claims
//!     └─ re-apply last-known cluster set → pause
//! simulate_attack / recover_system / set_system_status
//!     └─ integrity state machine
//! logout
//!     └─ wipe everything
//! ```

use crate::ingest::{generate_demo_batch, map_claims, DemoBatchConfig, ExternalClaim};
use crate::integrity;
use crate::metrics::DashboardMetrics;
use crate::models::cluster::FraudCluster;
use crate::models::event::{EventLog, SessionEvent};
use crate::models::record::{IncomeTier, LedgerRecord, RecordStatus};
use crate::models::state::{LedgerState, SystemStatus};
use crate::rng::DeterministicRng;
use crate::rules::allocator::AllocationOutcome;
use crate::rules::cluster::{CROSS_REGION_NOTE, CROSS_REGION_RULE};
use crate::rules::{allocate, apply_cross_region_rule};
use crate::session::snapshot::{SessionSnapshot, SnapshotError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

/// Rule name under which citizen submissions annotate records
const CITIZEN_REQUEST_RULE: &str = "citizen-request";

const CITIZEN_REQUEST_NOTE: &str = "Citizen-initiated request pending eligibility review";

/// Scheme assigned when a request names none
const DEFAULT_REQUEST_SCHEME: &str = "Welfare Scheme";

/// Region assigned when a request names none
const DEFAULT_REQUEST_REGION: &str = "RG-00";

/// Data source selection for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Synthetic batch generated from the session seed
    Demo,
    /// Externally supplied claims (upload / claims endpoint)
    Live,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Demo => write!(f, "demo"),
            SessionMode::Live => write!(f, "live"),
        }
    }
}

/// Errors from coordinator operations
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("citizen id is required")]
    MissingCitizenId,

    #[error("request amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("no record found for citizen {0}")]
    UnknownCitizen(String),
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seed for the session RNG (demo data, chain tokens, attack jitter)
    pub rng_seed: u64,

    /// Demo batch shape
    pub demo: DemoBatchConfig,
}

impl SessionConfig {
    /// Standard configuration: 55-record demo batch anchored at now
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            demo: DemoBatchConfig::new(Utc::now()),
        }
    }

    /// Override the demo batch shape (builder pattern)
    pub fn with_demo(mut self, demo: DemoBatchConfig) -> Self {
        self.demo = demo;
        self
    }
}

/// A citizen-initiated fund request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRequest {
    pub citizen_id: String,
    pub scheme: String,
    pub region_code: String,
    pub income_tier: IncomeTier,
    /// Requested amount (i64 whole rupees, must be positive)
    pub amount: i64,
    pub requested_at: DateTime<Utc>,
}

/// Observable outcome of an allocation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub budget: i64,
    pub remaining_budget: i64,
    pub approved: usize,
    pub blocked: usize,
}

/// The session coordinator
///
/// # Example
///
/// ```
/// use welfare_ledger_core_rs::{SessionConfig, SessionCoordinator, SessionMode, SystemStatus};
///
/// let mut session = SessionCoordinator::new(SessionConfig::new(42));
/// session.set_mode(SessionMode::Demo);
///
/// // The demo batch always contains cross-region duplicates, so loading
/// // it pauses the system.
/// assert_eq!(session.system().status(), SystemStatus::Paused);
/// assert!(!session.clusters().is_empty());
///
/// let summary = session.apply_budget(500_000);
/// assert!(summary.remaining_budget <= 500_000);
/// ```
pub struct SessionCoordinator {
    session_id: Uuid,
    config: SessionConfig,
    mode: Option<SessionMode>,
    authenticated: bool,
    dataset_loaded: bool,
    state: LedgerState,
    /// Last-known cluster set; input to freeze_cluster_claims
    known_clusters: Vec<FraudCluster>,
    rng: DeterministicRng,
    events: EventLog,
}

impl SessionCoordinator {
    /// Create a fresh session in the initial state (ACTIVE, nominal
    /// integrity, no batch, no mode)
    pub fn new(config: SessionConfig) -> Self {
        let rng = DeterministicRng::new(config.rng_seed);
        Self {
            session_id: Uuid::new_v4(),
            config,
            mode: None,
            authenticated: false,
            dataset_loaded: false,
            state: LedgerState::new(),
            known_clusters: Vec::new(),
            rng,
            events: EventLog::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Unique identity of this session
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Selected data source mode, if any
    pub fn mode(&self) -> Option<SessionMode> {
        self.mode
    }

    /// Authentication flag (set by the external login collaborator)
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// True once a batch has been installed for the current mode
    pub fn dataset_loaded(&self) -> bool {
        self.dataset_loaded
    }

    /// Current record collection in creation order
    pub fn records(&self) -> &[LedgerRecord] {
        self.state.records()
    }

    /// System-state singleton
    pub fn system(&self) -> &crate::models::state::SystemState {
        self.state.system()
    }

    /// Last-known fraud cluster set
    pub fn clusters(&self) -> &[FraudCluster] {
        &self.known_clusters
    }

    /// Session event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Derived dashboard metrics, recomputed on every call
    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics::compute(self.state.records())
    }

    /// Record the authentication outcome of the external login collaborator
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    // ========================================================================
    // Mutation entry points
    // ========================================================================

    /// Select the data source mode and reset all derived state
    ///
    /// Demo mode generates and installs the synthetic batch immediately;
    /// Live mode clears the batch and waits for external claims.
    pub fn set_mode(&mut self, mode: SessionMode) {
        self.mode = Some(mode);
        self.state = LedgerState::new();
        self.known_clusters.clear();
        self.dataset_loaded = false;
        self.events.log(SessionEvent::ModeChanged {
            mode: mode.to_string(),
        });

        if mode == SessionMode::Demo {
            let batch = generate_demo_batch(&self.config.demo, &mut self.rng);
            self.install_dataset(batch, "demo");
        }
    }

    /// Replace the record collection wholesale with an external batch
    pub fn load_dataset(&mut self, records: Vec<LedgerRecord>) {
        self.install_dataset(records, "external");
    }

    /// Map external claim rows and install them as the current batch
    pub fn load_claims(&mut self, claims: &[ExternalClaim], loaded_at: DateTime<Utc>) {
        let records = map_claims(claims, loaded_at, &mut self.rng);
        self.install_dataset(records, "claims");
    }

    /// Append a citizen fund request as one pending record
    ///
    /// Validation failures reject the request without touching the batch.
    /// Detection re-runs so cluster flags stay consistent, but submission
    /// never pauses the system - only dataset loads do.
    pub fn submit_request(&mut self, request: &FundRequest) -> Result<String, SessionError> {
        let citizen = request.citizen_id.trim().to_uppercase();
        if citizen.is_empty() {
            return Err(SessionError::MissingCitizenId);
        }
        if request.amount <= 0 {
            return Err(SessionError::InvalidAmount(request.amount));
        }

        let scheme = match request.scheme.trim() {
            "" => DEFAULT_REQUEST_SCHEME,
            trimmed => trimmed,
        };
        let region = match request.region_code.trim() {
            "" => DEFAULT_REQUEST_REGION,
            trimmed => trimmed,
        };
        // Only the high-payout rule of the risk model applies to a fresh
        // request; claim history lives with the backend collaborator.
        let risk_score = if request.amount >= 5_000 { 10 } else { 0 };

        let record_id = self.state.next_record_id();
        let previous_hash = self.state.tail_hash();
        let current_hash = integrity::next_chain_token(&mut self.rng);

        let record = LedgerRecord::new(
            record_id.clone(),
            citizen.clone(),
            scheme.to_string(),
            region.to_string(),
            request.income_tier,
            request.amount,
            request.requested_at,
            previous_hash,
            current_hash,
        )
        .with_risk_score(risk_score)
        .with_audit_note(CITIZEN_REQUEST_RULE, CITIZEN_REQUEST_NOTE);

        let mut next = self.state.records().to_vec();
        next.push(record);
        let (next, clusters) = apply_cross_region_rule(next);

        self.events.log(SessionEvent::RequestSubmitted {
            record_id: record_id.clone(),
            citizen_hash: citizen,
            amount: request.amount,
        });
        self.state.replace_records(next);
        self.known_clusters = clusters;

        Ok(record_id)
    }

    /// Run the global budget pass over the whole batch (officer action)
    pub fn apply_budget(&mut self, budget: i64) -> AllocationSummary {
        let AllocationOutcome {
            records,
            remaining_budget,
            approved,
            blocked,
        } = allocate(self.state.records().to_vec(), budget);

        let mut system = self.state.system().clone();
        system.set_last_budget(budget);
        system.set_remaining_budget(remaining_budget);

        let summary = AllocationSummary {
            budget: budget.max(0),
            remaining_budget,
            approved,
            blocked,
        };
        self.events.log(SessionEvent::BudgetApplied {
            budget: summary.budget,
            remaining: remaining_budget,
            approved,
            blocked,
        });
        self.state.replace(records, system);

        summary
    }

    /// Re-run eligibility for one citizen's records only (citizen action)
    ///
    /// The sub-budget is the stored remaining budget when a global pass has
    /// run, otherwise the citizen's own sum of non-blocked amounts. Other
    /// citizens' records are never touched.
    pub fn recalculate_citizen_eligibility(
        &mut self,
        citizen_hash: &str,
    ) -> Result<AllocationSummary, SessionError> {
        let citizen = citizen_hash.trim().to_uppercase();
        if !self.state.has_citizen(&citizen) {
            return Err(SessionError::UnknownCitizen(citizen));
        }

        let sub_budget = match self.state.system().last_budget() {
            Some(_) => self.state.system().remaining_budget(),
            None => self.state.non_blocked_amount_for(&citizen),
        };

        let mut next = self.state.records().to_vec();
        let indices: Vec<usize> = next
            .iter()
            .enumerate()
            .filter(|(_, record)| record.citizen_hash() == citizen)
            .map(|(i, _)| i)
            .collect();
        let subset: Vec<LedgerRecord> = indices.iter().map(|&i| next[i].clone()).collect();

        let AllocationOutcome {
            records: updated_subset,
            remaining_budget,
            approved,
            blocked,
        } = allocate(subset, sub_budget);

        for (i, updated) in indices.into_iter().zip(updated_subset) {
            next[i] = updated;
        }

        let mut system = self.state.system().clone();
        system.set_remaining_budget(remaining_budget);

        self.events.log(SessionEvent::EligibilityRecalculated {
            citizen_hash: citizen,
            sub_budget,
            remaining: remaining_budget,
        });
        self.state.replace(next, system);

        Ok(AllocationSummary {
            budget: sub_budget,
            remaining_budget,
            approved,
            blocked,
        })
    }

    /// Re-apply pending status to all records of the last-known cluster set
    /// and pause the system (officer action)
    ///
    /// Uses the stored cluster set, deliberately not recomputed: the freeze
    /// targets what the officer saw.
    pub fn freeze_cluster_claims(&mut self) -> usize {
        let flagged: BTreeSet<&str> = self
            .known_clusters
            .iter()
            .map(|cluster| cluster.citizen_hash())
            .collect();

        let mut next = self.state.records().to_vec();
        let mut affected = 0;
        for record in &mut next {
            if flagged.contains(record.citizen_hash()) {
                record.set_status(RecordStatus::Pending);
                record.set_cluster_flag(true);
                record.annotate(CROSS_REGION_RULE, CROSS_REGION_NOTE);
                affected += 1;
            }
        }

        let mut system = self.state.system().clone();
        system.set_status(SystemStatus::Paused);

        self.events.log(SessionEvent::ClusterClaimsFrozen {
            citizens: self.known_clusters.len(),
            records: affected,
        });
        self.state.replace(next, system);

        affected
    }

    /// Fire the attack simulation
    pub fn simulate_attack(&mut self) -> integrity::ThreatReport {
        let mut records = self.state.records().to_vec();
        let mut system = self.state.system().clone();

        let report = integrity::simulate_attack(&mut records, &mut system, &mut self.rng);

        self.events.log(SessionEvent::AttackSimulated {
            threat: report.threat.clone(),
            severity: report.severity.to_string(),
            ledger_integrity: system.ledger_integrity(),
        });
        self.state.replace(records, system);

        report
    }

    /// Recover from the attack simulation
    pub fn recover_system(&mut self) {
        let mut records = self.state.records().to_vec();
        let mut system = self.state.system().clone();

        integrity::recover_system(&mut records, &mut system, &mut self.rng);

        self.events.log(SessionEvent::SystemRecovered {
            ledger_integrity: system.ledger_integrity(),
        });
        self.state.replace(records, system);
    }

    /// Manually override the operating status (officer action)
    ///
    /// Independent of the attack flag.
    pub fn set_system_status(&mut self, status: SystemStatus) {
        let from = self.state.system().status();
        if from == status {
            return;
        }

        self.state.system_mut().set_status(status);
        self.events
            .log(SessionEvent::StatusOverridden { from, to: status });
    }

    /// Clear everything back to the initial state
    pub fn logout(&mut self) {
        self.mode = None;
        self.authenticated = false;
        self.dataset_loaded = false;
        self.state = LedgerState::new();
        self.known_clusters.clear();
        self.events.clear();
        self.events.log(SessionEvent::SessionCleared);
    }

    // ========================================================================
    // Persisted session surface
    // ========================================================================

    /// Capture the flat persisted surface of this session
    ///
    /// The record collection is deliberately excluded: it is regenerated
    /// (demo) or re-fetched (live) on restore.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SnapshotError> {
        let mut snapshot = SessionSnapshot {
            authenticated: self.authenticated,
            mode: self.mode,
            system_status: self.state.system().status(),
            ledger_integrity: self.state.system().ledger_integrity(),
            under_attack: self.state.system().under_attack(),
            dataset_loaded: self.dataset_loaded,
            remaining_budget: self.state.system().remaining_budget(),
            rng_seed: self.config.rng_seed,
            checksum: String::new(),
        };
        snapshot.checksum = snapshot.compute_checksum()?;
        Ok(snapshot)
    }

    /// Rebuild a session from its persisted surface
    ///
    /// Verifies the checksum, regenerates the demo batch when the snapshot
    /// says one was loaded, and re-applies the persisted system fields.
    pub fn restore(
        snapshot: &SessionSnapshot,
        demo: DemoBatchConfig,
    ) -> Result<Self, SnapshotError> {
        snapshot.verify()?;

        let config = SessionConfig {
            rng_seed: snapshot.rng_seed,
            demo,
        };
        let mut session = Self::new(config);
        session.authenticated = snapshot.authenticated;

        if let Some(mode) = snapshot.mode {
            if snapshot.dataset_loaded {
                session.set_mode(mode);
            } else {
                session.mode = Some(mode);
            }
        }
        session.dataset_loaded = snapshot.dataset_loaded;

        let system = session.state.system_mut();
        system.set_status(snapshot.system_status);
        system.set_integrity(snapshot.ledger_integrity);
        system.set_under_attack(snapshot.under_attack);
        system.set_remaining_budget(snapshot.remaining_budget);

        Ok(session)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Install a batch: cross-region rule, pause on any cluster, bookkeeping
    fn install_dataset(&mut self, records: Vec<LedgerRecord>, source: &str) {
        let (records, clusters) = apply_cross_region_rule(records);

        let mut system = self.state.system().clone();
        if !clusters.is_empty() {
            system.set_status(SystemStatus::Paused);
        }

        self.events.log(SessionEvent::DatasetLoaded {
            source: source.to_string(),
            records: records.len(),
            clusters: clusters.len(),
        });
        self.state.replace(records, system);
        self.known_clusters = clusters;
        self.dataset_loaded = true;
    }
}
