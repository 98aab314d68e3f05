//! Session event logging for auditing.
//!
//! Every mutating operation the coordinator performs is recorded here, so an
//! officer can reconstruct what happened to the batch and when. Events carry
//! the operation's observable outcome, not internal intermediate state.

use crate::models::state::SystemStatus;
use serde::Serialize;

/// A session-level event capturing one mutating operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A batch replaced the record collection wholesale
    DatasetLoaded {
        source: String,
        records: usize,
        clusters: usize,
    },

    /// A citizen fund request appended one pending record
    RequestSubmitted {
        record_id: String,
        citizen_hash: String,
        amount: i64,
    },

    /// The global budget allocation pass ran
    BudgetApplied {
        budget: i64,
        remaining: i64,
        approved: usize,
        blocked: usize,
    },

    /// A citizen-scoped eligibility recalculation ran
    EligibilityRecalculated {
        citizen_hash: String,
        sub_budget: i64,
        remaining: i64,
    },

    /// Officer froze all claims of the last-known cluster set
    ClusterClaimsFrozen { citizens: usize, records: usize },

    /// An integrity attack simulation fired
    AttackSimulated {
        threat: String,
        severity: String,
        ledger_integrity: f64,
    },

    /// The system recovered from an attack simulation
    SystemRecovered { ledger_integrity: f64 },

    /// Officer manually overrode the operating status
    StatusOverridden {
        from: SystemStatus,
        to: SystemStatus,
    },

    /// The session data source mode changed
    ModeChanged { mode: String },

    /// Logout wiped the session
    SessionCleared,
}

/// Append-only log of session events
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn log(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// All events in occurrence order
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all events (logout)
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}
